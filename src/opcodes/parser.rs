//! Row parser for the opcode documentation table
//!
//! Each row becomes an [`OpcodeDefinition`]. Cells left blank by the
//! table's row spans are filled from the previously parsed definition,
//! which [`parse_table`] threads through a fold over the source lines.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::cells::{self, split_row, Cells, RowShape};
use super::error::{TableError, TableResult};
use super::types::{InstructionFamily, OpcodeDefinition, OperandShape, ILLEGAL_MNEMONIC};
use super::versions::{is_dash, version_set};

/// Cross-reference usage text: ``xref:...[`*mnemonic*`] operands...``
static USAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\[]+\[`\*([^*]+)\*`\]\s*(.*)$").expect("usage pattern is valid")
});

/// Calls whose operand list cannot be written in the table: they take a
/// double type byte and up to eight operands.
const DOUBLE_VAR_CALLS: &[&str] = &["call_vs2", "call_vn2"];

/// Parse every non-blank line of the table.
///
/// Line numbers in errors are 1-based positions in `source`. A row that
/// carries no opcode resets the inheritance context, so the row after it
/// must be self-contained.
pub fn parse_table(source: &str) -> TableResult<Vec<OpcodeDefinition>> {
    let (definitions, _) = source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, row)| !row.is_empty())
        .try_fold(
            (Vec::new(), None::<OpcodeDefinition>),
            |(mut definitions, previous), (line, row)| {
                let parsed = parse_row(line, row, previous.as_ref())?;
                if let Some(definition) = &parsed {
                    definitions.push(definition.clone());
                }
                Ok::<_, TableError>((definitions, parsed))
            },
        )?;

    debug!(definitions = definitions.len(), "parsed opcode table");
    Ok(definitions)
}

/// Parse one trimmed, non-blank row.
///
/// Returns `Ok(None)` for rows that carry no opcode: the escape-byte
/// note and rows whose family index or byte is a dash placeholder.
pub fn parse_row(
    line: usize,
    row: &str,
    previous: Option<&OpcodeDefinition>,
) -> TableResult<Option<OpcodeDefinition>> {
    let cells = split_row(row).map_err(|count| TableError::UnexpectedColumnCount { line, count })?;
    RowParser {
        line,
        cells,
        previous,
    }
    .parse()
}

struct RowParser<'a> {
    line: usize,
    cells: Cells<'a>,
    previous: Option<&'a OpcodeDefinition>,
}

impl<'a> RowParser<'a> {
    fn parse(&self) -> TableResult<Option<OpcodeDefinition>> {
        if self.cells.shape == RowShape::SentinelNote {
            trace!(line = self.line, "skipping extended opcode sentinel note");
            return Ok(None);
        }

        let family = self.family()?;
        let Some(family_index) = self.number(cells::NUMBER, "opcode number", |p| p.family_index)? else {
            trace!(line = self.line, "skipping placeholder opcode number");
            return Ok(None);
        };
        let Some(opcode_byte) = self.number(cells::BYTE, "opcode byte", |p| p.opcode_byte)? else {
            trace!(line = self.line, "skipping placeholder opcode byte");
            return Ok(None);
        };
        let operand_shape = self.operand_shape()?;

        let (versions, stores_result, has_branch) = if self.cells.shape == RowShape::ByteVariant {
            let previous = self.inherit("versions")?;
            (previous.versions, previous.stores_result, previous.has_branch)
        } else {
            let token = self.cells.token(cells::VERSION);
            let versions = version_set(token).ok_or_else(|| TableError::UnknownVersionToken {
                line: self.line,
                token: token.to_string(),
            })?;
            (
                versions,
                self.cells.token(cells::STORE).contains('*'),
                self.cells.token(cells::BRANCH).contains('*'),
            )
        };

        let (raw_mnemonic, usage) = self.usage()?;
        let operand_shape = match operand_shape {
            OperandShape::VarCount if DOUBLE_VAR_CALLS.contains(&raw_mnemonic.as_str()) => {
                OperandShape::DoubleVarCount
            }
            shape => shape,
        };

        Ok(Some(OpcodeDefinition {
            family,
            family_index,
            opcode_byte,
            operand_shape,
            versions,
            stores_result,
            has_branch,
            raw_mnemonic,
            usage,
        }))
    }

    fn inherit(&self, field: &'static str) -> TableResult<&'a OpcodeDefinition> {
        self.previous.ok_or(TableError::MissingPrevious {
            line: self.line,
            field,
        })
    }

    fn family(&self) -> TableResult<InstructionFamily> {
        match self.cells.token(cells::FAMILY) {
            "" => Ok(self.inherit("instruction family")?.family),
            token => InstructionFamily::from_token(token).ok_or_else(|| TableError::UnknownFamily {
                line: self.line,
                token: token.to_string(),
            }),
        }
    }

    /// Numeric byte column. `Ok(None)` is a dash placeholder.
    fn number(
        &self,
        column: usize,
        field: &'static str,
        inherited: impl Fn(&OpcodeDefinition) -> u8,
    ) -> TableResult<Option<u8>> {
        match self.cells.token(column) {
            "" => Ok(Some(inherited(self.inherit(field)?))),
            token if is_dash(token) => Ok(None),
            token => token.parse::<u8>().map(Some).map_err(|_| TableError::InvalidNumber {
                line: self.line,
                field,
                value: token.to_string(),
            }),
        }
    }

    fn operand_shape(&self) -> TableResult<OperandShape> {
        let form = self.cells.token(cells::FORM);
        if form.is_empty() {
            return Ok(self.inherit("operand form")?.operand_shape);
        }
        let args = self.cells.token(cells::ARGS);
        OperandShape::from_cells(form, args).ok_or_else(|| TableError::UnknownOperandShape {
            line: self.line,
            form: form.to_string(),
            args: args.to_string(),
        })
    }

    fn usage(&self) -> TableResult<(String, Vec<String>)> {
        let usage = self.cells.raw(cells::USAGE).trim();
        if usage == "_illegal_" || is_dash(usage) {
            return Ok((ILLEGAL_MNEMONIC.to_string(), Vec::new()));
        }
        if usage.is_empty() {
            let previous = self.inherit("usage")?;
            return Ok((previous.raw_mnemonic.clone(), previous.usage.clone()));
        }

        let captures = USAGE_PATTERN
            .captures(usage)
            .ok_or_else(|| TableError::UnmatchedUsage {
                line: self.line,
                usage: usage.to_string(),
            })?;
        let mnemonic = captures[1].to_string();
        let operands = captures
            .get(2)
            .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Ok((mnemonic, operands))
    }
}
