//! Opcode table compiler
//!
//! Turns the Z-machine opcode documentation table into two flat,
//! version-aware dispatch tables. The pipeline runs leaves first:
//!
//! 1. [`parser`]: rows to [`OpcodeDefinition`]s, inheriting spanned cells
//! 2. [`grouping`]: definitions to standard / extended groups by byte
//! 3. [`resolver`]: each group to a [`Timeline`], newest version first
//! 4. [`emitter`]: timelines to two 256-slot [`OpcodeTable`]s
//!
//! The whole pipeline is a pure function of the input text.

pub mod cells;
pub mod emitter;
pub mod error;
pub mod grouping;
pub mod parser;
pub mod resolver;
pub mod types;
pub mod versions;

use tracing::debug;

pub use emitter::{OpcodeTable, RenderOptions, SLOT_COUNT};
pub use error::{TableError, TableResult};
pub use grouping::{group_definitions, GroupedDefinitions, Namespace, EXTENDED_ESCAPE_BYTE};
pub use parser::{parse_row, parse_table};
pub use resolver::{resolve_namespace, resolve_timeline};
pub use types::{
    InstructionFamily, OpcodeDefinition, OperandShape, ResolvedEntry, Timeline, VersionSet,
    ILLEGAL_MNEMONIC, MAX_VERSION,
};

/// Both namespace tables of one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTables {
    pub standard: OpcodeTable,
    pub extended: OpcodeTable,
}

impl CompiledTables {
    pub fn table(&self, namespace: Namespace) -> &OpcodeTable {
        match namespace {
            Namespace::Standard => &self.standard,
            Namespace::Extended => &self.extended,
        }
    }

    /// Populated slot counts as `(standard, extended)`
    pub fn populated_slots(&self) -> (usize, usize) {
        (self.standard.populated_slots(), self.extended.populated_slots())
    }
}

/// Parse, group and resolve a documentation table
pub fn compile_tables(source: &str) -> TableResult<CompiledTables> {
    let grouped = group_definitions(parse_table(source)?);

    let standard = OpcodeTable::from_resolved(Namespace::Standard, &resolve_namespace(&grouped.standard));
    let extended = OpcodeTable::from_resolved(Namespace::Extended, &resolve_namespace(&grouped.extended));
    let tables = CompiledTables { standard, extended };

    let (standard_slots, extended_slots) = tables.populated_slots();
    debug!(standard_slots, extended_slots, "compiled opcode tables");
    Ok(tables)
}
