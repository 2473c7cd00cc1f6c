//! Table compilation error types.
//!
//! This module defines [`TableError`] and [`TableResult`]. Every variant
//! carries the 1-based line number of the offending row: generation is
//! all-or-nothing, so the first error aborts the run.

use std::fmt;

// =============================================================================
// TableResult and TableError
// =============================================================================

/// Errors raised while parsing the opcode documentation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Row split into a cell count that matches no known row shape
    UnexpectedColumnCount { line: usize, count: usize },

    /// Blank cell that needs a previous row to inherit from, but there is none
    MissingPrevious { line: usize, field: &'static str },

    /// Numeric cell that does not parse as a byte
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Instruction family cell outside `0OP`, `1OP`, `2OP`, `VAR`, `EXT`
    UnknownFamily { line: usize, token: String },

    /// Version token outside the closed vocabulary
    UnknownVersionToken { line: usize, token: String },

    /// Operand form / argument pair outside the closed vocabulary
    UnknownOperandShape {
        line: usize,
        form: String,
        args: String,
    },

    /// Usage cell that does not follow the cross-reference pattern
    UnmatchedUsage { line: usize, usage: String },
}

impl TableError {
    /// Line number of the row that failed
    pub fn line(&self) -> usize {
        match self {
            TableError::UnexpectedColumnCount { line, .. }
            | TableError::MissingPrevious { line, .. }
            | TableError::InvalidNumber { line, .. }
            | TableError::UnknownFamily { line, .. }
            | TableError::UnknownVersionToken { line, .. }
            | TableError::UnknownOperandShape { line, .. }
            | TableError::UnmatchedUsage { line, .. } => *line,
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::UnexpectedColumnCount { line, count } => {
                write!(f, "Invalid row {}: unexpected column count {}", line, count)
            }
            TableError::MissingPrevious { line, field } => {
                write!(
                    f,
                    "Invalid row {}: blank {} with no previous row to inherit from",
                    line, field
                )
            }
            TableError::InvalidNumber { line, field, value } => {
                write!(f, "Invalid row {}: {} '{}' is not a byte", line, field, value)
            }
            TableError::UnknownFamily { line, token } => {
                write!(f, "Invalid row {}: unknown instruction family '{}'", line, token)
            }
            TableError::UnknownVersionToken { line, token } => {
                write!(f, "Invalid row {}: unexpected version '{}'", line, token)
            }
            TableError::UnknownOperandShape { line, form, args } => {
                write!(f, "Invalid row {}: arg list '{}' / '{}'", line, form, args)
            }
            TableError::UnmatchedUsage { line, usage } => {
                write!(f, "Invalid row {}: usage string '{}'", line, usage)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Result type for table compilation
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_line_and_field() {
        let err = TableError::InvalidNumber {
            line: 42,
            field: "opcode byte",
            value: "x1".to_string(),
        };
        assert_eq!(err.line(), 42);
        assert_eq!(err.to_string(), "Invalid row 42: opcode byte 'x1' is not a byte");
    }

    #[test]
    fn test_display_version_token() {
        let err = TableError::UnknownVersionToken {
            line: 7,
            token: "7/2".to_string(),
        };
        assert!(err.to_string().contains("7/2"));
        assert!(err.to_string().contains("row 7"));
    }
}
