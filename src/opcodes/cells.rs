//! Row splitting primitives for AsciiDoc pipe tables
//!
//! The opcode table uses row-spanning cells (`.3+|`), so a physical row
//! carries only the cells that are not covered by a span from above.
//! [`split_row`] recognizes the four row shapes that occur and lays
//! their cells out on the full twelve-column grid, leaving covered cells
//! blank for the parser to inherit.

use std::sync::LazyLock;

use regex::Regex;

/// Number of columns in a full row, including the leading span marker cell
pub const FULL_WIDTH: usize = 12;

pub const FAMILY: usize = 1;
pub const NUMBER: usize = 2;
pub const BYTE: usize = 3;
pub const FORM: usize = 6;
pub const ARGS: usize = 7;
pub const VERSION: usize = 8;
pub const STORE: usize = 9;
pub const BRANCH: usize = 10;
pub const USAGE: usize = 11;

/// Span and alignment markers such as `.3+`, `.2+^`, `^`, `_`
static FORMAT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\.\d+\+)?[\^<>_]?$").expect("format marker pattern is valid")
});

/// Layout of a physical row, keyed by its cell count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Twelve cells: every column present
    Full,
    /// Six cells: another byte of the same instruction. Byte, hex, binary,
    /// form and argument columns are new; everything else continues from
    /// the row above, including versions and flags.
    ByteVariant,
    /// Five cells: another version of the same byte. Version, store,
    /// branch and usage columns are new.
    VersionVariant,
    /// Ten cells: another byte with its own version, flags and usage.
    /// Only family and family index continue.
    ByteAndVersionVariant,
    /// Two cells naming the extended-opcode escape byte; carries no opcode
    SentinelNote,
}

/// A row laid out on the full grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cells<'a> {
    pub shape: RowShape,
    cells: [&'a str; FULL_WIDTH],
}

impl<'a> Cells<'a> {
    /// Raw cell text, untrimmed
    pub fn raw(&self, column: usize) -> &'a str {
        self.cells[column]
    }

    /// Content token of a cell, see [`cell_token`]
    pub fn token(&self, column: usize) -> &'a str {
        cell_token(self.cells[column])
    }
}

/// Split a trimmed row into cells and place them on the twelve-column grid.
///
/// Returns the raw cell count when it matches no known shape.
pub fn split_row(row: &str) -> Result<Cells<'_>, usize> {
    let raw: Vec<&str> = row.split('|').collect();
    let mut cells = [""; FULL_WIDTH];

    let shape = match raw.len() {
        FULL_WIDTH => {
            cells.copy_from_slice(&raw);
            RowShape::Full
        }
        6 => {
            cells[BYTE..=ARGS].copy_from_slice(&raw[1..6]);
            RowShape::ByteVariant
        }
        5 => {
            cells[VERSION..=USAGE].copy_from_slice(&raw[1..5]);
            RowShape::VersionVariant
        }
        10 => {
            cells[BYTE..=USAGE].copy_from_slice(&raw[1..10]);
            RowShape::ByteAndVersionVariant
        }
        2 if row.contains("0xbe") => RowShape::SentinelNote,
        count => return Err(count),
    };

    Ok(Cells { shape, cells })
}

/// Content token of a cell: the first whitespace-separated word, or the
/// empty string when the cell is blank or holds only a span marker.
pub fn cell_token(cell: &str) -> &str {
    let token = cell.split_whitespace().next().unwrap_or("");
    if FORMAT_MARKER.is_match(token) {
        ""
    } else {
        token
    }
}
