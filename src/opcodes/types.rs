//! Core data model for the opcode table compiler
//!
//! An [`OpcodeDefinition`] is one parsed documentation row. The resolver
//! turns every group of definitions sharing an opcode byte into a
//! [`Timeline`] of [`ResolvedEntry`] values, newest version first.

use std::fmt;

use itertools::Itertools;

/// Highest VM version covered by the table
pub const MAX_VERSION: u8 = 9;

/// Mnemonic marking "no instruction at this byte for this version"
pub const ILLEGAL_MNEMONIC: &str = "-";

// =============================================================================
// Instruction family
// =============================================================================

/// Instruction family, the leftmost column of the documentation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionFamily {
    /// `0OP`
    ZeroOperand,
    /// `1OP`
    OneOperand,
    /// `2OP`
    TwoOperand,
    /// `VAR`
    Variable,
    /// `EXT`
    Extended,
}

impl InstructionFamily {
    /// Parse the family cell token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "0OP" => Some(InstructionFamily::ZeroOperand),
            "1OP" => Some(InstructionFamily::OneOperand),
            "2OP" => Some(InstructionFamily::TwoOperand),
            "VAR" => Some(InstructionFamily::Variable),
            "EXT" => Some(InstructionFamily::Extended),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            InstructionFamily::ZeroOperand => "0OP",
            InstructionFamily::OneOperand => "1OP",
            InstructionFamily::TwoOperand => "2OP",
            InstructionFamily::Variable => "VAR",
            InstructionFamily::Extended => "EXT",
        }
    }
}

impl fmt::Display for InstructionFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

// =============================================================================
// Operand shape
// =============================================================================

/// How many operands an instruction takes and how each is sized
///
/// Operand type ids in the emitted table follow the operand-type bits of
/// the instruction encoding: `0` large constant, `1` small constant,
/// `2` variable reference. `3` marks a variable operand count read from a
/// type byte (up to 4 operands) and `4` a double type byte (up to 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandShape {
    /// No operands
    None,
    /// One large constant
    Large,
    /// One small constant
    Small,
    /// One variable reference
    VariableRef,
    SmallSmall,
    SmallVariable,
    VariableSmall,
    VariableVariable,
    /// Variable operand count, at most 4
    VarCount,
    /// Variable operand count, at most 8 (`call_vs2`, `call_vn2`)
    DoubleVarCount,
    /// Extended-form marker; selects the extended namespace.
    /// Operands are encoded like [`OperandShape::VarCount`].
    Extended,
}

impl OperandShape {
    /// Resolve the operand form and argument list cells of one row.
    ///
    /// Returns `None` for any pair outside the closed vocabulary.
    pub fn from_cells(form: &str, args: &str) -> Option<Self> {
        match (form, args) {
            ("S", "") => Some(OperandShape::None),
            ("E", _) => Some(OperandShape::Extended),
            (_, "") => Some(OperandShape::None),
            (_, "L") => Some(OperandShape::Large),
            (_, "S") => Some(OperandShape::Small),
            (_, "V") => Some(OperandShape::VariableRef),
            (_, "S,S") => Some(OperandShape::SmallSmall),
            (_, "S,V") => Some(OperandShape::SmallVariable),
            (_, "V,S") => Some(OperandShape::VariableSmall),
            (_, "V,V") => Some(OperandShape::VariableVariable),
            (_, "?") => Some(OperandShape::VarCount),
            _ => None,
        }
    }

    /// Operand type ids written to the emitted table
    pub fn type_ids(self) -> &'static [u8] {
        match self {
            OperandShape::None => &[],
            OperandShape::Large => &[0],
            OperandShape::Small => &[1],
            OperandShape::VariableRef => &[2],
            OperandShape::SmallSmall => &[1, 1],
            OperandShape::SmallVariable => &[1, 2],
            OperandShape::VariableSmall => &[2, 1],
            OperandShape::VariableVariable => &[2, 2],
            OperandShape::VarCount | OperandShape::Extended => &[3],
            OperandShape::DoubleVarCount => &[4],
        }
    }

    pub fn is_extended(self) -> bool {
        matches!(self, OperandShape::Extended)
    }
}

// =============================================================================
// Version set
// =============================================================================

/// Set of VM versions (1 through [`MAX_VERSION`]) stored as a bitmask
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VersionSet(u16);

impl VersionSet {
    /// The empty set: a reserved or placeholder row
    pub const fn empty() -> Self {
        VersionSet(0)
    }

    /// Every version, 1 through 9
    pub fn all() -> Self {
        Self::starting_at(1)
    }

    /// `start` through 9 inclusive
    pub fn starting_at(start: u8) -> Self {
        (start.max(1)..=MAX_VERSION).collect()
    }

    /// Explicit list of versions; values outside 1..=9 are ignored
    pub fn of(versions: &[u8]) -> Self {
        versions.iter().copied().collect()
    }

    pub fn contains(self, version: u8) -> bool {
        (1..=MAX_VERSION).contains(&version) && self.0 & (1 << version) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest version in the set
    pub fn lowest(self) -> Option<u8> {
        self.iter().next()
    }

    /// Versions in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=MAX_VERSION).filter(move |v| self.contains(*v))
    }
}

impl FromIterator<u8> for VersionSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let bits = iter
            .into_iter()
            .filter(|v| (1..=MAX_VERSION).contains(v))
            .fold(0u16, |bits, v| bits | (1 << v));
        VersionSet(bits)
    }
}

impl fmt::Debug for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for VersionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(","))
    }
}

// =============================================================================
// Definitions and timelines
// =============================================================================

/// One opcode documentation row after cell inheritance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeDefinition {
    pub family: InstructionFamily,
    pub family_index: u8,
    pub opcode_byte: u8,
    pub operand_shape: OperandShape,
    /// Versions in which this exact definition is valid
    pub versions: VersionSet,
    pub stores_result: bool,
    pub has_branch: bool,
    /// Mnemonic as written, or [`ILLEGAL_MNEMONIC`]
    pub raw_mnemonic: String,
    /// Operand role labels from the usage column
    pub usage: Vec<String>,
}

impl OpcodeDefinition {
    /// Placeholder recording that a version retired the byte
    pub fn placeholder(family: InstructionFamily, opcode_byte: u8) -> Self {
        OpcodeDefinition {
            family,
            family_index: 0,
            opcode_byte,
            operand_shape: OperandShape::None,
            versions: VersionSet::empty(),
            stores_result: false,
            has_branch: false,
            raw_mnemonic: ILLEGAL_MNEMONIC.to_string(),
            usage: Vec::new(),
        }
    }

    pub fn is_illegal(&self) -> bool {
        self.raw_mnemonic == ILLEGAL_MNEMONIC
    }

    /// Mnemonic tagged with the first version of its original window,
    /// e.g. `not_v1`. Illegal and version-less rows keep the raw name.
    pub fn display_mnemonic(&self) -> String {
        match self.versions.lowest() {
            Some(lowest) if !self.is_illegal() => format!("{}_v{}", self.raw_mnemonic, lowest),
            _ => self.raw_mnemonic.clone(),
        }
    }
}

/// A definition that is authoritative from `version_start` onwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub version_start: u8,
    pub display_mnemonic: String,
    pub definition: OpcodeDefinition,
}

impl ResolvedEntry {
    pub fn new(definition: OpcodeDefinition, version_start: u8) -> Self {
        ResolvedEntry {
            version_start,
            display_mnemonic: definition.display_mnemonic(),
            definition,
        }
    }
}

/// Per-byte history of resolved entries, newest `version_start` first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<ResolvedEntry>,
}

impl Timeline {
    /// Wrap entries that are already in descending `version_start` order
    pub(crate) fn from_descending(entries: Vec<ResolvedEntry>) -> Self {
        debug_assert!(entries
            .windows(2)
            .all(|w| w[0].version_start > w[1].version_start));
        Timeline { entries }
    }

    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Authoritative entry for a target VM version: the first entry whose
    /// `version_start` does not exceed it. `None` when the byte did not
    /// exist yet in that version.
    pub fn lookup(&self, version: u8) -> Option<&ResolvedEntry> {
        self.entries.iter().find(|e| e.version_start <= version)
    }
}
