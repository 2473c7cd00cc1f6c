//! Namespace partitioning
//!
//! Definitions with the extended operand form live in the extended
//! table (reached through escape byte 190); everything else is in the
//! standard table. Both are keyed by raw opcode byte.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::types::OpcodeDefinition;

/// Opcode byte of the escape into the extended table (0OP:14)
pub const EXTENDED_ESCAPE_BYTE: u8 = 0xBE;

/// One of the two independent opcode tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Standard,
    Extended,
}

impl Namespace {
    pub fn of(definition: &OpcodeDefinition) -> Self {
        if definition.operand_shape.is_extended() {
            Namespace::Extended
        } else {
            Namespace::Standard
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Namespace::Standard => write!(f, "standard"),
            Namespace::Extended => write!(f, "extended"),
        }
    }
}

/// Definitions grouped by namespace and opcode byte, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedDefinitions {
    pub standard: BTreeMap<u8, Vec<OpcodeDefinition>>,
    pub extended: BTreeMap<u8, Vec<OpcodeDefinition>>,
}

impl GroupedDefinitions {
    pub fn namespace(&self, namespace: Namespace) -> &BTreeMap<u8, Vec<OpcodeDefinition>> {
        match namespace {
            Namespace::Standard => &self.standard,
            Namespace::Extended => &self.extended,
        }
    }
}

/// Stable partition of parsed definitions. No resolution happens here.
pub fn group_definitions(definitions: impl IntoIterator<Item = OpcodeDefinition>) -> GroupedDefinitions {
    let mut grouped = GroupedDefinitions::default();
    for definition in definitions {
        let target = match Namespace::of(&definition) {
            Namespace::Standard => &mut grouped.standard,
            Namespace::Extended => &mut grouped.extended,
        };
        target.entry(definition.opcode_byte).or_default().push(definition);
    }

    debug!(
        standard = grouped.standard.len(),
        extended = grouped.extended.len(),
        "grouped definitions by opcode byte"
    );
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::types::{InstructionFamily, OperandShape, VersionSet};

    fn definition(byte: u8, mnemonic: &str, shape: OperandShape) -> OpcodeDefinition {
        OpcodeDefinition {
            family: InstructionFamily::Variable,
            family_index: 0,
            opcode_byte: byte,
            operand_shape: shape,
            versions: VersionSet::all(),
            stores_result: false,
            has_branch: false,
            raw_mnemonic: mnemonic.to_string(),
            usage: Vec::new(),
        }
    }

    #[test]
    fn test_partition_by_operand_form() {
        let grouped = group_definitions(vec![
            definition(0, "je", OperandShape::SmallSmall),
            definition(0, "save", OperandShape::Extended),
            definition(228, "sread", OperandShape::VarCount),
        ]);
        assert_eq!(grouped.standard.keys().copied().collect::<Vec<_>>(), vec![0, 228]);
        assert_eq!(grouped.extended.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(grouped.namespace(Namespace::Extended)[&0][0].raw_mnemonic, "save");
    }

    #[test]
    fn test_partition_is_stable() {
        let grouped = group_definitions(vec![
            definition(228, "sread", OperandShape::VarCount),
            definition(229, "print_char", OperandShape::VarCount),
            definition(228, "aread", OperandShape::VarCount),
        ]);
        let names: Vec<&str> = grouped.standard[&228]
            .iter()
            .map(|d| d.raw_mnemonic.as_str())
            .collect();
        assert_eq!(names, vec!["sread", "aread"]);
    }

    #[test]
    fn test_empty_input() {
        let grouped = group_definitions(Vec::new());
        assert!(grouped.standard.is_empty());
        assert!(grouped.extended.is_empty());
    }
}
