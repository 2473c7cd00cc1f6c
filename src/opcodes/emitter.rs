//! Fixed-size opcode tables and their textual rendering
//!
//! An [`OpcodeTable`] always has 256 slots, one per opcode byte. Rendering
//! produces a nested array literal for the interpreter source:
//!
//! ```text
//! STD_OPCODE_TABLE = [
//!   [], // 0
//!   [ // 1
//!     [1, "je_v1", [1, 1], false, true],
//!   ],
//!   ...
//! ]
//! ```
//!
//! Each entry is `[version_start, mnemonic, operand type ids, stores, branches]`.

use std::collections::BTreeMap;
use std::fmt::Write;

use itertools::Itertools;
use tracing::trace;

use super::grouping::Namespace;
use super::types::{ResolvedEntry, Timeline};

/// Slots per namespace, one per opcode byte
pub const SLOT_COUNT: usize = 256;

/// Rendering switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append `// <byte>` to every slot
    pub slot_comments: bool,
    /// Stop the array after the last populated slot
    pub trim_trailing_empty_slots: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            slot_comments: true,
            trim_trailing_empty_slots: false,
        }
    }
}

/// Resolved timelines of one namespace laid out by opcode byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeTable {
    namespace: Namespace,
    slots: Vec<Option<Timeline>>,
}

impl OpcodeTable {
    /// Build the 256 slots. Bytes without a timeline, or with an empty
    /// one, become empty slots.
    pub fn from_resolved(namespace: Namespace, resolved: &BTreeMap<u8, Timeline>) -> Self {
        let slots = (0..SLOT_COUNT)
            .map(|idx| {
                let byte = idx as u8;
                resolved.get(&byte).filter(|t| !t.is_empty()).cloned()
            })
            .collect();
        OpcodeTable { namespace, slots }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn slots(&self) -> &[Option<Timeline>] {
        &self.slots
    }

    pub fn slot(&self, byte: u8) -> Option<&Timeline> {
        self.slots[byte as usize].as_ref()
    }

    /// Authoritative entry for `byte` when running a version `version` story
    pub fn lookup(&self, byte: u8, version: u8) -> Option<&ResolvedEntry> {
        self.slot(byte).and_then(|timeline| timeline.lookup(version))
    }

    pub fn populated_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Render as a named nested array literal
    pub fn render(&self, name: &str, options: RenderOptions) -> String {
        let end = if options.trim_trailing_empty_slots {
            self.slots
                .iter()
                .rposition(Option::is_some)
                .map_or(0, |last| last + 1)
        } else {
            SLOT_COUNT
        };
        trace!(namespace = %self.namespace, name, slots = end, "rendering opcode table");

        let mut out = String::new();
        let _ = writeln!(out, "{} = [", name);
        for (idx, slot) in self.slots[..end].iter().enumerate() {
            match (slot, options.slot_comments) {
                (None, true) => {
                    let _ = writeln!(out, "  [], // {}", idx);
                }
                (None, false) => out.push_str("  [],\n"),
                (Some(timeline), comments) => {
                    if comments {
                        let _ = writeln!(out, "  [ // {}", idx);
                    } else {
                        out.push_str("  [\n");
                    }
                    for entry in timeline.entries() {
                        let _ = writeln!(out, "    {},", render_entry(entry));
                    }
                    out.push_str("  ],\n");
                }
            }
        }
        out.push(']');
        out
    }
}

/// `[version_start, "mnemonic", [type ids], stores, branches]`
fn render_entry(entry: &ResolvedEntry) -> String {
    let definition = &entry.definition;
    format!(
        "[{}, \"{}\", [{}], {}, {}]",
        entry.version_start,
        entry.display_mnemonic,
        definition.operand_shape.type_ids().iter().join(", "),
        definition.stores_result,
        definition.has_branch
    )
}
