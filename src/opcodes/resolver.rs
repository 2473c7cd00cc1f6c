//! Per-byte version resolution
//!
//! Several documentation rows can claim the same opcode byte: later VM
//! versions add, redefine or retire instructions. [`resolve_timeline`]
//! picks one authoritative definition per version and compresses the
//! result into a [`Timeline`], newest entry first.
//!
//! # Algorithm
//!
//! For each version `v` in 1..=9:
//!
//! 1. one candidate covers `v`: it wins, starting at `v`;
//! 2. several candidates cover `v`: the one whose own version set starts
//!    latest wins (first in source order on an exact tie);
//! 3. nothing covers `v` after something already did: an illegal
//!    placeholder starts at `v`;
//! 4. nothing covers `v` and nothing did before: `v` is skipped.
//!
//! Adjacent entries with the same display mnemonic then collapse into
//! the earliest one, and the sequence is reversed.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::trace;

use super::types::{OpcodeDefinition, ResolvedEntry, Timeline, MAX_VERSION};

/// Resolve all candidate definitions of one byte in one namespace
pub fn resolve_timeline(candidates: &[OpcodeDefinition]) -> Timeline {
    let mut ascending: Vec<ResolvedEntry> = Vec::with_capacity(MAX_VERSION as usize);

    for version in 1..=MAX_VERSION {
        match authoritative(candidates, version) {
            Some(definition) => ascending.push(ResolvedEntry::new(definition.clone(), version)),
            None if !ascending.is_empty() => {
                let first = &candidates[0];
                ascending.push(ResolvedEntry::new(
                    OpcodeDefinition::placeholder(first.family, first.opcode_byte),
                    version,
                ));
            }
            None => {}
        }
    }

    if ascending.len() <= 1 {
        return Timeline::from_descending(ascending);
    }

    let mut collapsed: Vec<ResolvedEntry> = ascending
        .into_iter()
        .dedup_by(|a, b| a.display_mnemonic == b.display_mnemonic)
        .collect();
    collapsed.reverse();

    if let Some(first) = candidates.first() {
        trace!(
            byte = first.opcode_byte,
            entries = collapsed.len(),
            newest = %collapsed[0].display_mnemonic,
            "resolved timeline"
        );
    }
    Timeline::from_descending(collapsed)
}

/// Resolve every group of a namespace
pub fn resolve_namespace(groups: &BTreeMap<u8, Vec<OpcodeDefinition>>) -> BTreeMap<u8, Timeline> {
    groups
        .iter()
        .map(|(byte, candidates)| (*byte, resolve_timeline(candidates)))
        .collect()
}

/// The candidate authoritative for `version`, if any.
///
/// Overlaps are settled in favour of the most recently introduced
/// definition: the highest lowest version wins.
fn authoritative(candidates: &[OpcodeDefinition], version: u8) -> Option<&OpcodeDefinition> {
    candidates
        .iter()
        .filter(|c| c.versions.contains(version))
        .reduce(|best, c| {
            if c.versions.lowest() > best.versions.lowest() {
                c
            } else {
                best
            }
        })
}
