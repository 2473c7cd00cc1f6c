//! Version-range vocabulary of the documentation table
//!
//! The "V" column uses a small set of hand-written tokens instead of
//! literal version lists. The vocabulary is closed: [`version_set`]
//! returns `None` for anything it does not list, and callers turn that
//! into a fatal error.

use super::types::{VersionSet, MAX_VERSION};

/// Compound tokens and the versions they stand for
const COMPOUND_TOKENS: &[(&str, &[u8])] = &[
    ("5/3", &[3, 5]),
    ("1/-", &[1]),
    ("4/-", &[4]),
    ("5/-", &[5]),
    ("6/-", &[6]),
    ("1/4", &[1, 2, 3, 4]),
    ("4/6", &[4, 5, 6]),
    ("5/6", &[5, 6]),
    ("5/*", &[5, 6, 7, 8, 9]),
    ("6/*", &[6, 7, 8, 9]),
];

/// Dash variants used for "not defined" across the table
pub fn is_dash(token: &str) -> bool {
    matches!(token, "-" | "\u{2015}" | "\u{2014}")
}

/// Map a version cell token to its version set.
///
/// - blank: every version
/// - `n`: `n` through 9
/// - a dash: no version (reserved byte)
/// - one of the compound tokens above
pub fn version_set(token: &str) -> Option<VersionSet> {
    if token.is_empty() {
        return Some(VersionSet::all());
    }
    if is_dash(token) {
        return Some(VersionSet::empty());
    }
    if let [digit @ b'1'..=b'9'] = token.as_bytes() {
        let start = digit - b'0';
        debug_assert!(start <= MAX_VERSION);
        return Some(VersionSet::starting_at(start));
    }
    COMPOUND_TOKENS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, versions)| VersionSet::of(versions))
}
