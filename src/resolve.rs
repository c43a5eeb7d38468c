//! Matching abbreviated roll numbers (the last three digits) against the full roll numbers on the
//! attendance sheet.

use std::fmt;

use crate::models::AttendanceTable;

/// The number of trailing characters of a roll number that an abbreviated token is matched against.
pub const SUFFIX_LEN: usize = 3;

/// The result of resolving a single abbreviated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one roll number ends with the token.
    Matched(&'a str),
    /// No roll number ends with the token.
    NotFound,
    /// Several roll numbers end with the token, in row order.
    Ambiguous(Vec<&'a str>),
}

/// A per-token problem that causes the token to be skipped without aborting the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenWarning {
    NotFound {
        token: String,
    },
    Ambiguous {
        token: String,
        matches: Vec<String>,
    },
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::NotFound { token } => write!(
                f,
                "No roll number found ending with {token}. Please add the student first."
            ),
            TokenWarning::Ambiguous { token, matches } => write!(
                f,
                "Multiple roll numbers found ending with {token}: {}. Please use unique last three digits.",
                matches.join(", ")
            ),
        }
    }
}

/// Left-pads `token` with zeros to [`SUFFIX_LEN`] characters. Longer tokens are returned as-is.
pub fn normalize_token(token: &str) -> String {
    format!("{token:0>width$}", width = SUFFIX_LEN)
}

/// Returns the last [`SUFFIX_LEN`] characters of `roll_number`, or all of it if it is shorter.
pub fn roll_suffix(roll_number: &str) -> &str {
    match roll_number.char_indices().rev().nth(SUFFIX_LEN - 1) {
        Some((start, _)) => &roll_number[start..],
        None => roll_number,
    }
}

/// Resolves an abbreviated roll `token` against every roll number on the sheet.
pub fn resolve_abbreviated_roll<'a>(token: &str, table: &'a AttendanceTable) -> Resolution<'a> {
    let wanted = normalize_token(token);

    let mut matches: Vec<&str> = table
        .rows()
        .iter()
        .map(|row| row.roll_number.as_str())
        .filter(|roll| roll_suffix(roll) == wanted)
        .collect();

    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Matched(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}
