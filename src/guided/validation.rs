//! Input classification for the simulated terminal.
//!
//! Matching is deliberately strict: the exercise is "type the exact command",
//! not "approximate the intent". Only the submitted side is trimmed; internal
//! whitespace, case and flags must match byte for byte.

use crate::types::Outcome;

/// Classify a submission against the expected command.
pub fn classify(submitted: &str, expected: &str) -> Outcome {
    if submitted.trim() == expected {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// Whether a raw submission counts as a submission at all.
pub fn is_blank(submitted: &str) -> bool {
    submitted.trim().is_empty()
}
