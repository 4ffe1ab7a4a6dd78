//! Errors for malformed range lists.

use thiserror::Error;

/// A range or range list that breaks the compressed-form invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Range lower bound {lo} exceeds upper bound {hi}")]
    Inverted { lo: i64, hi: i64 },

    #[error("Range starting at {lo} precedes the previous range starting at {previous_lo}")]
    Unordered { previous_lo: i64, lo: i64 },

    #[error("Range starting at {lo} overlaps or touches the previous range ending at {previous_hi}")]
    NotDisjoint { previous_hi: i64, lo: i64 },
}
