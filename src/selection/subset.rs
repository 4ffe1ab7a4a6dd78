//! Range-based subset predicates.

use super::error::RangeError;
use super::range::{compress_ranges, expand_ranges, validate_ranges, SelectionRange};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Predicate "the value of `field` lies in one of these ranges".
///
/// The ranges are always in compressed form, so membership is a binary
/// search. Deserialization validates that form.
///
/// # Example
///
/// ```rust
/// use guidepost::selection::MultiRangeSubset;
///
/// let subset = MultiRangeSubset::from_ids("student_id", [4, 5, 6, 10]);
/// assert_eq!(subset.ranges().len(), 2);
/// assert!(subset.contains(5));
/// assert!(!subset.contains(7));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSubset")]
pub struct MultiRangeSubset {
    field: String,
    ranges: Vec<SelectionRange>,
}

#[derive(Deserialize)]
struct RawSubset {
    field: String,
    ranges: Vec<SelectionRange>,
}

impl TryFrom<RawSubset> for MultiRangeSubset {
    type Error = RangeError;

    fn try_from(raw: RawSubset) -> Result<Self, Self::Error> {
        Self::new(raw.field, raw.ranges)
    }
}

impl MultiRangeSubset {
    /// Build from ranges that must already be in compressed form.
    pub fn new(field: impl Into<String>, ranges: Vec<SelectionRange>) -> Result<Self, RangeError> {
        validate_ranges(&ranges)?;
        Ok(Self {
            field: field.into(),
            ranges,
        })
    }

    /// Build from an arbitrary identifier set.
    pub fn from_ids<I>(field: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            field: field.into(),
            ranges: compress_ranges(ids),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// True when the subset selects nothing.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ranges
            .binary_search_by(|range| {
                if range.hi() < id {
                    Ordering::Less
                } else if range.lo() > id {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Every selected identifier, ascending.
    pub fn ids(&self) -> Vec<i64> {
        expand_ranges(&self.ranges).collect()
    }
}
