//! Compression of discrete identifier sets into contiguous ranges.

use super::error::RangeError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Closed interval `[lo, hi]` of identifiers.
///
/// Deserialization goes through [`SelectionRange::new`], so inverted
/// bounds are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct SelectionRange {
    lo: i64,
    hi: i64,
}

#[derive(Deserialize)]
struct RawRange {
    lo: i64,
    hi: i64,
}

impl TryFrom<RawRange> for SelectionRange {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.lo, raw.hi)
    }
}

impl SelectionRange {
    pub fn new(lo: i64, hi: i64) -> Result<Self, RangeError> {
        if lo > hi {
            return Err(RangeError::Inverted { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Range covering exactly one identifier.
    pub fn single(id: i64) -> Self {
        Self { lo: id, hi: id }
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.lo, self.hi)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.lo <= id && id <= self.hi
    }

    /// Number of identifiers covered, saturating at `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.hi.abs_diff(self.lo).saturating_add(1)
    }

    pub fn ids(&self) -> RangeInclusive<i64> {
        self.lo..=self.hi
    }
}

/// Compress a set of identifiers into the minimal list of closed ranges.
///
/// Input may be unordered and contain duplicates. Output ranges are sorted
/// by `lo`, pairwise disjoint and never adjacent: within a run,
/// `id - position` is constant, and a new range starts wherever it jumps.
///
/// # Example
///
/// ```rust
/// use guidepost::selection::compress_ranges;
///
/// let ranges: Vec<(i64, i64)> = compress_ranges([10, 1, 2, 3, 7, 8, 2])
///     .iter()
///     .map(|range| range.bounds())
///     .collect();
///
/// assert_eq!(ranges, vec![(1, 3), (7, 8), (10, 10)]);
/// assert!(compress_ranges(Vec::<i64>::new()).is_empty());
/// ```
pub fn compress_ranges<I>(ids: I) -> Vec<SelectionRange>
where
    I: IntoIterator<Item = i64>,
{
    let mut sorted: Vec<i64> = ids.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<SelectionRange> = Vec::new();
    for id in sorted {
        match ranges.last_mut() {
            Some(range) if range.hi.checked_add(1) == Some(id) => range.hi = id,
            _ => ranges.push(SelectionRange::single(id)),
        }
    }
    ranges
}

/// Expand ranges back into individual identifiers, in order.
pub fn expand_ranges(ranges: &[SelectionRange]) -> impl Iterator<Item = i64> + '_ {
    ranges.iter().flat_map(SelectionRange::ids)
}

/// Check that `ranges` is in compressed form: ascending, disjoint and
/// non-adjacent.
pub fn validate_ranges(ranges: &[SelectionRange]) -> Result<(), RangeError> {
    for pair in ranges.windows(2) {
        let (previous, range) = (pair[0], pair[1]);
        if range.lo < previous.lo {
            return Err(RangeError::Unordered {
                previous_lo: previous.lo,
                lo: range.lo,
            });
        }
        if range.lo <= previous.hi.saturating_add(1) {
            return Err(RangeError::NotDisjoint {
                previous_hi: previous.hi,
                lo: range.lo,
            });
        }
    }
    Ok(())
}
