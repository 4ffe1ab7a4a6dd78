//! Linked-view selection support.
//!
//! A selection made on one view is compressed into contiguous identifier
//! ranges and installed as a subset predicate on a linked dataset, with
//! feedback from that write suppressed.

pub mod error;
pub mod listener;
pub mod range;
pub mod subset;

pub use error::RangeError;
pub use listener::{
    IdAccessor, SelectionChanged, SelectionSyncListener, SubsetSink, SyncConfig, SyncOutcome,
};
pub use range::{compress_ranges, expand_ranges, validate_ranges, SelectionRange};
pub use subset::MultiRangeSubset;
