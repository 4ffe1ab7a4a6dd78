//! Guidepost: guided-sequence progression for interactive lessons
//!
//! A lesson stage is an ordered list of markers. The progression engine
//! tracks which marker is current and the furthest one reached, lets the
//! user move forward only when the current marker's gates hold, and tells
//! subscribers about every change. Views decide what to show by asking
//! whether the current marker lies in a window of markers.
//!
//! Alongside the engine, the `selection` module compresses a set of selected
//! identifiers into contiguous ranges and keeps a linked view's subset in
//! step with a selection, without feeding its own writes back to itself.
//!
//! # Core Concepts
//!
//! - **Marker**: a closed, ordered enum of steps declared with `marker_enum!`
//! - **Gates**: named predicates over session facts and stage-local state
//! - **Engine**: linear and jump transitions with change notifications
//! - **Checkpoint**: a serializable snapshot an external store may keep
//!
//! # Example
//!
//! ```rust
//! use guidepost::builder::StageBuilder;
//! use guidepost::core::{CompletionLedger, FactSource};
//! use guidepost::engine::TransitionOutcome;
//! use guidepost::marker_enum;
//! use std::rc::Rc;
//!
//! marker_enum! {
//!     enum Step { Intro, Question, Summary }
//! }
//!
//! let ledger = Rc::new(CompletionLedger::new());
//! let facts: Rc<dyn FactSource> = ledger.clone();
//! let engine = StageBuilder::<Step>::new()
//!     .facts(facts)
//!     .require_completed(Step::Question, "intro-mc1")
//!     .build()
//!     .unwrap();
//!
//! engine.transition_next();
//! assert_eq!(engine.transition_next(), TransitionOutcome::Blocked { at: Step::Question });
//!
//! ledger.mark_completed("intro-mc1");
//! engine.transition_next();
//! assert!(engine.is_at_or_after(Step::Summary));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod selection;
pub mod stages;

// Re-export commonly used types
pub use crate::builder::{BuildError, StageBuilder};
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{ChangeKind, CompletionLedger, FactSource, Gate, Marker, Observable, StepChange};
pub use crate::engine::{Direction, ProgressionEngine, TransitionOutcome};
pub use crate::selection::{compress_ranges, MultiRangeSubset, SelectionRange, SelectionSyncListener};
