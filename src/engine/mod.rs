//! Runtime progression through a stage.
//!
//! The engine owns the current and furthest markers, checks gates on
//! forward moves and notifies subscribers after every change. It is the
//! only place stage position is mutated.

mod progression;

pub use progression::{Direction, ProgressionEngine, TransitionOutcome};
