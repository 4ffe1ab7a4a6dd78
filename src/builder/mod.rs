//! Builder API for ergonomic stage construction.
//!
//! This module provides the fluent `StageBuilder` and the `marker_enum!`
//! macro for declaring a stage's markers with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod stage;

pub use error::BuildError;
pub use stage::StageBuilder;

use crate::core::{CompletionLedger, FactSource, Marker};
use crate::engine::ProgressionEngine;
use std::rc::Rc;

/// Build an ungated engine over `M` with a fresh, empty completion ledger.
///
/// Returns the ledger too so callers can record completions later.
///
/// # Example
///
/// ```
/// use guidepost::builder::ungated_stage;
/// use guidepost::marker_enum;
///
/// marker_enum! {
///     enum Step { Start, End }
/// }
///
/// let (engine, _ledger) = ungated_stage::<Step>().unwrap();
/// assert_eq!(engine.current(), Step::Start);
/// ```
pub fn ungated_stage<M: Marker>(
) -> Result<(ProgressionEngine<M>, Rc<CompletionLedger>), BuildError> {
    let ledger = Rc::new(CompletionLedger::new());
    let facts: Rc<dyn FactSource> = ledger.clone();
    let engine = StageBuilder::new().facts(facts).build()?;
    Ok((engine, ledger))
}
