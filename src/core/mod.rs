//! Core lesson-progression types.
//!
//! This module contains the building blocks the engine is made of:
//! - Markers and their ordered vocabulary
//! - Gate predicates over injected session facts
//! - Step change records, subscriber lists and observable cells
//!
//! Everything here is single-threaded and synchronous.

mod change;
mod gate;
mod marker;
mod observable;
mod subscribers;
mod vocabulary;

pub use change::{ChangeKind, StepChange};
pub use gate::{CompletionLedger, FactSource, Gate, GateInputs, GatePredicateSet};
pub use marker::Marker;
pub use observable::Observable;
pub use subscribers::{SubscriberList, Subscription};
pub use vocabulary::{StepVocabulary, VocabularyError};
