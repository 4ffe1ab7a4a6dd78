//! Builder for constructing a stage's progression engine.

use crate::builder::error::BuildError;
use crate::core::{FactSource, Gate, GateInputs, GatePredicateSet, Marker, StepVocabulary};
use crate::engine::ProgressionEngine;
use std::rc::Rc;

/// Builder for a progression engine with a fluent API.
///
/// The vocabulary always comes from `M::ALL`; the builder collects the
/// fact source, the stage-local state and the gates.
pub struct StageBuilder<M: Marker, L = ()> {
    facts: Option<Rc<dyn FactSource>>,
    locals: Option<L>,
    gates: GatePredicateSet<M, L>,
}

impl<M: Marker, L: 'static> StageBuilder<M, L> {
    pub fn new() -> Self {
        Self {
            facts: None,
            locals: None,
            gates: GatePredicateSet::new(),
        }
    }

    /// Set the session facts that gates consult (required).
    pub fn facts(mut self, facts: Rc<dyn FactSource>) -> Self {
        self.facts = Some(facts);
        self
    }

    /// Set the stage-local state (defaults to `L::default()`).
    pub fn locals(mut self, locals: L) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Add a gate on leaving `marker` forward.
    pub fn gate(mut self, marker: M, gate: Gate<L>) -> Self {
        self.gates.insert(marker, gate);
        self
    }

    /// Add a gate using a closure.
    pub fn when<F>(self, marker: M, name: impl Into<String>, predicate: F) -> Self
    where
        F: for<'a> Fn(&GateInputs<'a, L>) -> bool + 'static,
    {
        self.gate(marker, Gate::new(name, predicate))
    }

    /// Gate `marker` on a question or activity tag being complete.
    pub fn require_completed(self, marker: M, tag: impl Into<String>) -> Self {
        self.gate(marker, Gate::completed(tag))
    }

    /// Build the engine, positioned at the first marker.
    ///
    /// Locals set with [`locals`](Self::locals) are used, otherwise
    /// `L::default()`.
    pub fn build(mut self) -> Result<ProgressionEngine<M, L>, BuildError>
    where
        L: Default,
    {
        let locals = self.locals.take().unwrap_or_default();
        self.assemble(locals)
    }

    /// Build the engine with the given locals, for local state that has no
    /// sensible default.
    pub fn build_with_locals(self, locals: L) -> Result<ProgressionEngine<M, L>, BuildError> {
        self.assemble(locals)
    }

    fn assemble(self, locals: L) -> Result<ProgressionEngine<M, L>, BuildError> {
        let facts = self.facts.ok_or(BuildError::MissingFactSource)?;
        let vocabulary: StepVocabulary<M> =
            StepVocabulary::new().map_err(BuildError::InvalidVocabulary)?;

        tracing::debug!(
            markers = vocabulary.len(),
            gated = self.gates.len(),
            first = vocabulary.first().name(),
            "Built progression engine"
        );

        Ok(ProgressionEngine::from_parts(
            vocabulary, self.gates, facts, locals,
        ))
    }
}

impl<M: Marker, L: 'static> Default for StageBuilder<M, L> {
    fn default() -> Self {
        Self::new()
    }
}
