//! Gate predicates for controlling forward progression.
//!
//! Gates are pure boolean functions over externally owned facts and the
//! stage's local state. They are evaluated fresh on every transition
//! attempt; nothing is cached, since the facts they read can change between
//! attempts.

use super::marker::Marker;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Read-only view of session facts that gates consult.
///
/// Implemented by whatever owns answer records for the session. The engine
/// never writes through it.
pub trait FactSource {
    /// Whether the question or activity identified by `tag` is complete.
    fn has_completed(&self, tag: &str) -> bool;
}

/// In-memory `FactSource` backed by a set of completed tags.
///
/// Uses interior mutability so the same ledger can be shared with an engine
/// and updated as answers arrive.
///
/// # Example
///
/// ```rust
/// use guidepost::core::{CompletionLedger, FactSource};
///
/// let ledger = CompletionLedger::new();
/// assert!(!ledger.has_completed("tre-dat-mc1"));
///
/// ledger.mark_completed("tre-dat-mc1");
/// assert!(ledger.has_completed("tre-dat-mc1"));
/// ```
#[derive(Debug, Default)]
pub struct CompletionLedger {
    completed: RefCell<BTreeSet<String>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tag` as complete. Returns false if it already was.
    pub fn mark_completed(&self, tag: impl Into<String>) -> bool {
        self.completed.borrow_mut().insert(tag.into())
    }

    /// Forget a completion. Returns false if `tag` was not complete.
    pub fn revoke(&self, tag: &str) -> bool {
        self.completed.borrow_mut().remove(tag)
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.borrow().iter().cloned().collect()
    }
}

impl FactSource for CompletionLedger {
    fn has_completed(&self, tag: &str) -> bool {
        self.completed.borrow().contains(tag)
    }
}

/// Everything a gate may look at.
pub struct GateInputs<'a, L> {
    pub facts: &'a dyn FactSource,
    pub locals: &'a L,
}

type GatePredicate<L> = Box<dyn for<'a> Fn(&GateInputs<'a, L>) -> bool>;

/// Named boolean precondition on leaving a marker forward.
///
/// # Example
///
/// ```rust
/// use guidepost::core::{CompletionLedger, Gate, GateInputs};
///
/// let gate: Gate<()> = Gate::completed("galaxy-trend");
/// let ledger = CompletionLedger::new();
/// let inputs = GateInputs { facts: &ledger, locals: &() };
///
/// assert!(!gate.check(&inputs));
/// ledger.mark_completed("galaxy-trend");
/// assert!(gate.check(&inputs));
/// ```
pub struct Gate<L> {
    name: String,
    predicate: GatePredicate<L>,
}

impl<L: 'static> Gate<L> {
    /// Create a gate from a pure predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: for<'a> Fn(&GateInputs<'a, L>) -> bool + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Gate that holds once `tag` has been completed.
    pub fn completed(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let name = format!("completed:{tag}");
        Self::new(name, move |inputs: &GateInputs<'_, L>| {
            inputs.facts.has_completed(&tag)
        })
    }

    /// Gate over the stage's local state only.
    pub fn local<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&L) -> bool + 'static,
    {
        Self::new(name, move |inputs: &GateInputs<'_, L>| predicate(inputs.locals))
    }
}

impl<L> Gate<L> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, inputs: &GateInputs<'_, L>) -> bool {
        (self.predicate)(inputs)
    }
}

impl<L> fmt::Debug for Gate<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate").field("name", &self.name).finish()
    }
}

/// Gates keyed by the marker they guard.
///
/// A marker with no entry is always permitted to advance.
pub struct GatePredicateSet<M: Marker, L> {
    gates: BTreeMap<M, Vec<Gate<L>>>,
}

impl<M: Marker, L> GatePredicateSet<M, L> {
    pub fn new() -> Self {
        Self {
            gates: BTreeMap::new(),
        }
    }

    /// Add a gate to `marker`. Gates on one marker are conjunctive.
    pub fn insert(&mut self, marker: M, gate: Gate<L>) {
        self.gates.entry(marker).or_default().push(gate);
    }

    pub fn gates_for(&self, marker: M) -> &[Gate<L>] {
        self.gates.get(&marker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when every gate on `marker` holds (vacuously for ungated markers).
    pub fn all_pass(&self, marker: M, inputs: &GateInputs<'_, L>) -> bool {
        self.gates_for(marker).iter().all(|gate| gate.check(inputs))
    }

    /// Names of the gates on `marker` that currently fail.
    pub fn failing(&self, marker: M, inputs: &GateInputs<'_, L>) -> Vec<String> {
        self.gates_for(marker)
            .iter()
            .filter(|gate| !gate.check(inputs))
            .map(|gate| gate.name().to_string())
            .collect()
    }

    /// Number of gated markers.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl<M: Marker, L> Default for GatePredicateSet<M, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Marker, L> fmt::Debug for GatePredicateSet<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.gates.iter().map(|(marker, gates)| {
                let names: Vec<&str> = gates.iter().map(Gate::name).collect();
                (marker.name(), names)
            }))
            .finish()
    }
}
