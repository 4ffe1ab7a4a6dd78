//! The progression engine: current marker, furthest marker, and gated moves.

use crate::builder::StageBuilder;
use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::core::{
    ChangeKind, FactSource, GateInputs, GatePredicateSet, Marker, StepChange, StepVocabulary,
    SubscriberList, Subscription,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Direction of a linear move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// Result of a transition request.
///
/// Only `Moved` changes state. The other variants are ordinary outcomes a
/// caller can avoid by checking `can_advance` first; none of them is an
/// error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome<M> {
    /// The current marker changed.
    Moved { from: M, to: M },

    /// A gate on the current marker is not satisfied.
    Blocked { at: M },

    /// No successor (at the last marker) or no predecessor (at the first).
    AtBoundary { at: M },

    /// The requested target is already current.
    Unchanged { at: M },
}

impl<M> TransitionOutcome<M> {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Single source of truth for which step of a stage is active.
///
/// All operations take `&self` and complete synchronously. State is mutated
/// before subscribers are notified, so a subscriber may itself request a
/// transition while being notified.
///
/// # Example
///
/// ```rust
/// use guidepost::builder::StageBuilder;
/// use guidepost::core::{CompletionLedger, FactSource};
/// use guidepost::engine::Direction;
/// use guidepost::marker_enum;
/// use std::rc::Rc;
///
/// marker_enum! {
///     enum Step { A, B, C, D }
/// }
///
/// let ledger = Rc::new(CompletionLedger::new());
/// let facts: Rc<dyn FactSource> = ledger.clone();
/// let engine = StageBuilder::<Step>::new()
///     .facts(facts)
///     .require_completed(Step::B, "q1")
///     .build()
///     .unwrap();
///
/// engine.transition_next();
/// assert_eq!(engine.current(), Step::B);
/// assert!(!engine.can_advance(Direction::Next));
///
/// ledger.mark_completed("q1");
/// engine.transition_next();
/// assert_eq!(engine.current(), Step::C);
/// assert_eq!(engine.max_reached(), Step::C);
/// ```
pub struct ProgressionEngine<M: Marker, L = ()> {
    vocabulary: StepVocabulary<M>,
    gates: GatePredicateSet<M, L>,
    facts: Rc<dyn FactSource>,
    locals: L,
    current: Cell<M>,
    max_reached: Cell<M>,
    transitions: Cell<usize>,
    subscribers: SubscriberList<StepChange<M>>,
}

impl<M: Marker, L: 'static> ProgressionEngine<M, L> {
    /// Start configuring an engine.
    pub fn builder() -> StageBuilder<M, L> {
        StageBuilder::new()
    }
}

impl<M: Marker, L> ProgressionEngine<M, L> {
    pub(crate) fn from_parts(
        vocabulary: StepVocabulary<M>,
        gates: GatePredicateSet<M, L>,
        facts: Rc<dyn FactSource>,
        locals: L,
    ) -> Self {
        let first = vocabulary.first();
        Self {
            vocabulary,
            gates,
            facts,
            locals,
            current: Cell::new(first),
            max_reached: Cell::new(first),
            transitions: Cell::new(0),
            subscribers: SubscriberList::new(),
        }
    }

    pub fn vocabulary(&self) -> &StepVocabulary<M> {
        &self.vocabulary
    }

    /// Stage-local state visible to gates.
    pub fn locals(&self) -> &L {
        &self.locals
    }

    pub fn current(&self) -> M {
        self.current.get()
    }

    /// Furthest marker visited this session. Never decreases.
    pub fn max_reached(&self) -> M {
        self.max_reached.get()
    }

    /// Number of step changes applied so far.
    pub fn transition_count(&self) -> usize {
        self.transitions.get()
    }

    pub fn is_current(&self, marker: M) -> bool {
        self.current() == marker
    }

    /// Whether the current marker lies in the window `lo..=hi`.
    ///
    /// With `lo > hi` the window is open-ended: "at or after `lo`".
    pub fn is_between(&self, lo: M, hi: M) -> bool {
        self.vocabulary.is_between(self.current(), lo, hi)
    }

    /// Whether the current marker is `lo` or later.
    pub fn is_at_or_after(&self, lo: M) -> bool {
        self.vocabulary.is_at_or_after(self.current(), lo)
    }

    /// Whether `marker` has been visited this session.
    pub fn has_reached(&self, marker: M) -> bool {
        self.vocabulary.position(marker) <= self.vocabulary.position(self.max_reached())
    }

    fn gate_inputs(&self) -> GateInputs<'_, L> {
        GateInputs {
            facts: self.facts.as_ref(),
            locals: &self.locals,
        }
    }

    fn gates_pass(&self) -> bool {
        let current = self.current();
        let pass = self.gates.all_pass(current, &self.gate_inputs());
        tracing::trace!(marker = current.name(), pass, "Evaluated gates");
        pass
    }

    /// Names of the current marker's gates that do not hold right now.
    pub fn blocking_gates(&self) -> Vec<String> {
        self.gates.failing(self.current(), &self.gate_inputs())
    }

    /// Whether a linear move in `direction` would succeed.
    ///
    /// Gates only ever block `Next`; going back is always possible except
    /// from the first marker.
    pub fn can_advance(&self, direction: Direction) -> bool {
        let current = self.current();
        match direction {
            Direction::Next => {
                self.vocabulary.successor(current).is_some() && self.gates_pass()
            }
            Direction::Previous => self.vocabulary.predecessor(current).is_some(),
        }
    }

    /// Move to the successor if allowed.
    pub fn transition_next(&self) -> TransitionOutcome<M> {
        let current = self.current();
        let Some(next) = self.vocabulary.successor(current) else {
            return TransitionOutcome::AtBoundary { at: current };
        };
        if !self.gates_pass() {
            tracing::debug!(marker = current.name(), "Advance blocked by gate");
            return TransitionOutcome::Blocked { at: current };
        }
        self.apply(next, ChangeKind::Next)
    }

    /// Move to the predecessor if there is one.
    pub fn transition_previous(&self) -> TransitionOutcome<M> {
        let current = self.current();
        match self.vocabulary.predecessor(current) {
            Some(previous) => self.apply(previous, ChangeKind::Previous),
            None => TransitionOutcome::AtBoundary { at: current },
        }
    }

    /// Jump to `target`, provided the current marker's gates hold.
    ///
    /// Used for branch exits that stay within the lesson's rules, such as
    /// returning from a repeat loop to an earlier step.
    pub fn transition_to(&self, target: M) -> TransitionOutcome<M> {
        // Fails fast on markers outside the vocabulary.
        self.vocabulary.position(target);
        let current = self.current();
        if target == current {
            return TransitionOutcome::Unchanged { at: current };
        }
        if !self.gates_pass() {
            tracing::debug!(
                marker = current.name(),
                target = target.name(),
                "Jump blocked by gate"
            );
            return TransitionOutcome::Blocked { at: current };
        }
        self.apply(target, ChangeKind::Jump)
    }

    /// Jump to `target` ignoring every gate.
    ///
    /// The only way to leave a marker whose gates cannot be satisfied, e.g.
    /// "skip the remaining repeat steps".
    pub fn force_transition_to(&self, target: M) -> TransitionOutcome<M> {
        // Fails fast on markers outside the vocabulary.
        self.vocabulary.position(target);
        let current = self.current();
        if target == current {
            return TransitionOutcome::Unchanged { at: current };
        }
        self.apply(target, ChangeKind::Forced)
    }

    /// Register a callback for every change of the current marker.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StepChange<M>) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    /// Snapshot the position for an external store.
    pub fn checkpoint(&self) -> Checkpoint<M> {
        Checkpoint::new(self.current(), self.max_reached(), self.transition_count())
    }

    /// Resume from a checkpoint.
    ///
    /// `max_reached` and the transition count each become the larger of the
    /// engine's and the checkpoint's, so neither ever decreases. Subscribers
    /// are notified if the current marker changes.
    pub fn restore(&self, checkpoint: &Checkpoint<M>) -> Result<(), CheckpointError> {
        if let Err(error) = checkpoint.validate() {
            tracing::warn!(id = %checkpoint.id, %error, "Rejected checkpoint");
            return Err(error);
        }

        let from = self.current();
        let to = checkpoint.current;
        self.vocabulary.position(to);
        self.raise_max_reached(checkpoint.max_reached);
        self.current.set(to);
        self.transitions
            .set(self.transitions.get().max(checkpoint.transitions));

        tracing::debug!(
            id = %checkpoint.id,
            current = to.name(),
            max_reached = self.max_reached().name(),
            "Restored checkpoint"
        );

        if from != to {
            self.notify(from, to, ChangeKind::Restored);
        }
        Ok(())
    }

    fn raise_max_reached(&self, candidate: M) {
        if self.vocabulary.position(candidate) > self.vocabulary.position(self.max_reached()) {
            self.max_reached.set(candidate);
        }
    }

    fn apply(&self, to: M, kind: ChangeKind) -> TransitionOutcome<M> {
        let from = self.current();
        self.current.set(to);
        self.raise_max_reached(to);
        self.transitions.set(self.transitions.get() + 1);

        tracing::debug!(
            from = from.name(),
            to = to.name(),
            ?kind,
            max_reached = self.max_reached().name(),
            "Step changed"
        );

        self.notify(from, to, kind);
        TransitionOutcome::Moved { from, to }
    }

    fn notify(&self, from: M, to: M, kind: ChangeKind) {
        self.subscribers.notify(&StepChange {
            from,
            to,
            kind,
            timestamp: Utc::now(),
        });
    }
}

impl<M: Marker, L> fmt::Debug for ProgressionEngine<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("current", &self.current())
            .field("max_reached", &self.max_reached())
            .field("transitions", &self.transition_count())
            .field("gates", &self.gates)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompletionLedger, Gate, Observable};
    use std::cell::RefCell;

    crate::marker_enum! {
        enum Step {
            A,
            B,
            C,
            D,
        }
    }

    fn engine_with_gate_on_b() -> (ProgressionEngine<Step>, Rc<CompletionLedger>) {
        let ledger = Rc::new(CompletionLedger::new());
        let facts: Rc<dyn FactSource> = ledger.clone();
        let engine = StageBuilder::new()
            .facts(facts)
            .require_completed(Step::B, "q1")
            .build()
            .unwrap();
        (engine, ledger)
    }

    #[test]
    fn starts_at_first_marker() {
        let (engine, _) = engine_with_gate_on_b();
        assert_eq!(engine.current(), Step::A);
        assert_eq!(engine.max_reached(), Step::A);
        assert!(engine.is_current(Step::A));
        assert_eq!(engine.transition_count(), 0);
    }

    #[test]
    fn gate_blocks_next_until_fact_completes() {
        let (engine, ledger) = engine_with_gate_on_b();
        engine.transition_next();
        assert_eq!(engine.current(), Step::B);

        assert!(!engine.can_advance(Direction::Next));
        assert_eq!(
            engine.transition_next(),
            TransitionOutcome::Blocked { at: Step::B }
        );
        assert_eq!(engine.current(), Step::B);
        assert_eq!(engine.blocking_gates(), vec!["completed:q1"]);

        ledger.mark_completed("q1");
        assert!(engine.can_advance(Direction::Next));
        assert_eq!(
            engine.transition_next(),
            TransitionOutcome::Moved {
                from: Step::B,
                to: Step::C
            }
        );
        assert_eq!(engine.max_reached(), Step::C);
        assert!(engine.blocking_gates().is_empty());
    }

    #[test]
    fn gates_never_block_going_back() {
        let (engine, _) = engine_with_gate_on_b();
        engine.transition_next();

        assert!(!engine.can_advance(Direction::Next));
        assert!(engine.can_advance(Direction::Previous));
        assert!(engine.transition_previous().is_moved());
        assert_eq!(engine.current(), Step::A);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let (engine, ledger) = engine_with_gate_on_b();
        assert!(!engine.can_advance(Direction::Previous));
        assert_eq!(
            engine.transition_previous(),
            TransitionOutcome::AtBoundary { at: Step::A }
        );

        ledger.mark_completed("q1");
        engine.transition_next();
        engine.transition_next();
        engine.transition_next();
        assert_eq!(engine.current(), Step::D);
        assert!(!engine.can_advance(Direction::Next));
        assert_eq!(
            engine.transition_next(),
            TransitionOutcome::AtBoundary { at: Step::D }
        );
        assert_eq!(engine.transition_count(), 3);
    }

    #[test]
    fn forced_jump_back_keeps_max_reached() {
        let (engine, _) = engine_with_gate_on_b();
        engine.force_transition_to(Step::D);
        assert_eq!(engine.max_reached(), Step::D);

        engine.force_transition_to(Step::A);
        assert_eq!(engine.current(), Step::A);
        assert_eq!(engine.max_reached(), Step::D);
        assert!(engine.has_reached(Step::C));
    }

    #[test]
    fn forced_jump_bypasses_gates() {
        let (engine, _) = engine_with_gate_on_b();
        engine.transition_next();

        assert_eq!(
            engine.transition_to(Step::D),
            TransitionOutcome::Blocked { at: Step::B }
        );
        assert_eq!(
            engine.force_transition_to(Step::D),
            TransitionOutcome::Moved {
                from: Step::B,
                to: Step::D
            }
        );
    }

    #[test]
    fn gated_jump_is_allowed_from_ungated_marker() {
        let (engine, _) = engine_with_gate_on_b();
        assert!(engine.transition_to(Step::C).is_moved());
        assert_eq!(engine.max_reached(), Step::C);

        assert!(engine.transition_to(Step::A).is_moved());
        assert_eq!(engine.max_reached(), Step::C);
    }

    #[test]
    fn jump_to_current_is_unchanged() {
        let (engine, _) = engine_with_gate_on_b();
        assert_eq!(
            engine.transition_to(Step::A),
            TransitionOutcome::Unchanged { at: Step::A }
        );
        assert_eq!(
            engine.force_transition_to(Step::A),
            TransitionOutcome::Unchanged { at: Step::A }
        );
        assert_eq!(engine.transition_count(), 0);
    }

    #[test]
    fn window_queries_follow_current_marker() {
        let (engine, _) = engine_with_gate_on_b();
        engine.force_transition_to(Step::C);

        assert!(engine.is_between(Step::B, Step::D));
        assert!(!engine.is_between(Step::A, Step::B));
        // inverted bounds: "from D onward"
        assert!(!engine.is_between(Step::D, Step::A));
        // inverted bounds: "from C onward"
        assert!(engine.is_between(Step::C, Step::B));
        assert!(engine.is_at_or_after(Step::B));
        assert!(!engine.is_at_or_after(Step::D));
    }

    #[test]
    fn subscribers_receive_changes_in_order() {
        let (engine, _) = engine_with_gate_on_b();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        engine.subscribe(move |change: &StepChange<Step>| {
            first.borrow_mut().push(("first", change.to, change.kind))
        });
        let second = Rc::clone(&log);
        engine.subscribe(move |change: &StepChange<Step>| {
            second.borrow_mut().push(("second", change.to, change.kind))
        });

        engine.transition_next();
        engine.force_transition_to(Step::D);
        engine.transition_previous();

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", Step::B, ChangeKind::Next),
                ("second", Step::B, ChangeKind::Next),
                ("first", Step::D, ChangeKind::Forced),
                ("second", Step::D, ChangeKind::Forced),
                ("first", Step::C, ChangeKind::Previous),
                ("second", Step::C, ChangeKind::Previous),
            ]
        );
    }

    #[test]
    fn no_op_requests_do_not_notify() {
        let (engine, _) = engine_with_gate_on_b();
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        let handle = engine.subscribe(move |_| sink.set(sink.get() + 1));

        engine.transition_previous();
        engine.transition_to(Step::A);
        engine.transition_next();
        engine.transition_next();
        assert_eq!(calls.get(), 1);

        assert!(engine.unsubscribe(handle));
        engine.transition_previous();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscriber_may_request_a_transition() {
        let (engine, ledger) = engine_with_gate_on_b();
        ledger.mark_completed("q1");
        let engine = Rc::new(engine);

        // Skip straight over B whenever it becomes current.
        let weak = Rc::downgrade(&engine);
        engine.subscribe(move |change: &StepChange<Step>| {
            if change.to == Step::B {
                if let Some(engine) = weak.upgrade() {
                    engine.transition_next();
                }
            }
        });

        let observed = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&observed);
        engine.subscribe(move |change: &StepChange<Step>| {
            log.borrow_mut().push((change.from, change.to));
        });

        let outcome = engine.transition_next();
        assert_eq!(
            outcome,
            TransitionOutcome::Moved {
                from: Step::A,
                to: Step::B
            }
        );
        assert_eq!(engine.current(), Step::C);
        assert_eq!(engine.max_reached(), Step::C);
        assert_eq!(
            *observed.borrow(),
            vec![(Step::A, Step::B), (Step::B, Step::C)]
        );
    }

    #[test]
    fn gates_can_read_locals() {
        let engine = StageBuilder::<Step, Observable<bool>>::new()
            .facts(Rc::new(CompletionLedger::new()))
            .gate(
                Step::A,
                Gate::local("slideshow", |finished: &Observable<bool>| finished.get()),
            )
            .build()
            .unwrap();

        assert!(!engine.can_advance(Direction::Next));
        engine.locals().set(true);
        assert!(engine.can_advance(Direction::Next));
    }

    #[test]
    fn checkpoint_and_restore_resume_position() {
        let (engine, _) = engine_with_gate_on_b();
        engine.force_transition_to(Step::D);
        engine.transition_previous();
        let checkpoint = engine.checkpoint();

        let (fresh, _) = engine_with_gate_on_b();
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&kinds);
        fresh.subscribe(move |change: &StepChange<Step>| sink.borrow_mut().push(change.kind));

        fresh.restore(&checkpoint).unwrap();
        assert_eq!(fresh.current(), Step::C);
        assert_eq!(fresh.max_reached(), Step::D);
        assert_eq!(fresh.transition_count(), 2);
        assert_eq!(*kinds.borrow(), vec![ChangeKind::Restored]);
    }

    #[test]
    fn restore_rejects_invalid_checkpoint() {
        let (engine, _) = engine_with_gate_on_b();
        let checkpoint = Checkpoint::new(Step::D, Step::B, 1);

        assert!(matches!(
            engine.restore(&checkpoint),
            Err(CheckpointError::InvalidPosition { .. })
        ));
        assert_eq!(engine.current(), Step::A);
    }

    #[test]
    fn restore_never_lowers_max_reached() {
        let (engine, _) = engine_with_gate_on_b();
        engine.force_transition_to(Step::D);

        engine.restore(&Checkpoint::new(Step::A, Step::B, 0)).unwrap();
        assert_eq!(engine.current(), Step::A);
        assert_eq!(engine.max_reached(), Step::D);
        assert_eq!(engine.transition_count(), 1);
    }
}
