//! The explore-data stage: trends in galaxy data, Hubble's law and the age
//! of the universe.

use super::slideshow::SlideshowProgress;
use crate::builder::BuildError;
use crate::core::{FactSource, Gate, Observable};
use crate::engine::ProgressionEngine;
use std::rc::Rc;

crate::marker_enum! {
    /// Steps of the explore-data stage, in lesson order.
    pub enum ExploreDataMarker {
        ExpDat1,
        TreDat1,
        TreDat2,
        TreDat3,
        RelVel1,
        HubExp1,
        TreLin1,
        TreLin2,
        BesFit1,
        AgeUni1,
        HypGal1,
        AgeRac1,
        AgeUni2,
        AgeUni3,
        AgeUni4,
        YouAge1,
        ShoEst1,
        ShoEst2,
    }
}

/// Slide titles of the embedded Hubble slideshow.
pub const HUBBLE_SLIDESHOW_TITLES: [&str; 4] = [
    "Hubble's Discovery",
    "A Running Race",
    "Runner's Velocities vs. Distances",
    "Age of the Universe",
];

/// Name of the gate that waits for the Hubble slideshow.
pub const SLIDESHOW_GATE: &str = "hubble-slideshow-finished";

/// Stage-local state visible to the explore-data gates.
#[derive(Debug)]
pub struct ExploreDataLocals {
    pub hubble_slideshow_dialog: Observable<bool>,
    pub hubble_slideshow_finished: Observable<bool>,
    pub hubble_slideshow: Observable<SlideshowProgress>,
}

impl Default for ExploreDataLocals {
    fn default() -> Self {
        Self {
            hubble_slideshow_dialog: Observable::new(false),
            hubble_slideshow_finished: Observable::new(false),
            hubble_slideshow: Observable::new(
                SlideshowProgress::new(HUBBLE_SLIDESHOW_TITLES.len())
                    .with_titles(HUBBLE_SLIDESHOW_TITLES),
            ),
        }
    }
}

impl ExploreDataLocals {
    pub fn open_slideshow(&self) {
        self.hubble_slideshow_dialog.set(true);
    }

    pub fn close_slideshow(&self) {
        self.hubble_slideshow_dialog.set(false);
    }

    /// Show the next slide; marks the slideshow finished on the last one.
    ///
    /// Returns whether the slideshow is finished.
    pub fn advance_slideshow(&self) -> bool {
        self.hubble_slideshow.update(SlideshowProgress::next);
        if self.hubble_slideshow.get().finished() {
            self.hubble_slideshow_finished.set(true);
        }
        self.hubble_slideshow_finished.get()
    }
}

/// Build the explore-data stage over the session's completed questions.
pub fn explore_data_stage(
    facts: Rc<dyn FactSource>,
) -> Result<ProgressionEngine<ExploreDataMarker, ExploreDataLocals>, BuildError> {
    ProgressionEngine::builder()
        .facts(facts)
        .require_completed(ExploreDataMarker::TreDat1, "tre-dat-mc1")
        .require_completed(ExploreDataMarker::TreDat3, "tre-dat-mc3")
        .require_completed(ExploreDataMarker::RelVel1, "galaxy-trend")
        .gate(
            ExploreDataMarker::HubExp1,
            Gate::local(SLIDESHOW_GATE, |locals: &ExploreDataLocals| {
                locals.hubble_slideshow_finished.get()
            }),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompletionLedger;
    use crate::engine::{Direction, TransitionOutcome};

    fn stage() -> (
        ProgressionEngine<ExploreDataMarker, ExploreDataLocals>,
        Rc<CompletionLedger>,
    ) {
        let ledger = Rc::new(CompletionLedger::new());
        let facts: Rc<dyn FactSource> = ledger.clone();
        (explore_data_stage(facts).unwrap(), ledger)
    }

    #[test]
    fn has_eighteen_markers_in_lesson_order() {
        let (engine, _) = stage();
        let vocabulary = engine.vocabulary();

        assert_eq!(vocabulary.len(), 18);
        assert_eq!(vocabulary.first(), ExploreDataMarker::ExpDat1);
        assert_eq!(vocabulary.last(), ExploreDataMarker::ShoEst2);
        assert_eq!(engine.current(), ExploreDataMarker::ExpDat1);
    }

    #[test]
    fn question_gates_hold_until_answered() {
        let (engine, ledger) = stage();

        engine.transition_next();
        assert_eq!(
            engine.transition_next(),
            TransitionOutcome::Blocked {
                at: ExploreDataMarker::TreDat1
            }
        );
        assert_eq!(engine.blocking_gates(), vec!["completed:tre-dat-mc1"]);

        ledger.mark_completed("tre-dat-mc1");
        engine.transition_next();
        engine.transition_next();
        assert_eq!(engine.current(), ExploreDataMarker::TreDat3);
        assert!(!engine.can_advance(Direction::Next));

        ledger.mark_completed("tre-dat-mc3");
        engine.transition_next();
        assert_eq!(engine.current(), ExploreDataMarker::RelVel1);
        assert!(!engine.can_advance(Direction::Next));

        ledger.mark_completed("galaxy-trend");
        engine.transition_next();
        assert_eq!(engine.current(), ExploreDataMarker::HubExp1);
    }

    #[test]
    fn slideshow_gate_opens_after_last_slide() {
        let (engine, _) = stage();
        engine.force_transition_to(ExploreDataMarker::HubExp1);
        assert_eq!(engine.blocking_gates(), vec![SLIDESHOW_GATE]);

        let locals = engine.locals();
        locals.open_slideshow();
        assert!(!locals.advance_slideshow());
        assert!(!locals.advance_slideshow());
        assert_eq!(
            locals.hubble_slideshow.get().title(),
            "Runner's Velocities vs. Distances"
        );
        assert!(!engine.can_advance(Direction::Next));

        assert!(locals.advance_slideshow());
        locals.close_slideshow();
        assert!(!locals.hubble_slideshow_dialog.get());
        assert!(engine.can_advance(Direction::Next));

        engine.transition_next();
        assert_eq!(engine.current(), ExploreDataMarker::TreLin1);
    }

    #[test]
    fn finished_flag_stays_set_when_revisiting_slides() {
        let locals = ExploreDataLocals::default();
        for _ in 0..3 {
            locals.advance_slideshow();
        }
        locals.hubble_slideshow.update(|progress| progress.go_to(0));

        assert_eq!(locals.hubble_slideshow.get().title(), "Hubble's Discovery");
        assert!(locals.hubble_slideshow_finished.get());
    }

    #[test]
    fn later_markers_are_ungated() {
        let (engine, _) = stage();
        engine.force_transition_to(ExploreDataMarker::TreLin1);

        while engine.transition_next().is_moved() {}

        assert_eq!(engine.current(), ExploreDataMarker::ShoEst2);
        assert_eq!(engine.max_reached(), ExploreDataMarker::ShoEst2);
    }
}
