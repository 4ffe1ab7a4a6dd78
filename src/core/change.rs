//! Records of step changes delivered to subscribers.

use super::marker::Marker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the current marker was changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Linear advance to the successor.
    Next,
    /// Linear retreat to the predecessor.
    Previous,
    /// Gated jump to an arbitrary marker.
    Jump,
    /// Jump that bypassed gates.
    Forced,
    /// Position replaced from a checkpoint.
    Restored,
}

/// Record of a single change of the current marker.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use guidepost::core::{ChangeKind, StepChange};
/// use guidepost::marker_enum;
///
/// marker_enum! {
///     enum Step { Intro, Quiz }
/// }
///
/// let change = StepChange {
///     from: Step::Intro,
///     to: Step::Quiz,
///     kind: ChangeKind::Next,
///     timestamp: Utc::now(),
/// };
/// assert!(change.is_forward());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StepChange<M: Marker> {
    /// The marker being left
    pub from: M,
    /// The marker now current
    pub to: M,
    /// What kind of request caused the change
    pub kind: ChangeKind,
    /// When the change was applied
    pub timestamp: DateTime<Utc>,
}

impl<M: Marker> StepChange<M> {
    /// Whether the change moved further along the stage.
    pub fn is_forward(&self) -> bool {
        self.to.index() > self.from.index()
    }
}
