//! Core Marker trait for lesson steps.
//!
//! A marker is one discrete position in a stage's linear sequence. Markers
//! are plain values: ordering, indexing and naming are pure functions of the
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for the steps of one lesson stage.
///
/// Markers form a dense total order given by their declaration position.
/// `ALL` lists every marker in that order and `index` returns the marker's
/// position in `ALL`. The `marker_enum!` macro derives all of this for a
/// fieldless enum, which is the intended way to declare markers.
///
/// # Required Traits
///
/// - `Copy`: markers are small tokens passed by value
/// - `Ord`: must agree with `index`
/// - `Hash`: markers key the gate table
/// - `Serialize` + `Deserialize`: markers appear in checkpoints
///
/// # Example
///
/// ```rust
/// use guidepost::core::Marker;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
/// enum Intro {
///     Welcome,
///     Quiz,
///     Wrap,
/// }
///
/// impl Marker for Intro {
///     const ALL: &'static [Self] = &[Self::Welcome, Self::Quiz, Self::Wrap];
///
///     fn index(&self) -> usize {
///         *self as usize
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Welcome => "Welcome",
///             Self::Quiz => "Quiz",
///             Self::Wrap => "Wrap",
///         }
///     }
/// }
///
/// assert_eq!(Intro::Quiz.index(), 1);
/// assert_eq!(Intro::first(), Intro::Welcome);
/// assert_eq!(Intro::last(), Intro::Wrap);
/// ```
pub trait Marker:
    Copy + Eq + Ord + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Every marker of the stage, in declaration order.
    const ALL: &'static [Self];

    /// Position of this marker in `ALL`.
    fn index(&self) -> usize;

    /// Display name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// First marker of the stage.
    ///
    /// # Panics
    ///
    /// Panics if `ALL` is empty.
    fn first() -> Self {
        Self::ALL[0]
    }

    /// Last marker of the stage.
    ///
    /// # Panics
    ///
    /// Panics if `ALL` is empty.
    fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// Look a marker up by its name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|marker| marker.name() == name)
    }
}
