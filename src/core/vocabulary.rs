//! Ordered step vocabulary for one lesson stage.

use super::marker::Marker;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A defect in a marker declaration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Vocabulary declares no markers")]
    Empty,

    #[error("Marker '{name}' is declared at position {position} but reports index {index}")]
    IndexMismatch {
        name: &'static str,
        position: usize,
        index: usize,
    },

    #[error("Marker name '{name}' is declared more than once")]
    DuplicateName { name: &'static str },
}

/// The ordered markers of a stage.
///
/// Built from `M::ALL` and validated once, so every lookup afterwards can
/// rely on `marker.index()` being the marker's position.
///
/// # Example
///
/// ```rust
/// use guidepost::core::StepVocabulary;
/// use guidepost::marker_enum;
///
/// marker_enum! {
///     enum Step { A, B, C, D }
/// }
///
/// let vocabulary = StepVocabulary::<Step>::new().unwrap();
/// assert_eq!(vocabulary.successor(Step::B), Some(Step::C));
/// assert_eq!(vocabulary.predecessor(Step::A), None);
/// assert!(vocabulary.is_between(Step::C, Step::B, Step::D));
/// // An inverted window reads as "from lo onward".
/// assert!(vocabulary.is_between(Step::D, Step::C, Step::A));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StepVocabulary<M: Marker> {
    markers: &'static [M],
}

impl<M: Marker> StepVocabulary<M> {
    /// Validate `M::ALL` and wrap it.
    ///
    /// Every defect is reported, not only the first one found.
    pub fn new() -> Result<Self, Vec<VocabularyError>> {
        match Self::validate(M::ALL) {
            Validation::Success(_) => Ok(Self { markers: M::ALL }),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }

    /// Check a declaration, accumulating all violations.
    pub fn validate(markers: &[M]) -> Validation<(), NonEmptyVec<VocabularyError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<VocabularyError>>> = Vec::new();

        if markers.is_empty() {
            checks.push(Validation::fail(VocabularyError::Empty));
        }

        for (position, marker) in markers.iter().enumerate() {
            let check = if marker.index() == position {
                Validation::success(())
            } else {
                Validation::fail(VocabularyError::IndexMismatch {
                    name: marker.name(),
                    position,
                    index: marker.index(),
                })
            };
            checks.push(check);
        }

        let mut seen = HashSet::new();
        for marker in markers {
            if !seen.insert(marker.name()) {
                checks.push(Validation::fail(VocabularyError::DuplicateName {
                    name: marker.name(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Markers in order.
    pub fn markers(&self) -> &'static [M] {
        self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Always false for a validated vocabulary.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn first(&self) -> M {
        self.markers[0]
    }

    pub fn last(&self) -> M {
        self.markers[self.markers.len() - 1]
    }

    /// Position of `marker` in the vocabulary.
    ///
    /// # Panics
    ///
    /// Panics if `marker` is not part of this vocabulary. That can only
    /// happen with a hand-written `Marker` impl whose `ALL` omits a variant,
    /// and it is never clamped to a neighbouring step.
    pub fn position(&self, marker: M) -> usize {
        let index = marker.index();
        assert!(
            self.markers.get(index) == Some(&marker),
            "marker '{}' is not part of this vocabulary",
            marker.name()
        );
        index
    }

    /// The marker after `marker`, if any.
    pub fn successor(&self, marker: M) -> Option<M> {
        self.markers.get(self.position(marker) + 1).copied()
    }

    /// The marker before `marker`, if any.
    pub fn predecessor(&self, marker: M) -> Option<M> {
        self.position(marker)
            .checked_sub(1)
            .and_then(|index| self.markers.get(index))
            .copied()
    }

    /// Window test used to decide visibility of UI regions.
    ///
    /// With `lo <= hi` this is the closed window `lo..=hi`. With `lo > hi`
    /// the upper bound is dropped and the test reads "at or after `lo`".
    pub fn is_between(&self, marker: M, lo: M, hi: M) -> bool {
        let index = self.position(marker);
        let (lo, hi) = (self.position(lo), self.position(hi));
        if lo <= hi {
            lo <= index && index <= hi
        } else {
            index >= lo
        }
    }

    /// True when `marker` is `lo` or any later marker.
    pub fn is_at_or_after(&self, marker: M, lo: M) -> bool {
        self.position(marker) >= self.position(lo)
    }

    /// Find a marker by name.
    pub fn find(&self, name: &str) -> Option<M> {
        self.markers.iter().copied().find(|marker| marker.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = M> + '_ {
        self.markers.iter().copied()
    }
}
