//! Bounded slide counter for slideshows embedded in a stage.

use serde::{Deserialize, Serialize};

/// Position within a slideshow and the furthest slide seen.
///
/// Values are immutable; every move returns the next progress so it can be
/// stored in an [`Observable`](crate::core::Observable) with `update`.
///
/// # Example
///
/// ```rust
/// use guidepost::stages::SlideshowProgress;
///
/// let progress = SlideshowProgress::new(3).next().next();
/// assert_eq!(progress.step(), 2);
/// assert!(progress.finished());
///
/// let back = progress.previous();
/// assert_eq!(back.step(), 1);
/// assert_eq!(back.max_step_completed(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowProgress {
    step: usize,
    length: usize,
    max_step_completed: usize,
    titles: Vec<String>,
    default_title: String,
}

impl SlideshowProgress {
    /// A slideshow of `length` slides, never fewer than one.
    pub fn new(length: usize) -> Self {
        Self {
            step: 0,
            length: length.max(1),
            max_step_completed: 0,
            titles: Vec::new(),
            default_title: String::new(),
        }
    }

    /// Attach per-slide titles. The first title doubles as the fallback.
    pub fn with_titles<I, T>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self.default_title = self.titles.first().cloned().unwrap_or_default();
        self
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_step_completed(&self) -> usize {
        self.max_step_completed
    }

    fn last(&self) -> usize {
        self.length - 1
    }

    fn at(&self, step: usize) -> Self {
        Self {
            step,
            max_step_completed: self.max_step_completed.max(step),
            ..self.clone()
        }
    }

    /// Move one slide forward, staying on the last slide.
    pub fn next(&self) -> Self {
        self.at((self.step + 1).min(self.last()))
    }

    /// Move one slide back, staying on the first slide.
    pub fn previous(&self) -> Self {
        self.at(self.step.saturating_sub(1))
    }

    /// Jump to a slide already seen, or the one right after it.
    ///
    /// Slides further ahead are not reachable yet; the progress is returned
    /// unchanged.
    pub fn go_to(&self, step: usize) -> Self {
        if step > self.last() || step > self.max_step_completed + 1 {
            return self.clone();
        }
        self.at(step)
    }

    /// True once the last slide has been reached.
    pub fn finished(&self) -> bool {
        self.max_step_completed == self.last()
    }

    pub fn title(&self) -> &str {
        self.titles
            .get(self.step)
            .map(String::as_str)
            .unwrap_or(&self.default_title)
    }
}
