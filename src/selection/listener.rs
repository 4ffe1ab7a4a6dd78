//! Listener that mirrors a selection on one view as a range subset on another.

use super::subset::MultiRangeSubset;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Which selection to watch and where the derived subset goes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub source_dataset: String,
    pub source_field: String,
    pub target_dataset: String,
    pub target_field: String,
}

/// "Selection changed on `dataset`, `field`", with the selected rows.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionChanged<R> {
    pub dataset: String,
    pub field: String,
    pub rows: Vec<R>,
}

impl<R> SelectionChanged<R> {
    pub fn new(dataset: impl Into<String>, field: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            dataset: dataset.into(),
            field: field.into(),
            rows,
        }
    }
}

/// Receiver of derived subsets, usually the linked view's data layer.
///
/// Installing a subset may synchronously raise further selection events
/// that reach the listener again.
pub trait SubsetSink {
    fn install_subset(&self, dataset: &str, subset: MultiRangeSubset);
}

impl<T: SubsetSink + ?Sized> SubsetSink for Rc<T> {
    fn install_subset(&self, dataset: &str, subset: MultiRangeSubset) {
        (**self).install_subset(dataset, subset)
    }
}

/// Pulls the discrete identifier out of a selected row.
pub type IdAccessor<R> = Box<dyn Fn(&R) -> Option<i64>>;

/// What the listener did with one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new subset with this many ranges was written to the target.
    Installed { ranges: usize },
    /// The event was caused by the listener's own write, or repeats the
    /// identifier set it last derived.
    Echo,
    /// The event concerns a dataset or field the listener does not watch.
    Ignored,
}

/// Keeps a target dataset's subset in step with a source selection.
///
/// Each distinct identifier set is compressed into ranges and installed
/// exactly once. Events raised while the listener is writing, and events
/// repeating the last derived set, are reported as [`SyncOutcome::Echo`]
/// and produce no write.
///
/// # Example
///
/// ```rust
/// use guidepost::selection::{
///     MultiRangeSubset, SelectionChanged, SelectionSyncListener, SubsetSink, SyncConfig,
///     SyncOutcome,
/// };
/// use std::cell::RefCell;
///
/// #[derive(Default)]
/// struct Recorder(RefCell<Vec<MultiRangeSubset>>);
///
/// impl SubsetSink for Recorder {
///     fn install_subset(&self, _dataset: &str, subset: MultiRangeSubset) {
///         self.0.borrow_mut().push(subset);
///     }
/// }
///
/// let config = SyncConfig {
///     source_dataset: "scatter".into(),
///     source_field: "age".into(),
///     target_dataset: "histogram".into(),
///     target_field: "id".into(),
/// };
/// let listener: SelectionSyncListener<(i64, f64), Recorder> = SelectionSyncListener::new(
///     config,
///     Box::new(|row: &(i64, f64)| Some(row.0)),
///     Recorder::default(),
/// );
///
/// let event = SelectionChanged::new("scatter", "age", vec![(1, 0.5), (2, 0.7), (5, 0.1)]);
/// assert_eq!(listener.on_selection_changed(&event), SyncOutcome::Installed { ranges: 2 });
/// assert_eq!(listener.on_selection_changed(&event), SyncOutcome::Echo);
/// assert_eq!(listener.sink().0.borrow().len(), 1);
/// ```
pub struct SelectionSyncListener<R, S> {
    config: SyncConfig,
    accessor: IdAccessor<R>,
    sink: S,
    last_ids: RefCell<Option<Vec<i64>>>,
    last_subset: RefCell<Option<MultiRangeSubset>>,
    writing: Cell<bool>,
}

impl<R, S: SubsetSink> SelectionSyncListener<R, S> {
    pub fn new(config: SyncConfig, accessor: IdAccessor<R>, sink: S) -> Self {
        Self {
            config,
            accessor,
            sink,
            last_ids: RefCell::new(None),
            last_subset: RefCell::new(None),
            writing: Cell::new(false),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Sorted identifier set behind the last installed subset.
    pub fn current_ids(&self) -> Option<Vec<i64>> {
        self.last_ids.borrow().clone()
    }

    pub fn current_subset(&self) -> Option<MultiRangeSubset> {
        self.last_subset.borrow().clone()
    }

    /// Handle one selection-changed event.
    pub fn on_selection_changed(&self, event: &SelectionChanged<R>) -> SyncOutcome {
        if event.dataset != self.config.source_dataset || event.field != self.config.source_field
        {
            return SyncOutcome::Ignored;
        }

        if self.writing.get() {
            tracing::trace!(
                dataset = %event.dataset,
                "selection event raised by own subset write"
            );
            return SyncOutcome::Echo;
        }

        let mut ids: Vec<i64> = event
            .rows
            .iter()
            .filter_map(|row| (self.accessor)(row))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        if self.last_ids.borrow().as_deref() == Some(ids.as_slice()) {
            tracing::trace!(
                dataset = %event.dataset,
                ids = ids.len(),
                "selection repeats last derived set"
            );
            return SyncOutcome::Echo;
        }

        let subset =
            MultiRangeSubset::from_ids(self.config.target_field.clone(), ids.iter().copied());
        let ranges = subset.ranges().len();

        *self.last_ids.borrow_mut() = Some(ids);
        *self.last_subset.borrow_mut() = Some(subset.clone());

        {
            let _writing = WritingGuard::enter(&self.writing);
            self.sink.install_subset(&self.config.target_dataset, subset);
        }

        tracing::debug!(
            dataset = %self.config.target_dataset,
            field = %self.config.target_field,
            ranges,
            "installed derived subset"
        );

        SyncOutcome::Installed { ranges }
    }
}

/// Holds the writing flag for the duration of a sink call, including one
/// that unwinds.
struct WritingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> WritingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for WritingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl<R, S: fmt::Debug> fmt::Debug for SelectionSyncListener<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionSyncListener")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .field("last_ids", &self.last_ids)
            .field("writing", &self.writing.get())
            .finish()
    }
}
