//! Observable value cells for stage-local state.

use super::subscribers::{SubscriberList, Subscription};
use std::cell::RefCell;
use std::fmt;

/// A value whose changes can be observed.
///
/// Stage-local flags and counters (a dialog being open, a slideshow being
/// finished, a measurement count) live in `Observable` fields so each one can
/// be watched on its own. Subscribers only hear about real changes: setting
/// the value it already holds is silent.
///
/// # Example
///
/// ```rust
/// use guidepost::core::Observable;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let dialog_open = Observable::new(false);
/// let opened = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&opened);
/// dialog_open.subscribe(move |open: &bool| {
///     if *open {
///         counter.set(counter.get() + 1);
///     }
/// });
///
/// dialog_open.set(true);
/// dialog_open.set(true);
/// assert_eq!(opened.get(), 1);
/// ```
pub struct Observable<T> {
    value: RefCell<T>,
    subscribers: SubscriberList<T>,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: SubscriberList::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value, notifying subscribers if it changed.
    ///
    /// Returns whether the value changed. The new value is stored before
    /// any subscriber runs.
    pub fn set(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        *self.value.borrow_mut() = value.clone();
        self.subscribers.notify(&value);
        true
    }

    /// Derive the next value from the current one.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value.borrow());
        self.set(next)
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }
}

impl<T: Clone + PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
