//! Synchronous subscriber lists.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// Ordered list of callbacks invoked synchronously on `notify`.
///
/// Callbacks run in registration order. A callback may re-enter the owner
/// (request another transition, subscribe, unsubscribe): `notify` iterates a
/// snapshot of the list, so changes made during delivery apply from the
/// next notification on.
///
/// Events raised while a delivery round is running are queued and
/// delivered after it, so every callback sees events in the order they
/// happened.
pub struct SubscriberList<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(Subscription, Callback<E>)>>,
    delivering: Cell<bool>,
    pending: RefCell<VecDeque<E>>,
}

/// Clears the delivery state even if a callback panics.
struct DeliveryGuard<'a, E> {
    list: &'a SubscriberList<E>,
}

impl<E> Drop for DeliveryGuard<'_, E> {
    fn drop(&mut self) {
        self.list.delivering.set(false);
        self.list.pending.borrow_mut().clear();
    }
}

impl<E> SubscriberList<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
            delivering: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let subscription = Subscription(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries
            .borrow_mut()
            .push((subscription, Rc::new(callback)));
        subscription
    }

    /// Remove a callback. Returns false if it was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(id, _)| *id != subscription);
        entries.len() != before
    }

    /// Deliver `event` to every callback, or queue it behind the round
    /// already in progress.
    pub fn notify(&self, event: &E)
    where
        E: Clone,
    {
        if self.delivering.get() {
            self.pending.borrow_mut().push_back(event.clone());
            return;
        }

        self.delivering.set(true);
        let _guard = DeliveryGuard { list: self };

        self.deliver(event);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(queued) => self.deliver(&queued),
                None => break,
            }
        }
    }

    fn deliver(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<E> Default for SubscriberList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SubscriberList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberList")
            .field("subscribers", &self.len())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}
