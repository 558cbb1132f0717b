#![forbid(unsafe_code)]

//! Shared list state.
//!
//! [`ListStore`] is the seam between drop handling and whatever owns the
//! list. [`ObservableListStore`] is the built-in implementation: an
//! [`Observable`] holding an [`OrderedList`], so layout and other views can
//! subscribe to order changes.

use sortkit_core::item::{ItemId, ListError, OrderedList};
use tracing::debug;

use crate::reactive::{Observable, Subscription};

/// Read and replace the current list.
pub trait ListStore {
    /// Snapshot of the current order.
    fn get_list(&self) -> OrderedList;

    /// Replace the order. Subscribers are notified if it changed.
    fn commit_list(&self, list: OrderedList);
}

/// [`ListStore`] backed by an [`Observable`].
///
/// Cloning yields another handle to the same list.
#[derive(Debug, Clone)]
pub struct ObservableListStore {
    list: Observable<OrderedList>,
    capacity: Option<usize>,
}

impl ObservableListStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new(list: OrderedList) -> Self {
        Self {
            list: Observable::new(list),
            capacity: None,
        }
    }

    /// Create a store that refuses to grow past `capacity` items.
    ///
    /// An initial list longer than `capacity` is kept as is; only appends
    /// are refused.
    #[must_use]
    pub fn with_capacity(list: OrderedList, capacity: usize) -> Self {
        Self {
            list: Observable::new(list),
            capacity: Some(capacity),
        }
    }

    /// Maximum number of items, if bounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append `id` at the end.
    pub fn try_push(&self, id: ItemId) -> Result<(), ListError> {
        let mut next = self.list.get();
        next.try_push(id.clone(), self.capacity)?;
        debug!(item = id.as_str(), len = next.len(), "item appended");
        self.list.set(next);
        Ok(())
    }

    /// Remove `id`, returning whether it was present.
    pub fn remove(&self, id: &ItemId) -> bool {
        let mut next = self.list.get();
        let removed = next.remove(id);
        if removed {
            debug!(item = id.as_str(), "item removed");
            self.list.set(next);
        }
        removed
    }

    /// Number of committed changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.list.version()
    }

    /// Call `callback` with the new order on every change.
    pub fn subscribe(&self, callback: impl Fn(&OrderedList) + 'static) -> Subscription {
        self.list.subscribe(callback)
    }

    /// Borrow the current order for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&OrderedList) -> R) -> R {
        self.list.with(f)
    }
}

impl ListStore for ObservableListStore {
    fn get_list(&self) -> OrderedList {
        self.list.get()
    }

    fn commit_list(&self, list: OrderedList) {
        self.list.set(list);
    }
}
