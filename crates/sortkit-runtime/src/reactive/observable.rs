#![forbid(unsafe_code)]

//! Versioned shared value with change notification.
//!
//! An [`Observable<T>`] holds its value behind `Rc<RefCell<..>>`; clones are
//! handles onto the same value. A [`set`](Observable::set) that changes the
//! value (by `PartialEq`) calls every live subscriber in registration order,
//! or queues the calls while a [`BatchScope`](super::BatchScope) is open.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: a [`Subscription`] kept forever keeps its callback
//!   alive. Entries whose guard was dropped are pruned on the next change.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span};
use web_time::Instant;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

impl<T> Slot<T> {
    /// Drop dead listeners and upgrade the rest.
    fn live_listeners(&mut self) -> Vec<Listener<T>> {
        self.listeners.retain(|weak| weak.strong_count() > 0);
        self.listeners.iter().filter_map(Weak::upgrade).collect()
    }
}

/// Versioned shared value; the list store keeps its order in one.
///
/// # Invariants
///
/// 1. Each committed change bumps `version` by one; nothing else does.
/// 2. Writing an equal value changes nothing and notifies no one.
/// 3. Callbacks run in the order they subscribed.
pub struct Observable<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Observable")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .field("listeners", &slot.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    ///
    /// Safe to call from within a subscriber callback.
    pub fn set(&self, value: T) {
        let listeners = {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return;
            }
            slot.value = value;
            slot.version += 1;
            slot.live_listeners()
        };
        self.publish(listeners);
    }

    /// Call `callback` with the new value on every change.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(callback);
        self.slot
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&listener));
        Subscription {
            _listener: Box::new(listener),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    fn publish(&self, listeners: Vec<Listener<T>>) {
        if listeners.is_empty() {
            return;
        }

        if super::batch::is_batching() {
            // Keyed by listener so repeated writes queue one call each.
            for listener in listeners {
                let key = Rc::as_ptr(&listener) as *const () as usize;
                let source = self.clone();
                super::batch::enqueue(key, move || {
                    let latest = source.get();
                    listener(&latest);
                });
            }
            return;
        }

        let (value, version) = {
            let slot = self.slot.borrow();
            (slot.value.clone(), slot.version)
        };
        let start = Instant::now();
        let _span = debug_span!(
            "sortkit.notify",
            subscribers = listeners.len() as u64,
            version
        )
        .entered();
        for listener in &listeners {
            listener(&value);
        }
        debug!(
            duration_us = start.elapsed().as_micros() as u64,
            "subscribers notified"
        );
    }
}

/// Keeps a subscriber callback alive.
///
/// Dropping it unsubscribes; the dead entry is pruned on the next change.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
