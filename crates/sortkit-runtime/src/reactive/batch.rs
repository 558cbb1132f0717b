#![forbid(unsafe_code)]

//! Batched notification delivery and synchronous flushing.
//!
//! While a [`BatchScope`] is open, an [`Observable`](super::Observable) takes
//! its new value at once but queues subscriber calls until the outermost
//! scope closes. Each subscriber is queued at most once and reads the latest
//! value when it finally runs.
//!
//! [`flush_sync`] runs a mutation and delivers every notification it caused
//! before returning, even inside an outer batch. A drop commit goes through
//! it so layout subscribers see the new order before the moved item is
//! acknowledged.
//!
//! Delivery happens in rounds. A subscriber that writes another observable
//! queues that observable's subscribers for the next round, and the queue is
//! drained until a round adds nothing.
//!
//! # Invariants
//!
//! 1. Nested batches are supported: only the outermost scope flushes.
//! 2. Within a batch, `Observable::get()` returns the latest value.
//! 3. Within a round, subscribers run in the order they were first queued.
//! 4. When `flush_sync` returns or a root scope closes, the queue is empty,
//!    including notifications raised by subscribers during the flush.
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: the remaining callbacks, including
//!   later rounds, still run and the first panic is re-raised afterwards.
//! - **Subscribers that keep changing each other** never reach an empty
//!   round; the flush does not terminate.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use tracing::{debug, debug_span};
use web_time::Instant;

type Notify = Box<dyn FnOnce()>;

struct PendingQueue {
    depth: u32,
    /// Subscriber key and its latest queued call.
    queue: Vec<(usize, Notify)>,
}

thread_local! {
    static PENDING: RefCell<Option<PendingQueue>> = const { RefCell::new(None) };
}

/// Returns true if a batch is open on this thread.
pub fn is_batching() -> bool {
    PENDING.with(|cell| cell.borrow().is_some())
}

/// Queue `notify` for subscriber `key`, or run it now if no batch is open.
///
/// A later call for the same key replaces the queued one in place.
pub(crate) fn enqueue(key: usize, notify: impl FnOnce() + 'static) {
    let run_now = PENDING.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(pending) = guard.as_mut() else {
            return Some(notify);
        };
        let boxed: Notify = Box::new(notify);
        match pending.queue.iter_mut().find(|(queued, _)| *queued == key) {
            Some(slot) => slot.1 = boxed,
            None => pending.queue.push((key, boxed)),
        }
        None
    });
    if let Some(notify) = run_now {
        notify();
    }
}

fn take_round() -> Vec<Notify> {
    PENDING.with(|cell| {
        cell.borrow_mut().as_mut().map_or_else(Vec::new, |pending| {
            std::mem::take(&mut pending.queue)
                .into_iter()
                .map(|(_, notify)| notify)
                .collect()
        })
    })
}

/// Run queued notifications until a round queues nothing new.
///
/// The batch context stays open throughout, so cascaded writes are queued
/// rather than delivered recursively.
fn drain() {
    let mut round = take_round();
    if round.is_empty() {
        return;
    }

    let start = Instant::now();
    let _span = debug_span!("sortkit.flush").entered();
    let mut delivered = 0u64;
    let mut rounds = 0u32;
    let mut first_panic: Option<Box<dyn Any + Send>> = None;

    while !round.is_empty() {
        rounds += 1;
        delivered += round.len() as u64;
        for notify in round {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(notify))
                && first_panic.is_none()
            {
                first_panic = Some(payload);
            }
        }
        round = take_round();
    }

    debug!(
        delivered,
        rounds,
        duration_us = start.elapsed().as_micros() as u64,
        "deferred notifications delivered"
    );

    if let Some(payload) = first_panic {
        resume_unwind(payload);
    }
}

/// Run `f` and deliver every notification it triggers before returning.
///
/// Changes made by `f` are coalesced like a batch. If an outer
/// [`BatchScope`] is open, its queued notifications are delivered too,
/// since subscribers must never observe the commit out of order.
pub fn flush_sync<R>(f: impl FnOnce() -> R) -> R {
    let scope = BatchScope::new();
    let result = f();
    drop(scope);
    // Only a root scope drains on drop.
    drain();
    result
}

/// RAII guard that queues notifications while alive.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    /// Open a batch, or nest inside the current one.
    #[must_use]
    pub fn new() -> Self {
        let is_root = PENDING.with(|cell| {
            let mut guard = cell.borrow_mut();
            if let Some(pending) = guard.as_mut() {
                pending.depth += 1;
                return false;
            }
            *guard = Some(PendingQueue {
                depth: 1,
                queue: Vec::new(),
            });
            true
        });
        Self { is_root }
    }

    /// Notifications currently queued.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        PENDING.with(|cell| cell.borrow().as_ref().map_or(0, |p| p.queue.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let closes_root = PENDING.with(|cell| match cell.borrow_mut().as_mut() {
            Some(pending) => {
                pending.depth -= 1;
                pending.depth == 0
            }
            None => false,
        });
        if !closes_root {
            return;
        }

        let outcome = catch_unwind(drain);
        PENDING.with(|cell| *cell.borrow_mut() = None);
        if let Err(payload) = outcome {
            resume_unwind(payload);
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}
