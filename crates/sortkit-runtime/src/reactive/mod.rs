#![forbid(unsafe_code)]

//! Reactive primitives backing the list store.
//!
//! - [`Observable`]: shared value with change notification.
//! - [`BatchScope`]: defer notifications until a scope exits.
//! - [`flush_sync`]: apply a change and deliver its notifications at once.

pub mod batch;
pub mod observable;

pub use batch::{BatchScope, flush_sync};
pub use observable::{Observable, Subscription};
