#![forbid(unsafe_code)]

//! sortkit Runtime
//!
//! Stateful glue around the pure protocol in `sortkit-core`.
//!
//! # Key Components
//!
//! - [`ObservableListStore`] - Shared list order with change notification
//! - [`DropCoordinator`] - Validates drops, commits the new order, acknowledges
//! - [`FlashTracker`] - Post-move highlight with linear decay
//! - [`PointerDriver`] - Hit-tests a layout and drives a drag session
//! - [`SortableList`] - All of the above for one list
//! - [`ListPolicy`] - Tunables, loadable from TOML/JSON with `policy-config`
//!
//! # Role in sortkit
//! The core crate decides *what* a drop means. This crate decides *when* it
//! takes effect: a committed order is delivered to every store subscriber
//! (see [`reactive::flush_sync`]) before the moved item is acknowledged.

pub mod coordinator;
pub mod flash;
pub mod pointer;
pub mod policy_config;
pub mod reactive;
pub mod sortable;
pub mod store;

pub use coordinator::{
    Acknowledger, DropCoordinator, DropResolution, NoopAcknowledger, RejectReason,
};
pub use flash::FlashTracker;
pub use pointer::{PointerDriver, strip_layout};
pub use policy_config::{ListPolicy, PolicyConfigError};
pub use reactive::{BatchScope, Observable, Subscription, flush_sync};
pub use sortable::{SortableError, SortableList};
pub use store::{ListStore, ObservableListStore};
