#![forbid(unsafe_code)]

//! Core: edge resolution, drag sessions, and pure list reordering.
//!
//! # Role in sortkit
//! `sortkit-core` is the protocol layer. It owns the cell geometry, the
//! edge resolver, the item/list model, and the drag state machine. It does no
//! I/O and holds no shared state, so the runtime (`sortkit-runtime`) can wrap
//! it in whatever store and event loop it needs.
//!
//! # Primary responsibilities
//! - **Edge resolution** ([`edge`]): which side of a target a pointer is on.
//! - **Drag sessions** ([`session`]): source/hover tracking and per-item
//!   [`DropTargetState`] broadcast.
//! - **Reordering** ([`reorder`]): move one item next to another.
//! - **Gestures** ([`gesture`]): press/drag/release recognition with a
//!   movement threshold.

pub mod drop_state;
pub mod edge;
pub mod geometry;
pub mod gesture;
pub mod item;
pub mod reorder;
pub mod session;

pub use drop_state::{DropTargetState, drop_indicator};
pub use edge::{AllowedEdges, Axis, Edge, closest_edge, resolve_edge};
pub use geometry::{Position, Rect};
pub use gesture::{DragGesture, GestureConfig, GestureRecognizer, PointerEvent};
pub use item::{DragKind, ItemId, ListError, OrderedList};
pub use reorder::{Reorder, reorder};
pub use session::{
    DragEvents, DragOutcome, DragSession, DragSource, DropTarget, NoopObserver, SessionConfig,
    SessionPhase, TargetStateObserver, TargetStates,
};
