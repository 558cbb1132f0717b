#![forbid(unsafe_code)]

//! Drag session: the lifecycle of one reorder gesture.
//!
//! [`DragSession`] receives drag callbacks from a visual layer through the
//! [`DragEvents`] capability trait, tracks which item is dragged and which
//! target is hovered, and publishes per-item [`DropTargetState`] changes to a
//! [`TargetStateObserver`].
//!
//! # State Machine
//!
//! ```text
//!   Idle ──drag_start──▶ Dragging ──enter/over/leave──▶ Dragging
//!                          │
//!                          ├─drop (hovering)──▶ DroppedOnTarget ─┐
//!                          ├─drop (no target)─▶ DroppedOutside  ─┼─▶ Idle
//!                          └─cancel───────────▶ Cancelled       ─┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one source is dragged at a time; a second `drag_start` while
//!    dragging is ignored.
//! 2. The source item reports [`DropTargetState::Dragging`] for the whole
//!    gesture unless it is itself hovered.
//! 3. At most one item reports [`DropTargetState::DraggingOver`].
//! 4. Only real state changes reach the observer; repeated drag-over events
//!    with the same edge are absorbed.
//! 5. After drop or cancel every item the session touched is back to
//!    [`DropTargetState::Idle`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Incompatible target | Target does not accept the source kind | Target stays idle |
//! | Drop with no target | Released outside every item | `DroppedOutside` |
//! | Focus loss / Escape | External abort | `Cancelled`, no reorder |

use std::collections::HashMap;

use crate::drop_state::DropTargetState;
use crate::edge::{AllowedEdges, Axis, Edge, closest_edge, resolve_edge};
use crate::geometry::{Position, Rect};
use crate::item::{DragKind, ItemId};

// ---------------------------------------------------------------------------
// Sources and targets
// ---------------------------------------------------------------------------

/// The item that initiated a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub item: ItemId,
    pub kind: DragKind,
}

impl DragSource {
    /// Create a new drag source.
    #[must_use]
    pub fn new(item: impl Into<ItemId>, kind: DragKind) -> Self {
        Self {
            item: item.into(),
            kind,
        }
    }
}

/// A rendered item that can receive drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Item the target renders.
    pub item: ItemId,
    /// Bounds in cell coordinates.
    pub bounds: Rect,
    /// Accepted drag kinds (patterns, see [`DragKind::matches`]). Empty accepts
    /// every kind.
    pub accepts: Vec<String>,
    /// Sides the target may report. `None` uses the pair along the list axis.
    pub allowed_edges: Option<AllowedEdges>,
}

impl DropTarget {
    /// Create a target accepting any kind.
    #[must_use]
    pub fn new(item: impl Into<ItemId>, bounds: Rect) -> Self {
        Self {
            item: item.into(),
            bounds,
            accepts: Vec::new(),
            allowed_edges: None,
        }
    }

    /// Restrict accepted drag kinds.
    #[must_use]
    pub fn with_accepts(mut self, accepts: Vec<String>) -> Self {
        self.accepts = accepts;
        self
    }

    /// Restrict the sides this target may report.
    #[must_use]
    pub fn with_allowed_edges(mut self, allowed: AllowedEdges) -> Self {
        self.allowed_edges = Some(allowed);
        self
    }

    /// Check if this target accepts drags of `kind`.
    #[must_use]
    pub fn can_accept(&self, kind: &DragKind) -> bool {
        self.accepts.is_empty() || self.accepts.iter().any(|pattern| kind.matches(pattern))
    }

    /// Closest edge for `pointer` along `axis`, honouring the allowed set.
    #[must_use]
    pub fn edge_at(&self, pointer: Position, axis: Axis) -> Option<Edge> {
        match self.allowed_edges {
            None => Some(resolve_edge(pointer, self.bounds, axis)),
            Some(allowed) if allowed == AllowedEdges::along(axis) => {
                Some(resolve_edge(pointer, self.bounds, axis))
            }
            Some(allowed) => closest_edge(pointer, self.bounds, allowed),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal result of a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released over a compatible target.
    DroppedOnTarget {
        source: DragSource,
        target: ItemId,
        closest_edge: Option<Edge>,
    },
    /// Released with no target hovered.
    DroppedOutside { source: DragSource },
    /// Aborted (Escape, focus loss, or an explicit cancel).
    Cancelled { source: DragSource },
}

impl DragOutcome {
    /// The dragged source.
    #[must_use]
    pub fn source(&self) -> &DragSource {
        match self {
            Self::DroppedOnTarget { source, .. }
            | Self::DroppedOutside { source }
            | Self::Cancelled { source } => source,
        }
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DroppedOnTarget { .. } => "dropped-on-target",
            Self::DroppedOutside { .. } => "dropped-outside",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

/// Coarse phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Dragging,
}

// ---------------------------------------------------------------------------
// Capability interfaces
// ---------------------------------------------------------------------------

/// Drag callbacks a visual layer delivers to a session.
pub trait DragEvents {
    /// A drag gesture started on `source`.
    fn on_drag_start(&mut self, source: DragSource);

    /// The pointer entered `target`.
    fn on_drag_enter(&mut self, target: &DropTarget, pointer: Position);

    /// The pointer moved within `target`.
    fn on_drag_over(&mut self, target: &DropTarget, pointer: Position);

    /// The pointer left the target rendering `item`.
    fn on_drag_leave(&mut self, item: &ItemId);

    /// The pointer was released. Returns `None` when no drag was active.
    fn on_drop(&mut self) -> Option<DragOutcome>;

    /// The gesture was aborted. Returns `None` when no drag was active.
    fn on_drag_cancel(&mut self) -> Option<DragOutcome>;
}

/// Receives per-item state changes.
pub trait TargetStateObserver {
    fn target_state_changed(&mut self, item: &ItemId, state: DropTargetState);
}

impl<F: FnMut(&ItemId, DropTargetState)> TargetStateObserver for F {
    fn target_state_changed(&mut self, item: &ItemId, state: DropTargetState) {
        self(item, state);
    }
}

/// Observer that discards every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TargetStateObserver for NoopObserver {
    fn target_state_changed(&mut self, _item: &ItemId, _state: DropTargetState) {}
}

/// Observer keeping the latest state of every item.
///
/// Items never reported, or reported back to idle, read as
/// [`DropTargetState::Idle`].
#[derive(Debug, Clone, Default)]
pub struct TargetStates {
    states: HashMap<ItemId, DropTargetState>,
}

impl TargetStates {
    /// Create an empty state table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `item`.
    #[must_use]
    pub fn get(&self, item: &ItemId) -> DropTargetState {
        self.states.get(item).copied().unwrap_or_default()
    }

    /// Number of items in a non-idle state.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.states.len()
    }
}

impl TargetStateObserver for TargetStates {
    fn target_state_changed(&mut self, item: &ItemId, state: DropTargetState) {
        if state.is_idle() {
            self.states.remove(item);
        } else {
            self.states.insert(item.clone(), state);
        }
    }
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// Session behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Axis the list is laid out along.
    pub axis: Axis,
    /// Keep the last hovered target when the pointer leaves into empty
    /// space; a drop in the gap lands on it.
    pub sticky_targets: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            sticky_targets: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Hover {
    target: ItemId,
    closest_edge: Option<Edge>,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    source: DragSource,
    hover: Option<Hover>,
}

/// Tracks one drag gesture at a time.
#[derive(Debug)]
pub struct DragSession<O: TargetStateObserver = NoopObserver> {
    config: SessionConfig,
    active: Option<ActiveDrag>,
    observer: O,
}

impl DragSession<NoopObserver> {
    /// Create a session without an observer.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: TargetStateObserver> DragSession<O> {
    /// Create a session publishing state changes to `observer`.
    #[must_use]
    pub fn with_observer(config: SessionConfig, observer: O) -> Self {
        Self {
            config,
            active: None,
            observer,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.active.is_some() {
            SessionPhase::Dragging
        } else {
            SessionPhase::Idle
        }
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The dragged source, while dragging.
    #[must_use]
    pub fn source(&self) -> Option<&DragSource> {
        self.active.as_ref().map(|active| &active.source)
    }

    /// Whether `item` is the dragged source (used to dim it).
    #[must_use]
    pub fn is_source(&self, item: &ItemId) -> bool {
        self.source().is_some_and(|source| &source.item == item)
    }

    /// Hovered target and its closest edge, while dragging over one.
    #[must_use]
    pub fn hovered(&self) -> Option<(&ItemId, Option<Edge>)> {
        self.active
            .as_ref()
            .and_then(|active| active.hover.as_ref())
            .map(|hover| (&hover.target, hover.closest_edge))
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shared access to the observer.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// State an item falls back to when it stops being hovered.
    fn resting_state(&self, item: &ItemId) -> DropTargetState {
        if self.is_source(item) {
            DropTargetState::Dragging
        } else {
            DropTargetState::Idle
        }
    }

    fn hover(&mut self, target: &DropTarget, pointer: Position) {
        let axis = self.config.axis;
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if !target.can_accept(&active.source.kind) {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                target_item = target.item.as_str(),
                kind = active.source.kind.as_str(),
                "target rejects drag kind"
            );
            return;
        }

        let closest_edge = target.edge_at(pointer, axis);
        let previous = active.hover.clone();
        match previous {
            Some(prev) if prev.target == target.item && prev.closest_edge == closest_edge => {
                return;
            }
            Some(prev) if prev.target != target.item => {
                let resting = self.resting_state(&prev.target);
                self.observer.target_state_changed(&prev.target, resting);
            }
            _ => {}
        }

        if let Some(active) = self.active.as_mut() {
            active.hover = Some(Hover {
                target: target.item.clone(),
                closest_edge,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target_item = target.item.as_str(),
            edge = closest_edge.map(Edge::as_str),
            "drag over target"
        );
        self.observer
            .target_state_changed(&target.item, DropTargetState::DraggingOver { closest_edge });
    }

    /// Reset every touched item to idle and end the gesture.
    fn finish(&mut self) -> Option<ActiveDrag> {
        let active = self.active.take()?;
        if let Some(hover) = &active.hover
            && hover.target != active.source.item
        {
            self.observer
                .target_state_changed(&hover.target, DropTargetState::Idle);
        }
        self.observer
            .target_state_changed(&active.source.item, DropTargetState::Idle);
        Some(active)
    }
}

impl<O: TargetStateObserver> DragEvents for DragSession<O> {
    fn on_drag_start(&mut self, source: DragSource) {
        if self.active.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                item = source.item.as_str(),
                "drag start ignored: a drag is already active"
            );
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(item = source.item.as_str(), kind = source.kind.as_str(), "drag start");
        self.observer
            .target_state_changed(&source.item, DropTargetState::Dragging);
        self.active = Some(ActiveDrag {
            source,
            hover: None,
        });
    }

    fn on_drag_enter(&mut self, target: &DropTarget, pointer: Position) {
        self.hover(target, pointer);
    }

    fn on_drag_over(&mut self, target: &DropTarget, pointer: Position) {
        self.hover(target, pointer);
    }

    fn on_drag_leave(&mut self, item: &ItemId) {
        if self.config.sticky_targets {
            return;
        }
        let hovered = self
            .active
            .as_ref()
            .and_then(|active| active.hover.as_ref())
            .is_some_and(|hover| &hover.target == item);
        if !hovered {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.hover = None;
        }
        let resting = self.resting_state(item);
        self.observer.target_state_changed(item, resting);
    }

    fn on_drop(&mut self) -> Option<DragOutcome> {
        let active = self.finish()?;
        let outcome = match active.hover {
            Some(hover) => DragOutcome::DroppedOnTarget {
                source: active.source,
                target: hover.target,
                closest_edge: hover.closest_edge,
            },
            None => DragOutcome::DroppedOutside {
                source: active.source,
            },
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(outcome = outcome.as_str(), "drag ended");
        Some(outcome)
    }

    fn on_drag_cancel(&mut self) -> Option<DragOutcome> {
        let active = self.finish()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(item = active.source.item.as_str(), "drag cancelled");
        Some(DragOutcome::Cancelled {
            source: active.source,
        })
    }
}
