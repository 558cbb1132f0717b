#![forbid(unsafe_code)]

//! Per-target drag feedback state.
//!
//! Every rendered item owns one [`DropTargetState`]. It is re-derived from the
//! latest drag event for that item and carries no history, so a visual layer
//! can style hover and drag feedback straight from it.

use crate::edge::Edge;
use crate::geometry::Rect;

/// Visual drag state of a single list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropTargetState {
    /// Not involved in the current gesture.
    #[default]
    Idle,
    /// This item is the one being dragged.
    Dragging,
    /// The pointer is over this item; the drop would land on `closest_edge`.
    DraggingOver { closest_edge: Option<Edge> },
}

impl DropTargetState {
    /// Returns true for [`DropTargetState::Idle`].
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The hovered edge, when dragging over.
    #[must_use]
    pub const fn closest_edge(self) -> Option<Edge> {
        match self {
            Self::DraggingOver { closest_edge } => closest_edge,
            _ => None,
        }
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "is-dragging",
            Self::DraggingOver { .. } => "is-dragging-over",
        }
    }
}

/// Line marking where a drop would land, centred in the gap on the hovered
/// side of `bounds`.
///
/// The line is one cell thick and spans the item across the list axis. With a
/// zero gap it overlaps the item's outermost cells. Returns `None` unless the
/// state is [`DropTargetState::DraggingOver`] with an edge.
#[must_use]
pub fn drop_indicator(bounds: Rect, state: DropTargetState, gap: u16) -> Option<Rect> {
    let edge = state.closest_edge()?;
    if bounds.is_empty() {
        return None;
    }
    let half_gap = gap.div_ceil(2);
    let rect = match edge {
        Edge::Left => Rect::new(bounds.x.saturating_sub(half_gap), bounds.y, 1, bounds.height),
        Edge::Right => Rect::new(
            (bounds.right() - 1).saturating_add(half_gap),
            bounds.y,
            1,
            bounds.height,
        ),
        Edge::Top => Rect::new(bounds.x, bounds.y.saturating_sub(half_gap), bounds.width, 1),
        Edge::Bottom => Rect::new(
            bounds.x,
            (bounds.bottom() - 1).saturating_add(half_gap),
            bounds.width,
            1,
        ),
    };
    Some(rect)
}
