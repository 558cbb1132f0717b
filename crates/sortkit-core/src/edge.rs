#![forbid(unsafe_code)]

//! Closest-edge resolution for drop targets.
//!
//! Given a pointer position and the bounds of the item under it, decide which
//! side of the item the drop would land on. Along a list axis one side is the
//! *leading* edge (left / top) and the other the *trailing* edge
//! (right / bottom).
//!
//! # Measurement
//!
//! Pointer cells are measured at their centres. Coordinates are doubled so the
//! comparison never rounds: a cell at offset `o` inside an extent `w` sits at
//! `2o + 1`, and the midpoint of the extent is `w`.
//!
//! # Invariants
//!
//! 1. [`resolve_edge`] only reads the coordinate along the requested axis.
//! 2. On an exact tie the leading edge wins (left before right, top before
//!    bottom). The result is a pure function of its inputs.
//! 3. Pointers outside the bounds resolve to the nearer side.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::geometry::{Position, Rect};

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Layout direction of a sortable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Items laid out left to right.
    #[default]
    Horizontal,
    /// Items laid out top to bottom.
    Vertical,
}

impl Axis {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "x" => Ok(Self::Horizontal),
            "vertical" | "v" | "y" => Ok(Self::Vertical),
            _ => Err(ParseNameError::new("axis", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A side of a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Edges in tie-break order: leading sides first.
    pub const PRIORITY: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    /// The leading edge along `axis` (insert before).
    #[must_use]
    pub const fn leading(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::Left,
            Axis::Vertical => Self::Top,
        }
    }

    /// The trailing edge along `axis` (insert after).
    #[must_use]
    pub const fn trailing(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::Right,
            Axis::Vertical => Self::Bottom,
        }
    }

    /// The axis this edge lies across.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Index offset this edge implies along `axis`.
    ///
    /// `+1` for the trailing edge, `-1` for the leading edge, `0` when the
    /// edge is perpendicular to `axis`.
    #[must_use]
    pub const fn delta_on(self, axis: Axis) -> isize {
        match (axis, self) {
            (Axis::Horizontal, Self::Right) | (Axis::Vertical, Self::Bottom) => 1,
            (Axis::Horizontal, Self::Left) | (Axis::Vertical, Self::Top) => -1,
            _ => 0,
        }
    }

    /// Returns true if this is the trailing edge along `axis`.
    #[must_use]
    pub const fn is_trailing_on(self, axis: Axis) -> bool {
        self.delta_on(axis) > 0
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    const fn flag(self) -> AllowedEdges {
        match self {
            Self::Top => AllowedEdges::TOP,
            Self::Right => AllowedEdges::RIGHT,
            Self::Bottom => AllowedEdges::BOTTOM,
            Self::Left => AllowedEdges::LEFT,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            _ => Err(ParseNameError::new("edge", s)),
        }
    }
}

/// Unrecognised name for an [`Axis`] or [`Edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    kind: &'static str,
    input: String,
}

impl ParseNameError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} name {:?}", self.kind, self.input)
    }
}

impl std::error::Error for ParseNameError {}

// ---------------------------------------------------------------------------
// AllowedEdges
// ---------------------------------------------------------------------------

bitflags! {
    /// Sides a drop target is allowed to report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AllowedEdges: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl AllowedEdges {
    /// The leading/trailing pair along `axis`.
    #[must_use]
    pub const fn along(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::HORIZONTAL,
            Axis::Vertical => Self::VERTICAL,
        }
    }

    /// Whether `edge` is in the set.
    #[must_use]
    pub fn allows(self, edge: Edge) -> bool {
        self.contains(edge.flag())
    }

    /// Allowed edges in tie-break order.
    pub fn iter_edges(self) -> impl Iterator<Item = Edge> {
        Edge::PRIORITY.into_iter().filter(move |e| self.allows(*e))
    }
}

impl Default for AllowedEdges {
    fn default() -> Self {
        Self::HORIZONTAL
    }
}

impl FromIterator<Edge> for AllowedEdges {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, edge| acc | edge.flag())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Doubled distance from the pointer cell centre to `edge` of `bounds`.
///
/// Negative when the pointer lies outside the bounds beyond that edge.
fn doubled_distance(pointer: Position, bounds: Rect, edge: Edge) -> i32 {
    let centre = |p: u16| 2 * i32::from(p) + 1;
    match edge {
        Edge::Left => centre(pointer.x) - 2 * i32::from(bounds.x),
        Edge::Right => 2 * i32::from(bounds.x) + 2 * i32::from(bounds.width) - centre(pointer.x),
        Edge::Top => centre(pointer.y) - 2 * i32::from(bounds.y),
        Edge::Bottom => 2 * i32::from(bounds.y) + 2 * i32::from(bounds.height) - centre(pointer.y),
    }
}

/// Nearest allowed edge of `bounds` to `pointer`.
///
/// Ties resolve in [`Edge::PRIORITY`] order. Returns `None` when `allowed`
/// is empty.
#[must_use]
pub fn closest_edge(pointer: Position, bounds: Rect, allowed: AllowedEdges) -> Option<Edge> {
    let mut best: Option<(Edge, i32)> = None;
    for edge in allowed.iter_edges() {
        let distance = doubled_distance(pointer, bounds, edge);
        match best {
            Some((_, current)) if current <= distance => {}
            _ => best = Some((edge, distance)),
        }
    }
    best.map(|(edge, _)| edge)
}

/// Resolve which side of `bounds` along `axis` the pointer is on.
///
/// Always returns either [`Edge::leading`] or [`Edge::trailing`] of `axis`;
/// the leading edge wins when the pointer sits exactly on the midpoint.
#[must_use]
pub fn resolve_edge(pointer: Position, bounds: Rect, axis: Axis) -> Edge {
    let offset = 2 * (i32::from(pointer.along(axis)) - i32::from(bounds.start(axis))) + 1;
    if offset > i32::from(bounds.extent(axis)) {
        Edge::trailing(axis)
    } else {
        Edge::leading(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn horizontal_halves() {
        let bounds = Rect::new(10, 0, 4, 1);
        assert_eq!(resolve_edge(cell(10, 0), bounds, Axis::Horizontal), Edge::Left);
        assert_eq!(resolve_edge(cell(11, 0), bounds, Axis::Horizontal), Edge::Left);
        assert_eq!(resolve_edge(cell(12, 0), bounds, Axis::Horizontal), Edge::Right);
        assert_eq!(resolve_edge(cell(13, 0), bounds, Axis::Horizontal), Edge::Right);
    }

    #[test]
    fn exact_midpoint_is_leading() {
        // Width 3: the middle cell's centre is exactly on the midpoint.
        let bounds = Rect::new(0, 0, 3, 3);
        assert_eq!(resolve_edge(cell(1, 0), bounds, Axis::Horizontal), Edge::Left);
        assert_eq!(resolve_edge(cell(0, 1), bounds, Axis::Vertical), Edge::Top);
        assert_eq!(resolve_edge(cell(2, 0), bounds, Axis::Horizontal), Edge::Right);
    }

    #[test]
    fn cross_axis_is_ignored() {
        let bounds = Rect::new(0, 5, 6, 2);
        let a = resolve_edge(cell(4, 0), bounds, Axis::Horizontal);
        let b = resolve_edge(cell(4, 200), bounds, Axis::Horizontal);
        assert_eq!(a, b);
        assert_eq!(a, Edge::Right);
    }

    #[test]
    fn outside_pointer_clamps_to_nearer_side() {
        let bounds = Rect::new(10, 10, 4, 4);
        assert_eq!(resolve_edge(cell(2, 11), bounds, Axis::Horizontal), Edge::Left);
        assert_eq!(resolve_edge(cell(40, 11), bounds, Axis::Horizontal), Edge::Right);
        assert_eq!(resolve_edge(cell(11, 0), bounds, Axis::Vertical), Edge::Top);
        assert_eq!(resolve_edge(cell(11, 99), bounds, Axis::Vertical), Edge::Bottom);
    }

    #[test]
    fn zero_extent_resolves_trailing() {
        let bounds = Rect::new(4, 0, 0, 1);
        assert_eq!(resolve_edge(cell(4, 0), bounds, Axis::Horizontal), Edge::Right);
    }

    #[test]
    fn closest_edge_respects_allowed_set() {
        let bounds = Rect::new(0, 0, 10, 10);
        // Near the top-left corner, but only left/right allowed.
        assert_eq!(
            closest_edge(cell(1, 0), bounds, AllowedEdges::HORIZONTAL),
            Some(Edge::Left)
        );
        assert_eq!(
            closest_edge(cell(1, 0), bounds, AllowedEdges::all()),
            Some(Edge::Top)
        );
        assert_eq!(
            closest_edge(cell(8, 5), bounds, AllowedEdges::VERTICAL),
            Some(Edge::Bottom)
        );
        assert_eq!(closest_edge(cell(5, 5), bounds, AllowedEdges::empty()), None);
    }

    #[test]
    fn closest_edge_single_side() {
        let bounds = Rect::new(0, 0, 10, 1);
        assert_eq!(
            closest_edge(cell(9, 0), bounds, AllowedEdges::LEFT),
            Some(Edge::Left)
        );
    }

    #[test]
    fn closest_edge_agrees_with_resolve_edge() {
        let bounds = Rect::new(3, 2, 7, 5);
        for x in 0..14 {
            for y in 0..10 {
                let p = cell(x, y);
                for axis in [Axis::Horizontal, Axis::Vertical] {
                    assert_eq!(
                        closest_edge(p, bounds, AllowedEdges::along(axis)),
                        Some(resolve_edge(p, bounds, axis)),
                        "pointer {p:?} axis {axis}"
                    );
                }
            }
        }
    }

    #[test]
    fn delta_on_axis() {
        assert_eq!(Edge::Right.delta_on(Axis::Horizontal), 1);
        assert_eq!(Edge::Left.delta_on(Axis::Horizontal), -1);
        assert_eq!(Edge::Top.delta_on(Axis::Horizontal), 0);
        assert_eq!(Edge::Bottom.delta_on(Axis::Vertical), 1);
        assert_eq!(Edge::Top.delta_on(Axis::Vertical), -1);
        assert_eq!(Edge::Left.delta_on(Axis::Vertical), 0);
    }

    #[test]
    fn leading_trailing_pairs() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            assert_eq!(Edge::leading(axis).axis(), axis);
            assert_eq!(Edge::trailing(axis).axis(), axis);
            assert!(Edge::trailing(axis).is_trailing_on(axis));
            assert!(!Edge::leading(axis).is_trailing_on(axis));
        }
    }

    #[test]
    fn names_parse_back() {
        for edge in Edge::PRIORITY {
            assert_eq!(edge.as_str().parse::<Edge>(), Ok(edge));
        }
        assert_eq!("V".parse::<Axis>(), Ok(Axis::Vertical));
        let err = "diagonal".parse::<Edge>().unwrap_err();
        assert_eq!(err.to_string(), "unknown edge name \"diagonal\"");
    }

    #[test]
    fn allowed_edges_from_iter() {
        let set: AllowedEdges = [Edge::Top, Edge::Left].into_iter().collect();
        assert!(set.allows(Edge::Top));
        assert!(set.allows(Edge::Left));
        assert!(!set.allows(Edge::Right));
        assert_eq!(set.iter_edges().collect::<Vec<_>>(), vec![Edge::Top, Edge::Left]);
        assert_eq!(AllowedEdges::default(), AllowedEdges::HORIZONTAL);
    }
}
