#![forbid(unsafe_code)]

//! Pure list reordering from an edge-resolved drop.
//!
//! [`reorder`] relocates exactly one item next to a target item, on the side
//! given by the target's closest edge. It never mutates its input and has no
//! side effects, so it can run inside a store commit.
//!
//! # Invariants
//!
//! 1. The output is a permutation of the input: same length, same ids.
//! 2. Apart from the moved item, relative order is preserved.
//! 3. When the requested slot equals the source's current slot the result is
//!    [`Reorder::Unchanged`].
//!
//! # Example
//!
//! ```
//! use sortkit_core::edge::{Axis, Edge};
//! use sortkit_core::item::OrderedList;
//! use sortkit_core::reorder::reorder;
//!
//! let list = OrderedList::new(["a", "b", "c"]).unwrap();
//! let moved = reorder(&list, &"a".into(), &"c".into(), Some(Edge::Right), Axis::Horizontal);
//! assert_eq!(moved.into_list(&list).to_string(), "[b, c, a]");
//! ```

use crate::edge::{Axis, Edge};
use crate::item::{ItemId, OrderedList};

/// Result of a reorder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    /// The item already sits in the requested slot (or an id was absent).
    Unchanged,
    /// The new order.
    Moved(OrderedList),
}

impl Reorder {
    /// Returns true if the order changed.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// The resulting list, falling back to `original` when unchanged.
    #[must_use]
    pub fn into_list(self, original: &OrderedList) -> OrderedList {
        match self {
            Self::Unchanged => original.clone(),
            Self::Moved(list) => list,
        }
    }
}

/// Index offset implied by an optional edge along `axis`.
///
/// `0` when there is no edge or the edge is perpendicular to `axis`.
#[must_use]
pub fn edge_delta(edge: Option<Edge>, axis: Axis) -> isize {
    edge.map_or(0, |edge| edge.delta_on(axis))
}

/// Final index of an item moved from `start` next to the item at `target`.
///
/// Accounts for the shift caused by removing the item first.
#[must_use]
pub fn destination_index(start: usize, target: usize, edge: Option<Edge>, axis: Axis) -> usize {
    if start == target {
        return start;
    }
    let Some(edge) = edge else {
        return target;
    };
    let going_after = edge.is_trailing_on(axis);
    if start < target {
        if going_after { target } else { target - 1 }
    } else if going_after {
        target + 1
    } else {
        target
    }
}

/// Move `source` to the `edge` side of `target`.
///
/// Callers are expected to have checked that both ids are present and
/// distinct; if not, the result is [`Reorder::Unchanged`].
#[must_use]
pub fn reorder(
    list: &OrderedList,
    source: &ItemId,
    target: &ItemId,
    edge: Option<Edge>,
    axis: Axis,
) -> Reorder {
    let (Some(start), Some(target)) = (list.index_of(source), list.index_of(target)) else {
        return Reorder::Unchanged;
    };
    if start == target {
        return Reorder::Unchanged;
    }
    let delta = edge_delta(edge, axis);
    if start as isize == target as isize + delta {
        return Reorder::Unchanged;
    }

    let finish = destination_index(start, target, edge, axis);
    if finish == start {
        return Reorder::Unchanged;
    }

    let mut ids = list.as_slice().to_vec();
    let moved = ids.remove(start);
    ids.insert(finish, moved);
    Reorder::Moved(OrderedList::from_permutation(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> OrderedList {
        OrderedList::new(ids.iter().copied()).expect("valid list")
    }

    fn moved(
        ids: &[&str],
        source: &str,
        target: &str,
        edge: Option<Edge>,
        axis: Axis,
    ) -> String {
        let l = list(ids);
        reorder(&l, &source.into(), &target.into(), edge, axis)
            .into_list(&l)
            .to_string()
    }

    #[test]
    fn move_first_after_last() {
        assert_eq!(
            moved(&["A", "B", "C"], "A", "C", Some(Edge::Right), Axis::Horizontal),
            "[B, C, A]"
        );
    }

    #[test]
    fn move_first_before_last() {
        assert_eq!(
            moved(&["A", "B", "C"], "A", "C", Some(Edge::Left), Axis::Horizontal),
            "[B, A, C]"
        );
    }

    #[test]
    fn move_last_before_first() {
        assert_eq!(
            moved(&["X", "Y", "Z", "W"], "W", "X", Some(Edge::Left), Axis::Horizontal),
            "[W, X, Y, Z]"
        );
    }

    #[test]
    fn move_backward_after_target() {
        assert_eq!(
            moved(&["A", "B", "C", "D"], "D", "A", Some(Edge::Right), Axis::Horizontal),
            "[A, D, B, C]"
        );
    }

    #[test]
    fn vertical_axis_uses_top_bottom() {
        assert_eq!(
            moved(&["A", "B", "C"], "C", "A", Some(Edge::Top), Axis::Vertical),
            "[C, A, B]"
        );
        assert_eq!(
            moved(&["A", "B", "C"], "A", "B", Some(Edge::Bottom), Axis::Vertical),
            "[B, A, C]"
        );
    }

    #[test]
    fn already_in_place_is_unchanged() {
        let l = list(&["A", "B", "C"]);
        // B is already immediately after A.
        assert_eq!(
            reorder(&l, &"B".into(), &"A".into(), Some(Edge::Right), Axis::Horizontal),
            Reorder::Unchanged
        );
        // A is already immediately before B.
        assert_eq!(
            reorder(&l, &"A".into(), &"B".into(), Some(Edge::Left), Axis::Horizontal),
            Reorder::Unchanged
        );
    }

    #[test]
    fn self_drop_is_unchanged() {
        let l = list(&["A", "B"]);
        assert_eq!(
            reorder(&l, &"A".into(), &"A".into(), Some(Edge::Right), Axis::Horizontal),
            Reorder::Unchanged
        );
    }

    #[test]
    fn absent_ids_are_unchanged() {
        let l = list(&["A", "B"]);
        assert_eq!(
            reorder(&l, &"Q".into(), &"A".into(), Some(Edge::Left), Axis::Horizontal),
            Reorder::Unchanged
        );
        assert_eq!(
            reorder(&l, &"A".into(), &"Q".into(), Some(Edge::Left), Axis::Horizontal),
            Reorder::Unchanged
        );
    }

    #[test]
    fn perpendicular_edge_has_no_offset() {
        // Top on a horizontal list adds no offset to the no-op check and
        // does not count as "after" the target.
        assert_eq!(
            moved(&["A", "B", "C"], "A", "C", Some(Edge::Top), Axis::Horizontal),
            "[B, A, C]"
        );
        assert_eq!(
            moved(&["A", "B", "C"], "B", "A", Some(Edge::Top), Axis::Horizontal),
            "[B, A, C]"
        );
        assert_eq!(
            moved(&["A", "B", "C"], "C", "A", None, Axis::Horizontal),
            "[C, A, B]"
        );
    }

    #[test]
    fn destination_accounts_for_removal() {
        let h = Axis::Horizontal;
        assert_eq!(destination_index(0, 2, Some(Edge::Right), h), 2);
        assert_eq!(destination_index(0, 2, Some(Edge::Left), h), 1);
        assert_eq!(destination_index(3, 0, Some(Edge::Left), h), 0);
        assert_eq!(destination_index(3, 0, Some(Edge::Right), h), 1);
        assert_eq!(destination_index(1, 1, Some(Edge::Right), h), 1);
        assert_eq!(destination_index(1, 3, None, h), 3);
    }

    #[test]
    fn reorder_does_not_touch_input() {
        let l = list(&["A", "B", "C"]);
        let before = l.clone();
        let _ = reorder(&l, &"A".into(), &"C".into(), Some(Edge::Right), Axis::Horizontal);
        assert_eq!(l, before);
    }
}
