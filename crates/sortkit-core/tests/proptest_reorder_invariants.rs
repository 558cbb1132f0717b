//! Property-based invariant tests for edge resolution and reordering.
//!
//! 1. Reorder output is a permutation of the input
//! 2. Relative order of the untouched items is preserved
//! 3. Reordering into the slot the item already occupies is a no-op
//! 4. The resolved edge is deterministic and always on the list axis
//! 5. `closest_edge` restricted to the axis pair agrees with `resolve_edge`
//! 6. The moved item lands on the requested side of the target

use proptest::prelude::*;
use sortkit_core::edge::{AllowedEdges, Axis, Edge, closest_edge, resolve_edge};
use sortkit_core::geometry::{Position, Rect};
use sortkit_core::item::{ItemId, OrderedList};
use sortkit_core::reorder::{Reorder, reorder};

// ── Strategies ──────────────────────────────────────────────────────────

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn edge_strategy() -> impl Strategy<Value = Option<Edge>> {
    prop_oneof![
        Just(None),
        Just(Some(Edge::Top)),
        Just(Some(Edge::Right)),
        Just(Some(Edge::Bottom)),
        Just(Some(Edge::Left)),
    ]
}

/// A list of `len` unique ids plus a source and target index into it.
fn drop_strategy() -> impl Strategy<Value = (OrderedList, usize, usize)> {
    (1usize..12).prop_flat_map(|len| {
        let ids: Vec<String> = (0..len).map(|i| format!("item-{i}")).collect();
        let list = OrderedList::new(ids).expect("generated ids are unique");
        (Just(list), 0..len, 0..len)
    })
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..200, 0u16..200, 1u16..60, 1u16..60).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn sorted(list: &OrderedList) -> Vec<ItemId> {
    let mut ids = list.as_slice().to_vec();
    ids.sort();
    ids
}

// ── Reorder ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reorder_is_a_permutation(
        (list, src, tgt) in drop_strategy(),
        edge in edge_strategy(),
        axis in axis_strategy(),
    ) {
        let source = list.as_slice()[src].clone();
        let target = list.as_slice()[tgt].clone();
        let out = reorder(&list, &source, &target, edge, axis).into_list(&list);
        prop_assert_eq!(out.len(), list.len());
        prop_assert_eq!(sorted(&out), sorted(&list));
    }

    #[test]
    fn reorder_preserves_relative_order(
        (list, src, tgt) in drop_strategy(),
        edge in edge_strategy(),
        axis in axis_strategy(),
    ) {
        let source = list.as_slice()[src].clone();
        let target = list.as_slice()[tgt].clone();
        let out = reorder(&list, &source, &target, edge, axis).into_list(&list);
        let before: Vec<&ItemId> = list.iter().filter(|id| **id != source).collect();
        let after: Vec<&ItemId> = out.iter().filter(|id| **id != source).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn dropping_into_current_slot_is_a_noop(
        (list, src, _tgt) in drop_strategy(),
        axis in axis_strategy(),
    ) {
        let source = list.as_slice()[src].clone();
        // Trailing edge of the predecessor.
        if src > 0 {
            let prev = list.as_slice()[src - 1].clone();
            let result = reorder(&list, &source, &prev, Some(Edge::trailing(axis)), axis);
            prop_assert_eq!(result, Reorder::Unchanged);
        }
        // Leading edge of the successor.
        if src + 1 < list.len() {
            let next = list.as_slice()[src + 1].clone();
            let result = reorder(&list, &source, &next, Some(Edge::leading(axis)), axis);
            prop_assert_eq!(result, Reorder::Unchanged);
        }
        // Itself.
        let result = reorder(&list, &source, &source, Some(Edge::leading(axis)), axis);
        prop_assert_eq!(result, Reorder::Unchanged);
    }

    #[test]
    fn moved_item_lands_beside_target(
        (list, src, tgt) in drop_strategy(),
        trailing in any::<bool>(),
        axis in axis_strategy(),
    ) {
        prop_assume!(src != tgt);
        let source = list.as_slice()[src].clone();
        let target = list.as_slice()[tgt].clone();
        let edge = if trailing { Edge::trailing(axis) } else { Edge::leading(axis) };
        let out = reorder(&list, &source, &target, Some(edge), axis).into_list(&list);
        let s = out.index_of(&source).expect("source kept");
        let t = out.index_of(&target).expect("target kept");
        if trailing {
            prop_assert_eq!(s, t + 1);
        } else {
            prop_assert_eq!(s + 1, t);
        }
    }
}

// ── Edge resolution ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn resolve_edge_is_deterministic_and_on_axis(
        bounds in rect_strategy(),
        px in 0u16..300,
        py in 0u16..300,
        axis in axis_strategy(),
    ) {
        let pointer = Position::new(px, py);
        let first = resolve_edge(pointer, bounds, axis);
        let second = resolve_edge(pointer, bounds, axis);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.axis(), axis);
    }

    #[test]
    fn resolve_edge_ignores_cross_axis(
        bounds in rect_strategy(),
        px in 0u16..300,
        py in 0u16..300,
        other in 0u16..300,
    ) {
        let a = resolve_edge(Position::new(px, py), bounds, Axis::Horizontal);
        let b = resolve_edge(Position::new(px, other), bounds, Axis::Horizontal);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn closest_edge_on_axis_pair_matches_resolver(
        bounds in rect_strategy(),
        dx in 0u16..60,
        dy in 0u16..60,
        axis in axis_strategy(),
    ) {
        prop_assume!(dx < bounds.width && dy < bounds.height);
        let pointer = Position::new(bounds.x + dx, bounds.y + dy);
        prop_assert_eq!(
            closest_edge(pointer, bounds, AllowedEdges::along(axis)),
            Some(resolve_edge(pointer, bounds, axis))
        );
    }
}
