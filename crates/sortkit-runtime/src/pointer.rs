#![forbid(unsafe_code)]

//! Pointer-driven drag events over a laid-out list.
//!
//! [`PointerDriver`] owns the current item rectangles and a
//! [`GestureRecognizer`]. It turns raw [`PointerEvent`]s into [`DragEvents`]
//! calls on any sink (normally a [`DragSession`](sortkit_core::session::DragSession)):
//!
//! | Gesture | Calls |
//! |---------|-------|
//! | `Start` on an item | `on_drag_start`, then enter/over at the current position |
//! | `Start` off every item | nothing; the press is ignored until release |
//! | `Move` | `on_drag_leave` / `on_drag_enter` when the hit item changes, else `on_drag_over` |
//! | `End` | a final move to the release position, then `on_drop` |
//! | `Cancel` | `on_drag_cancel` |

use sortkit_core::edge::{AllowedEdges, Axis};
use sortkit_core::geometry::{Position, Rect};
use sortkit_core::gesture::{DragGesture, GestureConfig, GestureRecognizer, PointerEvent};
use sortkit_core::item::{DragKind, ItemId, OrderedList};
use sortkit_core::session::{DragEvents, DragOutcome, DragSource, DropTarget};
use tracing::trace;

/// Lay `ids` out as a strip of equal cells along `axis`.
///
/// Each item is `extent` cells long and one cell thick, separated by `gap`
/// cells. Positions saturate at the coordinate limit.
#[must_use]
pub fn strip_layout(ids: &OrderedList, axis: Axis, extent: u16, gap: u16) -> Vec<(ItemId, Rect)> {
    let stride = extent.saturating_add(gap);
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(stride);
            let rect = match axis {
                Axis::Horizontal => Rect::new(offset, 0, extent, 1),
                Axis::Vertical => Rect::new(0, offset, 1, extent),
            };
            (id.clone(), rect)
        })
        .collect()
}

/// Converts pointer input into drag events using hit-testing.
#[derive(Debug, Clone)]
pub struct PointerDriver {
    recognizer: GestureRecognizer,
    targets: Vec<DropTarget>,
    kind: DragKind,
    accepts: Vec<String>,
    allowed_edges: Option<AllowedEdges>,
    hovered: Option<ItemId>,
    tracking: bool,
}

impl Default for PointerDriver {
    fn default() -> Self {
        Self::new(GestureConfig::default(), DragKind::default())
    }
}

impl PointerDriver {
    /// Create a driver whose drags carry `kind`.
    #[must_use]
    pub fn new(gestures: GestureConfig, kind: DragKind) -> Self {
        Self {
            recognizer: GestureRecognizer::new(gestures),
            targets: Vec::new(),
            kind,
            accepts: Vec::new(),
            allowed_edges: None,
            hovered: None,
            tracking: false,
        }
    }

    /// Accepted drag-kind patterns applied to every target.
    #[must_use]
    pub fn with_accepts(mut self, accepts: Vec<String>) -> Self {
        self.accepts = accepts;
        self.rebuild_targets();
        self
    }

    /// Sides every target may report. `None` uses the list axis pair.
    #[must_use]
    pub fn with_allowed_edges(mut self, allowed: Option<AllowedEdges>) -> Self {
        self.allowed_edges = allowed;
        self.rebuild_targets();
        self
    }

    /// Replace the item rectangles.
    ///
    /// A relayout during a drag keeps the hovered item if it still exists.
    pub fn set_layout(&mut self, layout: impl IntoIterator<Item = (ItemId, Rect)>) {
        self.targets = layout
            .into_iter()
            .map(|(item, bounds)| self.make_target(item, bounds))
            .collect();
        if let Some(hovered) = &self.hovered
            && !self.targets.iter().any(|t| &t.item == hovered)
        {
            self.hovered = None;
        }
    }

    /// Current targets in layout order.
    #[must_use]
    pub fn targets(&self) -> &[DropTarget] {
        &self.targets
    }

    /// Item under `pos`, if any.
    #[must_use]
    pub fn hit_test(&self, pos: Position) -> Option<&DropTarget> {
        self.targets.iter().find(|t| t.bounds.contains(pos))
    }

    /// Whether a drag is being driven.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracking
    }

    /// Feed one pointer event, forwarding the resulting drag events to
    /// `events`. Returns the terminal outcome when a drag ends.
    pub fn handle<E: DragEvents>(
        &mut self,
        event: PointerEvent,
        events: &mut E,
    ) -> Option<DragOutcome> {
        let mut outcome = None;
        for gesture in self.recognizer.process(event) {
            if let Some(done) = self.apply(gesture, events) {
                outcome = Some(done);
            }
        }
        outcome
    }

    fn apply<E: DragEvents>(&mut self, gesture: DragGesture, events: &mut E) -> Option<DragOutcome> {
        match gesture {
            DragGesture::Start { origin, current } => {
                let Some(source) = self.hit_test(origin).map(|t| t.item.clone()) else {
                    trace!(x = origin.x, y = origin.y, "drag started off every item");
                    return None;
                };
                self.tracking = true;
                self.hovered = None;
                events.on_drag_start(DragSource::new(source, self.kind.clone()));
                self.track(current, events);
                None
            }
            DragGesture::Move { current, .. } => {
                if self.tracking {
                    self.track(current, events);
                }
                None
            }
            DragGesture::End { end, .. } => {
                if !self.tracking {
                    return None;
                }
                self.track(end, events);
                self.tracking = false;
                self.hovered = None;
                events.on_drop()
            }
            DragGesture::Cancel => {
                if !self.tracking {
                    return None;
                }
                self.tracking = false;
                self.hovered = None;
                events.on_drag_cancel()
            }
        }
    }

    fn track<E: DragEvents>(&mut self, pos: Position, events: &mut E) {
        let hit = self.targets.iter().position(|t| t.bounds.contains(pos));
        let hit_item = hit.map(|i| self.targets[i].item.clone());
        if hit_item != self.hovered {
            if let Some(previous) = self.hovered.take() {
                events.on_drag_leave(&previous);
            }
            if let Some(i) = hit {
                events.on_drag_enter(&self.targets[i], pos);
            }
            self.hovered = hit_item;
        } else if let Some(i) = hit {
            events.on_drag_over(&self.targets[i], pos);
        }
    }

    fn make_target(&self, item: ItemId, bounds: Rect) -> DropTarget {
        let target = DropTarget::new(item, bounds).with_accepts(self.accepts.clone());
        match self.allowed_edges {
            Some(allowed) => target.with_allowed_edges(allowed),
            None => target,
        }
    }

    fn rebuild_targets(&mut self) {
        let layout: Vec<(ItemId, Rect)> = self
            .targets
            .drain(..)
            .map(|t| (t.item, t.bounds))
            .collect();
        self.set_layout(layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortkit_core::edge::Edge;

    /// Records every call as a string.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DragEvents for Recorder {
        fn on_drag_start(&mut self, source: DragSource) {
            self.calls.push(format!("start {}", source.item));
        }
        fn on_drag_enter(&mut self, target: &DropTarget, pointer: Position) {
            self.calls.push(format!("enter {} @{}", target.item, pointer.x));
        }
        fn on_drag_over(&mut self, target: &DropTarget, pointer: Position) {
            self.calls.push(format!("over {} @{}", target.item, pointer.x));
        }
        fn on_drag_leave(&mut self, item: &ItemId) {
            self.calls.push(format!("leave {item}"));
        }
        fn on_drop(&mut self) -> Option<DragOutcome> {
            self.calls.push("drop".into());
            None
        }
        fn on_drag_cancel(&mut self) -> Option<DragOutcome> {
            self.calls.push("cancel".into());
            None
        }
    }

    fn driver(ids: &[&str]) -> PointerDriver {
        let list = OrderedList::new(ids.iter().copied()).expect("valid list");
        let mut d = PointerDriver::default();
        d.set_layout(strip_layout(&list, Axis::Horizontal, 4, 1));
        d
    }

    fn p(x: u16) -> Position {
        Position::new(x, 0)
    }

    #[test]
    fn strip_layout_spacing() {
        let list = OrderedList::new(["a", "b", "c"]).expect("valid list");
        let h = strip_layout(&list, Axis::Horizontal, 4, 1);
        assert_eq!(h[1].1, Rect::new(5, 0, 4, 1));
        assert_eq!(h[2].1, Rect::new(10, 0, 4, 1));
        let v = strip_layout(&list, Axis::Vertical, 2, 0);
        assert_eq!(v[2].1, Rect::new(0, 4, 1, 2));
    }

    #[test]
    fn drag_across_items() {
        let mut d = driver(&["a", "b", "c"]);
        let mut rec = Recorder::default();
        for event in [
            PointerEvent::Down(p(1)),
            PointerEvent::Move(p(6)),
            PointerEvent::Move(p(7)),
            PointerEvent::Move(p(9)),
            PointerEvent::Move(p(11)),
            PointerEvent::Up(p(12)),
        ] {
            d.handle(event, &mut rec);
        }
        assert_eq!(
            rec.calls,
            vec![
                "start a",
                "enter b @6",
                "over b @7",
                "leave b",
                "enter c @11",
                "over c @12",
                "drop",
            ]
        );
        assert!(!d.is_dragging());
    }

    #[test]
    fn press_off_items_is_ignored() {
        let mut d = driver(&["a", "b"]);
        let mut rec = Recorder::default();
        for event in [
            PointerEvent::Down(p(4)),
            PointerEvent::Move(p(8)),
            PointerEvent::Up(p(8)),
        ] {
            d.handle(event, &mut rec);
        }
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn escape_cancels() {
        let mut d = driver(&["a", "b"]);
        let mut rec = Recorder::default();
        d.handle(PointerEvent::Down(p(0)), &mut rec);
        d.handle(PointerEvent::Move(p(5)), &mut rec);
        d.handle(PointerEvent::Escape, &mut rec);
        assert_eq!(rec.calls, vec!["start a", "enter b @5", "cancel"]);
    }

    #[test]
    fn drives_a_real_session() {
        use sortkit_core::session::{DragSession, SessionConfig};
        let mut d = driver(&["a", "b", "c"]);
        let mut session = DragSession::new(SessionConfig::default());
        d.handle(PointerEvent::Down(p(1)), &mut session);
        d.handle(PointerEvent::Move(p(11)), &mut session);
        let outcome = d.handle(PointerEvent::Up(p(13)), &mut session);
        assert_eq!(
            outcome,
            Some(DragOutcome::DroppedOnTarget {
                source: DragSource::new("a", DragKind::default()),
                target: "c".into(),
                closest_edge: Some(Edge::Right),
            })
        );
    }

    #[test]
    fn targets_inherit_accepts_and_edges() {
        let d = driver(&["a"])
            .with_accepts(vec!["sortkit/*".into()])
            .with_allowed_edges(Some(AllowedEdges::RIGHT));
        let t = &d.targets()[0];
        assert_eq!(t.accepts, vec!["sortkit/*".to_string()]);
        assert_eq!(t.allowed_edges, Some(AllowedEdges::RIGHT));
        assert_eq!(d.hit_test(p(2)).map(|t| t.item.as_str()), Some("a"));
        assert!(d.hit_test(p(4)).is_none());
    }
}
