#![no_main]

use libfuzzer_sys::fuzz_target;
use sortkit_core::edge::Axis;
use sortkit_core::geometry::Position;
use sortkit_core::gesture::PointerEvent;
use sortkit_core::item::OrderedList;
use sortkit_runtime::{ListPolicy, NoopAcknowledger, SortableList};

fuzz_target!(|data: &[u8]| {
    // First byte picks the axis and list length (1..=5); the rest are
    // three-byte pointer events.
    let Some((&head, payload)) = data.split_first() else {
        return;
    };
    let axis = if head & 0x80 == 0 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let len = usize::from(head % 5) + 1;
    let ids: Vec<String> = (0..len).map(|i| format!("item-{i}")).collect();
    let items = OrderedList::new(ids.iter().map(String::as_str)).expect("distinct ids");
    let policy = ListPolicy {
        axis,
        allowed_edges: Vec::new(),
        ..ListPolicy::default()
    };
    let mut list =
        SortableList::with_acknowledger(items.clone(), policy, NoopAcknowledger).expect("fits");

    for chunk in payload.chunks_exact(3) {
        let pos = Position::new(u16::from(chunk[1] % 64), u16::from(chunk[2] % 64));
        let event = match chunk[0] % 5 {
            0 => PointerEvent::Down(pos),
            1 | 2 => PointerEvent::Move(pos),
            3 => PointerEvent::Up(pos),
            _ => PointerEvent::Escape,
        };
        let _ = list.handle_pointer(event);

        // Whatever happens, the order stays a permutation of the items.
        let order = list.order();
        assert_eq!(order.len(), items.len(), "length changed");
        assert!(items.iter().all(|id| order.contains(id)), "item lost");
    }
});
