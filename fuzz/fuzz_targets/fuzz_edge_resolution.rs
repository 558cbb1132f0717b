#![no_main]

use libfuzzer_sys::fuzz_target;
use sortkit_core::edge::{AllowedEdges, Axis, closest_edge, resolve_edge};
use sortkit_core::geometry::{Position, Rect};

fn word(data: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([data[i], data[i + 1]])
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 13 {
        return;
    }
    let bounds = Rect::new(word(data, 0), word(data, 2), word(data, 4), word(data, 6));
    let pointer = Position::new(word(data, 8), word(data, 10));
    let allowed = AllowedEdges::from_bits_truncate(data[12]);

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let edge = resolve_edge(pointer, bounds, axis);
        assert_eq!(edge.axis(), axis, "resolved edge left the axis");
    }

    match closest_edge(pointer, bounds, allowed) {
        Some(edge) => assert!(allowed.allows(edge), "edge outside the allowed set"),
        None => assert!(allowed.is_empty(), "allowed edges but no result"),
    }
});
