#![forbid(unsafe_code)]

//! Drag gesture recognition from raw pointer input.
//!
//! [`GestureRecognizer`] turns a stream of [`PointerEvent`]s into
//! [`DragGesture`]s: a press only becomes a drag once the pointer travels past
//! a manhattan threshold, and Escape or focus loss abort a drag in flight.
//!
//! # Invariants
//!
//! 1. Every drag is well-formed: `Start` → zero or more `Move` → `End` or
//!    `Cancel`.
//! 2. A press/release that never crosses the threshold emits nothing.
//! 3. `Cancel` is only emitted for a drag that actually started.
//! 4. After `End` or `Cancel` the recognizer is idle.
//!
//! # Failure Modes
//!
//! - `Move` without a prior `Down` is treated as a press at that position, so
//!   a stream that starts mid-gesture still produces a well-formed drag.
//! - A second `Down` while pressed restarts tracking from the new position.

use crate::geometry::Position;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Raw pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PointerEvent {
    /// Primary button pressed.
    Down(Position),
    /// Pointer moved (button state is tracked by the recognizer).
    Move(Position),
    /// Primary button released.
    Up(Position),
    /// Escape pressed.
    Escape,
    /// The window lost focus.
    FocusLost,
}

/// Recognized drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    /// The pointer crossed the threshold. `origin` is where the press began.
    Start { origin: Position, current: Position },
    /// The pointer moved during a drag.
    Move {
        origin: Position,
        current: Position,
        delta: (i32, i32),
    },
    /// The button was released during a drag.
    End { origin: Position, end: Position },
    /// The drag was aborted.
    Cancel,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Minimum manhattan distance (cells) before a drag starts (default: 3).
    pub drag_threshold: u16,
    /// Whether Escape cancels an active drag (default: true).
    pub cancel_on_escape: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3,
            cancel_on_escape: true,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct DragTracker {
    origin: Position,
    last: Position,
    started: bool,
}

/// Stateful recognizer for press-drag-release gestures.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    drag: Option<DragTracker>,
}

impl GestureRecognizer {
    /// Create a new recognizer.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self { config, drag: None }
    }

    /// Process a raw event, returning the gestures it produced (0..=2).
    pub fn process(&mut self, event: PointerEvent) -> Vec<DragGesture> {
        let mut out = Vec::with_capacity(2);
        match event {
            PointerEvent::Down(pos) => {
                self.drag = Some(DragTracker {
                    origin: pos,
                    last: pos,
                    started: false,
                });
            }
            PointerEvent::Move(pos) => self.on_move(pos, &mut out),
            PointerEvent::Up(pos) => {
                if let Some(drag) = self.drag.take()
                    && drag.started
                {
                    out.push(DragGesture::End {
                        origin: drag.origin,
                        end: pos,
                    });
                }
            }
            PointerEvent::Escape => {
                if self.config.cancel_on_escape {
                    self.cancel(&mut out);
                }
            }
            PointerEvent::FocusLost => self.cancel(&mut out),
        }
        out
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.started)
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    fn on_move(&mut self, pos: Position, out: &mut Vec<DragGesture>) {
        let threshold = u32::from(self.config.drag_threshold);
        let drag = self.drag.get_or_insert(DragTracker {
            origin: pos,
            last: pos,
            started: false,
        });

        if !drag.started && drag.origin.manhattan_distance(pos) >= threshold {
            drag.started = true;
            out.push(DragGesture::Start {
                origin: drag.origin,
                current: pos,
            });
        } else if drag.started {
            out.push(DragGesture::Move {
                origin: drag.origin,
                current: pos,
                delta: (
                    i32::from(pos.x) - i32::from(drag.last.x),
                    i32::from(pos.y) - i32::from(drag.last.y),
                ),
            });
        }
        drag.last = pos;
    }

    fn cancel(&mut self, out: &mut Vec<DragGesture>) {
        if let Some(drag) = self.drag.take()
            && drag.started
        {
            out.push(DragGesture::Cancel);
        }
    }
}
