#![forbid(unsafe_code)]

//! Post-move highlight.
//!
//! [`FlashTracker`] is an [`Acknowledger`] that remembers when each item was
//! last moved and reports a highlight intensity decaying linearly from 1.0 to
//! 0.0 over the configured duration. Re-acknowledging an item restarts its
//! flash.
//!
//! Entries are kept only while they can still be visible: starting a flash
//! prunes every fully decayed one, and removing an item from the list
//! forgets its flash.

use std::collections::HashMap;
use std::time::Duration;

use sortkit_core::item::ItemId;
use tracing::trace;
use web_time::Instant;

use crate::coordinator::Acknowledger;

/// Default flash length.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(700);

/// Tracks transient highlights for recently moved items.
#[derive(Debug, Clone)]
pub struct FlashTracker {
    duration: Duration,
    started: HashMap<ItemId, Instant>,
}

impl Default for FlashTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_DURATION)
    }
}

impl FlashTracker {
    /// Create a tracker whose flashes last `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: HashMap::new(),
        }
    }

    /// Flash length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start (or restart) a flash for `item` at `now`.
    ///
    /// Flashes that have fully decayed by `now` are dropped first.
    pub fn flash_at(&mut self, item: &ItemId, now: Instant) {
        self.prune(now);
        trace!(item = item.as_str(), tracked = self.started.len(), "flash started");
        self.started.insert(item.clone(), now);
    }

    /// Number of items with a recorded flash, visible or not.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.started.len()
    }

    /// When the current flash for `item` started.
    #[must_use]
    pub fn started_at(&self, item: &ItemId) -> Option<Instant> {
        self.started.get(item).copied()
    }

    /// Highlight strength for `item` at `now`, in `[0.0, 1.0]`.
    #[must_use]
    pub fn intensity(&self, item: &ItemId, now: Instant) -> f32 {
        let Some(start) = self.started.get(item) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(*start);
        if elapsed >= self.duration {
            return 0.0;
        }
        1.0 - elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    /// Whether `item` still has a visible flash at `now`.
    #[must_use]
    pub fn is_flashing(&self, item: &ItemId, now: Instant) -> bool {
        self.intensity(item, now) > 0.0
    }

    /// Items with a visible flash at `now`.
    #[must_use]
    pub fn active(&self, now: Instant) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self
            .started
            .keys()
            .filter(|item| self.is_flashing(item, now))
            .cloned()
            .collect();
        items.sort();
        items
    }

    /// Forget flashes that have fully decayed by `now`.
    pub fn prune(&mut self, now: Instant) {
        let duration = self.duration;
        self.started
            .retain(|_, start| now.saturating_duration_since(*start) < duration);
    }
}

impl Acknowledger for FlashTracker {
    fn acknowledge(&mut self, item: &ItemId) {
        self.flash_at(item, Instant::now());
    }

    fn forget(&mut self, item: &ItemId) {
        self.started.remove(item);
    }
}
