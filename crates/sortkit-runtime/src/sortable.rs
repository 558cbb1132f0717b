#![forbid(unsafe_code)]

//! A complete pointer-driven sortable list.
//!
//! [`SortableList`] wires the pieces together for one list:
//!
//! ```text
//! PointerEvent ─▶ PointerDriver ─▶ DragSession ─▶ DragOutcome
//!                     ▲                 │               │
//!                 strip layout     TargetStates    DropCoordinator
//!                     ▲                                 │ flush_sync
//!                     └──── ObservableListStore ◀───────┘ ─▶ Acknowledger
//! ```
//!
//! The layout is recomputed whenever the store reports a new order, before
//! the next pointer event is processed and right after a committed drop.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use sortkit_core::drop_state::{DropTargetState, drop_indicator};
use sortkit_core::geometry::{Position, Rect};
use sortkit_core::gesture::PointerEvent;
use sortkit_core::item::{ItemId, ListError, OrderedList};
use sortkit_core::session::{
    DragEvents, DragOutcome, DragSession, DragSource, DropTarget, TargetStates,
};
use tracing::debug;
use web_time::Instant;

use crate::coordinator::{Acknowledger, DropCoordinator, DropResolution};
use crate::flash::FlashTracker;
use crate::policy_config::ListPolicy;
use crate::pointer::{PointerDriver, strip_layout};
use crate::reactive::Subscription;
use crate::store::{ListStore, ObservableListStore};

/// Why a [`SortableList`] could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortableError {
    /// The policy failed [`ListPolicy::validate`].
    InvalidPolicy(Vec<String>),
    /// The initial items do not fit the policy.
    List(ListError),
}

impl fmt::Display for SortableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPolicy(errors) => write!(f, "invalid policy: {}", errors.join("; ")),
            Self::List(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SortableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPolicy(_) => None,
            Self::List(err) => Some(err),
        }
    }
}

impl From<ListError> for SortableError {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

/// One sortable list: store, session, coordinator and layout.
#[derive(Debug)]
pub struct SortableList<A: Acknowledger = FlashTracker> {
    policy: ListPolicy,
    store: ObservableListStore,
    session: DragSession<TargetStates>,
    coordinator: DropCoordinator<ObservableListStore, A>,
    driver: PointerDriver,
    layout_dirty: Rc<Cell<bool>>,
    last_resolution: Option<DropResolution>,
    _subscription: Subscription,
}

impl SortableList<FlashTracker> {
    /// Create a list that flashes moved items for the policy's duration.
    pub fn new(items: OrderedList, policy: ListPolicy) -> Result<Self, SortableError> {
        let flashes = FlashTracker::new(policy.flash_duration());
        Self::with_acknowledger(items, policy, flashes)
    }

    /// Highlight strength of `item` at `now`.
    #[must_use]
    pub fn flash_intensity(&self, item: &ItemId, now: Instant) -> f32 {
        self.coordinator.acknowledger().intensity(item, now)
    }
}

impl<A: Acknowledger> SortableList<A> {
    /// Create a list reporting moves to `acknowledger`.
    ///
    /// Fails if the policy does not validate or `items` already exceeds
    /// `policy.max_items`.
    pub fn with_acknowledger(
        items: OrderedList,
        policy: ListPolicy,
        acknowledger: A,
    ) -> Result<Self, SortableError> {
        let errors = policy.validate();
        if !errors.is_empty() {
            return Err(SortableError::InvalidPolicy(errors));
        }
        if items.len() > policy.max_items {
            return Err(ListError::CapacityExceeded {
                capacity: policy.max_items,
            }
            .into());
        }

        let store = ObservableListStore::with_capacity(items, policy.max_items);
        let layout_dirty = Rc::new(Cell::new(true));
        let dirty = Rc::clone(&layout_dirty);
        let subscription = store.subscribe(move |_| dirty.set(true));

        let coordinator = DropCoordinator::new(store.clone(), acknowledger, policy.axis)
            .with_accepts(policy.accepts.clone());
        let driver = PointerDriver::new(policy.to_gesture_config(), policy.drag_kind())
            .with_accepts(policy.accepts.clone())
            .with_allowed_edges(policy.allowed_edge_set());
        let session = DragSession::with_observer(policy.to_session_config(), TargetStates::new());

        debug!(
            axis = policy.axis.as_str(),
            max_items = policy.max_items,
            sticky = policy.sticky_targets,
            "sortable list created"
        );

        let mut list = Self {
            policy,
            store,
            session,
            coordinator,
            driver,
            layout_dirty,
            last_resolution: None,
            _subscription: subscription,
        };
        list.relayout();
        Ok(list)
    }

    /// Feed one pointer event. Returns the drop resolution when a drag ends.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<DropResolution> {
        if self.layout_dirty.get() {
            self.relayout();
        }
        let outcome = self.driver.handle(event, &mut self.session)?;
        Some(self.resolve(&outcome))
    }

    /// Append an item at the end, bounded by the policy capacity.
    pub fn append(&mut self, id: impl Into<ItemId>) -> Result<(), ListError> {
        self.store.try_push(id.into())?;
        self.relayout();
        Ok(())
    }

    /// Remove an item, returning whether it was present.
    ///
    /// The acknowledger forgets the item.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.coordinator.acknowledger_mut().forget(id);
            self.relayout();
        }
        removed
    }

    /// Current order.
    #[must_use]
    pub fn order(&self) -> OrderedList {
        self.store.get_list()
    }

    /// Visual drag state of `item`.
    #[must_use]
    pub fn target_state(&self, item: &ItemId) -> DropTargetState {
        self.session.observer().get(item)
    }

    /// Whether `item` is being dragged (the visual layer dims it).
    #[must_use]
    pub fn is_source(&self, item: &ItemId) -> bool {
        self.session.is_source(item)
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Drop line to draw next to `item`, if it is hovered.
    #[must_use]
    pub fn drop_indicator(&self, item: &ItemId) -> Option<Rect> {
        let target = self.driver.targets().iter().find(|t| &t.item == item)?;
        drop_indicator(target.bounds, self.target_state(item), self.policy.gap)
    }

    /// Recompute the strip layout from the current order.
    pub fn relayout(&mut self) {
        let layout = self.store.with(|list| {
            strip_layout(list, self.policy.axis, self.policy.item_extent, self.policy.gap)
        });
        self.driver.set_layout(layout);
        self.layout_dirty.set(false);
    }

    /// Item rectangles in display order.
    #[must_use]
    pub fn layout(&self) -> &[DropTarget] {
        self.driver.targets()
    }

    /// Item under `pos`.
    #[must_use]
    pub fn item_at(&self, pos: Position) -> Option<&ItemId> {
        self.driver.hit_test(pos).map(|t| &t.item)
    }

    /// Resolution of the most recent drag.
    #[must_use]
    pub fn last_resolution(&self) -> Option<&DropResolution> {
        self.last_resolution.as_ref()
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &ListPolicy {
        &self.policy
    }

    /// Shared handle to the backing store.
    #[must_use]
    pub fn store(&self) -> &ObservableListStore {
        &self.store
    }

    /// The acknowledgment sink.
    #[must_use]
    pub fn acknowledger(&self) -> &A {
        self.coordinator.acknowledger()
    }

    fn resolve(&mut self, outcome: &DragOutcome) -> DropResolution {
        let resolution = self.coordinator.handle_drop(outcome);
        if self.layout_dirty.get() {
            self.relayout();
        }
        self.last_resolution = Some(resolution.clone());
        resolution
    }
}

/// Drag events delivered directly (without pointer input) go through the
/// same session and coordinator.
impl<A: Acknowledger> DragEvents for SortableList<A> {
    fn on_drag_start(&mut self, source: DragSource) {
        self.session.on_drag_start(source);
    }

    fn on_drag_enter(&mut self, target: &DropTarget, pointer: Position) {
        self.session.on_drag_enter(target, pointer);
    }

    fn on_drag_over(&mut self, target: &DropTarget, pointer: Position) {
        self.session.on_drag_over(target, pointer);
    }

    fn on_drag_leave(&mut self, item: &ItemId) {
        self.session.on_drag_leave(item);
    }

    fn on_drop(&mut self) -> Option<DragOutcome> {
        let outcome = self.session.on_drop()?;
        self.resolve(&outcome);
        Some(outcome)
    }

    fn on_drag_cancel(&mut self) -> Option<DragOutcome> {
        let outcome = self.session.on_drag_cancel()?;
        self.resolve(&outcome);
        Some(outcome)
    }
}
