#![forbid(unsafe_code)]

//! Drop handling: validate, reorder, commit, acknowledge.
//!
//! [`DropCoordinator::handle_drop`] takes the terminal [`DragOutcome`] of a
//! session and either commits a new order to the [`ListStore`] or rejects the
//! drop. Rejections are ordinary no-ops, reported through
//! [`DropResolution`] for logs and tests and never surfaced to users.
//!
//! # Pipeline
//!
//! | Step | Check | On failure |
//! |------|-------|------------|
//! | 1 | Outcome has a target | [`RejectReason::NoTarget`] |
//! | 2 | Source differs from target | [`RejectReason::DegenerateDrop`] |
//! | 3 | Both ids are in the current list | [`RejectReason::StaleReference`] |
//! | 4 | List accepts the source kind | [`RejectReason::Incompatible`] |
//! | 5 | Reorder changes the order | [`RejectReason::DegenerateDrop`] |
//! | 6 | Commit inside [`flush_sync`], then acknowledge | |
//!
//! # Invariants
//!
//! 1. At most one commit per drop.
//! 2. Subscribers of the store observe the commit before the acknowledgment
//!    fires.
//! 3. A rejected drop leaves the store untouched.

use std::fmt;

use sortkit_core::edge::Axis;
use sortkit_core::item::{ItemId, OrderedList};
use sortkit_core::reorder::{Reorder, reorder};
use sortkit_core::session::DragOutcome;
use tracing::{debug, info_span};

use crate::reactive::flush_sync;
use crate::store::ListStore;

// ---------------------------------------------------------------------------
// Acknowledgment
// ---------------------------------------------------------------------------

/// Receives the id of each successfully moved item, once per commit.
pub trait Acknowledger {
    fn acknowledge(&mut self, item: &ItemId);

    /// `item` left the list; drop anything kept for it.
    fn forget(&mut self, _item: &ItemId) {}
}

impl<F: FnMut(&ItemId)> Acknowledger for F {
    fn acknowledge(&mut self, item: &ItemId) {
        self(item);
    }
}

/// Acknowledger that ignores every move.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAcknowledger;

impl Acknowledger for NoopAcknowledger {
    fn acknowledge(&mut self, _item: &ItemId) {}
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Why a drop did not commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Released outside every target, or cancelled.
    NoTarget,
    /// Dropped onto itself, or into the slot it already occupies.
    DegenerateDrop,
    /// Source or target is no longer in the list.
    StaleReference,
    /// The list does not accept the source's drag kind.
    Incompatible,
}

impl RejectReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTarget => "no_target",
            Self::DegenerateDrop => "degenerate_drop",
            Self::StaleReference => "stale_reference",
            Self::Incompatible => "incompatible",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What [`DropCoordinator::handle_drop`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResolution {
    /// `moved` was relocated and `list` committed.
    Committed { moved: ItemId, list: OrderedList },
    /// Nothing was committed.
    Rejected(RejectReason),
}

impl DropResolution {
    /// Returns true if a new order was committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            Self::Committed { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DropCoordinator
// ---------------------------------------------------------------------------

/// Turns drag outcomes into committed list orders.
#[derive(Debug)]
pub struct DropCoordinator<S, A> {
    store: S,
    acknowledger: A,
    axis: Axis,
    accepts: Vec<String>,
}

impl<S: ListStore, A: Acknowledger> DropCoordinator<S, A> {
    /// Create a coordinator for a list laid out along `axis`.
    #[must_use]
    pub fn new(store: S, acknowledger: A, axis: Axis) -> Self {
        Self {
            store,
            acknowledger,
            axis,
            accepts: Vec::new(),
        }
    }

    /// Restrict the drag kinds this list accepts (patterns, see
    /// [`DragKind::matches`](sortkit_core::item::DragKind::matches)). Empty
    /// accepts every kind.
    #[must_use]
    pub fn with_accepts(mut self, accepts: Vec<String>) -> Self {
        self.accepts = accepts;
        self
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The acknowledgment sink.
    #[must_use]
    pub fn acknowledger(&self) -> &A {
        &self.acknowledger
    }

    /// Mutable access to the acknowledgment sink.
    pub fn acknowledger_mut(&mut self) -> &mut A {
        &mut self.acknowledger
    }

    /// Axis used to interpret drop edges.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Validate a terminal outcome and commit the resulting order.
    pub fn handle_drop(&mut self, outcome: &DragOutcome) -> DropResolution {
        let DragOutcome::DroppedOnTarget {
            source,
            target,
            closest_edge,
        } = outcome
        else {
            return self.reject(RejectReason::NoTarget, outcome);
        };

        if source.item == *target {
            return self.reject(RejectReason::DegenerateDrop, outcome);
        }

        let current = self.store.get_list();
        if !current.contains(&source.item) || !current.contains(target) {
            return self.reject(RejectReason::StaleReference, outcome);
        }

        if !self.accepts.is_empty()
            && !self
                .accepts
                .iter()
                .any(|pattern| source.kind.matches(pattern))
        {
            return self.reject(RejectReason::Incompatible, outcome);
        }

        let list = match reorder(&current, &source.item, target, *closest_edge, self.axis) {
            Reorder::Unchanged => return self.reject(RejectReason::DegenerateDrop, outcome),
            Reorder::Moved(list) => list,
        };

        {
            let _span = info_span!(
                "sortkit.commit",
                moved = source.item.as_str(),
                target = target.as_str(),
                edge = closest_edge.map(|edge| edge.as_str()),
            )
            .entered();
            let committed = list.clone();
            flush_sync(|| self.store.commit_list(committed));
            debug!(order = %list, "drop committed");
        }

        self.acknowledger.acknowledge(&source.item);
        DropResolution::Committed {
            moved: source.item.clone(),
            list,
        }
    }

    fn reject(&self, reason: RejectReason, outcome: &DragOutcome) -> DropResolution {
        debug!(
            reason = reason.as_str(),
            outcome = outcome.as_str(),
            source = outcome.source().item.as_str(),
            "drop rejected"
        );
        DropResolution::Rejected(reason)
    }
}
