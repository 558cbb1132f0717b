use std::io::Write;

use clap::Args;
use serde::Serialize;
use sortkit_core::edge::{Axis, Edge};
use sortkit_core::item::{DragKind, ItemId, OrderedList};
use sortkit_core::session::{DragOutcome, DragSource};
use sortkit_runtime::{
    DropCoordinator, DropResolution, ListStore, NoopAcknowledger, ObservableListStore,
};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct ReorderArgs {
    /// Current order, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub items: Vec<String>,

    /// Item being dragged.
    #[arg(long)]
    pub source: String,

    /// Item it is dropped on.
    #[arg(long)]
    pub target: String,

    /// Side of the target. Omit to drop onto the target's own slot.
    #[arg(long)]
    pub edge: Option<Edge>,

    #[arg(long, default_value = "horizontal")]
    pub axis: Axis,

    /// Emit a JSON report instead of the bare order.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReorderReport {
    pub order: OrderedList,
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Apply one drop to `args.items`.
///
/// A degenerate drop reports the unchanged order. Unknown ids are an error,
/// checked before the drop so a self-drop of an unknown id is caught too.
pub fn reorder_report(args: &ReorderArgs) -> Result<ReorderReport> {
    let list = OrderedList::new(args.items.iter().map(String::as_str))?;
    for id in [&args.source, &args.target] {
        if !list.contains(&ItemId::from(id.as_str())) {
            return Err(CliError::invalid(format!("`{id}` is not in --items")));
        }
    }
    let store = ObservableListStore::new(list);
    let mut coordinator = DropCoordinator::new(store.clone(), NoopAcknowledger, args.axis);

    let outcome = DragOutcome::DroppedOnTarget {
        source: DragSource::new(args.source.as_str(), DragKind::default()),
        target: ItemId::from(args.target.as_str()),
        closest_edge: args.edge,
    };

    match coordinator.handle_drop(&outcome) {
        DropResolution::Committed { list, .. } => Ok(ReorderReport {
            order: list,
            moved: true,
            reason: None,
        }),
        DropResolution::Rejected(reason) => Ok(ReorderReport {
            order: store.get_list(),
            moved: false,
            reason: Some(reason.as_str()),
        }),
    }
}

pub fn run_reorder(args: ReorderArgs, out: &mut dyn Write) -> Result<()> {
    let report = reorder_report(&args)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        let ids: Vec<&str> = report.order.iter().map(ItemId::as_str).collect();
        writeln!(out, "{}", ids.join(","))?;
    }
    Ok(())
}
