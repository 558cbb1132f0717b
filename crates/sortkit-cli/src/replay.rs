//! `sortkit replay`: run a recorded pointer script against a strip layout.
//!
//! ```json
//! {
//!   "items": ["A", "B", "C"],
//!   "policy": { "max_items": 8 },
//!   "events": [
//!     { "kind": "down", "x": 1, "y": 0 },
//!     { "kind": "move", "x": 24, "y": 0 },
//!     { "kind": "up", "x": 24, "y": 0 }
//!   ]
//! }
//! ```
//!
//! `policy` is optional; `--config` replaces it entirely.

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Args;
use serde::{Deserialize, Serialize};
use sortkit_core::gesture::PointerEvent;
use sortkit_core::item::{ItemId, OrderedList};
use sortkit_runtime::{DropResolution, ListPolicy, SortableList};
use tracing::{debug, info, info_span};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// JSON script with `items`, `events`, and an optional `policy`.
    pub script: PathBuf,

    /// Policy file (TOML or JSON) overriding the script's policy.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit a JSON report.
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 if any drop was rejected.
    #[arg(long = "fail-on-reject")]
    pub fail_on_reject: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    pub items: OrderedList,
    #[serde(default)]
    pub policy: Option<ListPolicy>,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DropRecord {
    /// Index of the event that ended the drag.
    pub event: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderedList>,
}

impl DropRecord {
    fn new(event: usize, resolution: DropResolution) -> Self {
        match resolution {
            DropResolution::Committed { moved, list } => Self {
                event,
                status: "committed",
                moved: Some(moved),
                reason: None,
                order: Some(list),
            },
            DropResolution::Rejected(reason) => Self {
                event,
                status: "rejected",
                moved: None,
                reason: Some(reason.as_str()),
                order: None,
            },
        }
    }

    fn is_rejected(&self) -> bool {
        self.status == "rejected"
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplayReport {
    pub order: OrderedList,
    pub drops: Vec<DropRecord>,
    pub acknowledged: Vec<ItemId>,
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    if !path.exists() {
        return Err(CliError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Feed every event of `script` to a fresh sortable list.
pub fn replay(script: ReplayScript, policy: ListPolicy) -> Result<ReplayReport> {
    let acks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&acks);
    let mut list = SortableList::with_acknowledger(script.items, policy, move |id: &ItemId| {
        sink.borrow_mut().push(id.clone());
    })?;

    let _span = info_span!("sortkit.replay", events = script.events.len()).entered();
    let mut drops = Vec::new();
    for (index, event) in script.events.into_iter().enumerate() {
        debug!(index, ?event, "replay event");
        if let Some(resolution) = list.handle_pointer(event) {
            drops.push(DropRecord::new(index, resolution));
        }
    }
    info!(drops = drops.len(), order = %list.order(), "replay finished");

    let acknowledged = acks.borrow().clone();
    Ok(ReplayReport {
        order: list.order(),
        drops,
        acknowledged,
    })
}

pub fn run_replay(args: ReplayArgs, out: &mut dyn Write) -> Result<()> {
    let script = load_script(&args.script)?;
    let policy = match &args.config {
        Some(path) => ListPolicy::from_file(path)?,
        None => script.policy.clone().unwrap_or_default(),
    };
    let report = replay(script, policy)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_text(&report, out)?;
    }

    let rejected = report.drops.iter().filter(|d| d.is_rejected()).count();
    if args.fail_on_reject && rejected > 0 {
        return Err(CliError::exit(1, format!("{rejected} drop(s) rejected")));
    }
    Ok(())
}

fn write_text(report: &ReplayReport, out: &mut dyn Write) -> Result<()> {
    for drop in &report.drops {
        match (&drop.moved, &drop.order, drop.reason) {
            (Some(moved), Some(order), _) => {
                writeln!(out, "event {}: committed {moved} -> {order}", drop.event)?;
            }
            (_, _, reason) => {
                writeln!(
                    out,
                    "event {}: rejected ({})",
                    drop.event,
                    reason.unwrap_or("unknown")
                )?;
            }
        }
    }
    writeln!(out, "order: {}", report.order)?;
    let acked: Vec<&str> = report.acknowledged.iter().map(ItemId::as_str).collect();
    writeln!(out, "acknowledged: {}", acked.join(","))?;
    Ok(())
}
