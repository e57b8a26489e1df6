//! Replay command - apply an NDJSON edit script to one group's items
//!
//! Each non-empty line is one edit (lines starting with `#` are skipped):
//!
//! ```text
//! {"op":"insert","index":0,"item":{"id":"new-1","title":"Fresh tile"}}
//! {"op":"move","from":0,"to":7}
//! {"op":"remove","index":2}
//! {"op":"replace","index":1,"item":{"id":"swap-1","title":"Swapped"}}
//! {"op":"reset","items":[]}
//! ```
//!
//! The preview is printed after every edit. With `--verify` the preview is
//! also recomputed from scratch each step and any divergence aborts the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tilegrid_core::{CollectionChange, ItemRecord, ListEdit};
use tracing::{debug, info};

use crate::commands::catalog::print_items;
use crate::Settings;

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// NDJSON edit script ("-" reads stdin)
    #[arg(value_name = "EDITS")]
    pub edits: PathBuf,

    /// Group whose items the edits apply to
    #[arg(long, short = 'g')]
    pub group: String,

    /// Catalog file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Check the preview against a full recompute after every edit
    #[arg(long)]
    pub verify: bool,

    /// Emit one JSON object per step instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Step<'a> {
    step: usize,
    op: &'static str,
    /// Notification the preview received; absent for no-op edits
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<CollectionChange>,
    len: usize,
    top: Vec<&'a str>,
}

fn open_script(path: &PathBuf) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

pub fn run_replay(args: ReplayArgs, settings: &Settings) -> Result<()> {
    let mut catalog = settings.load_catalog(args.catalog.as_ref())?;
    let group = catalog
        .group_mut(&args.group)
        .ok_or_else(|| tilegrid_core::TileError::group_not_found(&args.group))?;

    let reader = open_script(&args.edits)?;
    let mut step = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let edit: ListEdit<ItemRecord> = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid edit on line {}", line_no + 1))?;
        let op = edit.op();
        step += 1;

        let change = group
            .edit(edit)
            .with_context(|| format!("Edit {} ({}) on line {} rejected", step, op, line_no + 1))?;

        if args.verify && !group.list().preview().is_prefix_of(group.items()) {
            anyhow::bail!(
                "Preview diverged from items after edit {} ({}) on line {}",
                step,
                op,
                line_no + 1
            );
        }

        match change {
            Some(change) => debug!(step, %change, len = group.items().len(), "edit applied"),
            None => debug!(step, op, "edit raised no notification"),
        }

        if args.json {
            let record = Step {
                step,
                op,
                change,
                len: group.items().len(),
                top: group.top_items().iter().map(|item| item.id()).collect(),
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            let ids: Vec<&str> = group.top_items().iter().map(|item| item.id()).collect();
            println!(
                "[{}] {:<8} len {:<4} top: {}",
                step,
                op,
                group.items().len(),
                ids.join(", ")
            );
        }
    }

    info!(steps = step, group = %args.group, "replay finished");

    if !args.json {
        println!();
        println!(
            "Final preview of {} ({} of {} items):",
            group.id(),
            group.top_items().len(),
            group.items().len()
        );
        print_items(group.top_items());
    }

    Ok(())
}
