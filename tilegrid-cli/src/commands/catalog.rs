//! Catalog browsing commands: groups, group, item

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tilegrid_core::{Group, Item, TileInfo, ALL_GROUPS};

use crate::Settings;

#[derive(Parser, Debug)]
pub struct GroupsArgs {
    /// Catalog file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct GroupArgs {
    /// Group id (e.g. "Group-1")
    pub id: String,

    /// Catalog file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// List every item instead of just the preview
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ItemArgs {
    /// Item id
    pub id: String,

    /// Catalog file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct GroupSummary<'a> {
    id: &'a str,
    title: &'a str,
    subtitle: &'a str,
    items: usize,
    preview: usize,
}

impl<'a> From<&'a Group> for GroupSummary<'a> {
    fn from(group: &'a Group) -> Self {
        Self {
            id: group.id(),
            title: &group.info.title,
            subtitle: &group.info.subtitle,
            items: group.items().len(),
            preview: group.top_items().len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupView<'a> {
    #[serde(flatten)]
    info: &'a TileInfo,
    capacity: usize,
    total: usize,
    /// True once the preview holds `capacity` items
    preview_full: bool,
    items: Vec<&'a Item>,
}

pub fn run_groups(args: GroupsArgs, settings: &Settings) -> Result<()> {
    let catalog = settings.load_catalog(args.catalog.as_ref())?;
    let groups = catalog.groups(ALL_GROUPS)?;

    if args.json {
        let summaries: Vec<GroupSummary> = groups.iter().map(GroupSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No groups in catalog");
        return Ok(());
    }

    for group in groups {
        println!(
            "{:<16} {}  ({} items, {} in preview)",
            group.id(),
            group,
            group.items().len(),
            group.top_items().len()
        );
    }

    Ok(())
}

pub fn run_group(args: GroupArgs, settings: &Settings) -> Result<()> {
    let catalog = settings.load_catalog(args.catalog.as_ref())?;
    let group = catalog.require_group(&args.id)?;

    let shown: &[Arc<Item>] = if args.all {
        group.items()
    } else {
        group.top_items()
    };

    if args.json {
        let view = GroupView {
            info: &group.info,
            capacity: catalog.preview_capacity(),
            total: group.items().len(),
            preview_full: group.list().preview().is_full(),
            items: shown.iter().map(|item| item.as_ref()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} [{}]  preview {}/{} (capacity {})",
        group,
        group.id(),
        group.top_items().len(),
        group.items().len(),
        catalog.preview_capacity()
    );
    if !group.info.subtitle.is_empty() {
        println!("{}", group.info.subtitle);
    }
    println!();
    print_items(shown);

    Ok(())
}

pub fn run_item(args: ItemArgs, settings: &Settings) -> Result<()> {
    let catalog = settings.load_catalog(args.catalog.as_ref())?;
    let item = catalog.require_item(&args.id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&**item)?);
        return Ok(());
    }

    println!("{} [{}]", item, item.id());
    println!("group: {}", item.group_id);
    println!("span:  {}x{}", item.col_span, item.row_span);
    if !item.info.subtitle.is_empty() {
        println!("subtitle: {}", item.info.subtitle);
    }
    if let Some(image) = &item.info.image {
        println!("image: {}", image);
    }
    if !item.info.description.is_empty() {
        println!("\n{}", item.info.description);
    }
    if !item.content.is_empty() {
        println!("\n{}", item.content);
    }

    Ok(())
}

pub(crate) fn print_items(items: &[Arc<Item>]) {
    for (position, item) in items.iter().enumerate() {
        println!(
            "{:>4}. {:<24} {}  ({}x{})",
            position + 1,
            item.id(),
            item,
            item.col_span,
            item.row_span
        );
    }
}
