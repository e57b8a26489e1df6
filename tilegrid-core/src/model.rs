use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collection::{ListEdit, PreviewedList};
use crate::mirror::CollectionChange;
use crate::error::Result;

/// Fields shared by groups and items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Relative image path; resolving it is up to the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl TileInfo {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            image: None,
            description: String::new(),
        }
    }
}

impl fmt::Display for TileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

fn default_span() -> u32 {
    1
}

/// Item as written in catalog files and edit scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_span")]
    pub col_span: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            image: None,
            description: String::new(),
            content: String::new(),
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn into_item(self, group_id: impl Into<String>) -> Item {
        Item {
            info: TileInfo {
                id: self.id,
                title: self.title,
                subtitle: self.subtitle,
                image: self.image,
                description: self.description,
            },
            content: self.content,
            col_span: self.col_span,
            row_span: self.row_span,
            group_id: group_id.into(),
        }
    }
}

/// A tile inside a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub info: TileInfo,
    pub content: String,
    pub col_span: u32,
    pub row_span: u32,
    /// Id of the owning group
    pub group_id: String,
}

impl Item {
    pub fn id(&self) -> &str {
        &self.info.id
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.info, f)
    }
}

/// A group of items with a bounded preview of its first items.
#[derive(Debug, Clone)]
pub struct Group {
    pub info: TileInfo,
    items: PreviewedList<Arc<Item>>,
}

impl Group {
    pub fn new(info: TileInfo, preview_capacity: usize) -> Result<Self> {
        Ok(Self {
            info,
            items: PreviewedList::new(preview_capacity)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn items(&self) -> &[Arc<Item>] {
        self.items.items()
    }

    pub fn top_items(&self) -> &[Arc<Item>] {
        self.items.top_items()
    }

    pub fn list(&self) -> &PreviewedList<Arc<Item>> {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&Arc<Item>> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Append a record, stamping it with this group's id
    pub fn add_item(&mut self, record: ItemRecord) -> Result<Arc<Item>> {
        let item = Arc::new(record.into_item(self.info.id.clone()));
        self.items.push(Arc::clone(&item))?;
        Ok(item)
    }

    /// Apply an edit whose payload records become items of this group.
    /// Returns the notification the preview received.
    pub fn edit(&mut self, edit: ListEdit<ItemRecord>) -> Result<Option<CollectionChange>> {
        let group_id = self.info.id.clone();
        let edit = edit.map(|record| Arc::new(record.into_item(group_id.clone())));
        self.items.apply_edit(edit)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.info, f)
    }
}
