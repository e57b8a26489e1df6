//! Key-indexed store of groups and items, loaded from a catalog file.
//!
//! Catalog files are TOML or JSON (chosen by extension):
//!
//! ```toml
//! [[groups]]
//! id = "Group-1"
//! title = "Getting Started"
//!
//! [[groups.items]]
//! id = "Group-1-Item1"
//! title = "Starting Out"
//! col_span = 2
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TileError};
use crate::model::{Group, Item, ItemRecord, TileInfo};

/// The only group collection id the catalog answers to
pub const ALL_GROUPS: &str = "AllGroups";

/// On-disk catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

impl GroupRecord {
    fn split(self) -> (TileInfo, Vec<ItemRecord>) {
        let info = TileInfo {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            image: self.image,
            description: self.description,
        };
        (info, self.items)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<Group>,
    preview_capacity: usize,
}

impl Catalog {
    pub fn new(preview_capacity: usize) -> Result<Self> {
        if preview_capacity == 0 {
            return Err(TileError::config("preview capacity must be at least 1"));
        }
        Ok(Self {
            groups: Vec::new(),
            preview_capacity,
        })
    }

    pub fn from_file(file: CatalogFile, preview_capacity: usize) -> Result<Self> {
        let mut catalog = Self::new(preview_capacity)?;
        for record in file.groups {
            catalog.add_group(record)?;
        }
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str, preview_capacity: usize) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|source| TileError::Toml {
            path: "<inline>".into(),
            source,
        })?;
        Self::from_file(file, preview_capacity)
    }

    pub fn from_json_str(content: &str, preview_capacity: usize) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(content).map_err(|e| TileError::json("catalog", e))?;
        Self::from_file(file, preview_capacity)
    }

    /// Load a `.toml` or `.json` catalog file
    pub fn load(path: impl AsRef<Path>, preview_capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let file: CatalogFile = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|source| TileError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| TileError::json(path.display().to_string(), e))?,
            _ => {
                return Err(TileError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let catalog = Self::from_file(file, preview_capacity)?;
        debug!(
            path = %path.display(),
            groups = catalog.groups.len(),
            preview_capacity,
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Add a group and its items; ids must be unique across the catalog
    pub fn add_group(&mut self, record: GroupRecord) -> Result<&mut Group> {
        if self.groups.iter().any(|g| g.id() == record.id) {
            return Err(TileError::DuplicateId {
                kind: "group",
                id: record.id,
            });
        }

        let mut seen: HashSet<String> = self
            .groups
            .iter()
            .flat_map(|g| g.items().iter().map(|item| item.id().to_string()))
            .collect();

        let (info, items) = record.split();
        let mut group = Group::new(info, self.preview_capacity)?;
        for item in items {
            if !seen.insert(item.id.clone()) {
                return Err(TileError::DuplicateId {
                    kind: "item",
                    id: item.id,
                });
            }
            group.add_item(item)?;
        }

        self.groups.push(group);
        let index = self.groups.len() - 1;
        Ok(&mut self.groups[index])
    }

    /// Groups of a named collection. Only [`ALL_GROUPS`] is supported.
    pub fn groups(&self, collection_id: &str) -> Result<&[Group]> {
        if collection_id != ALL_GROUPS {
            return Err(TileError::UnknownCollection {
                id: collection_id.to_string(),
            });
        }
        Ok(&self.groups)
    }

    pub fn all_groups(&self) -> &[Group] {
        &self.groups
    }

    /// The group with `id`, if exactly one matches
    pub fn group(&self, id: &str) -> Option<&Group> {
        let mut matches = self.groups.iter().filter(|g| g.id() == id);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        let mut matches = self.groups.iter_mut().filter(|g| g.id() == id);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// Like [`Catalog::group`] but a miss is an error
    pub fn require_group(&self, id: &str) -> Result<&Group> {
        self.group(id).ok_or_else(|| TileError::group_not_found(id))
    }

    /// The item with `id` across all groups, if exactly one matches
    pub fn item(&self, id: &str) -> Option<&Arc<Item>> {
        let mut matches = self
            .groups
            .iter()
            .flat_map(|g| g.items().iter())
            .filter(|item| item.id() == id);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    pub fn require_item(&self, id: &str) -> Result<&Arc<Item>> {
        self.item(id).ok_or_else(|| TileError::item_not_found(id))
    }

    pub fn preview_capacity(&self) -> usize {
        self.preview_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ListEdit;

    const SAMPLE: &str = r#"
[[groups]]
id = "Group-1"
title = "Getting Started"
image = "Assets/10.jpg"

[[groups.items]]
id = "Group-1-Item1"
title = "Starting Out"
col_span = 79
row_span = 49

[[groups.items]]
id = "Group-1-Item2"
title = "Follow Through"

[[groups.items]]
id = "Group-1-Item3"
title = "Credit Cards"

[[groups]]
id = "Group-2"
title = "Budgeting"

[[groups.items]]
id = "Group-2-Item1"
title = "Income"
"#;

    #[test]
    fn test_toml_catalog() {
        let catalog = Catalog::from_toml_str(SAMPLE, 2).unwrap();

        let groups = catalog.groups(ALL_GROUPS).unwrap();
        assert_eq!(groups.len(), 2);

        let g1 = catalog.group("Group-1").unwrap();
        assert_eq!(g1.items().len(), 3);
        assert_eq!(g1.top_items().len(), 2);
        assert_eq!(g1.info.image.as_deref(), Some("Assets/10.jpg"));

        let item = catalog.item("Group-1-Item1").unwrap();
        assert_eq!(item.col_span, 79);
        assert_eq!(item.group_id, "Group-1");
        assert_eq!(catalog.item("Group-2-Item1").unwrap().group_id, "Group-2");
    }

    #[test]
    fn test_unknown_collection() {
        let catalog = Catalog::from_toml_str(SAMPLE, 12).unwrap();
        let err = catalog.groups("Favorites").unwrap_err();
        assert!(matches!(err, TileError::UnknownCollection { .. }));
    }

    #[test]
    fn test_missing_lookups() {
        let catalog = Catalog::from_toml_str(SAMPLE, 12).unwrap();
        assert!(catalog.group("Group-9").is_none());
        assert!(catalog.item("nope").is_none());
        assert!(matches!(
            catalog.require_group("Group-9"),
            Err(TileError::GroupNotFound { .. })
        ));
        assert!(matches!(
            catalog.require_item("nope"),
            Err(TileError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"groups":[
            {"id":"g","title":"G","items":[{"id":"x","title":"X"}]},
            {"id":"h","title":"H","items":[{"id":"x","title":"X again"}]}
        ]}"#;
        let err = Catalog::from_json_str(json, 12).unwrap_err();
        assert!(matches!(err, TileError::DuplicateId { kind: "item", .. }));

        let json = r#"{"groups":[{"id":"g","title":"G"},{"id":"g","title":"G2"}]}"#;
        let err = Catalog::from_json_str(json, 12).unwrap_err();
        assert!(matches!(err, TileError::DuplicateId { kind: "group", .. }));
    }

    #[test]
    fn test_ambiguous_item_lookup_yields_none() {
        let mut catalog = Catalog::from_toml_str(SAMPLE, 12).unwrap();
        catalog
            .group_mut("Group-2")
            .unwrap()
            .edit(ListEdit::Push {
                item: ItemRecord::new("Group-1-Item1", "Copy"),
            })
            .unwrap();
        assert!(catalog.item("Group-1-Item1").is_none());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            Catalog::new(0),
            Err(TileError::Config { .. })
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("catalog.toml");
        fs::write(&toml_path, SAMPLE).unwrap();
        let catalog = Catalog::load(&toml_path, 12).unwrap();
        assert_eq!(catalog.all_groups().len(), 2);

        let yaml_path = dir.path().join("catalog.yaml");
        fs::write(&yaml_path, "groups: []").unwrap();
        assert!(matches!(
            Catalog::load(&yaml_path, 12),
            Err(TileError::UnsupportedFormat { .. })
        ));
    }
}
