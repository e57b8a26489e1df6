pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod mirror;
pub mod model;

pub use catalog::{Catalog, CatalogFile, GroupRecord, ALL_GROUPS};
pub use collection::{ListEdit, PreviewedList};
pub use config::TileConfig;
pub use error::{Result, TileError};
pub use mirror::{
    ChangeHandler, CollectionChange, PrefixMirror, SourceView, DEFAULT_PREVIEW_CAPACITY,
};
pub use model::{Group, Item, ItemRecord, TileInfo};
