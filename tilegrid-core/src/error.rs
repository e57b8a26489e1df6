//! Structured error types for tilegrid-core library.
//!
//! Uses `thiserror` so library consumers get structured, composable errors.
//! The `tilegrid` binary wraps these in `anyhow` for context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tilegrid-core operations
#[derive(Error, Debug)]
pub enum TileError {
    /// A change notification or list mutation broke the collection contract
    /// (index out of bounds, self-move, mirror out of step with its source).
    #[error("Contract violation in {action}: {reason}")]
    ContractViolation { action: &'static str, reason: String },

    /// Configuration error (e.g. a zero preview capacity)
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// TOML catalog parsing failed
    #[error("TOML error in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Catalog file has an extension we cannot parse
    #[error("Unsupported catalog format {path:?} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// Group collection id other than "AllGroups"
    #[error("Unknown group collection '{id}': only 'AllGroups' is supported")]
    UnknownCollection { id: String },

    #[error("Group not found: {id}")]
    GroupNotFound { id: String },

    #[error("Item not found: {id}")]
    ItemNotFound { id: String },

    /// Two records in a catalog share an id
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Result type alias for tilegrid-core operations
pub type Result<T> = std::result::Result<T, TileError>;

impl TileError {
    /// Create a contract violation for the named action
    pub fn contract(action: &'static str, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            action,
            reason: reason.into(),
        }
    }

    /// Create an index-out-of-bounds contract violation
    pub fn out_of_bounds(action: &'static str, what: &str, index: usize, len: usize) -> Self {
        Self::contract(
            action,
            format!("{what} index {index} out of bounds (len {len})"),
        )
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn group_not_found(id: impl Into<String>) -> Self {
        Self::GroupNotFound { id: id.into() }
    }

    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }

    /// True for errors caused by a broken notification pipeline
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}
