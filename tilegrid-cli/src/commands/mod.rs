//! Command implementations for tilegrid CLI

pub mod catalog;
pub mod replay;

// Re-export main dispatcher functions for flat access from main.rs
pub use catalog::{run_group, run_groups, run_item};
pub use replay::run_replay;
