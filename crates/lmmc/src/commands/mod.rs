//! CLI command implementations

pub mod completions;
pub mod update;
pub mod version;
