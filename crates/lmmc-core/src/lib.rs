//! # lmmc-core
//!
//! Core library for the lmmc CLI providing:
//! - Runtime configuration types and the hierarchical config loader
//! - Release-naming platform detection
//! - Shared error types

pub mod config;
pub mod error;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::{OutputFormat, Platform, RuntimeConfig};
