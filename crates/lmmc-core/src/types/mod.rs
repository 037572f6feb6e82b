//! Type definitions for lmmc runtime configuration

mod platform;
mod runtime_config;

pub use platform::*;
pub use runtime_config::*;
