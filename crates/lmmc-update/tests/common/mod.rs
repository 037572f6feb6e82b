//! Common test infrastructure for lmmc-update tests
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Tags, platform names, binary contents
//! - `builders`: Fluent builders for release JSON and `Release` values
//! - `mock_server`: Wiremock setup for the releases API and asset downloads
//! - `archives`: zip and tar.gz fixture writers, including hostile entries
//! - `updater_helpers`: Fake binaries, failing replacers, phase recording

// Each test binary uses a different subset of the helpers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod archives;
pub mod builders;
pub mod constants;
pub mod mock_server;
pub mod updater_helpers;

pub use archives::*;
pub use builders::*;
pub use constants::*;
pub use mock_server::*;
pub use updater_helpers::*;
