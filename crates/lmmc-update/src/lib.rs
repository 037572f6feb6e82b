//! Self-update functionality for the lmmc CLI
//!
//! Provides:
//! - Latest (or prerelease) lookup against GitHub releases
//! - Platform asset selection
//! - Streaming binary download with SHA-256 and progress tracking
//! - Guarded extraction from zip and tar.gz archives
//! - Binary replacement with backup and restore

pub mod download;
pub mod error;
pub mod extract;
pub mod install;
pub mod releases;
pub mod updater;

pub use download::{BinaryDownloader, DownloadResult};
pub use error::{Result, UpdateError};
pub use extract::{ArchiveExtractor, ArchiveFormat, DEFAULT_MAX_EXTRACT_BYTES};
pub use install::{BinaryReplacer, Installer, RenameSwap};
pub use releases::{Release, ReleaseAsset, ReleaseManager};
pub use updater::{UpdateOptions, UpdateOutcome, UpdatePhase, Updater};

/// Current CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
