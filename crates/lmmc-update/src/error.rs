//! Error types for the self-update path
//!
//! Every variant is terminal for the current invocation; nothing is retried.

use std::path::Path;
use thiserror::Error;

/// Result type alias using lmmc-update's error type
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors that can occur while checking for or installing an update.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Release metadata could not be fetched or decoded
    #[error("failed to fetch release information: {0}")]
    Fetch(String),

    /// The release listing was empty
    #[error("no releases found")]
    NoRelease,

    /// No asset in the release matches the running platform
    #[error("no compatible binary found for {platform}")]
    NoCompatibleAsset { platform: String },

    /// The binary download failed
    #[error("download failed: {0}")]
    Download(String),

    /// The downloaded file is neither `.zip` nor `.tar.gz`
    #[error("unsupported archive format: {name}")]
    UnsupportedFormat { name: String },

    /// A path escapes its base directory or is absolute
    #[error("unsafe file path: {path}")]
    UnsafePath { path: String },

    /// The archive could not be opened or read
    #[error("failed to read archive: {0}")]
    Archive(String),

    /// The archive holds no entry for the expected binary
    #[error("binary '{binary}' not found in archive")]
    BinaryNotFound { binary: String },

    /// Backing up or replacing the executable failed
    #[error("installation failed: {message}")]
    Install {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl UpdateError {
    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Create a download error
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download(message.into())
    }

    /// Create an unsafe path error
    pub fn unsafe_path(path: impl Into<String>) -> Self {
        Self::UnsafePath { path: path.into() }
    }

    /// Create an install error wrapping the underlying I/O failure
    pub fn install(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Install {
            message: format!("{}: {}", message.into(), source),
            source: Some(source),
        }
    }

    /// Create an install error from a path that cannot be used
    pub fn install_path(message: impl Into<String>, path: &Path) -> Self {
        Self::Install {
            message: format!("{}: {}", message.into(), path.display()),
            source: None,
        }
    }
}
