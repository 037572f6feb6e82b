//! Platform identification in release-asset vocabulary
//!
//! Release assets are published as `lmmc-<os>-<arch>.<ext>` using the
//! `darwin`/`amd64`/`arm64` naming, so the Rust target names reported by
//! `std::env::consts` are translated before matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An OS/architecture pair as it appears in release asset names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system (e.g. `linux`, `darwin`, `windows`)
    pub os: String,

    /// CPU architecture (e.g. `amd64`, `arm64`)
    pub arch: String,
}

impl Platform {
    /// Create a platform from already-translated names
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Platform of the running binary
    pub fn current() -> Self {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Translate Rust target OS/arch names into release-asset names
    pub fn from_rust(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            other => other,
        };
        Self::new(os, arch)
    }

    /// Token matched against asset names, e.g. `linux-amd64`
    pub fn token(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
