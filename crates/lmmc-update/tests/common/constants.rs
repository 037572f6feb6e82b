//! Shared constants for test infrastructure

use lmmc_core::types::Platform;

// Release tags
pub const TAG_V1_2_0: &str = "v1.2.0";
pub const TAG_V1_3_0: &str = "v1.3.0";
pub const TAG_V1_4_0_RC1: &str = "v1.4.0-rc.1";

// Release publish time and its display form
pub const PUBLISHED_AT: &str = "2025-03-01T10:00:00Z";
pub const PUBLISHED_DISPLAY: &str = "2025-03-01 10:00:00";

// Versions as reported by the running build
pub const VERSION_1_2_0: &str = "1.2.0";
pub const VERSION_DEV: &str = "dev";

// Repository used by the mocked releases API
pub const REPO_OWNER: &str = "lerianstudio";
pub const REPO_NAME: &str = "lerian-mcp-memory";

pub const BINARY_NAME: &str = "lmmc";

// Asset names
pub const ASSET_LINUX_AMD64_TAR: &str = "lmmc-linux-amd64.tar.gz";
pub const ASSET_LINUX_AMD64_ZIP: &str = "lmmc-linux-amd64.zip";
pub const ASSET_DARWIN_ARM64_TAR: &str = "lmmc-darwin-arm64.tar.gz";
pub const ASSET_WINDOWS_AMD64_ZIP: &str = "lmmc-windows-amd64.zip";

// Binary contents
pub const ORIGINAL_CONTENT: &[u8] = b"#!/bin/sh\necho lmmc 1.2.0\n";
pub const NEW_CONTENT: &[u8] = b"#!/bin/sh\necho lmmc 1.3.0\n";
pub const README_CONTENT: &[u8] = b"# lmmc\n";

/// Platform the updater tests select assets for
pub fn test_platform() -> Platform {
    Platform::new("linux", "amd64")
}
