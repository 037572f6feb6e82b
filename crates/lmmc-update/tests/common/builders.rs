//! Builder patterns for test data construction
//!
//! Releases are built as GitHub-shaped JSON so the same value can be served
//! by wiremock or decoded into a `Release` directly.

use lmmc_update::releases::{Release, ReleaseAsset};
use serde_json::{json, Value};

use super::constants::*;

/// Builder for GitHub release objects
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    tag_name: String,
    name: Option<String>,
    body: Option<String>,
    prerelease: bool,
    draft: bool,
    assets: Vec<Value>,
    published_at: Option<String>,
}

impl ReleaseBuilder {
    /// Create a new ReleaseBuilder with minimal defaults
    pub fn new() -> Self {
        Self {
            tag_name: TAG_V1_3_0.to_string(),
            name: None,
            body: None,
            prerelease: false,
            draft: false,
            assets: Vec::new(),
            published_at: None,
        }
    }

    /// Set the tag name
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = tag.to_string();
        self
    }

    /// Set the release name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the release body
    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Mark as prerelease
    pub fn prerelease(mut self) -> Self {
        self.prerelease = true;
        self
    }

    /// Set the published date (RFC 3339)
    pub fn published_at(mut self, date: &str) -> Self {
        self.published_at = Some(date.to_string());
        self
    }

    /// Add an asset served from `base_url/download/<name>`
    pub fn asset(mut self, base_url: &str, name: &str, size: u64) -> Self {
        self.assets.push(json!({
            "name": name,
            "browser_download_url": format!("{}/download/{}", base_url, name),
            "size": size,
        }));
        self
    }

    /// Add an asset with an explicit download URL
    pub fn asset_url(mut self, name: &str, url: &str) -> Self {
        self.assets.push(json!({
            "name": name,
            "browser_download_url": url,
            "size": 0,
        }));
        self
    }

    /// Release JSON as returned by the GitHub API
    pub fn to_json(&self) -> Value {
        json!({
            "tag_name": self.tag_name,
            "name": self.name,
            "body": self.body,
            "prerelease": self.prerelease,
            "draft": self.draft,
            "published_at": self.published_at,
            "assets": self.assets,
        })
    }

    /// Build the Release
    pub fn build(self) -> Release {
        serde_json::from_value(self.to_json()).expect("builder produces valid release JSON")
    }
}

impl Default for ReleaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a standalone asset
pub fn asset(name: &str, url: &str, size: u64) -> ReleaseAsset {
    ReleaseAsset {
        name: name.to_string(),
        browser_download_url: url.to_string(),
        size,
    }
}

/// Release carrying the usual platform archives, served from `base_url`
pub fn standard_release(base_url: &str, tag: &str) -> ReleaseBuilder {
    ReleaseBuilder::new()
        .tag(tag)
        .asset(base_url, ASSET_DARWIN_ARM64_TAR, 1024)
        .asset(base_url, ASSET_LINUX_AMD64_TAR, 1024)
        .asset(base_url, ASSET_WINDOWS_AMD64_ZIP, 1024)
}
