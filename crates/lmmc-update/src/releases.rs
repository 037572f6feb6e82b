//! GitHub releases management

use chrono::{DateTime, Utc};
use lmmc_core::types::{GitHubConfig, Platform, RuntimeConfig};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, UpdateError};

/// Media type requested from the releases API
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v1.2.0")
    pub tag_name: String,

    /// Release name
    #[serde(default)]
    pub name: Option<String>,

    /// Release body (changelog)
    #[serde(default)]
    pub body: Option<String>,

    /// Whether this is a prerelease
    #[serde(default)]
    pub prerelease: bool,

    /// Whether this is a draft
    #[serde(default)]
    pub draft: bool,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,

    /// Published date
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Tag without its leading `v`
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }

    /// Publish time formatted for display, if known
    pub fn published_display(&self) -> Option<String> {
        self.published_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    /// Select the asset built for `platform`.
    ///
    /// Assets are scanned in manifest order and the first whose name contains
    /// the `<os>-<arch>` token wins; there is no ranking between candidates.
    pub fn asset_for(&self, platform: &Platform) -> Result<&ReleaseAsset> {
        let token = platform.token();
        debug!("Looking for asset matching '{}' in {}", token, self.tag_name);

        self.assets
            .iter()
            .find(|a| a.name.contains(&token))
            .ok_or_else(|| UpdateError::NoCompatibleAsset {
                platform: platform.to_string(),
            })
    }
}

/// Release manager for resolving the release to update to
pub struct ReleaseManager {
    /// HTTP client bounded by the metadata timeout
    client: reqwest::Client,

    /// Include prereleases
    include_prerelease: bool,

    /// GitHub configuration
    github_config: GitHubConfig,
}

impl ReleaseManager {
    /// Create a release manager from runtime configuration
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.network.user_agent)
            .timeout(Duration::from_secs(config.network.http_timeout_secs))
            .build()
            .map_err(|e| UpdateError::fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            include_prerelease: false,
            github_config: config.github.clone(),
        })
    }

    /// Set whether prerelease versions are eligible
    pub fn prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Resolve the newest eligible release.
    ///
    /// Stable-only lookups hit `/releases/latest`; with prereleases the first
    /// entry of the recency-sorted listing is taken.
    pub async fn get_latest(&self) -> Result<Release> {
        if self.include_prerelease {
            self.get_newest_listed().await
        } else {
            self.get_latest_stable().await
        }
    }

    async fn get_latest_stable(&self) -> Result<Release> {
        let url = format!("{}/latest", self.github_config.releases_url());
        debug!("Fetching latest release from: {}", url);

        let response = self.send(&url).await?;
        response
            .json::<Release>()
            .await
            .map_err(|e| UpdateError::fetch(format!("invalid release response: {}", e)))
    }

    async fn get_newest_listed(&self) -> Result<Release> {
        let url = format!("{}?per_page=1", self.github_config.releases_url());
        debug!("Fetching newest release (prereleases included) from: {}", url);

        let response = self.send(&url).await?;
        let releases: Vec<Release> = response
            .json()
            .await
            .map_err(|e| UpdateError::fetch(format!("invalid release listing: {}", e)))?;

        releases.into_iter().next().ok_or(UpdateError::NoRelease)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| UpdateError::fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpdateError::fetch(format!(
                "GitHub API returned status {}",
                response.status()
            )));
        }

        Ok(response)
    }
}
