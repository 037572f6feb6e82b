//! Runtime configuration types for operational parameters
//!
//! These types control how lmmc talks to the release endpoint, how the
//! self-updater treats downloaded archives, and how results are displayed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// GitHub repository settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Self-update settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Display and output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for release metadata requests, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for binary downloads, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_download_timeout() -> u64 {
    300 // 5 minutes
}
fn default_user_agent() -> String {
    format!("lmmc/{}", env!("CARGO_PKG_VERSION"))
}

/// GitHub repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Base URL for GitHub API
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
}

impl GitHubConfig {
    /// URL of the releases collection for the configured repository
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            api_url: default_github_api_url(),
        }
    }
}

fn default_repo_owner() -> String {
    "lerianstudio".to_string()
}
fn default_repo_name() -> String {
    "lerian-mcp-memory".to_string()
}
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Self-update configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateConfig {
    /// Name of the binary entry looked up inside release archives
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Upper bound on bytes copied out of a single archive entry
    #[serde(default = "default_max_extract_bytes")]
    pub max_extract_bytes: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            binary_name: default_binary_name(),
            max_extract_bytes: default_max_extract_bytes(),
        }
    }
}

fn default_binary_name() -> String {
    "lmmc".to_string()
}
fn default_max_extract_bytes() -> u64 {
    100 * 1024 * 1024 // 100 MB
}

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayConfig {
    /// Default output format when `--output` is not given
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_enabled")]
    pub color_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            color_enabled: default_color_enabled(),
        }
    }
}

fn default_color_enabled() -> bool {
    true
}

/// Output style for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bordered table (default)
    #[default]
    Table,

    /// Pretty-printed JSON
    Json,

    /// `key: value` lines
    Plain,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Plain => "plain",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            other => Err(Error::invalid_output_format(other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
