//! Binary download with progress tracking
//!
//! Streams a release asset to disk under the configured download timeout
//! (5 minutes by default). The SHA-256 of the written bytes is computed on the
//! fly and reported with the result.
//!
//! The destination file is created as soon as the server accepts the request
//! and is left behind if the transfer fails midway; callers download into a
//! temporary directory they own.

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use lmmc_core::types::RuntimeConfig;
use reqwest::header::CONTENT_LENGTH;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, UpdateError};
use crate::releases::ReleaseAsset;

/// Result of a download operation
#[derive(Debug)]
pub struct DownloadResult {
    /// Path to the downloaded file
    pub file_path: PathBuf,

    /// Size of the downloaded file in bytes
    pub file_size: u64,

    /// SHA256 checksum of the downloaded file
    pub checksum: String,
}

/// Streams release assets to local files
pub struct BinaryDownloader {
    /// HTTP client bounded by the download timeout
    client: reqwest::Client,

    /// Enable progress bars
    show_progress: bool,
}

impl BinaryDownloader {
    /// Create a downloader from runtime configuration
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.network.user_agent)
            .timeout(Duration::from_secs(config.network.download_timeout_secs))
            .build()
            .map_err(|e| UpdateError::download(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            show_progress: false,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download `asset` into `dir`, keeping the asset's file name
    pub async fn download_asset(&self, asset: &ReleaseAsset, dir: &Path) -> Result<DownloadResult> {
        if !is_plain_file_name(&asset.name) {
            return Err(UpdateError::unsafe_path(&asset.name));
        }

        info!(
            "Downloading {} ({})",
            asset.name,
            human_readable_size(asset.size)
        );

        self.download(&asset.browser_download_url, &dir.join(&asset.name))
            .await
    }

    /// Stream `url` into `destination`
    pub async fn download(&self, url: &str, destination: &Path) -> Result<DownloadResult> {
        if has_parent_traversal(destination) {
            return Err(UpdateError::unsafe_path(destination.display().to_string()));
        }

        debug!("GET {} -> {:?}", url, destination);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpdateError::download(format!(
                "download failed with status {}",
                response.status()
            )));
        }

        let total_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.parse::<u64>().ok())
            .unwrap_or(0);

        let progress = self.progress_bar(total_size, destination);

        let mut file = File::create(destination).map_err(|e| {
            UpdateError::download(format!("failed to create {:?}: {}", destination, e))
        })?;

        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk: bytes::Bytes = chunk_result
                .map_err(|e| UpdateError::download(format!("failed to read body: {}", e)))?;
            file.write_all(&chunk)
                .map_err(|e| UpdateError::download(format!("failed to write file: {}", e)))?;
            hasher.update(&chunk);

            downloaded += chunk.len() as u64;
            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }

        file.flush()
            .map_err(|e| UpdateError::download(format!("failed to flush file: {}", e)))?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let checksum = format!("{:x}", hasher.finalize());
        debug!("Downloaded {} bytes, sha256 {}", downloaded, checksum);

        Ok(DownloadResult {
            file_path: destination.to_path_buf(),
            file_size: downloaded,
            checksum,
        })
    }

    fn progress_bar(&self, total_size: u64, destination: &Path) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        if let Some(name) = destination.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        Some(pb)
    }
}

/// True when any component of `path` is `..`
fn has_parent_traversal(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// A single, non-empty path segment
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Convert bytes to human-readable size
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
