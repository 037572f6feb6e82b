//! Self-update orchestration
//!
//! Runs the update as a linear sequence of phases:
//! checking -> downloading -> extracting -> backing up -> installing -> done.
//! The run stops early when the build is a dev build, when the latest release
//! is already installed, or on a dry run. Any error moves to `Failed` and is
//! returned to the caller; nothing is retried.

use lmmc_core::types::{Platform, RuntimeConfig};
use semver::Version;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::download::BinaryDownloader;
use crate::error::{Result, UpdateError};
use crate::extract::ArchiveExtractor;
use crate::install::{BinaryReplacer, Installer, RenameSwap};
use crate::releases::ReleaseManager;

/// Version string reported by builds without a release version
pub const DEV_VERSION: &str = "dev";

/// Version a forced update from a dev build is treated as
const DEV_FALLBACK_VERSION: &str = "v0.0.0";

/// Prefix of the temporary download directory
const TEMP_DIR_PREFIX: &str = "lmmc-update-";

/// Flags controlling one update run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Install even when the versions match or the build is a dev build
    pub force: bool,

    /// Consider prereleases
    pub prerelease: bool,

    /// Report the available version without touching the filesystem
    pub dry_run: bool,
}

/// Step of the update state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Checking,
    Downloading,
    Extracting,
    BackingUp,
    Installing,
    Done,
    Failed,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdatePhase::Checking => "checking",
            UpdatePhase::Downloading => "downloading",
            UpdatePhase::Extracting => "extracting",
            UpdatePhase::BackingUp => "backing-up",
            UpdatePhase::Installing => "installing",
            UpdatePhase::Done => "done",
            UpdatePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How an update run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Dev build without `force`; nothing was checked
    DevBuildSkipped,

    /// The latest release is already installed
    AlreadyLatest {
        version: String,
        published: Option<String>,
    },

    /// Dry run found a release to install
    Available {
        current: String,
        latest: String,
        published: Option<String>,
    },

    /// The executable was replaced
    Updated {
        from: String,
        to: String,
        published: Option<String>,
        binary: PathBuf,
    },
}

type PhaseObserver = Box<dyn Fn(UpdatePhase) + Send + Sync>;

/// Self-updater for the lmmc binary
pub struct Updater {
    /// Runtime configuration (endpoints, timeouts, binary name, caps)
    config: RuntimeConfig,

    /// Version of the running build
    current_version: String,

    /// Executable to replace; the running one when unset
    binary_path: Option<PathBuf>,

    /// Platform used for asset selection
    platform: Platform,

    /// Show a download progress bar
    show_progress: bool,

    /// Replacement strategy handed to the installer
    replacer: Arc<dyn BinaryReplacer>,

    /// Called on every phase transition
    observer: Option<PhaseObserver>,
}

impl Updater {
    /// Create an updater for the running binary
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            current_version: crate::VERSION.to_string(),
            binary_path: None,
            platform: Platform::current(),
            show_progress: false,
            replacer: Arc::new(RenameSwap),
            observer: None,
        }
    }

    /// Override the version treated as currently installed
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Replace `path` instead of the running executable
    pub fn with_binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(path.into());
        self
    }

    /// Select assets for `platform` instead of the running one
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Show a progress bar while downloading
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Use a different strategy to swap the binary into place
    pub fn with_replacer(mut self, replacer: impl BinaryReplacer + 'static) -> Self {
        self.replacer = Arc::new(replacer);
        self
    }

    /// Register a callback for phase transitions
    pub fn on_phase(mut self, observer: impl Fn(UpdatePhase) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Version treated as currently installed
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Run one update
    pub async fn run(&self, options: &UpdateOptions) -> Result<UpdateOutcome> {
        debug!("Starting update run: {:?}", options);

        let result = self.run_phases(options).await;
        match &result {
            Ok(_) => self.enter(UpdatePhase::Done),
            Err(e) => {
                warn!("Update failed: {}", e);
                self.enter(UpdatePhase::Failed);
            }
        }
        result
    }

    async fn run_phases(&self, options: &UpdateOptions) -> Result<UpdateOutcome> {
        let current = if self.current_version == DEV_VERSION {
            if !options.force {
                info!("Development build, skipping update check");
                return Ok(UpdateOutcome::DevBuildSkipped);
            }
            DEV_FALLBACK_VERSION.to_string()
        } else {
            self.current_version.clone()
        };

        self.enter(UpdatePhase::Checking);
        let release = ReleaseManager::new(&self.config)?
            .prerelease(options.prerelease)
            .get_latest()
            .await?;
        let latest = release.tag_name.clone();
        let published = release.published_display();
        info!("Current version: {}, latest release: {}", current, latest);
        if let Some(date) = &published {
            debug!("Release {} published {}", latest, date);
        }

        if same_version(&current, release.version()) && !options.force {
            return Ok(UpdateOutcome::AlreadyLatest {
                version: latest,
                published,
            });
        }
        if is_older(&latest, &current) {
            warn!("Latest release {} is older than {}", latest, current);
        }

        if options.dry_run {
            return Ok(UpdateOutcome::Available {
                current,
                latest,
                published,
            });
        }

        let asset = release.asset_for(&self.platform)?;
        let installer = self.installer()?;

        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .map_err(|e| UpdateError::download(format!("failed to create temp dir: {}", e)))?;

        self.enter(UpdatePhase::Downloading);
        let download = BinaryDownloader::new(&self.config)?
            .with_progress(self.show_progress)
            .download_asset(asset, temp_dir.path())
            .await?;

        self.enter(UpdatePhase::Extracting);
        let extract_dir = temp_dir.path().join("extract");
        fs::create_dir(&extract_dir)
            .map_err(|e| UpdateError::Archive(format!("failed to create {:?}: {}", extract_dir, e)))?;
        let binary = ArchiveExtractor::from_config(&self.config.update)
            .extract(&download.file_path, &extract_dir)?;

        self.enter(UpdatePhase::BackingUp);
        let backup = installer.backup()?;

        self.enter(UpdatePhase::Installing);
        installer.commit(&binary, &backup)?;

        info!("Updated {} -> {}", current, latest);
        Ok(UpdateOutcome::Updated {
            from: current,
            to: latest,
            published,
            binary: installer.target().to_path_buf(),
        })
    }

    fn installer(&self) -> Result<Installer> {
        let installer = match &self.binary_path {
            Some(path) => Installer::new(path.clone()),
            None => Installer::for_current_exe()?,
        };
        Ok(installer.with_replacer(Arc::clone(&self.replacer)))
    }

    fn enter(&self, phase: UpdatePhase) {
        debug!("Update phase: {}", phase);
        if let Some(observer) = &self.observer {
            observer(phase);
        }
    }
}

/// Versions match after stripping one leading `v` from each
pub fn same_version(a: &str, b: &str) -> bool {
    strip_v(a) == strip_v(b)
}

fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// True only when both parse as semver and `a < b`
fn is_older(a: &str, b: &str) -> bool {
    match (Version::parse(strip_v(a)), Version::parse(strip_v(b))) {
        (Ok(a), Ok(b)) => a < b,
        _ => false,
    }
}
