//! Executable replacement with backup and restore
//!
//! The running binary is copied to `<path>.backup` before anything touches
//! it. The new binary is then swapped in through a [`BinaryReplacer`]; the
//! default [`RenameSwap`] stages it as `<path>.new` next to the target and
//! renames it over the live path, so the target always holds one complete
//! binary. If the swap fails the backup is renamed back over the target.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Result, UpdateError};

/// Suffix of the pre-update copy of the executable
pub const BACKUP_SUFFIX: &str = ".backup";

/// Suffix of the staged new binary
pub const STAGING_SUFFIX: &str = ".new";

/// Strategy for putting a new binary at the target path
pub trait BinaryReplacer: Send + Sync {
    /// Replace `target` with the contents of `new_binary`
    fn replace(&self, new_binary: &Path, target: &Path) -> io::Result<()>;
}

impl<R: BinaryReplacer + ?Sized> BinaryReplacer for Arc<R> {
    fn replace(&self, new_binary: &Path, target: &Path) -> io::Result<()> {
        (**self).replace(new_binary, target)
    }
}

/// Copy to a staging file in the target's directory, then rename over the target
#[derive(Debug, Default, Clone, Copy)]
pub struct RenameSwap;

impl BinaryReplacer for RenameSwap {
    fn replace(&self, new_binary: &Path, target: &Path) -> io::Result<()> {
        let staging = with_suffix(target, STAGING_SUFFIX);
        debug!("Staging {:?} at {:?}", new_binary, staging);

        let result = fs::copy(new_binary, &staging)
            .and_then(|_| set_executable(&staging))
            .and_then(|_| fs::rename(&staging, target));

        if result.is_err() && staging.exists() {
            if let Err(e) = fs::remove_file(&staging) {
                warn!("Failed to remove staging file {:?}: {}", staging, e);
            }
        }

        result
    }
}

/// Installs a new binary over an existing executable
pub struct Installer {
    /// Executable being replaced
    target: PathBuf,

    /// Replacement strategy
    replacer: Box<dyn BinaryReplacer>,
}

impl Installer {
    /// Create an installer for `target`
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            replacer: Box::new(RenameSwap),
        }
    }

    /// Create an installer for the running executable
    pub fn for_current_exe() -> Result<Self> {
        let target = std::env::current_exe()
            .map_err(|e| UpdateError::install("failed to resolve current executable", e))?;
        Ok(Self::new(target))
    }

    /// Use a different replacement strategy
    pub fn with_replacer(mut self, replacer: impl BinaryReplacer + 'static) -> Self {
        self.replacer = Box::new(replacer);
        self
    }

    /// Path of the executable being replaced
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path the backup is written to
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.target, BACKUP_SUFFIX)
    }

    /// Back up, replace and clean up in one call
    pub fn install(&self, new_binary: &Path) -> Result<()> {
        let backup = self.backup()?;
        self.commit(new_binary, &backup)
    }

    /// Copy the current executable to its backup path
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.target.is_file() {
            return Err(UpdateError::install_path(
                "executable not found",
                &self.target,
            ));
        }

        let backup = self.backup_path();
        debug!("Backing up {:?} -> {:?}", self.target, backup);

        fs::copy(&self.target, &backup)
            .map_err(|e| UpdateError::install("failed to create backup", e))?;

        Ok(backup)
    }

    /// Swap in `new_binary`, restoring from `backup` if that fails
    pub fn commit(&self, new_binary: &Path, backup: &Path) -> Result<()> {
        debug!("Replacing {:?} with {:?}", self.target, new_binary);

        let replaced = self
            .replacer
            .replace(new_binary, &self.target)
            .and_then(|_| set_executable(&self.target));

        if let Err(e) = replaced {
            error!("Failed to replace binary: {}", e);
            self.restore(backup);
            return Err(UpdateError::install("failed to replace binary", e));
        }

        if let Err(e) = fs::remove_file(backup) {
            warn!("Failed to remove backup {:?}: {}", backup, e);
        }

        info!("Installed new binary at {:?}", self.target);
        Ok(())
    }

    /// Best-effort restore; failures are logged, not returned
    fn restore(&self, backup: &Path) {
        warn!("Restoring {:?} from {:?}", self.target, backup);

        match fs::rename(backup, &self.target) {
            Ok(()) => info!("Restored previous binary"),
            Err(e) => error!(
                "Failed to restore backup {:?}: {}. The previous binary is still at that path.",
                backup, e
            ),
        }
    }
}

/// Append `suffix` to the full file name (`lmmc` -> `lmmc.backup`)
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
