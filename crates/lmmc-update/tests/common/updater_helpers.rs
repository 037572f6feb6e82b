//! Helpers for installer and updater testing

use lmmc_update::install::BinaryReplacer;
use lmmc_update::updater::UpdatePhase;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Create a fake executable with the given content
pub fn create_fake_binary(path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Replacer that always fails as if the target were read-only
pub struct DeniedReplacer;

impl BinaryReplacer for DeniedReplacer {
    fn replace(&self, _new_binary: &Path, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "permission denied",
        ))
    }
}

/// Replacer that clobbers the target before failing
pub struct PartialWriteReplacer;

impl BinaryReplacer for PartialWriteReplacer {
    fn replace(&self, _new_binary: &Path, target: &Path) -> io::Result<()> {
        fs::write(target, b"trunc")?;
        Err(io::Error::other("disk full"))
    }
}

/// Collects phase transitions reported by the updater
#[derive(Clone, Default)]
pub struct PhaseRecorder {
    phases: Arc<Mutex<Vec<UpdatePhase>>>,
}

impl PhaseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback to hand to `Updater::on_phase`
    pub fn observer(&self) -> impl Fn(UpdatePhase) + Send + Sync + 'static {
        let phases = Arc::clone(&self.phases);
        move |phase| phases.lock().unwrap().push(phase)
    }

    pub fn phases(&self) -> Vec<UpdatePhase> {
        self.phases.lock().unwrap().clone()
    }
}

/// Sorted list of every path under `dir`
pub fn snapshot_dir(dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let Ok(entries) = fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path.clone());
            }
            paths.push(path);
        }
    }

    paths.sort();
    paths
}
