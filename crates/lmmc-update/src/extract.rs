//! Binary extraction from release archives
//!
//! Release assets are either `.zip` or `.tar.gz`. The extractor pulls out a
//! single entry: the first one, in archive order, whose name contains the
//! binary name and has no path separator (nested directories are skipped).
//!
//! Two guards apply to every archive:
//! - every entry path is checked, and any `..` segment or absolute path
//!   rejects the whole archive with [`UpdateError::UnsafePath`];
//! - at most `max_bytes` are copied out of the selected entry.

use flate2::read::GzDecoder;
use lmmc_core::types::UpdateConfig;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, UpdateError};

/// Default cap on bytes copied out of one entry (100 MB)
pub const DEFAULT_MAX_EXTRACT_BYTES: u64 = 100 * 1024 * 1024;

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the file name suffix
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") {
            Ok(ArchiveFormat::TarGz)
        } else {
            Err(UpdateError::UnsupportedFormat { name })
        }
    }
}

/// Extracts the lmmc binary from a downloaded archive
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    binary_name: String,
    max_bytes: u64,
}

impl ArchiveExtractor {
    /// Create an extractor looking for `binary_name`
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
            max_bytes: DEFAULT_MAX_EXTRACT_BYTES,
        }
    }

    /// Create an extractor from the update section of the runtime config
    pub fn from_config(config: &UpdateConfig) -> Self {
        Self::new(config.binary_name.clone()).with_size_limit(config.max_extract_bytes)
    }

    /// Cap the number of bytes copied out of the selected entry
    pub fn with_size_limit(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Extract the binary from `archive` into `dest_dir`, returning its path
    pub fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let format = ArchiveFormat::detect(archive)?;
        debug!("Extracting {:?} ({:?}) into {:?}", archive, format, dest_dir);

        match format {
            ArchiveFormat::Zip => self.extract_zip(archive, dest_dir),
            ArchiveFormat::TarGz => self.extract_tar_gz(archive, dest_dir),
        }
    }

    fn extract_zip(&self, archive_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let file = File::open(archive_path).map_err(archive_error)?;
        let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

        // The central directory is complete up front, so validate every name
        // before anything is written.
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(archive_error)?;
            names.push((entry.name().to_string(), entry.is_file()));
        }
        for (name, _) in &names {
            validate_entry_path(name)?;
        }

        let index = names
            .iter()
            .position(|(name, is_file)| *is_file && self.is_candidate(name))
            .ok_or_else(|| self.not_found())?;

        let entry = archive.by_index(index).map_err(archive_error)?;
        self.copy_limited(entry, dest_dir, &names[index].0)
    }

    fn extract_tar_gz(&self, archive_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let file = File::open(archive_path).map_err(archive_error)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));

        let mut extracted: Option<PathBuf> = None;

        for entry in archive.entries().map_err(archive_error)? {
            let mut entry = entry.map_err(archive_error)?;
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

            // Entries stream in order, so an unsafe one may follow the binary
            if let Err(e) = validate_entry_path(&name) {
                if let Some(path) = extracted.take() {
                    let _ = fs::remove_file(path);
                }
                return Err(e);
            }

            if extracted.is_none() && entry.header().entry_type().is_file() && self.is_candidate(&name)
            {
                extracted = Some(self.copy_limited(&mut entry, dest_dir, &name)?);
            }
        }

        extracted.ok_or_else(|| self.not_found())
    }

    fn is_candidate(&self, name: &str) -> bool {
        name.contains(&self.binary_name) && !name.contains(['/', '\\'])
    }

    fn not_found(&self) -> UpdateError {
        UpdateError::BinaryNotFound {
            binary: self.binary_name.clone(),
        }
    }

    /// Copy at most `max_bytes` of `reader` into `dest_dir/name`
    fn copy_limited<R: Read>(&self, mut reader: R, dest_dir: &Path, name: &str) -> Result<PathBuf> {
        validate_entry_path(name)?;

        let path = dest_dir.join(name);
        let mut out = File::create(&path).map_err(archive_error)?;

        let copied = io::copy(&mut (&mut reader).take(self.max_bytes), &mut out)
            .map_err(archive_error)?;

        if copied == self.max_bytes {
            let mut probe = [0u8; 1];
            if matches!(reader.read(&mut probe), Ok(n) if n > 0) {
                warn!(
                    "Entry {} exceeds {} bytes, output truncated",
                    name, self.max_bytes
                );
            }
        }

        debug!("Extracted {} ({} bytes) to {:?}", name, copied, path);
        Ok(path)
    }
}

/// Reject entry names with a `..` segment or an absolute/drive-rooted path
pub fn validate_entry_path(name: &str) -> Result<()> {
    let normalized = name.replace('\\', "/");

    let absolute = normalized.starts_with('/')
        || normalized
            .as_bytes()
            .get(1)
            .is_some_and(|b| *b == b':' && normalized.as_bytes()[0].is_ascii_alphabetic());
    let traversal = normalized.split('/').any(|segment| segment == "..");

    if absolute || traversal || Path::new(name).is_absolute() {
        return Err(UpdateError::unsafe_path(name));
    }

    Ok(())
}

fn archive_error(e: impl std::fmt::Display) -> UpdateError {
    UpdateError::Archive(e.to_string())
}
