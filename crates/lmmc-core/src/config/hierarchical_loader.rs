//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Runtime config (`<config dir>/lmmc-runtime.yaml`)
//! 3. Environment variables (LMMC_* prefix)
//! 4. CLI flags (handled by caller)
//!
//! The config dir is `$XDG_CONFIG_HOME/lmmc`, then `$LMMC_CONFIG_DIR`, then `~/.lmmc`.

use crate::error::{Error, Result};
use crate::types::{OutputFormat, RuntimeConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// File name of the user runtime config inside the config dir
const RUNTIME_CONFIG_FILE: &str = "lmmc-runtime.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Resolve the standard config directory
    fn get_config_dir() -> Result<Utf8PathBuf> {
        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Ok(Utf8PathBuf::from(xdg).join("lmmc"));
            }
        }

        if let Ok(dir) = env::var("LMMC_CONFIG_DIR") {
            if !dir.is_empty() {
                return Ok(Utf8PathBuf::from(dir));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {:?}", p)))?;

        Ok(home.join(".lmmc"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        // Start with embedded defaults
        let mut config = Self::load_embedded_config::<RuntimeConfig>("runtime-defaults.yaml")?;

        let runtime_config_path = self.config_dir.join(RUNTIME_CONFIG_FILE);
        if runtime_config_path.exists() {
            debug!("Loading runtime config from {}", runtime_config_path);
            // Keys missing from the file fall back to serde defaults
            config = self.load_yaml_file::<RuntimeConfig>(&runtime_config_path)?;
        }

        config = self.apply_env_overrides(config)?;

        Ok(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("LMMC_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("LMMC_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("LMMC_DOWNLOAD_TIMEOUT_SECS") {
            config.network.download_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("LMMC_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("LMMC_GITHUB_API_URL") {
            config.github.api_url = val;
        }

        if let Ok(val) = env::var("LMMC_GITHUB_REPO_OWNER") {
            config.github.repo_owner = val;
        }

        if let Ok(val) = env::var("LMMC_GITHUB_REPO_NAME") {
            config.github.repo_name = val;
        }

        if let Ok(val) = env::var("LMMC_OUTPUT_FORMAT") {
            config.display.output_format = val.parse::<OutputFormat>()?;
        }

        if let Ok(val) = env::var("LMMC_NO_COLOR") {
            config.display.color_enabled = !val.parse().unwrap_or(false);
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.network.http_timeout_secs, 30);
        assert_eq!(config.network.download_timeout_secs, 300);
        assert_eq!(config.github.repo_owner, "lerianstudio");
        assert_eq!(config.github.repo_name, "lerian-mcp-memory");
        assert_eq!(config.display.output_format, OutputFormat::Table);
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_from_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
network:
  http-timeout-secs: 5
  download-timeout-secs: 60
github:
  api-url: "http://localhost:8080"
  repo-owner: "custom-owner"
  repo-name: "custom-repo"
"#;
        let config_path = loader.config_dir().join(RUNTIME_CONFIG_FILE);
        fs::write(&config_path, config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.network.http_timeout_secs, 5);
        assert_eq!(config.network.download_timeout_secs, 60);
        assert_eq!(config.github.api_url, "http://localhost:8080");
        assert_eq!(config.github.repo_owner, "custom-owner");
        assert_eq!(config.github.repo_name, "custom-repo");
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_reported() {
        let (loader, _temp) = create_temp_loader();
        let config_path = loader.config_dir().join(RUNTIME_CONFIG_FILE);
        fs::write(&config_path, "network: [not, a, map]").unwrap();

        let err = loader.load_runtime_config().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("LMMC_HTTP_TIMEOUT_SECS", "12");
        env::set_var("LMMC_GITHUB_REPO_OWNER", "env-owner");
        env::set_var("LMMC_OUTPUT_FORMAT", "json");
        env::set_var("LMMC_NO_COLOR", "true");

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.network.http_timeout_secs, 12);
        assert_eq!(config.github.repo_owner, "env-owner");
        assert_eq!(config.display.output_format, OutputFormat::Json);
        assert!(!config.display.color_enabled);

        env::remove_var("LMMC_HTTP_TIMEOUT_SECS");
        env::remove_var("LMMC_GITHUB_REPO_OWNER");
        env::remove_var("LMMC_OUTPUT_FORMAT");
        env::remove_var("LMMC_NO_COLOR");
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_number() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("LMMC_DOWNLOAD_TIMEOUT_SECS", "five minutes");
        let result = loader.load_runtime_config();
        env::remove_var("LMMC_DOWNLOAD_TIMEOUT_SECS");

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_config_dir_prefers_xdg() {
        let temp = TempDir::new().unwrap();
        let xdg = temp.path().to_str().unwrap().to_string();

        env::set_var("XDG_CONFIG_HOME", &xdg);
        env::set_var("LMMC_CONFIG_DIR", "/should/not/win");
        let loader = HierarchicalConfigLoader::new().unwrap();
        env::remove_var("XDG_CONFIG_HOME");
        env::remove_var("LMMC_CONFIG_DIR");

        assert_eq!(
            loader.config_dir(),
            Utf8PathBuf::from(xdg).join("lmmc").as_path()
        );
        // Loading never creates the directory
        assert!(!loader.config_dir().exists());
    }
}
