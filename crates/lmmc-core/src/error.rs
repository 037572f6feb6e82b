//! Error types for lmmc-core

use thiserror::Error;

/// Result type alias using lmmc-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for lmmc
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown output format name
    #[error("Unknown output format: {format}. Valid formats: table, json, plain")]
    InvalidOutputFormat { format: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid output format error
    pub fn invalid_output_format(format: impl Into<String>) -> Self {
        Self::InvalidOutputFormat {
            format: format.into(),
        }
    }
}
