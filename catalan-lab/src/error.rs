//! Error handling for the command-line runner

use std::path::PathBuf;

use thiserror::Error;

/// Failures detected by the runner itself, before or around the pipelines.
#[derive(Debug, Error)]
pub enum LabError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be read
    #[error("Failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this tool
    #[error("Invalid configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting is out of range
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// `--combination` is not a usable `src-tgt` pair
    #[error(transparent)]
    Combination(catalan_pipelines::error::PipelineError),
}

/// Result type alias for runner operations
pub type LabResult<T> = Result<T, LabError>;
