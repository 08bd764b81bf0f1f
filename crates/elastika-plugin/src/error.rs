//! Error types for the processor, its configuration and its state.

use std::path::PathBuf;
use thiserror::Error;

use crate::processor::BusLayout;

/// Errors that can occur while loading or saving a [`ProcessorConfig`](crate::ProcessorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A field parsed but holds an unusable value
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Description of why the value is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

/// Errors from saving processor state.
///
/// Loading never fails: malformed blobs are ignored (see [`load_state`](crate::load_state)).
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to serialize state as JSON
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by [`ElastikaProcessor`](crate::ElastikaProcessor).
#[derive(Debug, Error)]
pub enum PluginError {
    /// The host proposed a bus layout the processor cannot run
    #[error("unsupported bus layout: {0}")]
    UnsupportedLayout(BusLayout),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// State error
    #[error(transparent)]
    State(#[from] StateError),
}
