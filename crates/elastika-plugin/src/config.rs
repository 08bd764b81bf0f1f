//! Processor configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use elastika_core::PushPolicy;

use crate::error::ConfigError;

/// Tail length reported to hosts when none is configured, in seconds.
pub const DEFAULT_TAIL_SECONDS: f64 = 20.0;

/// Construction-time settings for an [`ElastikaProcessor`](crate::ElastikaProcessor).
///
/// # TOML Format
///
/// ```toml
/// push_policy = "target_changed"
/// tail_seconds = 12.5
/// ```
///
/// Missing fields take their defaults, so an empty file is valid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// When smoothed values are pushed into the engine.
    pub push_policy: PushPolicy,

    /// Tail length reported to the host, in seconds.
    pub tail_seconds: f64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            push_policy: PushPolicy::default(),
            tail_seconds: DEFAULT_TAIL_SECONDS,
        }
    }
}

impl ProcessorConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), policy = ?config.push_policy, "config loaded");
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check field values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tail_seconds.is_finite() || self.tail_seconds < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tail_seconds",
                reason: format!(
                    "expected a finite, non-negative number, got {}",
                    self.tail_seconds
                ),
            });
        }
        Ok(())
    }
}
