//! Configuration file support.
//!
//! Settings are read from a JSON file. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration. Command line
//! flags are layered on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PruneError};
use crate::logging::LogSettings;
use crate::prune::{CheckpointPattern, Stride, DEFAULT_PREFIX};

/// Checkpoint pruning settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PruneConfig {
    /// Project prefix of the checkpoint file names.
    pub prefix: String,
    /// Retention stride; prompted for when absent.
    pub stride: Option<Stride>,
    /// Target directory; prompted for when absent.
    pub target: Option<PathBuf>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            stride: None,
            target: None,
        }
    }
}

impl PruneConfig {
    /// Compiles the checkpoint matcher for the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns `PruneError::Pattern` if the pattern cannot be compiled.
    pub fn pattern(&self) -> Result<CheckpointPattern, PruneError> {
        CheckpointPattern::new(self.prefix.clone())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MagkitConfig {
    pub prune: PruneConfig,
    pub logging: LogSettings,
}

impl MagkitConfig {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON, unknown fields or a zero stride.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Parse` if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_empty_object_is_default() {
        let config = MagkitConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MagkitConfig::default());
        assert_eq!(config.prune.prefix, "dmi_paper");
        assert!(config.prune.stride.is_none());
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_full_config() {
        let config = MagkitConfig::from_json_str(
            r#"{
                "prune": {"prefix": "skyrmion", "stride": 250, "target": "/data/runs"},
                "logging": {"enabled": false, "directory": "logs", "level": "debug"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.prune.prefix, "skyrmion");
        assert_eq!(config.prune.stride.map(Stride::get), Some(250));
        assert_eq!(config.prune.target, Some(PathBuf::from("/data/runs")));
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let err = MagkitConfig::from_json_str(r#"{"prune": {"stride": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(MagkitConfig::from_json_str(r#"{"prune": {"spacing": 5}}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MagkitConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_pattern_uses_prefix() {
        let config = PruneConfig {
            prefix: "bloch".to_string(),
            ..PruneConfig::default()
        };
        let pattern = config.pattern().unwrap();
        assert!(pattern
            .parse("bloch-Oxs_TimeDriver-Magnetization-000000001-0000000.omf")
            .is_some());
    }
}
