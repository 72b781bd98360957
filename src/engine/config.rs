//! Engine configuration.

use crate::store::SnapshotFormat;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine configuration: {0}")]
    Parse(String),
}

/// Tunables for an [`Engine`](super::Engine).
///
/// # Example
///
/// ```rust
/// use waypoint::engine::EngineConfig;
/// use waypoint::store::SnapshotFormat;
///
/// let config = EngineConfig::from_toml_str(r#"
///     log_warnings = false
///     snapshot_format = "binary"
/// "#).unwrap();
///
/// assert!(config.revalidate_on_start);
/// assert!(!config.log_warnings);
/// assert_eq!(config.snapshot_format, SnapshotFormat::Binary);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Re-run definition validation before starting an instance
    pub revalidate_on_start: bool,

    /// Emit warning diagnostics through `tracing`
    pub log_warnings: bool,

    /// Encoding used by engine snapshots
    pub snapshot_format: SnapshotFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            revalidate_on_start: true,
            log_warnings: true,
            snapshot_format: SnapshotFormat::Json,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
