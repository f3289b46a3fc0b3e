//! Engine settings
//!
//! Settings are stored in `{config_dir}/tessera/engine.json`. A missing or
//! unreadable file yields the defaults.

use crate::error::{EngineError, Result};
use crate::notify::DEFAULT_NOTIFICATION_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of undo entries kept per session
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default pause between consecutive queued source writes
pub const DEFAULT_WRITE_SPACING_MS: u64 = 300;

/// Tunables for one editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum undo entries kept; the oldest are dropped first. 0 = unbounded
    pub history_limit: usize,
    /// Whether usage events reach the telemetry sink
    pub telemetry_enabled: bool,
    /// Maximum pending user notifications
    pub notification_limit: usize,
    /// Pause between consecutive queued source writes, in milliseconds
    pub write_spacing_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            telemetry_enabled: true,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            write_spacing_ms: DEFAULT_WRITE_SPACING_MS,
        }
    }
}

impl EngineSettings {
    pub fn write_spacing(&self) -> Duration {
        Duration::from_millis(self.write_spacing_ms)
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_write_spacing(mut self, spacing: Duration) -> Self {
        self.write_spacing_ms = u64::try_from(spacing.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.telemetry_enabled = enabled;
        self
    }

    /// Path of the user settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tessera").join("engine.json"))
    }

    /// Load the user settings, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            if path.exists() {
                tracing::warn!("Ignoring invalid settings at {}: {}", path.display(), e);
            }
            Self::default()
        })
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save to the user settings file
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| EngineError::Settings("Could not determine config directory".into()))?;
        self.save_to(&path)
    }

    /// Save settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = EngineSettings::default();
        assert_eq!(settings.history_limit, 100);
        assert!(settings.telemetry_enabled);
        assert_eq!(settings.notification_limit, 50);
        assert_eq!(settings.write_spacing(), Duration::from_millis(300));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: EngineSettings = serde_json::from_str(r#"{"history_limit": 10}"#).unwrap();
        assert_eq!(settings.history_limit, 10);
        assert!(settings.telemetry_enabled);
        assert_eq!(settings.write_spacing_ms, DEFAULT_WRITE_SPACING_MS);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.json");

        let settings = EngineSettings::default()
            .with_history_limit(5)
            .with_telemetry(false)
            .with_write_spacing(Duration::ZERO);
        settings.save_to(&path).unwrap();

        let loaded = EngineSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineSettings::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
