//! Configuration file handling.
//!
//! Sections:
//! - Event bus (history recording and retention)
//! - Sheet (interline used to normalize glyph weights)
//! - Logging (filter directive and output format)

use std::path::Path;
use std::time::Duration;

use glyphpick_core::{Error, EventBusConfig, Result};
use serde::{Deserialize, Serialize};

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusSettings {
    /// Record published events
    pub enable_history: bool,
    /// Maximum number of recorded events
    pub max_history_size: usize,
    /// Age after which recorded events are dropped, in seconds
    pub history_retention_secs: u64,
}

impl Default for EventBusSettings {
    fn default() -> Self {
        let bus = EventBusConfig::default();
        Self {
            enable_history: bus.enable_history,
            max_history_size: bus.max_history_size,
            history_retention_secs: bus.history_retention.as_secs(),
        }
    }
}

impl EventBusSettings {
    pub fn to_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            enable_history: self.enable_history,
            max_history_size: self.max_history_size,
            history_retention: Duration::from_secs(self.history_retention_secs),
        }
    }
}

/// Sheet settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// Distance between two staff lines, in pixels
    pub interline: u32,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self { interline: 20 }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by RUST_LOG
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub event_bus: EventBusSettings,
    pub sheet: SheetSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = if has_extension(path, "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?
        } else if has_extension(path, "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if has_extension(path, "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else if has_extension(path, "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate all settings
    pub fn validate(&self) -> Result<()> {
        if self.event_bus.enable_history {
            if self.event_bus.max_history_size == 0 {
                return Err(Error::other(
                    "History size must be > 0 when history is enabled",
                ));
            }
            if self.event_bus.history_retention_secs == 0 {
                return Err(Error::other(
                    "History retention must be > 0 when history is enabled",
                ));
            }
        }

        if self.sheet.interline == 0 {
            return Err(Error::other("Sheet interline must be > 0"));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(Error::other("Log filter must not be empty"));
        }

        Ok(())
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
