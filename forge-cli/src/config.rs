//! `forge.toml` configuration.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults shown here.
//!
//! ```toml
//! [storage]
//! backend = "file"     # "file" or "memory"
//! location = ""        # directory for the file slot; empty = $FORGE_STATE_DIR or "."
//!
//! [input]
//! debounce_ms = 150
//!
//! [display]
//! separator = ","      # thousands separator
//!
//! [logging]
//! level = "info"       # any EnvFilter directive
//! # file = "forge.log"
//!
//! [export]
//! dir = "."
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use forge_core::storage::SlotConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: SlotConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: SlotConfig {
                backend: "file".to_string(),
                location: String::new(),
            },
            input: InputConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub debounce_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { debounce_ms: 150 }
    }
}

impl InputConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub separator: char,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`. A missing file is an error; callers decide whether to
    /// fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let separator = self.display.separator;
        if separator.is_ascii_digit() || separator == '-' {
            return Err(ConfigError::Invalid(format!(
                "display.separator cannot be '{separator}'"
            )));
        }
        if self.storage.backend.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.backend is empty".to_string()));
        }
        Ok(())
    }
}
