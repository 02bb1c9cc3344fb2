//! Configuration loading and typed config structures for Savanna.
//!
//! The configuration lives in `savanna-config.yaml`. Every field has a
//! default, so a missing file or a partial file both yield a usable config.
//! Rule constants (vision ranges, health, decay, breeding threshold) are not
//! part of the configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `savanna-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Board size, seed and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Agents placed before the first tick.
    #[serde(default)]
    pub population: PopulationConfig,

    /// When the run ends.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Text frame output.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`SimulationConfig::from_file`] when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid columns.
    #[serde(default = "default_width")]
    pub width: i32,

    /// Grid rows.
    #[serde(default = "default_height")]
    pub height: i32,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_width(),
            height: default_height(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Initial population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Lions placed before the first tick.
    #[serde(default)]
    pub initial_lions: u32,

    /// Antelopes placed before the first tick.
    #[serde(default)]
    pub initial_antelopes: u32,
}

/// Simulation boundary configuration.
///
/// A value of 0 for `max_ticks` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the simulation ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Text frame output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Print the grid after every tick.
    #[serde(default)]
    pub frames: bool,

    /// Color frames with ANSI escapes by agent tint.
    #[serde(default)]
    pub color: bool,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Savanna".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_width() -> i32 {
    60
}

const fn default_height() -> i32 {
    25
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_owned()
}
