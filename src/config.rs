//! Configuration loading.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `SLANGIFY__` (nested keys separated by
//! `__`, e.g. `SLANGIFY__API__BASE_URL`).

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animator::{Easing, StaggerTiming};
use crate::levels::{LevelCatalog, SlangLevel, DEFAULT_LEVEL_ID};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "slangify.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] ConfigError),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// The configuration is well-formed but inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the translation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/api/translate` is appended
    pub base_url: String,
    /// Request timeout in seconds (none by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Settings for a translation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Level selected when the session starts
    pub default_level: String,
    /// How long the "copied" indicator stays on, in milliseconds
    pub copied_indicator_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL_ID.to_string(),
            copied_indicator_ms: 2000,
        }
    }
}

impl SessionConfig {
    /// Copied indicator lifetime.
    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }
}

/// Settings for the entrance animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-line animation length in milliseconds
    pub duration_ms: u64,
    /// Delay between successive line starts in milliseconds
    pub stagger_ms: u64,
    /// Initial horizontal offset in cells
    pub offset: f64,
    /// Easing curve
    pub easing: Easing,
    /// Delay after the first committed frame before playing, in milliseconds
    pub settle_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let timing = StaggerTiming::default();
        Self {
            duration_ms: timing.duration.as_millis() as u64,
            stagger_ms: timing.stagger.as_millis() as u64,
            offset: timing.offset,
            easing: timing.easing,
            settle_ms: 50,
        }
    }
}

impl AnimationConfig {
    /// Timing parameters for the animator.
    pub fn timing(&self) -> StaggerTiming {
        StaggerTiming {
            duration: Duration::from_millis(self.duration_ms),
            stagger: Duration::from_millis(self.stagger_ms),
            offset: self.offset,
            easing: self.easing,
        }
    }

    /// Settle delay for the post-render scheduler.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlangConfig {
    /// Translation API settings
    pub api: ApiConfig,
    /// Session settings
    pub session: SessionConfig,
    /// Animation settings
    pub animation: AnimationConfig,
    /// Replacement level catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<SlangLevel>>,
}

impl SlangConfig {
    /// Load configuration.
    ///
    /// With `Some(path)` the file must exist. With `None`, `slangify.toml` in
    /// the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                let path_str = path
                    .to_str()
                    .ok_or_else(|| ConfigLoadError::InvalidPath(format!("{:?}", path)))?;
                if !path.exists() {
                    return Err(ConfigLoadError::FileNotFound(path_str.to_string()));
                }
                builder = builder.add_source(File::with_name(path_str));
            }
            None => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
        }

        let config = builder
            .add_source(
                Environment::with_prefix("SLANGIFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: SlangConfig = config.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(base_url = %loaded.api.base_url, "configuration loaded");
        Ok(loaded)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigLoadError::Invalid("api.base_url is empty".to_string()));
        }
        if let Some(levels) = &self.levels {
            if levels.is_empty() {
                return Err(ConfigLoadError::Invalid(
                    "levels must contain at least one entry".to_string(),
                ));
            }
        }
        if !self.catalog().contains(&self.session.default_level) {
            return Err(ConfigLoadError::Invalid(format!(
                "session.default_level \"{}\" is not a configured level",
                self.session.default_level
            )));
        }
        if !self.animation.offset.is_finite() || self.animation.offset < 0.0 {
            return Err(ConfigLoadError::Invalid(
                "animation.offset must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Level catalog: the configured levels, or the built-in ones.
    pub fn catalog(&self) -> LevelCatalog {
        match &self.levels {
            Some(levels) => LevelCatalog::from_levels(levels.clone()),
            None => LevelCatalog::builtin(),
        }
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
