//! Configuration file support for gmap.
//!
//! Parses `gmap.toml` with serde and provides auto-discovery of the file in
//! the current directory and its parents.
//!
//! ```toml
//! [map]
//! google_api_key = "..."
//! width = 600        # integer or string
//! height = "400"
//! fluid = true
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`]. Values left
//! unset everywhere stay unset in [`Config::map_options`], so the renderer's
//! own fallbacks (the `GOOGLE_API_KEY` environment variable for the key,
//! built-in defaults for the rest) still apply.

use std::path::{Path, PathBuf};

use gmap_renderer::{Dimension, MapOptions};
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "gmap.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Google API key.
    pub google_api_key: Option<String>,
    /// Override iframe width.
    pub width: Option<String>,
    /// Override iframe height.
    pub height: Option<String>,
    /// Override fluid flag.
    pub fluid: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Map rendering settings.
    pub map: MapSection,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[map]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapSection {
    /// Google API key.
    pub google_api_key: Option<String>,
    /// Iframe width.
    pub width: Option<DimensionValue>,
    /// Iframe height.
    pub height: Option<DimensionValue>,
    /// Wrap the iframe in a fluid container.
    pub fluid: Option<bool>,
}

/// A dimension written as either a TOML integer or string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    /// `width = 600`
    Number(u32),
    /// `width = "600"`
    Text(String),
}

impl From<DimensionValue> for Dimension {
    fn from(value: DimensionValue) -> Self {
        match value {
            DimensionValue::Number(n) => n.into(),
            DimensionValue::Text(s) => s.into(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `gmap.toml` in current directory and parents.
    /// With no file found, starts from an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for the config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Discovered config file");
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(key) = &settings.google_api_key {
            self.map.google_api_key = Some(key.clone());
        }
        if let Some(width) = &settings.width {
            self.map.width = Some(DimensionValue::Text(width.clone()));
        }
        if let Some(height) = &settings.height {
            self.map.height = Some(DimensionValue::Text(height.clone()));
        }
        if let Some(fluid) = settings.fluid {
            self.map.fluid = Some(fluid);
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a dimension is an empty string.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty_dimension(self.map.width.as_ref(), "map.width")?;
        require_non_empty_dimension(self.map.height.as_ref(), "map.height")?;
        Ok(())
    }

    /// Explicit renderer options from the configured values.
    #[must_use]
    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            google_api_key: self.map.google_api_key.clone(),
            width: self.map.width.clone().map(Dimension::from),
            height: self.map.height.clone().map(Dimension::from),
            fluid: self.map.fluid,
        }
    }
}

fn require_non_empty_dimension(
    value: Option<&DimensionValue>,
    field: &str,
) -> Result<(), ConfigError> {
    if let Some(DimensionValue::Text(text)) = value
        && text.trim().is_empty()
    {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
