// src/config.rs

//! Defines the configuration structures for the rendering engine.
//!
//! Every field has a default matching the reference 320x480 panel, so an
//! empty JSON object (or no config file at all) yields a working setup.
//! Partial files only override what they name.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "INDEXED_GFX_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match Config::load() {
    Ok(config) => config,
    Err(e) => {
        warn!("Config: {:#}; falling back to defaults", e);
        Config::default()
    }
});

// --- Top-Level Configuration Structure ---

/// Root of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Framebuffer geometry.
    pub canvas: CanvasConfig,
    /// Flush scheduling.
    pub flush: FlushConfig,
}

/// Framebuffer geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Rows held by the first storage sector; the rest go to the second.
    pub top_sector_rows: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 320,
            height: 480,
            top_sector_rows: 256,
        }
    }
}

/// Flush scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlushConfig {
    /// Columns per dirty band.
    pub band_width: usize,
    /// Dirty band cells above which a flush only visits every other row.
    pub interlace_threshold: usize,
}

impl Default for FlushConfig {
    fn default() -> Self {
        FlushConfig {
            band_width: 64,
            interlace_threshold: 900,
        }
    }
}

impl Config {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the JSON file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads the file named by `INDEXED_GFX_CONFIG`, or the defaults if unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("Config: loading {}", Path::new(&path).display());
                Self::from_file(path)
            }
            None => {
                info!("Config: {} not set, using defaults", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Rejects geometry the engine cannot allocate or address.
    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            bail!("canvas must be at least 1x1, got {}x{}", canvas.width, canvas.height);
        }
        if canvas.width > i32::MAX as usize || canvas.height > i32::MAX as usize {
            bail!("canvas {}x{} exceeds the coordinate range", canvas.width, canvas.height);
        }
        if canvas.top_sector_rows > canvas.height {
            bail!(
                "top_sector_rows {} exceeds canvas height {}",
                canvas.top_sector_rows,
                canvas.height
            );
        }
        if self.flush.band_width == 0 {
            bail!("flush.band_width must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults_describe_the_reference_panel() {
        let config = Config::default();
        assert_eq!(config.canvas.width, 320);
        assert_eq!(config.canvas.height, 480);
        assert_eq!(config.canvas.top_sector_rows, 256);
        assert_eq!(config.flush.band_width, 64);
        assert_eq!(config.flush.interlace_threshold, 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_the_default() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = Config::from_json_str(r#"{ "flush": { "interlace_threshold": 10 } }"#).unwrap();
        assert_eq!(config.flush.interlace_threshold, 10);
        assert_eq!(config.flush.band_width, 64);
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        assert!(Config::from_json_str(r#"{ "canvas": { "width": 0 } }"#).is_err());
        assert!(Config::from_json_str(r#"{ "canvas": { "height": 100 } }"#).is_err());
        assert!(Config::from_json_str(r#"{ "flush": { "band_width": 0 } }"#).is_err());
        assert!(Config::from_json_str("not json").is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config::default();
        config.canvas.width = 128;
        config.flush.band_width = 32;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/nonexistent/indexed-gfx.json").is_err());
    }
}
