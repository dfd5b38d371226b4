//! Run configuration
//!
//! Provides the parameters of one conversion run with defaults, file
//! loading/saving (TOML or JSON) and validation.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use gcodegen_core::{FlattenOptions, Point, Transform, DEFAULT_FEEDRATE, MAX_NUM_SEGMENTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension given to output files derived from the input path.
pub const GCODE_EXTENSION: &str = "gcode";

/// Parameters for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// SVG input file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// G-code output file; derived from `input` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Feedrate in mm/min
    pub feedrate: f64,
    /// Uniform scale applied to source coordinates
    pub scale: f64,
    /// X translation applied after scaling
    pub offset_x: f64,
    /// Y translation applied after scaling
    pub offset_y: f64,
    /// Curve sampling options
    pub flatten: FlattenOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            feedrate: DEFAULT_FEEDRATE,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            flatten: FlattenOptions::default(),
        }
    }
}

impl RunConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-user config file, `<config dir>/gcodegen/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gcodegen").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded run configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.feedrate.is_finite() || self.feedrate <= 0.0 {
            return Err(out_of_range("feedrate", self.feedrate));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(out_of_range("scale", self.scale));
        }

        if !self.offset_x.is_finite() {
            return Err(out_of_range("offset_x", self.offset_x));
        }

        if !self.offset_y.is_finite() {
            return Err(out_of_range("offset_y", self.offset_y));
        }

        if self.flatten.num_segments == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "flatten.num_segments".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.flatten.num_segments > MAX_NUM_SEGMENTS {
            return Err(SettingsError::InvalidSetting {
                key: "flatten.num_segments".to_string(),
                reason: format!("must be at most {}", MAX_NUM_SEGMENTS),
            });
        }

        Ok(())
    }

    /// The coordinate transform described by this config.
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, Point::new(self.offset_x, self.offset_y))
    }

    /// The input path, which a run cannot do without.
    pub fn input_path(&self) -> SettingsResult<&Path> {
        self.input
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey("input".to_string()).into())
    }

    /// The output path: the configured one, or the input with a `.gcode`
    /// extension.
    pub fn output_path(&self) -> SettingsResult<PathBuf> {
        match &self.output {
            Some(output) => Ok(output.clone()),
            None => Ok(self.input_path()?.with_extension(GCODE_EXTENSION)),
        }
    }
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("<none>")
            ))
            .into()),
        }
    }
}

fn out_of_range(key: &str, value: f64) -> SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
