//! Command line interface
//!
//! Flags override values from the config file, which override defaults.

use anyhow::Context;
use clap::Parser;
use gcodegen_camtools::{ConversionParameters, ConversionSummary, SvgToGcodeConverter};
use gcodegen_core::{ClosedCurveDistance, EllipseMode};
use gcodegen_settings::RunConfig;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "gcodegen")]
#[command(about = "Convert SVG vector paths into linear G-code moves", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// SVG file to convert
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// G-code output file [default: INPUT with a .gcode extension]
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Run configuration file (.toml or .json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Feedrate in mm/min
    #[arg(long)]
    pub feedrate: Option<f64>,

    /// Uniform scale applied to SVG coordinates
    #[arg(long)]
    pub scale: Option<f64>,

    /// X offset added after scaling
    #[arg(long, allow_hyphen_values = true)]
    pub offset_x: Option<f64>,

    /// Y offset added after scaling
    #[arg(long, allow_hyphen_values = true)]
    pub offset_y: Option<f64>,

    /// Sampling steps per arc, circle or ellipse
    #[arg(long)]
    pub segments: Option<usize>,

    /// Report chord lengths instead of radii on circles and ellipses
    #[arg(long)]
    pub chord_distance: bool,

    /// Sample ellipses with both radii
    #[arg(long)]
    pub parametric_ellipse: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Load the base configuration: the `--config` file, else the per-user
    /// config file if present, else defaults.
    pub fn base_config(&self) -> anyhow::Result<RunConfig> {
        if let Some(path) = &self.config {
            return RunConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        match RunConfig::user_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Using user config");
                RunConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))
            }
            _ => Ok(RunConfig::default()),
        }
    }

    /// Overlay the flags given on the command line onto `config`.
    pub fn apply_to(&self, mut config: RunConfig) -> RunConfig {
        config.input = Some(self.input.clone());
        if self.output.is_some() {
            config.output = self.output.clone();
        }
        if let Some(feedrate) = self.feedrate {
            config.feedrate = feedrate;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(x) = self.offset_x {
            config.offset_x = x;
        }
        if let Some(y) = self.offset_y {
            config.offset_y = y;
        }
        if let Some(n) = self.segments {
            config.flatten.num_segments = n;
        }
        if self.chord_distance {
            config.flatten.closed_distance = ClosedCurveDistance::Chord;
        }
        if self.parametric_ellipse {
            config.flatten.ellipse_mode = EllipseMode::Parametric;
        }
        config
    }

    /// The merged and validated run configuration.
    pub fn resolve(&self) -> anyhow::Result<RunConfig> {
        let config = self.apply_to(self.base_config()?);
        config.validate().context("Invalid run configuration")?;
        Ok(config)
    }
}

/// Execute one conversion run as described by `config`.
pub fn run(config: &RunConfig) -> anyhow::Result<ConversionSummary> {
    let input = config.input_path()?;
    let output = config.output_path()?;

    let converter = SvgToGcodeConverter::new(ConversionParameters {
        feedrate: config.feedrate,
        transform: config.transform(),
        flatten: config.flatten,
    })?;

    converter
        .convert_file(input, &output)
        .with_context(|| format!("Failed to convert {}", input.display()))
}
