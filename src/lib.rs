//! # gcodegen
//!
//! Converts SVG vector paths into linear G-code motion commands for CNC
//! machines. Curves are flattened into short straight moves; every move
//! is an absolute `G1` at Z0.
//!
//! ## Architecture
//!
//! gcodegen is organized as a workspace with multiple crates:
//!
//! 1. **gcodegen-core** - Geometry, the run transform, sampling options, errors
//! 2. **gcodegen-camtools** - SVG import, classification, flattening, G-code output
//! 3. **gcodegen-settings** - Run configuration files and validation
//! 4. **gcodegen** - Command line binary that integrates all crates

pub mod cli;

pub use cli::{run, Cli};

pub use gcodegen_core::{
    ClosedCurveDistance, EllipseMode, FlattenOptions, GeometryError, MotionPoint, Point, Result,
    Transform,
};

pub use gcodegen_camtools::{
    CamToolError, ConversionParameters, ConversionSummary, FileFormatError, ImportedPath,
    Segment, SvgImporter, SvgToGcodeConverter,
};

pub use gcodegen_settings::{RunConfig, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free
/// - RUST_LOG environment variable support (default `info`)
/// - `debug` raising the level to `debug`
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let mut env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    if debug {
        env_filter = env_filter.add_directive(tracing::Level::DEBUG.into());
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_level(true)
        .with_line_number(debug);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
