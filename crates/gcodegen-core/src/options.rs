//! Curve sampling options
//!
//! Controls how many steps each curve is sampled with and which of the two
//! travel-distance conventions closed curves report.

use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of sampling steps per curve.
pub const DEFAULT_NUM_SEGMENTS: usize = 100;

/// Largest accepted number of sampling steps per curve.
///
/// Bounds the per-curve point buffer; a million steps is already far below
/// any machine's positioning resolution.
pub const MAX_NUM_SEGMENTS: usize = 1_000_000;

/// Default feedrate in mm/min.
pub const DEFAULT_FEEDRATE: f64 = 100.0;

/// Distance reported for each sample of a closed curve (circle or ellipse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedCurveDistance {
    /// Distance from the curve's center to the sample.
    #[default]
    Radial,
    /// Distance from the previous sample (the first sample reports 0).
    Chord,
}

impl fmt::Display for ClosedCurveDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radial => write!(f, "radial"),
            Self::Chord => write!(f, "chord"),
        }
    }
}

/// How closed elliptical curves are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EllipseMode {
    /// Sample a circle of the horizontal radius; `ry` has no effect.
    #[default]
    HorizontalRadius,
    /// Sample the true ellipse `(rx·cos θ, ry·sin θ)`.
    Parametric,
}

impl fmt::Display for EllipseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HorizontalRadius => write!(f, "horizontal_radius"),
            Self::Parametric => write!(f, "parametric"),
        }
    }
}

/// Sampling parameters shared by all flattening algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Number of angular steps per arc, circle or ellipse
    pub num_segments: usize,
    /// Travel distance convention for circles and ellipses
    pub closed_distance: ClosedCurveDistance,
    /// Sampling of closed elliptical curves
    pub ellipse_mode: EllipseMode,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            num_segments: DEFAULT_NUM_SEGMENTS,
            closed_distance: ClosedCurveDistance::default(),
            ellipse_mode: EllipseMode::default(),
        }
    }
}

impl FlattenOptions {
    /// Options with a custom step count and default conventions.
    pub fn with_segments(num_segments: usize) -> Self {
        Self {
            num_segments,
            ..Self::default()
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.num_segments == 0 {
            return Err(GeometryError::ZeroSegments);
        }
        if self.num_segments > MAX_NUM_SEGMENTS {
            return Err(GeometryError::TooManySegments {
                num_segments: self.num_segments,
                max: MAX_NUM_SEGMENTS,
            });
        }
        Ok(())
    }
}
