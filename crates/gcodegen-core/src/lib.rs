//! # gcodegen Core
//!
//! Core types and utilities shared by the gcodegen crates.
//! Provides 2-D geometry primitives, the run transform, the sampling
//! options used when flattening curves, and the geometry error type.

pub mod error;
pub mod geometry;
pub mod options;

pub use error::{GeometryError, Result};
pub use geometry::{MotionPoint, Point, Transform, POINT_EPSILON};
pub use options::{
    ClosedCurveDistance, EllipseMode, FlattenOptions, DEFAULT_FEEDRATE, DEFAULT_NUM_SEGMENTS,
    MAX_NUM_SEGMENTS,
};
