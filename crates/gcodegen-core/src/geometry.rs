//! 2-D geometry primitives
//!
//! Points are plain `f64` pairs compared by value. The [`Transform`] maps
//! source (SVG) coordinates onto machine coordinates and is created once per
//! conversion run.

use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Tolerance used when comparing points for coincidence.
pub const POINT_EPSILON: f64 = 1e-9;

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Point at `radius` from the origin in direction `angle` (radians).
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    /// Distance from the origin.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of this point seen from the origin, in `(-π, π]`.
    pub fn phase(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns true when both points coincide within `epsilon`.
    pub fn approx_eq(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }

    /// Returns true when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Uniform scale followed by a 2-D translation.
///
/// Applied as `p' = p * scale + offset`. Lengths (radii, perimeters) only
/// take the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub offset: Point,
}

impl Transform {
    /// Creates a transform without validating its parameters.
    ///
    /// A zero or negative scale is accepted and yields degenerate geometry.
    pub const fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    /// Creates a transform, rejecting a non-positive or non-finite scale and
    /// a non-finite offset.
    pub fn try_new(scale: f64, offset: Point) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidScale { scale });
        }
        if !offset.is_finite() {
            return Err(GeometryError::InvalidOffset {
                x: offset.x,
                y: offset.y,
            });
        }
        Ok(Self { scale, offset })
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new(1.0, Point::origin())
    }

    /// Maps a source coordinate onto the machine plane.
    pub fn apply(&self, point: Point) -> Point {
        point * self.scale + self.offset
    }

    /// Scales a length without translating it.
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A single linear move target, the atomic unit written to G-code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Advisory distance associated with this move (emitted as a comment).
    pub travel_distance: f64,
}

impl MotionPoint {
    /// Creates a motion point on the Z0 plane.
    pub fn new(point: Point, travel_distance: f64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: 0.0,
            travel_distance,
        }
    }

    /// The XY position of this motion point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
