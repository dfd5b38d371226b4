//! Path segment model
//!
//! Segments are produced by the SVG importer in document order and carry
//! untransformed source coordinates.

use gcodegen_core::{Point, POINT_EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A closed shape described by its anchor point and radii.
///
/// Flattening samples around `start`, which the importer places at the
/// shape's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedCurve {
    pub start: Point,
    pub rx: f64,
    pub ry: f64,
    /// Total perimeter in source units
    pub length: f64,
}

/// One typed segment of an imported path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },
    Arc {
        start: Point,
        end: Point,
        center: Point,
        radius: f64,
    },
    /// Arc with unequal radii; not flattened.
    EllipticalArc {
        start: Point,
        end: Point,
        center: Point,
        rx: f64,
        ry: f64,
    },
    QuadraticBezier {
        start: Point,
        control: Point,
        end: Point,
    },
    CubicBezier {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    ClosedCurve(ClosedCurve),
}

/// Segment kind, used for logging and conversion statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Line,
    Arc,
    EllipticalArc,
    QuadraticBezier,
    CubicBezier,
    ClosedCurve,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Arc => write!(f, "arc"),
            Self::EllipticalArc => write!(f, "elliptical arc"),
            Self::QuadraticBezier => write!(f, "quadratic bezier"),
            Self::CubicBezier => write!(f, "cubic bezier"),
            Self::ClosedCurve => write!(f, "closed curve"),
        }
    }
}

impl Segment {
    /// Creates a straight line segment.
    pub fn line(start: Point, end: Point) -> Self {
        Segment::Line { start, end }
    }

    /// Creates a circular arc segment.
    pub fn arc(start: Point, end: Point, center: Point, radius: f64) -> Self {
        Segment::Arc {
            start,
            end,
            center,
            radius,
        }
    }

    /// Creates a closed circle around `center`.
    pub fn circle(center: Point, radius: f64) -> Self {
        Segment::ClosedCurve(ClosedCurve {
            start: center,
            rx: radius,
            ry: radius,
            length: 2.0 * PI * radius.abs(),
        })
    }

    /// Creates a closed ellipse around `center`.
    pub fn ellipse(center: Point, rx: f64, ry: f64) -> Self {
        Segment::ClosedCurve(ClosedCurve {
            start: center,
            rx,
            ry,
            length: ellipse_perimeter(rx.abs(), ry.abs()),
        })
    }

    /// The kind of this segment.
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Line { .. } => SegmentKind::Line,
            Segment::Arc { .. } => SegmentKind::Arc,
            Segment::EllipticalArc { .. } => SegmentKind::EllipticalArc,
            Segment::QuadraticBezier { .. } => SegmentKind::QuadraticBezier,
            Segment::CubicBezier { .. } => SegmentKind::CubicBezier,
            Segment::ClosedCurve(_) => SegmentKind::ClosedCurve,
        }
    }

    /// Geometric length in source units.
    ///
    /// Arcs use the angular span the flattener traverses. Bezier curves report
    /// the length of their control polygon, which is zero exactly when the
    /// curve is.
    pub fn length(&self) -> f64 {
        match *self {
            Segment::Line { start, end } => start.distance_to(&end),
            Segment::Arc {
                start,
                end,
                center,
                radius,
            } => {
                let sweep = (end - center).phase() - (start - center).phase();
                radius.abs() * sweep.abs()
            }
            Segment::EllipticalArc {
                start,
                end,
                center,
                rx,
                ry,
            } => {
                let sweep = (end - center).phase() - (start - center).phase();
                0.5 * (rx.abs() + ry.abs()) * sweep.abs()
            }
            Segment::QuadraticBezier {
                start,
                control,
                end,
            } => start.distance_to(&control) + control.distance_to(&end),
            Segment::CubicBezier {
                start,
                control1,
                control2,
                end,
            } => {
                start.distance_to(&control1)
                    + control1.distance_to(&control2)
                    + control2.distance_to(&end)
            }
            Segment::ClosedCurve(curve) => curve.length.abs(),
        }
    }

    /// Returns true when the segment has no geometric extent.
    pub fn is_zero_length(&self) -> bool {
        self.length() <= POINT_EPSILON
    }
}

/// Ramanujan's approximation of an ellipse perimeter.
pub fn ellipse_perimeter(rx: f64, ry: f64) -> f64 {
    let sum = rx + ry;
    if sum <= 0.0 {
        return 0.0;
    }
    let h = ((rx - ry) / sum).powi(2);
    PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}
