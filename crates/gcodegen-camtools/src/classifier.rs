//! Segment classification
//!
//! Decides which flattening algorithm handles a segment. Every segment kind
//! is matched explicitly so a new kind cannot be ignored by accident.

use crate::segment::{ClosedCurve, Segment, SegmentKind};
use gcodegen_core::{Point, Transform};

/// Maximum `|rx - ry|`, in untransformed source units, for a closed curve
/// to be treated as a circle.
pub const CIRCLE_TOLERANCE: f64 = 1e-6;

/// A primitive the flattener knows how to sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
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
    /// Closed circular curve; the radius is derived from `length`.
    Circle { center: Point, length: f64 },
    /// Closed elliptical curve.
    Ellipse { center: Point, rx: f64, ry: f64 },
}

/// Outcome of classifying one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Flatten(Primitive),
    /// The segment has no geometric extent.
    ZeroLength,
    /// The segment kind has no flattening algorithm.
    Unsupported(SegmentKind),
}

/// Classify a segment for flattening.
pub fn classify(segment: &Segment) -> Classification {
    if segment.is_zero_length() {
        return Classification::ZeroLength;
    }

    match *segment {
        Segment::Line { start, end } => Classification::Flatten(Primitive::Line { start, end }),
        Segment::Arc {
            start,
            end,
            center,
            radius,
        } => Classification::Flatten(Primitive::Arc {
            start,
            end,
            center,
            radius,
        }),
        Segment::ClosedCurve(curve) => Classification::Flatten(classify_closed(&curve)),
        Segment::EllipticalArc { .. }
        | Segment::QuadraticBezier { .. }
        | Segment::CubicBezier { .. } => Classification::Unsupported(segment.kind()),
    }
}

fn classify_closed(curve: &ClosedCurve) -> Primitive {
    if (curve.rx - curve.ry).abs() < CIRCLE_TOLERANCE {
        Primitive::Circle {
            center: curve.start,
            length: curve.length,
        }
    } else {
        Primitive::Ellipse {
            center: curve.start,
            rx: curve.rx,
            ry: curve.ry,
        }
    }
}

impl Primitive {
    /// Maps the primitive into machine coordinates.
    ///
    /// Points take the full transform; radii and lengths only the scale.
    pub fn transformed(&self, transform: &Transform) -> Primitive {
        match *self {
            Primitive::Line { start, end } => Primitive::Line {
                start: transform.apply(start),
                end: transform.apply(end),
            },
            Primitive::Arc {
                start,
                end,
                center,
                radius,
            } => Primitive::Arc {
                start: transform.apply(start),
                end: transform.apply(end),
                center: transform.apply(center),
                radius: transform.scale_length(radius).abs(),
            },
            Primitive::Circle { center, length } => Primitive::Circle {
                center: transform.apply(center),
                length: transform.scale_length(length).abs(),
            },
            Primitive::Ellipse { center, rx, ry } => Primitive::Ellipse {
                center: transform.apply(center),
                rx: transform.scale_length(rx).abs(),
                ry: transform.scale_length(ry).abs(),
            },
        }
    }
}
