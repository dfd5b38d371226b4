//! Segment Flattener
//!
//! Converts lines, circular arcs and closed circular/elliptical curves into
//! ordered sequences of motion points plus an accumulated travel distance.
//! All inputs are expected in machine coordinates (already transformed).

use crate::classifier::Primitive;
use gcodegen_core::{ClosedCurveDistance, EllipseMode, FlattenOptions, MotionPoint, Point};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Rotational direction of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

impl ArcDirection {
    /// Infer the direction from the start and end phase angles.
    ///
    /// A non-negative difference (including zero) is counter-clockwise.
    pub fn infer(angle_start: f64, angle_end: f64) -> Self {
        if angle_end - angle_start < 0.0 {
            ArcDirection::Clockwise
        } else {
            ArcDirection::CounterClockwise
        }
    }
}

impl fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "CW"),
            Self::CounterClockwise => write!(f, "CCW"),
        }
    }
}

/// Which algorithm produced a flattened segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Line,
    Arc,
    Circle,
    Ellipse,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Arc => write!(f, "arc"),
            Self::Circle => write!(f, "circle"),
            Self::Ellipse => write!(f, "ellipse"),
        }
    }
}

/// The motion points produced for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedSegment {
    pub kind: PrimitiveKind,
    pub points: Vec<MotionPoint>,
    pub total_distance: f64,
    /// Whether each emitted move carries a travel distance comment
    pub annotated: bool,
}

impl FlattenedSegment {
    fn new(kind: PrimitiveKind, capacity: usize) -> Self {
        Self {
            kind,
            points: Vec::with_capacity(capacity),
            total_distance: 0.0,
            annotated: kind != PrimitiveKind::Line,
        }
    }

    fn push(&mut self, point: Point, travel_distance: f64) {
        self.total_distance += travel_distance;
        self.points.push(MotionPoint::new(point, travel_distance));
    }

    /// Number of motion points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no motion points were produced.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First motion point, if any.
    pub fn first(&self) -> Option<&MotionPoint> {
        self.points.first()
    }

    /// Last motion point, if any.
    pub fn last(&self) -> Option<&MotionPoint> {
        self.points.last()
    }
}

/// Samples primitives into motion points
#[derive(Debug, Clone, Default)]
pub struct SegmentFlattener {
    options: FlattenOptions,
}

impl SegmentFlattener {
    /// Create a new flattener
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    /// Flatten any supported primitive.
    pub fn flatten(&self, primitive: &Primitive) -> FlattenedSegment {
        match *primitive {
            Primitive::Line { start, end } => self.flatten_line(start, end),
            Primitive::Arc {
                start,
                end,
                center,
                radius,
            } => self.flatten_arc(start, end, center, radius),
            Primitive::Circle { center, length } => self.flatten_circle(center, length),
            Primitive::Ellipse { center, rx, ry } => self.flatten_ellipse(center, rx, ry),
        }
    }

    /// Two-point discretization: the start (distance 0) and the end.
    pub fn flatten_line(&self, start: Point, end: Point) -> FlattenedSegment {
        let mut out = FlattenedSegment::new(PrimitiveKind::Line, 2);
        out.push(start, 0.0);
        out.push(end, start.distance_to(&end));
        out
    }

    /// Sample a circular arc in `num_segments` equal angular steps.
    ///
    /// Only the far end of each step is emitted, so the result holds exactly
    /// `num_segments` points and excludes `start`. The direction comes from
    /// the sign of the phase difference; clockwise arcs are traversed with a
    /// negative step and finish on `end`.
    pub fn flatten_arc(
        &self,
        start: Point,
        end: Point,
        center: Point,
        radius: f64,
    ) -> FlattenedSegment {
        let n = self.options.num_segments;
        let mut out = FlattenedSegment::new(PrimitiveKind::Arc, n);

        let mut angle_start = (start - center).phase();
        let mut angle_end = (end - center).phase();
        let direction = ArcDirection::infer(angle_start, angle_end);

        if direction == ArcDirection::Clockwise {
            angle_start += TAU;
            angle_end += TAU;
        }

        let mut theta_diff = (angle_end - angle_start).abs();
        if direction == ArcDirection::Clockwise {
            theta_diff = -theta_diff;
        }

        for i in 0..n {
            let theta1 = angle_start + i as f64 * theta_diff / n as f64;
            let theta2 = angle_start + (i + 1) as f64 * theta_diff / n as f64;
            let point1 = center + Point::from_polar(radius, theta1);
            let point2 = center + Point::from_polar(radius, theta2);
            out.push(point2, point1.distance_to(&point2));
        }

        tracing::trace!(
            %direction,
            sweep = theta_diff,
            points = out.len(),
            "Flattened arc"
        );
        out
    }

    /// Sample a closed circle of radius `length / 2π` around `center`.
    ///
    /// Produces `num_segments + 1` points; the last coincides with the first.
    pub fn flatten_circle(&self, center: Point, length: f64) -> FlattenedSegment {
        let radius = length / (2.0 * PI);
        self.sample_closed(PrimitiveKind::Circle, center, |theta| {
            Point::from_polar(radius, theta)
        })
    }

    /// Sample a closed ellipse around `center`.
    ///
    /// With [`EllipseMode::HorizontalRadius`] only `rx` is used and `ry` has
    /// no effect on the output.
    pub fn flatten_ellipse(&self, center: Point, rx: f64, ry: f64) -> FlattenedSegment {
        match self.options.ellipse_mode {
            EllipseMode::HorizontalRadius => {
                self.sample_closed(PrimitiveKind::Ellipse, center, |theta| {
                    Point::from_polar(rx, theta)
                })
            }
            EllipseMode::Parametric => {
                self.sample_closed(PrimitiveKind::Ellipse, center, |theta| {
                    Point::new(rx * theta.cos(), ry * theta.sin())
                })
            }
        }
    }

    fn sample_closed<F>(&self, kind: PrimitiveKind, center: Point, offset_at: F) -> FlattenedSegment
    where
        F: Fn(f64) -> Point,
    {
        let n = self.options.num_segments;
        let mut out = FlattenedSegment::new(kind, n + 1);
        let mut previous: Option<Point> = None;

        for i in 0..=n {
            let theta = TAU * (i as f64 / n as f64);
            let point = center + offset_at(theta);
            let distance = match self.options.closed_distance {
                ClosedCurveDistance::Radial => point.distance_to(&center),
                ClosedCurveDistance::Chord => previous.map_or(0.0, |p| p.distance_to(&point)),
            };
            out.push(point, distance);
            previous = Some(point);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn flattener(n: usize) -> SegmentFlattener {
        SegmentFlattener::new(FlattenOptions::with_segments(n))
    }

    #[test]
    fn test_line_two_points() {
        let f = SegmentFlattener::default();
        let out = f.flatten_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(out.len(), 2);
        assert_eq!(out.points[0].position(), Point::new(0.0, 0.0));
        assert_eq!(out.points[1].position(), Point::new(10.0, 0.0));
        assert_eq!(out.points[0].travel_distance, 0.0);
        assert_eq!(out.total_distance, 10.0);
        assert!(!out.annotated);
    }

    #[test]
    fn test_quarter_arc_point_count_and_length() {
        let f = SegmentFlattener::default();
        let out = f.flatten_arc(
            Point::new(5.0, 0.0),
            Point::new(0.0, 5.0),
            Point::origin(),
            5.0,
        );
        assert_eq!(out.len(), 100);
        assert!(out.annotated);

        let true_length = 5.0 * PI / 2.0;
        assert!((out.total_distance - true_length).abs() / true_length < 0.001);

        let last = out.last().unwrap().position();
        assert!(last.approx_eq(&Point::new(0.0, 5.0), 1e-9));
        // The start point itself is never emitted
        assert!(!out.first().unwrap().position().approx_eq(&Point::new(5.0, 0.0), 1e-6));
    }

    #[test]
    fn test_arc_accuracy_improves_with_segments() {
        let true_length = 5.0 * PI / 2.0;
        let errors: Vec<f64> = [4, 16, 64, 256]
            .iter()
            .map(|&n| {
                let out = flattener(n).flatten_arc(
                    Point::new(5.0, 0.0),
                    Point::new(0.0, 5.0),
                    Point::origin(),
                    5.0,
                );
                (true_length - out.total_distance).abs()
            })
            .collect();

        for pair in errors.windows(2) {
            assert!(pair[1] < pair[0], "errors should shrink: {:?}", errors);
        }
        assert!(errors[3] / true_length < 0.001);
    }

    #[test]
    fn test_arc_direction_inference() {
        assert_eq!(ArcDirection::infer(0.0, 1.0), ArcDirection::CounterClockwise);
        assert_eq!(ArcDirection::infer(1.0, 1.0), ArcDirection::CounterClockwise);
        assert_eq!(ArcDirection::infer(1.0, 0.0), ArcDirection::Clockwise);
        assert_eq!(ArcDirection::Clockwise.to_string(), "CW");
    }

    #[test]
    fn test_clockwise_arc_traverses_clockwise() {
        let f = flattener(10);
        // (0,5) -> (5,0): phase decreases from π/2 to 0
        let out = f.flatten_arc(
            Point::new(0.0, 5.0),
            Point::new(5.0, 0.0),
            Point::origin(),
            5.0,
        );
        assert_eq!(out.len(), 10);

        let angles: Vec<f64> = out
            .points
            .iter()
            .map(|p| p.position().phase().rem_euclid(TAU))
            .collect();
        // All samples stay in the first quadrant and move clockwise
        for angle in &angles {
            assert!(*angle <= PI / 2.0 + EPS || *angle >= TAU - EPS);
        }
        for pair in angles.windows(2) {
            let delta = (pair[0] - pair[1]).rem_euclid(TAU);
            assert!(delta > 0.0 && delta < PI, "not clockwise: {:?}", angles);
        }
        assert!(out
            .last()
            .unwrap()
            .position()
            .approx_eq(&Point::new(5.0, 0.0), 1e-9));
    }

    #[test]
    fn test_cw_and_ccw_arcs_differ() {
        let f = flattener(8);
        let a = Point::new(5.0, 0.0);
        let b = Point::new(0.0, 5.0);
        let ccw = f.flatten_arc(a, b, Point::origin(), 5.0);
        let cw = f.flatten_arc(b, a, Point::origin(), 5.0);

        assert_ne!(ccw.points, cw.points);
        assert!(ccw.last().unwrap().position().approx_eq(&b, 1e-9));
        assert!(cw.last().unwrap().position().approx_eq(&a, 1e-9));
        assert!((ccw.total_distance - cw.total_distance).abs() < 1e-9);
    }

    #[test]
    fn test_arc_crossing_the_negative_x_axis() {
        // Phase goes from 3π/4 to -3π/4: a negative difference, so the arc
        // runs clockwise the long way round through angle 0.
        let r = 2.0;
        let start = Point::from_polar(r, 0.75 * PI);
        let end = Point::from_polar(r, -0.75 * PI);
        let out = flattener(6).flatten_arc(start, end, Point::origin(), r);

        let expected = r * 1.5 * PI;
        assert!((out.total_distance - expected).abs() / expected < 0.05);
        assert!(out.last().unwrap().position().approx_eq(&end, 1e-9));
        // Passes through the positive X axis
        assert!(out.points.iter().any(|p| p.x > 1.9));
    }

    #[test]
    fn test_circle_closes() {
        let f = flattener(50);
        let length = 2.0 * PI * 3.0;
        let out = f.flatten_circle(Point::new(10.0, 10.0), length);
        assert_eq!(out.len(), 51);

        let first = out.first().unwrap().position();
        let last = out.last().unwrap().position();
        assert!(first.approx_eq(&last, 1e-9));
        assert!(first.approx_eq(&Point::new(13.0, 10.0), 1e-9));
    }

    #[test]
    fn test_circle_radial_distance() {
        let f = flattener(4);
        let out = f.flatten_circle(Point::origin(), 2.0 * PI * 2.0);
        for p in &out.points {
            assert!((p.travel_distance - 2.0).abs() < EPS);
        }
        assert!((out.total_distance - 10.0).abs() < EPS);
    }

    #[test]
    fn test_circle_chord_distance() {
        let f = SegmentFlattener::new(FlattenOptions {
            num_segments: 4,
            closed_distance: ClosedCurveDistance::Chord,
            ..FlattenOptions::default()
        });
        let out = f.flatten_circle(Point::origin(), 2.0 * PI);
        assert_eq!(out.points[0].travel_distance, 0.0);
        // Four chords of a unit square inscribed in the circle
        assert!((out.total_distance - 4.0 * 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_ellipse_ignores_ry_by_default() {
        let f = flattener(16);
        let ellipse = f.flatten_ellipse(Point::origin(), 3.0, 1.0);
        let circle = f.flatten_circle(Point::origin(), 2.0 * PI * 3.0);
        assert_eq!(ellipse.len(), 17);
        for (e, c) in ellipse.points.iter().zip(circle.points.iter()) {
            assert!(e.position().approx_eq(&c.position(), 1e-9));
        }
        assert_eq!(ellipse.kind, PrimitiveKind::Ellipse);
    }

    #[test]
    fn test_parametric_ellipse_uses_both_radii() {
        let f = SegmentFlattener::new(FlattenOptions {
            num_segments: 4,
            ellipse_mode: EllipseMode::Parametric,
            ..FlattenOptions::default()
        });
        let out = f.flatten_ellipse(Point::new(1.0, 1.0), 3.0, 1.0);
        assert!(out.points[0].position().approx_eq(&Point::new(4.0, 1.0), 1e-9));
        assert!(out.points[1].position().approx_eq(&Point::new(1.0, 2.0), 1e-9));
        assert!(out.points[2].position().approx_eq(&Point::new(-2.0, 1.0), 1e-9));
        assert!(out.points[4].position().approx_eq(&Point::new(4.0, 1.0), 1e-9));
    }

    #[test]
    fn test_flatten_dispatch() {
        let f = flattener(10);
        let out = f.flatten(&Primitive::Circle {
            center: Point::origin(),
            length: TAU,
        });
        assert_eq!(out.kind, PrimitiveKind::Circle);
        assert_eq!(out.len(), 11);

        let out = f.flatten(&Primitive::Line {
            start: Point::origin(),
            end: Point::new(1.0, 1.0),
        });
        assert_eq!(out.kind, PrimitiveKind::Line);
        assert_eq!(out.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_arc_emits_exactly_n_points(
            n in 1usize..400,
            a0 in -3.1f64..3.1,
            a1 in -3.1f64..3.1,
            r in 0.1f64..500.0,
        ) {
            let center = Point::new(1.0, -2.0);
            let start = center + Point::from_polar(r, a0);
            let end = center + Point::from_polar(r, a1);
            let out = flattener(n).flatten_arc(start, end, center, r);
            prop_assert_eq!(out.len(), n);
            for p in &out.points {
                prop_assert!((p.position().distance_to(&center) - r).abs() < 1e-6 * r.max(1.0));
            }
        }

        #[test]
        fn prop_closed_curves_close(n in 1usize..400, r in 0.1f64..500.0) {
            let out = flattener(n).flatten_circle(Point::new(3.0, 4.0), TAU * r);
            prop_assert_eq!(out.len(), n + 1);
            let first = out.first().unwrap().position();
            let last = out.last().unwrap().position();
            prop_assert!(first.approx_eq(&last, 1e-9 * r.max(1.0)));
        }
    }
}
