//! SVG Import
//!
//! Reads an SVG document into an ordered list of paths made of typed
//! segments. Drawable elements are taken in document order:
//! `path`, `line`, `polyline`, `polygon`, `rect`, `circle` and `ellipse`.
//! Styles, units and `transform` attributes are ignored; coordinates are
//! returned exactly as written in the document.

use crate::error::{FileFormatError, FileFormatResult};
use crate::segment::Segment;
use gcodegen_core::{Point, POINT_EPSILON};
use lyon::geom::{point, vector, Angle, ArcFlags, SvgArc};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path as StdPath;
use std::str::FromStr;
use std::sync::LazyLock;
use svgtypes::{PathParser, PathSegment, PointsParser};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"));

static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(path|line|polyline|polygon|rect|circle|ellipse)\b([^>]*?)/?>")
        .expect("invalid element regex")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("invalid attribute regex")
});

/// One drawable element of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPath {
    /// Element name, e.g. `path` or `circle`
    pub element: String,
    /// Value of the `id` attribute, if present
    pub id: Option<String>,
    pub segments: Vec<Segment>,
}

impl ImportedPath {
    /// Human readable label for logging.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("<{} id=\"{}\">", self.element, id),
            None => format!("<{}>", self.element),
        }
    }
}

/// SVG document reader
#[derive(Debug, Default)]
pub struct SvgImporter;

impl SvgImporter {
    /// Read and parse an SVG file.
    pub fn from_file<P: AsRef<StdPath>>(path: P) -> FileFormatResult<Vec<ImportedPath>> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.is_file() {
            return Err(FileFormatError::NotFound(path_str));
        }

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if ext != "svg" {
            return Err(FileFormatError::UnknownExtension(format!(".{}", ext)));
        }

        let content = std::fs::read_to_string(path)?;
        let paths = Self::parse_str(&content)?;
        tracing::debug!(file = %path_str, paths = paths.len(), "Imported SVG");
        Ok(paths)
    }

    /// Parse an SVG document held in memory.
    pub fn parse_str(content: &str) -> FileFormatResult<Vec<ImportedPath>> {
        let content = COMMENT_RE.replace_all(content, "");
        if !content.contains("<svg") {
            return Err(FileFormatError::SvgParseError(
                "no <svg> root element".to_string(),
            ));
        }

        let mut paths = Vec::new();
        for caps in ELEMENT_RE.captures_iter(&content) {
            let element = &caps[1];
            let attrs = parse_attributes(&caps[2]);

            let segments = match element {
                "path" => match attrs.get("d") {
                    Some(d) => Self::parse_path_data(d)?,
                    None => Vec::new(),
                },
                "line" => line_segments(&attrs)?,
                "polyline" => poly_segments(&attrs, false),
                "polygon" => poly_segments(&attrs, true),
                "rect" => rect_segments(&attrs)?,
                "circle" => circle_segments(&attrs)?,
                "ellipse" => ellipse_segments(&attrs)?,
                _ => Vec::new(),
            };

            if segments.is_empty() {
                tracing::debug!(element, "Element has no drawable geometry");
                continue;
            }

            paths.push(ImportedPath {
                element: element.to_string(),
                id: attrs.get("id").cloned(),
                segments,
            });
        }

        if paths.is_empty() {
            tracing::warn!("SVG document contains no drawable elements");
        }
        Ok(paths)
    }

    /// Parse SVG path data (`d` attribute) into segments.
    ///
    /// Every subpath of the data belongs to the same returned list. `Z`
    /// adds a closing line back to the subpath start.
    pub fn parse_path_data(data: &str) -> FileFormatResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut current = Point::origin();
        let mut subpath_start = Point::origin();
        let mut last_cubic_ctrl: Option<Point> = None;
        let mut last_quad_ctrl: Option<Point> = None;

        for token in PathParser::from(data) {
            let token = token.map_err(|e| FileFormatError::InvalidPathData {
                element: "path".to_string(),
                reason: e.to_string(),
            })?;

            let mut cubic_ctrl = None;
            let mut quad_ctrl = None;

            match token {
                PathSegment::MoveTo { abs, x, y } => {
                    current = resolve(abs, current, x, y);
                    subpath_start = current;
                }
                PathSegment::LineTo { abs, x, y } => {
                    let end = resolve(abs, current, x, y);
                    segments.push(Segment::line(current, end));
                    current = end;
                }
                PathSegment::HorizontalLineTo { abs, x } => {
                    let end = Point::new(if abs { x } else { current.x + x }, current.y);
                    segments.push(Segment::line(current, end));
                    current = end;
                }
                PathSegment::VerticalLineTo { abs, y } => {
                    let end = Point::new(current.x, if abs { y } else { current.y + y });
                    segments.push(Segment::line(current, end));
                    current = end;
                }
                PathSegment::CurveTo {
                    abs,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let control1 = resolve(abs, current, x1, y1);
                    let control2 = resolve(abs, current, x2, y2);
                    let end = resolve(abs, current, x, y);
                    segments.push(Segment::CubicBezier {
                        start: current,
                        control1,
                        control2,
                        end,
                    });
                    cubic_ctrl = Some(control2);
                    current = end;
                }
                PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                    let control1 = reflect(last_cubic_ctrl, current);
                    let control2 = resolve(abs, current, x2, y2);
                    let end = resolve(abs, current, x, y);
                    segments.push(Segment::CubicBezier {
                        start: current,
                        control1,
                        control2,
                        end,
                    });
                    cubic_ctrl = Some(control2);
                    current = end;
                }
                PathSegment::Quadratic { abs, x1, y1, x, y } => {
                    let control = resolve(abs, current, x1, y1);
                    let end = resolve(abs, current, x, y);
                    segments.push(Segment::QuadraticBezier {
                        start: current,
                        control,
                        end,
                    });
                    quad_ctrl = Some(control);
                    current = end;
                }
                PathSegment::SmoothQuadratic { abs, x, y } => {
                    let control = reflect(last_quad_ctrl, current);
                    let end = resolve(abs, current, x, y);
                    segments.push(Segment::QuadraticBezier {
                        start: current,
                        control,
                        end,
                    });
                    quad_ctrl = Some(control);
                    current = end;
                }
                PathSegment::EllipticalArc {
                    abs,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    let end = resolve(abs, current, x, y);
                    segments.extend(arc_segments(
                        current,
                        end,
                        rx,
                        ry,
                        x_axis_rotation,
                        large_arc,
                        sweep,
                    ));
                    current = end;
                }
                PathSegment::ClosePath { .. } => {
                    if !current.approx_eq(&subpath_start, POINT_EPSILON) {
                        segments.push(Segment::line(current, subpath_start));
                    }
                    current = subpath_start;
                }
            }

            last_cubic_ctrl = cubic_ctrl;
            last_quad_ctrl = quad_ctrl;
        }

        Ok(segments)
    }
}

fn resolve(abs: bool, current: Point, x: f64, y: f64) -> Point {
    if abs {
        Point::new(x, y)
    } else {
        Point::new(current.x + x, current.y + y)
    }
}

/// Reflect the previous control point about `current` (smooth curve commands).
fn reflect(control: Option<Point>, current: Point) -> Point {
    match control {
        Some(c) => current + (current - c),
        None => current,
    }
}

/// Convert an endpoint-parameterized SVG arc into center-parameterized
/// segments. Radii are corrected upwards when too small to span the endpoints.
///
/// Circular arcs are flattened by endpoint phase in `(-π, π]`, so an arc
/// whose sweep crosses the negative x axis is split there into two pieces.
fn arc_segments(
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> Vec<Segment> {
    if from.approx_eq(&to, POINT_EPSILON) {
        return Vec::new();
    }
    if rx.abs() <= POINT_EPSILON || ry.abs() <= POINT_EPSILON {
        return vec![Segment::line(from, to)];
    }

    let svg_arc = SvgArc {
        from: point(from.x, from.y),
        to: point(to.x, to.y),
        radii: vector(rx.abs(), ry.abs()),
        x_rotation: Angle::degrees(x_axis_rotation),
        flags: ArcFlags { large_arc, sweep },
    };
    let arc = svg_arc.to_arc();
    let center = Point::new(arc.center.x, arc.center.y);

    if (rx.abs() - ry.abs()).abs() >= crate::classifier::CIRCLE_TOLERANCE {
        return vec![Segment::EllipticalArc {
            start: from,
            end: to,
            center,
            rx: arc.radii.x,
            ry: arc.radii.y,
        }];
    }

    let radius = arc.radii.x;
    split_circular_arc(from, to, center, radius, sweep)
}

/// Split a circular arc at the negative x axis when its endpoint phases
/// would otherwise be read in the wrong direction.
///
/// `positive` is the SVG sweep flag: true when the angle increases from
/// `from` to `to`.
fn split_circular_arc(
    from: Point,
    to: Point,
    center: Point,
    radius: f64,
    positive: bool,
) -> Vec<Segment> {
    let a = (from - center).phase();
    let b = (to - center).phase();
    if positive == (b >= a) {
        return vec![Segment::arc(from, to, center, radius)];
    }

    // Phase +π exactly, and a point just below the axis at phase near -π
    let nudge = (center.y.abs() + radius) * 1e-12;
    let above = Point::new(center.x - radius, center.y);
    let below = Point::new(center.x - radius, center.y - nudge);
    let (first_end, second_start) = if positive {
        (above, below)
    } else {
        (below, above)
    };

    [(from, first_end), (second_start, to)]
        .into_iter()
        .filter(|(start, end)| !start.approx_eq(end, POINT_EPSILON))
        .map(|(start, end)| Segment::arc(start, end, center, radius))
        .collect()
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE_RE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (caps[1].to_string(), value)
        })
        .collect()
}

/// Read a numeric attribute, ignoring its unit. Missing attributes yield
/// `default`.
fn number_attr(
    element: &str,
    attrs: &HashMap<String, String>,
    name: &str,
    default: f64,
) -> FileFormatResult<f64> {
    let Some(raw) = attrs.get(name) else {
        return Ok(default);
    };
    svgtypes::Length::from_str(raw.trim())
        .map(|length| length.number)
        .map_err(|_| FileFormatError::InvalidAttribute {
            element: element.to_string(),
            attribute: name.to_string(),
            value: raw.clone(),
        })
}

fn line_segments(attrs: &HashMap<String, String>) -> FileFormatResult<Vec<Segment>> {
    let start = Point::new(
        number_attr("line", attrs, "x1", 0.0)?,
        number_attr("line", attrs, "y1", 0.0)?,
    );
    let end = Point::new(
        number_attr("line", attrs, "x2", 0.0)?,
        number_attr("line", attrs, "y2", 0.0)?,
    );
    Ok(vec![Segment::line(start, end)])
}

fn poly_segments(attrs: &HashMap<String, String>, closed: bool) -> Vec<Segment> {
    let points: Vec<Point> = attrs
        .get("points")
        .map(|raw| PointsParser::from(raw.as_str()).map(Point::from).collect())
        .unwrap_or_default();

    let mut segments: Vec<Segment> = points
        .windows(2)
        .map(|pair| Segment::line(pair[0], pair[1]))
        .collect();

    if closed && points.len() > 2 {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            segments.push(Segment::line(last, first));
        }
    }
    segments
}

fn rect_segments(attrs: &HashMap<String, String>) -> FileFormatResult<Vec<Segment>> {
    let x = number_attr("rect", attrs, "x", 0.0)?;
    let y = number_attr("rect", attrs, "y", 0.0)?;
    let width = number_attr("rect", attrs, "width", 0.0)?;
    let height = number_attr("rect", attrs, "height", 0.0)?;

    if width <= 0.0 || height <= 0.0 {
        return Ok(Vec::new());
    }
    if number_attr("rect", attrs, "rx", 0.0)? > 0.0 || number_attr("rect", attrs, "ry", 0.0)? > 0.0
    {
        tracing::warn!("Rounded rectangle corners are not supported; using square corners");
    }

    let corners = [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ];
    Ok((0..4)
        .map(|i| Segment::line(corners[i], corners[(i + 1) % 4]))
        .collect())
}

fn circle_segments(attrs: &HashMap<String, String>) -> FileFormatResult<Vec<Segment>> {
    let center = Point::new(
        number_attr("circle", attrs, "cx", 0.0)?,
        number_attr("circle", attrs, "cy", 0.0)?,
    );
    let r = number_attr("circle", attrs, "r", 0.0)?;
    if r <= 0.0 {
        return Ok(Vec::new());
    }
    Ok(vec![Segment::circle(center, r)])
}

fn ellipse_segments(attrs: &HashMap<String, String>) -> FileFormatResult<Vec<Segment>> {
    let center = Point::new(
        number_attr("ellipse", attrs, "cx", 0.0)?,
        number_attr("ellipse", attrs, "cy", 0.0)?,
    );
    // A single given radius applies to both axes ("auto")
    let (rx, ry) = match (attrs.contains_key("rx"), attrs.contains_key("ry")) {
        (true, false) => {
            let r = number_attr("ellipse", attrs, "rx", 0.0)?;
            (r, r)
        }
        (false, true) => {
            let r = number_attr("ellipse", attrs, "ry", 0.0)?;
            (r, r)
        }
        _ => (
            number_attr("ellipse", attrs, "rx", 0.0)?,
            number_attr("ellipse", attrs, "ry", 0.0)?,
        ),
    };
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(Vec::new());
    }
    Ok(vec![Segment::ellipse(center, rx, ry)])
}
