use gcodegen_camtools::{
    CamToolError, ConversionParameters, FileFormatError, SvgImporter, SvgToGcodeConverter,
};
use gcodegen_core::{FlattenOptions, Point, Transform};
use std::fs;
use tempfile::tempdir;

const SHAPES_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100mm" height="100mm" viewBox="0 0 100 100">
  <line x1="0" y1="0" x2="10" y2="0" stroke="black"/>
  <path d="M 15 0 A 5 5 0 0 1 10 5 Q 12 12 14 14"/>
  <circle cx="50" cy="50" r="10"/>
  <ellipse cx="20" cy="80" rx="8" ry="4"/>
</svg>
"#;

fn converter(segments: usize) -> SvgToGcodeConverter {
    SvgToGcodeConverter::new(ConversionParameters {
        flatten: FlattenOptions::with_segments(segments),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_shapes_conversion() {
    let paths = SvgImporter::parse_str(SHAPES_SVG).unwrap();
    assert_eq!(paths.len(), 4);

    let mut out = Vec::new();
    let summary = converter(8).convert(&paths, &mut out).unwrap();
    let gcode = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = gcode.lines().collect();

    assert_eq!(lines[0], "G21 ; Set units to millimeters");
    assert_eq!(lines[1], "G1 F100 ; Set feedrate");
    assert_eq!(lines[2], "G1 X0.000 Y0.000 Z0");
    assert_eq!(lines[3], "G1 X10.000 Y0.000 Z0");

    // line 2 + arc 8 + circle 9 + ellipse 9, quadratic skipped
    assert_eq!(summary.segments_converted, 4);
    assert_eq!(summary.unsupported_skipped, 1);
    assert_eq!(lines.len(), 2 + 2 + 8 + 9 + 9);
    assert_eq!(summary.lines_written, lines.len());

    let annotated = lines
        .iter()
        .filter(|l| l.contains("; Travel distance: "))
        .count();
    assert_eq!(annotated, 8 + 9 + 9);

    // Arc ends on its endpoint
    assert_eq!(lines[11], "G1 X10.000 Y5.000 Z0 ; Travel distance: 0.980");
}

#[test]
fn test_conversion_is_idempotent() {
    let paths = SvgImporter::parse_str(SHAPES_SVG).unwrap();
    let conv = converter(32);
    let first = conv.convert_to_string(&paths).unwrap();
    let second = conv.convert_to_string(&paths).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_transform_applies_to_every_primitive() {
    let doc = r#"<svg><line x1="0" y1="0" x2="5" y2="0"/><circle cx="0" cy="0" r="1"/></svg>"#;
    let paths = SvgImporter::parse_str(doc).unwrap();
    let conv = SvgToGcodeConverter::new(ConversionParameters {
        transform: Transform::new(2.0, Point::new(10.0, 10.0)),
        flatten: FlattenOptions::with_segments(4),
        ..Default::default()
    })
    .unwrap();
    let gcode = conv.convert_to_string(&paths).unwrap();
    let lines: Vec<&str> = gcode.lines().collect();

    assert_eq!(lines[2], "G1 X10.000 Y10.000 Z0");
    assert_eq!(lines[3], "G1 X20.000 Y10.000 Z0");
    // Circle of radius 2 around the offset center
    assert_eq!(lines[4], "G1 X12.000 Y10.000 Z0 ; Travel distance: 2.000");
    assert_eq!(lines[8], "G1 X12.000 Y10.000 Z0 ; Travel distance: 2.000");
}

#[test]
fn test_zero_length_segments_produce_nothing() {
    let doc = r#"<svg><path d="M 1 1 L 1 1 L 1 1"/></svg>"#;
    let paths = SvgImporter::parse_str(doc).unwrap();
    let mut out = Vec::new();
    let summary = converter(10).convert(&paths, &mut out).unwrap();

    assert_eq!(summary.zero_length_skipped, 2);
    assert_eq!(summary.total_distance, 0.0);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
}

#[test]
fn test_convert_file_writes_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shapes.svg");
    let output = dir.path().join("shapes.gcode");
    fs::write(&input, SHAPES_SVG).unwrap();

    let summary = converter(8).convert_file(&input, &output).unwrap();
    let gcode = fs::read_to_string(&output).unwrap();
    assert_eq!(gcode.lines().count(), summary.lines_written);
    assert!(gcode.starts_with("G21 ; Set units to millimeters\n"));

    // Only the input and the output remain in the directory
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_failed_conversion_leaves_no_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.svg");
    let output = dir.path().join("broken.gcode");
    fs::write(&input, r#"<svg><path d="M 0 0 L oops"/></svg>"#).unwrap();

    let err = converter(8).convert_file(&input, &output).unwrap_err();
    assert!(matches!(
        err,
        CamToolError::FileFormat(FileFormatError::InvalidPathData { .. })
    ));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_and_wrong_input() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.gcode");

    let err = converter(8)
        .convert_file(dir.path().join("missing.svg"), &output)
        .unwrap_err();
    assert!(matches!(
        err,
        CamToolError::FileFormat(FileFormatError::NotFound(_))
    ));

    let txt = dir.path().join("drawing.txt");
    fs::write(&txt, "<svg/>").unwrap();
    let err = converter(8).convert_file(&txt, &output).unwrap_err();
    assert!(matches!(
        err,
        CamToolError::FileFormat(FileFormatError::UnknownExtension(_))
    ));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("line.svg");
    let output = dir.path().join("line.gcode");
    fs::write(&input, r#"<svg><line x1="0" y1="0" x2="1" y2="0"/></svg>"#).unwrap();
    fs::write(&output, "stale").unwrap();

    converter(8).convert_file(&input, &output).unwrap();
    let gcode = fs::read_to_string(&output).unwrap();
    assert!(!gcode.contains("stale"));
    assert!(gcode.ends_with("G1 X1.000 Y0.000 Z0\n"));
}

fn motion_xy(line: &str) -> (f64, f64) {
    let mut words = line.split_whitespace().skip(1);
    let x = words.next().unwrap()[1..].parse().unwrap();
    let y = words.next().unwrap()[1..].parse().unwrap();
    (x, y)
}

#[test]
fn test_arc_through_negative_x_axis_follows_sweep() {
    let doc = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 5 0 A 5 5 0 0 0 0 5"/></svg>"#;
    let paths = SvgImporter::parse_str(doc).unwrap();

    let mut out = Vec::new();
    let summary = converter(100).convert(&paths, &mut out).unwrap();
    let gcode = String::from_utf8(out).unwrap();

    // A quarter circle of radius 5, not the complementary three quarters
    let quarter = 5.0 * std::f64::consts::PI / 2.0;
    assert!(
        (summary.total_distance - quarter).abs() < 0.01,
        "travelled {}",
        summary.total_distance
    );

    let points: Vec<(f64, f64)> = gcode.lines().skip(2).map(motion_xy).collect();
    assert!(!points.is_empty());
    for &(x, y) in &points {
        assert!(x <= 5.0 + 1e-3 && y <= 5.0 + 1e-3, "strayed to ({}, {})", x, y);
    }
    let (x, y) = *points.last().unwrap();
    assert!(x.abs() < 1e-3 && (y - 5.0).abs() < 1e-3);
}
