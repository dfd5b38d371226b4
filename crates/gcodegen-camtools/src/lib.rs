//! # gcodegen CAM Tools
//!
//! This crate turns vector paths into linear G-code motion for CNC machines.
//!
//! ## Pipeline
//!
//! - **SVG Import**: Reads `<path>`, `<line>`, `<polyline>`, `<polygon>`, `<rect>`,
//!   `<circle>` and `<ellipse>` elements into typed segments
//! - **Classifier**: Maps each segment onto a flattening algorithm, or skips it
//! - **Flattener**: Samples lines, arcs, circles and ellipses into motion points
//! - **Emitter**: Writes the G-code header and one `G1` move per motion point
//! - **Converter**: Drives the pipeline in document order and reports a summary

pub mod classifier;
pub mod converter;
pub mod emitter;
pub mod error;
pub mod flatten;
pub mod segment;
pub mod svg_import;

// Re-export commonly used items
pub use classifier::{classify, Classification, Primitive, CIRCLE_TOLERANCE};
pub use converter::{ConversionParameters, ConversionSummary, SvgToGcodeConverter};
pub use emitter::GcodeEmitter;
pub use error::{CamToolError, CamToolResult, FileFormatError, FileFormatResult, ParameterError};
pub use flatten::{ArcDirection, FlattenedSegment, PrimitiveKind, SegmentFlattener};
pub use segment::{ClosedCurve, Segment, SegmentKind};
pub use svg_import::{ImportedPath, SvgImporter};
