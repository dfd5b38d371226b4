//! SVG to G-code conversion driver
//!
//! Walks imported paths in document order and runs every segment through
//! classification, transform, flattening and emission. Nothing is
//! reordered; output order equals input order.

use crate::classifier::{classify, Classification};
use crate::emitter::GcodeEmitter;
use crate::error::{CamToolError, CamToolResult, ParameterError};
use crate::flatten::SegmentFlattener;
use crate::svg_import::{ImportedPath, SvgImporter};
use gcodegen_core::{FlattenOptions, Transform, DEFAULT_FEEDRATE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Parameters for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionParameters {
    pub feedrate: f64,
    pub transform: Transform,
    pub flatten: FlattenOptions,
}

impl Default for ConversionParameters {
    fn default() -> Self {
        Self {
            feedrate: DEFAULT_FEEDRATE,
            transform: Transform::identity(),
            flatten: FlattenOptions::default(),
        }
    }
}

impl ConversionParameters {
    /// Validate parameters before a run.
    pub fn validate(&self) -> CamToolResult<()> {
        if !self.feedrate.is_finite() || self.feedrate <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "feedrate".to_string(),
                value: self.feedrate,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            }
            .into());
        }
        Transform::try_new(self.transform.scale, self.transform.offset)?;
        self.flatten.validate()?;
        Ok(())
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub paths: usize,
    pub segments_converted: usize,
    pub zero_length_skipped: usize,
    pub unsupported_skipped: usize,
    /// Output lines, header included
    pub lines_written: usize,
    /// Sum of travel distances over all flattened segments
    pub total_distance: f64,
}

impl ConversionSummary {
    /// Serialize the summary as pretty JSON.
    pub fn to_json(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paths, {} segments converted, {} zero-length skipped, {} unsupported skipped, {} lines, {:.3} mm travelled",
            self.paths,
            self.segments_converted,
            self.zero_length_skipped,
            self.unsupported_skipped,
            self.lines_written,
            self.total_distance
        )
    }
}

/// Converts imported paths into G-code.
#[derive(Debug, Clone)]
pub struct SvgToGcodeConverter {
    params: ConversionParameters,
    flattener: SegmentFlattener,
}

impl SvgToGcodeConverter {
    /// Create a converter, validating `params`.
    pub fn new(params: ConversionParameters) -> CamToolResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            flattener: SegmentFlattener::new(params.flatten),
        })
    }

    /// Convert `paths` and write the G-code to `writer`.
    pub fn convert<W: Write>(
        &self,
        paths: &[ImportedPath],
        writer: W,
    ) -> CamToolResult<ConversionSummary> {
        tracing::info!(
            paths = paths.len(),
            feedrate = self.params.feedrate,
            scale = self.params.transform.scale,
            segments = self.params.flatten.num_segments,
            closed_distance = %self.params.flatten.closed_distance,
            ellipse_mode = %self.params.flatten.ellipse_mode,
            "Starting G-code conversion"
        );

        let mut emitter = GcodeEmitter::new(writer);
        emitter.write_header(self.params.feedrate)?;

        let mut summary = ConversionSummary {
            paths: paths.len(),
            ..ConversionSummary::default()
        };

        for path in paths {
            tracing::debug!(path = %path.label(), segments = path.segments.len(), "Converting path");

            for segment in &path.segments {
                let primitive = match classify(segment) {
                    Classification::Flatten(primitive) => primitive,
                    Classification::ZeroLength => {
                        tracing::trace!(kind = %segment.kind(), "Skipping zero-length segment");
                        summary.zero_length_skipped += 1;
                        continue;
                    }
                    Classification::Unsupported(kind) => {
                        tracing::warn!(path = %path.label(), %kind, "Skipping unsupported segment");
                        summary.unsupported_skipped += 1;
                        continue;
                    }
                };

                let flattened = self
                    .flattener
                    .flatten(&primitive.transformed(&self.params.transform));
                tracing::debug!(
                    kind = %flattened.kind,
                    points = flattened.len(),
                    distance = flattened.total_distance,
                    "Flattened segment"
                );

                emitter.write_segment(&flattened)?;
                summary.segments_converted += 1;
                summary.total_distance += flattened.total_distance;
            }
        }

        summary.lines_written = emitter.lines_written();
        emitter.finish()?;

        tracing::debug!("Conversion finished: {}", summary);
        Ok(summary)
    }

    /// Convert `paths` into a G-code string.
    pub fn convert_to_string(&self, paths: &[ImportedPath]) -> CamToolResult<String> {
        let mut out = Vec::new();
        self.convert(paths, &mut out)?;
        String::from_utf8(out).map_err(|e| CamToolError::GenerationFailed(e.to_string()))
    }

    /// Convert an SVG file and write the G-code to `output`.
    ///
    /// The G-code is written to a temporary file next to `output` and moved
    /// into place only after the run succeeds.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> CamToolResult<ConversionSummary> {
        let output = output.as_ref();
        let paths = SvgImporter::from_file(input.as_ref())?;

        let summary = write_atomically(output, |writer| self.convert(&paths, writer))?;

        tracing::info!(output = %output.display(), "Wrote G-code: {}", summary);
        Ok(summary)
    }
}

/// Run `write` against a temporary file in the directory of `output`, then
/// move it onto `output`. On error the temporary file is removed and
/// `output` is left untouched.
fn write_atomically<T, F>(output: &Path, write: F) -> CamToolResult<T>
where
    F: FnOnce(&mut dyn Write) -> CamToolResult<T>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };
    tmp.persist(output).map_err(|e| CamToolError::IoError(e.error))?;
    Ok(value)
}
