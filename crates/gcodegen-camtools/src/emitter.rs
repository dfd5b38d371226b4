//! Toolpath Emitter
//!
//! Serializes flattened segments into G-code text. The line format is a
//! fixed interface for downstream tooling:
//!
//! ```text
//! G21 ; Set units to millimeters
//! G1 F<feedrate> ; Set feedrate
//! G1 X<x:.3> Y<y:.3> Z0 ; Travel distance: <d:.3>
//! ```

use crate::error::{CamToolError, CamToolResult};
use crate::flatten::FlattenedSegment;
use gcodegen_core::MotionPoint;
use std::io::Write;

/// Unit declaration, always the first line of the output.
pub const UNITS_LINE: &str = "G21 ; Set units to millimeters";

/// Feedrate declaration, the second line of the output.
pub fn feedrate_line(feedrate: f64) -> String {
    format!("G1 F{} ; Set feedrate", feedrate)
}

/// Format one linear move. `annotated` appends the travel distance comment.
pub fn format_motion(point: &MotionPoint, annotated: bool) -> String {
    if annotated {
        format!(
            "G1 X{:.3} Y{:.3} Z0 ; Travel distance: {:.3}",
            point.x, point.y, point.travel_distance
        )
    } else {
        format!("G1 X{:.3} Y{:.3} Z0", point.x, point.y)
    }
}

/// Writes G-code lines to a sink in arrival order.
#[derive(Debug)]
pub struct GcodeEmitter<W: Write> {
    writer: W,
    header_written: bool,
    lines_written: usize,
}

impl<W: Write> GcodeEmitter<W> {
    /// Create an emitter over `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            lines_written: 0,
        }
    }

    /// Write the unit and feedrate header. Allowed exactly once, before any
    /// motion line.
    pub fn write_header(&mut self, feedrate: f64) -> CamToolResult<()> {
        if self.header_written {
            return Err(CamToolError::GenerationFailed(
                "header already written".to_string(),
            ));
        }
        self.write_line(UNITS_LINE)?;
        self.write_line(&feedrate_line(feedrate))?;
        self.header_written = true;
        Ok(())
    }

    /// Write every motion point of `segment`, contiguously.
    ///
    /// Returns the number of lines written.
    pub fn write_segment(&mut self, segment: &FlattenedSegment) -> CamToolResult<usize> {
        if !self.header_written {
            return Err(CamToolError::GenerationFailed(
                "motion line before header".to_string(),
            ));
        }
        for point in &segment.points {
            self.write_line(&format_motion(point, segment.annotated))?;
        }
        Ok(segment.points.len())
    }

    /// Total lines written so far, header included.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> CamToolResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_line(&mut self, line: &str) -> CamToolResult<()> {
        writeln!(self.writer, "{}", line)?;
        self.lines_written += 1;
        Ok(())
    }
}
