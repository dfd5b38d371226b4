//! Error handling for gcodegen
//!
//! Geometry errors cover invalid transforms and sampling parameters. They
//! are detected before any toolpath is produced.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Represents invalid geometric input detected before any toolpath is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Scale factor is zero, negative or not a finite number
    #[error("Invalid scale factor: {scale} (must be a finite value > 0)")]
    InvalidScale {
        /// The rejected scale factor.
        scale: f64,
    },

    /// Offset component is not a finite number
    #[error("Invalid offset: ({x}, {y})")]
    InvalidOffset {
        /// The X component of the offset.
        x: f64,
        /// The Y component of the offset.
        y: f64,
    },

    /// Curves cannot be sampled with zero steps
    #[error("Number of segments must be at least 1")]
    ZeroSegments,

    /// Step count above the supported maximum
    #[error("Number of segments {num_segments} exceeds the maximum of {max}")]
    TooManySegments {
        /// The rejected step count.
        num_segments: usize,
        /// The largest accepted step count.
        max: usize,
    },
}

/// Result type using GeometryError
pub type Result<T> = std::result::Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::InvalidScale { scale: 0.0 };
        assert_eq!(
            err.to_string(),
            "Invalid scale factor: 0 (must be a finite value > 0)"
        );

        let err = GeometryError::ZeroSegments;
        assert_eq!(err.to_string(), "Number of segments must be at least 1");

        let err = GeometryError::TooManySegments {
            num_segments: 2_000_000,
            max: 1_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Number of segments 2000000 exceeds the maximum of 1000000"
        );
    }
}
