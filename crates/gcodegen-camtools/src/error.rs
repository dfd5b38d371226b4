//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for conversion parameters,
//! SVG import and G-code output.

use gcodegen_core::GeometryError;
use std::io;
use thiserror::Error;

/// Errors that can occur during SVG to G-code conversion.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid transform or sampling parameters.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A file format error occurred.
    #[error("File format error: {0}")]
    FileFormat(#[from] FileFormatError),
}

/// Errors related to conversion parameter validation.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to reading the vector input.
#[derive(Error, Debug)]
pub enum FileFormatError {
    /// The SVG document could not be parsed.
    #[error("SVG parse error: {0}")]
    SvgParseError(String),

    /// Path data inside an element is malformed.
    #[error("Invalid path data in <{element}>: {reason}")]
    InvalidPathData { element: String, reason: String },

    /// A numeric attribute could not be read.
    #[error("Invalid attribute '{attribute}' on <{element}>: {value}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// The input file does not exist or is not a regular file.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The file extension is not recognized.
    #[error("Unknown file extension: {0}")]
    UnknownExtension(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for file format operations.
pub type FileFormatResult<T> = Result<T, FileFormatError>;
