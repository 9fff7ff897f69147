use thiserror::Error;

use crate::shapefile::ShapeType;

/// The coarse category an error belongs to.
///
/// Every [`GeokitError`] variant maps to exactly one kind, see [`GeokitError::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid required input.
    Argument,
    /// Malformed or grammatically invalid text input.
    Parse,
    /// Malformed binary structure.
    Format,
    /// Structurally valid input that is not handled.
    Unsupported,
    /// Input outside a documented domain.
    OutOfRange,
    /// Illegal call sequence or numerical failure.
    InvalidOperation,
    /// Failure of the underlying stream.
    Io,
}

#[derive(Debug, Error)]
pub enum GeokitError {
    #[error("IO error: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("Invalid argument '{argument}': {msg}")]
    InvalidArgument { argument: &'static str, msg: String },
    #[error("Required parameter '{0}' is missing")]
    MissingParameter(String),
    #[error("Invalid geometry: {msg}")]
    InvalidGeometry { msg: String },
    #[error("Expected {expected} but encountered '{found}'")]
    ParseError { expected: String, found: String },
    #[error("Invalid {format} data: {msg}")]
    InvalidFormat { format: &'static str, msg: String },
    #[error("Attempting to load a non-{expected} as {expected} (found {found:?})")]
    ShapeTypeMismatch {
        expected: ShapeType,
        found: ShapeType,
    },
    #[error("Unsupported geometry type: '{0}'")]
    UnsupportedGeometryType(&'static str),
    #[error("Do not know how to handle field type '{field_type}' of field '{field_name}'")]
    UnsupportedFieldType { field_type: char, field_name: String },
    #[error("Unsupported shape type: {0:?}")]
    UnsupportedShapeType(ShapeType),
    #[error("Unsupported projection: '{0}'")]
    UnsupportedProjection(String),
    #[error("Value {value} for '{name}' is out of range: {msg}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        msg: String,
    },
    #[error("Invalid operation in '{method_name}': {msg}")]
    InvalidOperation {
        method_name: &'static str,
        msg: String,
    },
    #[error("No convergence in '{method_name}' after {iterations} iterations")]
    NoConvergence {
        method_name: &'static str,
        iterations: usize,
    },
}

impl GeokitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeokitError::IoError(_) => ErrorKind::Io,
            GeokitError::InvalidArgument { .. }
            | GeokitError::MissingParameter(_)
            | GeokitError::InvalidGeometry { .. } => ErrorKind::Argument,
            GeokitError::ParseError { .. } => ErrorKind::Parse,
            GeokitError::InvalidFormat { .. } | GeokitError::ShapeTypeMismatch { .. } => {
                ErrorKind::Format
            }
            GeokitError::UnsupportedGeometryType(_)
            | GeokitError::UnsupportedFieldType { .. }
            | GeokitError::UnsupportedShapeType(_)
            | GeokitError::UnsupportedProjection(_) => ErrorKind::Unsupported,
            GeokitError::OutOfRange { .. } => ErrorKind::OutOfRange,
            GeokitError::InvalidOperation { .. } | GeokitError::NoConvergence { .. } => {
                ErrorKind::InvalidOperation
            }
        }
    }

    pub(crate) fn parse(expected: impl Into<String>, found: impl Into<String>) -> Self {
        GeokitError::ParseError {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn format(format: &'static str, msg: impl Into<String>) -> Self {
        GeokitError::InvalidFormat {
            format,
            msg: msg.into(),
        }
    }
}

/// Convenience [`Result`] alias with [`GeokitError`] as the error type.
pub type Result<T> = std::result::Result<T, GeokitError>;
