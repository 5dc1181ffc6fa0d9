//! Error types for paramorph-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// paramorph-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid grid dimensions (no axes, or an axis of extent zero)
    #[error("invalid grid dimensions: {0:?}")]
    InvalidDimension(Vec<usize>),

    /// Index out of bounds
    #[error("index out of bounds: {index:?} in grid of {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// Incompatible grid shapes
    #[error("incompatible grid shapes: {0:?} vs {1:?}")]
    IncompatibleShapes(Vec<usize>, Vec<usize>),

    /// Number of axes does not match
    #[error("dimension mismatch: expected {expected} axes, got {actual}")]
    AxisCountMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized grid could not be decoded
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Result type alias for paramorph-core operations
pub type Result<T> = std::result::Result<T, Error>;
