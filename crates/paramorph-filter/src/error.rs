//! Error types for paramorph-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Configuration does not match the grid it is applied to
    #[error("dimension mismatch: filter configured for {expected} axes, grid has {actual}")]
    DimensionMismatch {
        /// Axes the filter is configured for
        expected: usize,
        /// Axes of the grid
        actual: usize,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
