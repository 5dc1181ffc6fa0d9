//! Error types for paramorph-morph

use paramorph_filter::FilterError;
use std::fmt;
use thiserror::Error;

/// Internal stage of the dilation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Proximity field for disc/sphere reach
    CircularProximity,
    /// Threshold paired with [`StageKind::CircularProximity`]
    CircularThreshold,
    /// Proximity field for box reach
    RectangularProximity,
    /// Threshold paired with [`StageKind::RectangularProximity`]
    RectangularThreshold,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::CircularProximity => "circular proximity",
            StageKind::CircularThreshold => "circular threshold",
            StageKind::RectangularProximity => "rectangular proximity",
            StageKind::RectangularThreshold => "rectangular threshold",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// An internal stage failed; the error is passed through unchanged
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Which stage raised the error
        stage: StageKind,
        /// The stage's own error
        #[source]
        source: FilterError,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl MorphError {
    /// The stage that failed, if this is a stage error
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            MorphError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
