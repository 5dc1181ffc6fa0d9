//! paramorph-filter - Grid filters used by the parabolic morphology pipeline
//!
//! This crate provides the two building blocks binary dilation is composed
//! from:
//!
//! - Separable parabolic passes producing a short-circuited squared-distance
//!   field ([`ParabolicProximity`])
//! - Binary thresholding of a real-valued field ([`BinaryThreshold`])

mod error;
pub mod parabolic;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use parabolic::{ParabolicMode, ParabolicProximity, lower_envelope};
pub use threshold::BinaryThreshold;
