//! JSON configuration for the dilation filter
//!
//! ```json
//! {
//!   "radius": [3.0, 1.5],
//!   "shape": "rectangular",
//!   "use_image_spacing": true,
//!   "inside_value": 255
//! }
//! ```
//!
//! Every field is optional. `radius` is either a single number applied to
//! all axes or one number per axis.

use crate::params::ShapeMode;
use crate::{MorphError, MorphResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Radius as written in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RadiusSpec {
    /// Same radius on every axis
    Uniform(f64),
    /// One radius per axis
    PerAxis(Vec<f64>),
}

impl Default for RadiusSpec {
    fn default() -> Self {
        RadiusSpec::Uniform(0.0)
    }
}

impl RadiusSpec {
    /// Expand to one component per axis
    ///
    /// A per-axis radius is returned as written; its length is checked when
    /// it is handed to the filter.
    pub fn to_axes(&self, ndim: usize) -> Vec<f64> {
        match self {
            RadiusSpec::Uniform(r) => vec![*r; ndim],
            RadiusSpec::PerAxis(radii) => radii.clone(),
        }
    }
}

/// Settings of [`BinaryDilatePara`](crate::BinaryDilatePara)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DilateParaConfig {
    /// Structuring element radius
    pub radius: RadiusSpec,
    /// Structuring element shape
    pub shape: ShapeMode,
    /// Measure the radius with the grid's physical spacing
    pub use_image_spacing: bool,
    /// Value written to foreground output samples
    pub inside_value: u8,
}

impl Default for DilateParaConfig {
    fn default() -> Self {
        Self {
            radius: RadiusSpec::default(),
            shape: ShapeMode::Circular,
            use_image_spacing: false,
            inside_value: 1,
        }
    }
}

impl DilateParaConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> MorphResult<Self> {
        serde_json::from_str(json).map_err(|e| MorphError::Config(e.to_string()))
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json_string(&self) -> MorphResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MorphError::Config(e.to_string()))
    }
}

/// Load a configuration from a JSON file
///
/// # Errors
///
/// Returns `MorphError::Config` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> MorphResult<DilateParaConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| MorphError::Config(format!("{}: {}", path.display(), e)))?;
    DilateParaConfig::from_json_str(&text)
}
