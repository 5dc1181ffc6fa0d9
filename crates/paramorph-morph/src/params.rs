//! Dilation parameters
//!
//! [`ParameterStore`] owns everything a caller can set on the dilation
//! filter and keeps the values derived from the radius (per-axis scale,
//! short-circuit ceiling, threshold window) in step with it.
//!
//! # Radius normalization
//!
//! All distances are expressed relative to the *reference radius*, the
//! smallest finite positive axis radius `r_ref`. Axis `k` is scaled by
//! `r_ref / r_k <= 1`, so "within `r_k` along axis `k`" always reads as
//! "proximity <= r_ref^2". With equal radii the scale is 1 and the
//! proximity field is the plain squared distance. With unequal radii a
//! circular dilation reaches the axis-aligned ellipsoid with semi-axes
//! `r_k`.
//!
//! Scales never exceed 1, so squared weights cannot overflow. A reference
//! radius too large to square gives an infinite ceiling: every sample that
//! foreground reaches along the unfrozen axes is inside, and an empty grid
//! stays empty.
//!
//! Axes whose radius is zero, negative, NaN or infinite are frozen: the
//! foreground does not grow along them.

use crate::{MorphError, MorphResult};
use serde::{Deserialize, Serialize};

/// Relative slack on the threshold window and ceiling, absorbing rounding
/// in the radius normalization
///
/// A few ulps: far below the gap between neighbouring squared distances
/// for any radius whose square is exact in `f64`.
pub const WINDOW_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Shape of the structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Disc / sphere (ellipsoid when radii differ)
    #[default]
    Circular,
    /// Axis-aligned box
    Rectangular,
}

/// Values derived from the radius vector
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedParameters {
    /// Per-axis distance scale handed to the proximity stages
    /// (`f64::INFINITY` marks a frozen axis)
    pub scale: Vec<f64>,
    /// Smallest finite positive axis radius, 0 if there is none
    pub reference_radius: f64,
    /// Short-circuit ceiling for the proximity stages
    pub ceiling: f64,
    /// Lower bound of the threshold window
    pub lower: f64,
    /// Upper bound of the threshold window
    pub upper: f64,
}

fn usable(r: f64) -> bool {
    r.is_finite() && r > 0.0
}

/// Derive scale, ceiling and threshold window from a radius vector
pub fn derive_parameters(radius: &[f64]) -> DerivedParameters {
    let reference = radius
        .iter()
        .copied()
        .filter(|&r| usable(r))
        .reduce(f64::min)
        .unwrap_or(0.0);
    let scale = radius
        .iter()
        .map(|&r| {
            if usable(r) {
                // Underflow would read as an invalid scale
                (reference / r).max(f64::MIN_POSITIVE)
            } else {
                f64::INFINITY
            }
        })
        .collect();
    let upper = reference * reference * (1.0 + WINDOW_TOLERANCE);

    DerivedParameters {
        scale,
        reference_radius: reference,
        ceiling: upper,
        lower: 0.0,
        upper,
    }
}

/// Parameters of the dilation filter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    radius: Vec<f64>,
    shape_mode: ShapeMode,
    use_image_spacing: bool,
    inside_value: u8,
    derived: DerivedParameters,
}

impl ParameterStore {
    /// Create parameters for `ndim` axes: zero radius, circular, no
    /// spacing, inside value 1
    pub fn new(ndim: usize) -> Self {
        let radius = vec![0.0; ndim];
        let derived = derive_parameters(&radius);
        Self {
            radius,
            shape_mode: ShapeMode::Circular,
            use_image_spacing: false,
            inside_value: 1,
            derived,
        }
    }

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.radius.len()
    }

    /// Radius per axis
    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    /// Replace the radius vector
    ///
    /// Returns `Ok(false)` without touching anything when the new radius
    /// equals the current one (NaN components compare equal to themselves).
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` if `radius` does not have one
    /// component per axis.
    pub fn set_radius(&mut self, radius: &[f64]) -> MorphResult<bool> {
        if radius.len() != self.radius.len() {
            return Err(MorphError::InvalidParameters(format!(
                "radius has {} components, filter has {} axes",
                radius.len(),
                self.radius.len()
            )));
        }
        let unchanged = self
            .radius
            .iter()
            .zip(radius)
            .all(|(a, b)| a.to_bits() == b.to_bits());
        if unchanged {
            return Ok(false);
        }
        self.radius.copy_from_slice(radius);
        self.derived = derive_parameters(&self.radius);
        Ok(true)
    }

    /// Set the same radius on every axis
    pub fn set_radius_scalar(&mut self, radius: f64) -> bool {
        let broadcast = vec![radius; self.radius.len()];
        // Length always matches
        self.set_radius(&broadcast).unwrap_or(false)
    }

    /// Structuring element shape
    pub fn shape_mode(&self) -> ShapeMode {
        self.shape_mode
    }

    /// Set the structuring element shape; returns whether it changed
    pub fn set_shape_mode(&mut self, mode: ShapeMode) -> bool {
        let changed = self.shape_mode != mode;
        self.shape_mode = mode;
        changed
    }

    /// Whether proximity is measured in physical units
    pub fn use_image_spacing(&self) -> bool {
        self.use_image_spacing
    }

    /// Measure proximity in physical units; returns whether it changed
    pub fn set_use_image_spacing(&mut self, enable: bool) -> bool {
        let changed = self.use_image_spacing != enable;
        self.use_image_spacing = enable;
        changed
    }

    /// Value written to foreground output samples
    pub fn inside_value(&self) -> u8 {
        self.inside_value
    }

    /// Set the foreground output value; returns whether it changed
    pub fn set_inside_value(&mut self, value: u8) -> bool {
        let changed = self.inside_value != value;
        self.inside_value = value;
        changed
    }

    /// Scale, ceiling and window derived from the current radius
    pub fn derived(&self) -> &DerivedParameters {
        &self.derived
    }
}
