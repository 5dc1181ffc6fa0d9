//! Binary thresholding of real-valued grids
//!
//! Finite samples inside the closed window `[lower, upper]` become the
//! inside value. Everything else, including NaN and infinities, becomes the
//! outside value, so an infinite bound never admits an unreached sample.

use crate::{FilterError, FilterResult};
use paramorph_core::{BGrid, FGrid};

/// Threshold a real-valued grid into a binary grid
///
/// # Examples
///
/// ```
/// use paramorph_core::FGrid;
/// use paramorph_filter::BinaryThreshold;
///
/// let field = FGrid::from_data(&[4], vec![0.0, 1.0, 4.0, f64::INFINITY]).unwrap();
/// let out = BinaryThreshold::new(0.0, 1.0).apply(&field).unwrap();
/// assert_eq!(out.data(), &[1, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryThreshold {
    lower: f64,
    upper: f64,
    inside_value: u8,
    outside_value: u8,
}

impl Default for BinaryThreshold {
    /// Window covering every finite value, inside 1, outside 0
    fn default() -> Self {
        Self {
            lower: f64::MIN,
            upper: f64::MAX,
            inside_value: 1,
            outside_value: 0,
        }
    }
}

impl BinaryThreshold {
    /// Create a threshold with the window `[lower, upper]`
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }

    /// Lower bound of the window (inclusive)
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound of the window (inclusive)
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Set both window bounds
    pub fn set_window(&mut self, lower: f64, upper: f64) {
        self.lower = lower;
        self.upper = upper;
    }

    /// Value written for samples inside the window
    pub fn inside_value(&self) -> u8 {
        self.inside_value
    }

    /// Set the value written for samples inside the window
    pub fn set_inside_value(&mut self, value: u8) {
        self.inside_value = value;
    }

    /// Value written for samples outside the window
    pub fn outside_value(&self) -> u8 {
        self.outside_value
    }

    /// Set the value written for samples outside the window
    pub fn set_outside_value(&mut self, value: u8) {
        self.outside_value = value;
    }

    /// Binarize `input`
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidParameters` if `lower > upper` or either
    /// bound is NaN.
    pub fn apply(&self, input: &FGrid) -> FilterResult<BGrid> {
        if !(self.lower <= self.upper) {
            return Err(FilterError::InvalidParameters(format!(
                "threshold window [{}, {}] is empty",
                self.lower, self.upper
            )));
        }

        let (lower, upper) = (self.lower, self.upper);
        let (inside, outside) = (self.inside_value, self.outside_value);
        Ok(input.map(|v| {
            if v.is_finite() && v >= lower && v <= upper {
                inside
            } else {
                outside
            }
        }))
    }
}
