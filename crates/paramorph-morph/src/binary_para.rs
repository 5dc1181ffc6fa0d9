//! Binary dilation by parabolic passes
//!
//! Dilation of a binary grid by a disc/sphere of radius `r` equals
//! thresholding the squared distance to the foreground at `r^2`. The
//! squared distance is produced by separable 1-D parabolic passes, and the
//! passes are short-circuited at `r^2`, so only the neighbourhood within
//! reach of the foreground is resolved.
//!
//! A box (rectangular) structuring element is handled by the same passes,
//! with every axis growing the foreground independently by its own radius.
//!
//! Note that discs and spheres are not drawn with Bresenham's algorithm: a
//! voxel belongs to the structuring element when its *centre* lies within
//! the radius, not when any part of the voxel does.
//!
//! Input samples must be 0/1 (any non-zero sample is taken as foreground).
//!
//! # Pipeline
//!
//! ```text
//! input (binary) -> proximity (circular | rectangular) -> threshold -> output (binary)
//! ```
//!
//! Both proximity/threshold pairs are built once when the filter is created
//! and kept configured; the shape mode at execution time picks one.

use crate::config::DilateParaConfig;
use crate::params::{ParameterStore, ShapeMode};
use crate::{MorphError, MorphResult, StageKind};
use log::debug;
use paramorph_core::BGrid;
use paramorph_filter::{BinaryThreshold, ParabolicMode, ParabolicProximity};
use std::fmt;

/// Binary dilation filter with a circular or rectangular structuring element
///
/// Setters that change the effective behaviour mark the filter stale and
/// bump [`modified_count`](Self::modified_count); setters handed the
/// current value are no-ops. [`update`](Self::update) re-executes only
/// when the filter is stale.
///
/// # Examples
///
/// ```
/// use paramorph_core::BGrid;
/// use paramorph_morph::{BinaryDilatePara, ShapeMode};
///
/// let mut input = BGrid::new(&[5, 5]).unwrap();
/// input.set(&[2, 2], 1).unwrap();
///
/// let mut filter = BinaryDilatePara::new(2);
/// filter.set_radius_scalar(1.0);
/// let plus = filter.generate_data(&input).unwrap();
/// assert_eq!(plus.count_nonzero(), 5);
///
/// filter.set_shape_mode(ShapeMode::Rectangular);
/// let block = filter.update(&input).unwrap();
/// assert_eq!(block.count_nonzero(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryDilatePara {
    params: ParameterStore,
    circ_proximity: ParabolicProximity,
    circ_threshold: BinaryThreshold,
    rect_proximity: ParabolicProximity,
    rect_threshold: BinaryThreshold,
    output: Option<BGrid>,
    stale: bool,
    modified_count: u64,
}

impl BinaryDilatePara {
    /// Create a filter for `ndim`-dimensional grids
    ///
    /// The radius starts at zero on every axis and the shape is circular.
    pub fn new(ndim: usize) -> Self {
        let mut filter = Self {
            params: ParameterStore::new(ndim),
            circ_proximity: ParabolicProximity::new(ndim, ParabolicMode::Euclidean),
            circ_threshold: BinaryThreshold::default(),
            rect_proximity: ParabolicProximity::new(ndim, ParabolicMode::PerAxis),
            rect_threshold: BinaryThreshold::default(),
            output: None,
            stale: true,
            modified_count: 0,
        };
        filter.configure_radius();
        filter.configure_spacing();
        filter.configure_inside_value();
        filter
    }

    /// Create a filter from a configuration
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` if a per-axis radius in the
    /// configuration does not have `ndim` components.
    pub fn from_config(ndim: usize, config: &DilateParaConfig) -> MorphResult<Self> {
        let mut filter = Self::new(ndim);
        filter.apply_config(config)?;
        Ok(filter)
    }

    /// Apply every setting of `config`; returns whether anything changed
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` if a per-axis radius does not
    /// match the filter's number of axes. Nothing is changed in that case.
    pub fn apply_config(&mut self, config: &DilateParaConfig) -> MorphResult<bool> {
        let radius = config.radius.to_axes(self.ndim());
        let radius_changed = self.set_radius(&radius)?;
        let shape_changed = self.set_shape_mode(config.shape);
        let spacing_changed = self.set_use_image_spacing(config.use_image_spacing);
        let inside_changed = self.set_inside_value(config.inside_value);
        Ok(radius_changed || shape_changed || spacing_changed || inside_changed)
    }

    /// Number of axes the filter works on
    pub fn ndim(&self) -> usize {
        self.params.ndim()
    }

    /// Current parameters
    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Radius per axis
    pub fn radius(&self) -> &[f64] {
        self.params.radius()
    }

    /// Set the radius per axis
    ///
    /// Returns `Ok(false)` if the radius is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` if `radius` does not have one
    /// component per axis.
    pub fn set_radius(&mut self, radius: &[f64]) -> MorphResult<bool> {
        let changed = self.params.set_radius(radius)?;
        if changed {
            self.configure_radius();
            self.modified();
        }
        Ok(changed)
    }

    /// Set the same radius on every axis; returns whether it changed
    pub fn set_radius_scalar(&mut self, radius: f64) -> bool {
        let changed = self.params.set_radius_scalar(radius);
        if changed {
            self.configure_radius();
            self.modified();
        }
        changed
    }

    /// Structuring element shape
    pub fn shape_mode(&self) -> ShapeMode {
        self.params.shape_mode()
    }

    /// Select the structuring element shape; returns whether it changed
    pub fn set_shape_mode(&mut self, mode: ShapeMode) -> bool {
        let changed = self.params.set_shape_mode(mode);
        if changed {
            self.modified();
        }
        changed
    }

    /// True when the structuring element is a disc/sphere
    pub fn is_circular(&self) -> bool {
        self.shape_mode() == ShapeMode::Circular
    }

    /// Choose a circular (`true`) or rectangular (`false`) element
    pub fn set_circular(&mut self, circular: bool) -> bool {
        self.set_shape_mode(if circular {
            ShapeMode::Circular
        } else {
            ShapeMode::Rectangular
        })
    }

    /// Shorthand for `set_circular(true)`
    pub fn circular_on(&mut self) -> bool {
        self.set_circular(true)
    }

    /// Shorthand for `set_circular(false)`
    pub fn circular_off(&mut self) -> bool {
        self.set_circular(false)
    }

    /// Whether the radius is measured with the grid's physical spacing
    pub fn use_image_spacing(&self) -> bool {
        self.params.use_image_spacing()
    }

    /// Measure the radius with the grid's physical spacing
    pub fn set_use_image_spacing(&mut self, enable: bool) -> bool {
        let changed = self.params.set_use_image_spacing(enable);
        if changed {
            self.configure_spacing();
            self.modified();
        }
        changed
    }

    /// Value written to foreground output samples
    pub fn inside_value(&self) -> u8 {
        self.params.inside_value()
    }

    /// Set the value written to foreground output samples
    pub fn set_inside_value(&mut self, value: u8) -> bool {
        let changed = self.params.set_inside_value(value);
        if changed {
            self.configure_inside_value();
            self.modified();
        }
        changed
    }

    // ========================================================================
    // Staleness
    // ========================================================================

    /// True when the published output (if any) no longer reflects the
    /// parameters
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of times the filter was marked stale since construction
    ///
    /// Counts effective parameter changes and explicit
    /// [`modified`](Self::modified) calls. Setters handed the current value
    /// and [`take_output`](Self::take_output) do not count.
    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }

    /// Mark the filter stale, e.g. after the caller changed the input
    pub fn modified(&mut self) {
        self.stale = true;
        self.modified_count += 1;
        debug!(
            "BinaryDilatePara modified (#{}): radius {:?}, {:?}",
            self.modified_count,
            self.params.radius(),
            self.params.shape_mode()
        );
    }

    // ========================================================================
    // Stage access
    // ========================================================================

    /// Proximity stage used for `mode`
    pub fn proximity_stage(&self, mode: ShapeMode) -> &ParabolicProximity {
        match mode {
            ShapeMode::Circular => &self.circ_proximity,
            ShapeMode::Rectangular => &self.rect_proximity,
        }
    }

    /// Threshold stage used for `mode`
    pub fn threshold_stage(&self, mode: ShapeMode) -> &BinaryThreshold {
        match mode {
            ShapeMode::Circular => &self.circ_threshold,
            ShapeMode::Rectangular => &self.rect_threshold,
        }
    }

    fn configure_radius(&mut self) {
        let derived = self.params.derived();
        for prox in [&mut self.circ_proximity, &mut self.rect_proximity] {
            prox.set_scale(&derived.scale);
            prox.set_ceiling(Some(derived.ceiling));
        }
        for thresh in [&mut self.circ_threshold, &mut self.rect_threshold] {
            thresh.set_window(derived.lower, derived.upper);
        }
    }

    fn configure_spacing(&mut self) {
        let enable = self.params.use_image_spacing();
        self.circ_proximity.set_use_image_spacing(enable);
        self.rect_proximity.set_use_image_spacing(enable);
    }

    fn configure_inside_value(&mut self) {
        let value = self.params.inside_value();
        for thresh in [&mut self.circ_threshold, &mut self.rect_threshold] {
            thresh.set_inside_value(value);
            thresh.set_outside_value(0);
        }
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run the pipeline for the current shape mode and publish the result
    ///
    /// Any previously published output is discarded first. On failure no
    /// output is published, the filter stays stale and the error names the
    /// stage that raised it.
    ///
    /// # Errors
    ///
    /// Returns `MorphError::Stage` if a stage fails, e.g. when `input` does
    /// not have [`ndim`](Self::ndim) axes.
    pub fn generate_data(&mut self, input: &BGrid) -> MorphResult<&BGrid> {
        self.output = None;
        let out = self.execute(input)?;
        self.stale = false;
        Ok(self.output.insert(out))
    }

    /// Return the published output, re-executing first if the filter is
    /// stale or nothing has been published
    ///
    /// The filter does not track its input; call [`modified`](Self::modified)
    /// after changing it.
    pub fn update(&mut self, input: &BGrid) -> MorphResult<&BGrid> {
        match self.output.take() {
            Some(out) if !self.stale => {
                debug!("BinaryDilatePara up to date, reusing output");
                Ok(self.output.insert(out))
            }
            _ => self.generate_data(input),
        }
    }

    /// The published output, if any
    pub fn output(&self) -> Option<&BGrid> {
        self.output.as_ref()
    }

    /// Take ownership of the published output, leaving the filter stale
    pub fn take_output(&mut self) -> Option<BGrid> {
        let out = self.output.take();
        if out.is_some() {
            self.stale = true;
        }
        out
    }

    /// Route to the stage pair of the current shape mode and run it
    fn execute(&self, input: &BGrid) -> MorphResult<BGrid> {
        let mode = self.params.shape_mode();
        let (proximity, threshold, proximity_kind, threshold_kind) = match mode {
            ShapeMode::Circular => (
                &self.circ_proximity,
                &self.circ_threshold,
                StageKind::CircularProximity,
                StageKind::CircularThreshold,
            ),
            ShapeMode::Rectangular => (
                &self.rect_proximity,
                &self.rect_threshold,
                StageKind::RectangularProximity,
                StageKind::RectangularThreshold,
            ),
        };
        debug!(
            "BinaryDilatePara: {:?} dilation of {:?} grid, radius {:?}, spacing {}",
            mode,
            input.dims(),
            self.params.radius(),
            self.params.use_image_spacing()
        );

        let field = proximity.apply(input).map_err(|source| MorphError::Stage {
            stage: proximity_kind,
            source,
        })?;
        threshold.apply(&field).map_err(|source| MorphError::Stage {
            stage: threshold_kind,
            source,
        })
    }
}

impl fmt::Display for BinaryDilatePara {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BinaryDilatePara")?;
        writeln!(f, "  Radius: {:?}", self.params.radius())?;
        writeln!(f, "  Shape: {:?}", self.params.shape_mode())?;
        writeln!(f, "  UseImageSpacing: {}", self.params.use_image_spacing())?;
        writeln!(f, "  InsideValue: {}", self.params.inside_value())?;
        write!(f, "  Stale: {}", self.stale)
    }
}

/// Dilate a binary grid by a per-axis radius
///
/// One-shot form of [`BinaryDilatePara`].
///
/// # Errors
///
/// Returns `MorphError::InvalidParameters` if `radius` does not have one
/// component per axis of `input`, or a stage error.
pub fn dilate_para(input: &BGrid, radius: &[f64], shape: ShapeMode) -> MorphResult<BGrid> {
    let mut filter = BinaryDilatePara::new(input.ndim());
    filter.set_radius(radius)?;
    filter.set_shape_mode(shape);
    filter.execute(input)
}

/// Dilate a binary grid by the same radius on every axis
pub fn dilate_para_uniform(input: &BGrid, radius: f64, shape: ShapeMode) -> MorphResult<BGrid> {
    let mut filter = BinaryDilatePara::new(input.ndim());
    filter.set_radius_scalar(radius);
    filter.set_shape_mode(shape);
    filter.execute(input)
}
