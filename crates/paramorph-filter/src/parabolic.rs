//! Separable parabolic passes
//!
//! The squared Euclidean distance to the nearest foreground sample can be
//! computed one axis at a time: along each 1-D line the result is the lower
//! envelope of parabolas `f(q) + (w * (p - q))^2` rooted at every sample `q`,
//! where `f` is the field produced by the previous axis (0 on foreground,
//! infinity elsewhere, for the first axis).
//!
//! # Algorithm
//!
//! The envelope of a line of `n` samples is built in `O(n)` by keeping a
//! stack of the parabolas that are minimal somewhere, together with the
//! abscissa where each one takes over from its predecessor. A new parabola
//! pops every stacked parabola whose takeover point lies to the right of
//! its own intersection with the new one.
//!
//! # Short-circuiting
//!
//! With a ceiling configured, samples whose value already exceeds the ceiling
//! never enter the envelope, and results above the ceiling are stored as
//! infinity. Only the neighbourhood within the ceiling is ever resolved, so a
//! dilation by radius `r` only pays for distances up to `r`.
//!
//! # Reference
//!
//! P. Felzenszwalb, D. Huttenlocher, "Distance Transforms of Sampled
//! Functions", and R. Beare, "Morphology with parabolic structuring elements".

use crate::{FilterError, FilterResult};
use log::trace;
use paramorph_core::{BGrid, FGrid, Grid};

/// How consecutive axis passes are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParabolicMode {
    /// Each pass consumes the previous pass's distances, producing the
    /// combined squared Euclidean distance (disc/sphere reach)
    #[default]
    Euclidean,
    /// Each pass after the first re-binarizes its input at the ceiling, so
    /// every axis grows the reached set independently (box reach)
    PerAxis,
}

/// Squared-distance proximity field computed by separable parabolic passes
///
/// The distance along axis `k` between samples `p` and `q` is
/// `|p - q| * scale[k]`, multiplied by the grid spacing along `k` when
/// image spacing is in use.
///
/// A scale of `f64::INFINITY` freezes its axis: no pass runs along it and
/// nothing grows in that direction.
///
/// # Examples
///
/// ```
/// use paramorph_core::BGrid;
/// use paramorph_filter::{ParabolicMode, ParabolicProximity};
///
/// let mut input = BGrid::new(&[7]).unwrap();
/// input.set(&[3], 1).unwrap();
///
/// let mut prox = ParabolicProximity::new(1, ParabolicMode::Euclidean);
/// prox.set_ceiling(Some(4.0));
/// let field = prox.apply(&input).unwrap();
/// let inf = f64::INFINITY;
/// assert_eq!(field.data(), &[inf, 4.0, 1.0, 0.0, 1.0, 4.0, inf]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParabolicProximity {
    scale: Vec<f64>,
    use_image_spacing: bool,
    ceiling: Option<f64>,
    mode: ParabolicMode,
}

impl ParabolicProximity {
    /// Create a stage for `ndim`-dimensional grids with unit scale,
    /// no spacing and no ceiling
    pub fn new(ndim: usize, mode: ParabolicMode) -> Self {
        Self {
            scale: vec![1.0; ndim],
            use_image_spacing: false,
            ceiling: None,
            mode,
        }
    }

    /// Per-axis distance scale
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Set the per-axis distance scale
    ///
    /// Values are validated when the stage is applied.
    pub fn set_scale(&mut self, scale: &[f64]) {
        self.scale = scale.to_vec();
    }

    /// Whether grid spacing multiplies the per-axis scale
    pub fn use_image_spacing(&self) -> bool {
        self.use_image_spacing
    }

    /// Enable or disable use of the grid spacing
    pub fn set_use_image_spacing(&mut self, enable: bool) {
        self.use_image_spacing = enable;
    }

    /// Short-circuit ceiling, if any
    pub fn ceiling(&self) -> Option<f64> {
        self.ceiling
    }

    /// Set the short-circuit ceiling; `None` computes the full transform
    pub fn set_ceiling(&mut self, ceiling: Option<f64>) {
        self.ceiling = ceiling;
    }

    /// Pass combination mode
    pub fn mode(&self) -> ParabolicMode {
        self.mode
    }

    /// Compute the proximity field of a binary grid
    ///
    /// Non-zero samples are foreground (distance 0).
    ///
    /// # Errors
    ///
    /// - `FilterError::DimensionMismatch` if the scale has a different number
    ///   of axes than the grid
    /// - `FilterError::InvalidParameters` if a scale component is zero,
    ///   negative, NaN or negative infinity
    pub fn apply(&self, input: &BGrid) -> FilterResult<FGrid> {
        let field = input
            .data()
            .iter()
            .map(|&v| if v != 0 { 0.0 } else { f64::INFINITY })
            .collect();
        self.run(input, field)
    }

    /// Compute the proximity field of a real-valued grid
    ///
    /// Each sample is taken as the initial distance at that position, so
    /// feeding back a previous result continues the transform.
    pub fn apply_field(&self, input: &FGrid) -> FilterResult<FGrid> {
        let field = input.data().to_vec();
        self.run(input, field)
    }

    /// Squared weight per axis; `None` marks a frozen axis
    ///
    /// A weight whose square overflows reaches no neighbour and freezes its
    /// axis. One whose square underflows to zero reaches the whole line.
    fn axis_weights<T: Copy>(&self, input: &Grid<T>) -> FilterResult<Vec<Option<f64>>> {
        if self.scale.len() != input.ndim() {
            return Err(FilterError::DimensionMismatch {
                expected: self.scale.len(),
                actual: input.ndim(),
            });
        }

        self.scale
            .iter()
            .zip(input.spacing())
            .enumerate()
            .map(|(axis, (&scale, &spacing))| {
                if scale == f64::INFINITY {
                    return Ok(None);
                }
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(FilterError::InvalidParameters(format!(
                        "scale for axis {axis} must be positive, got {scale}"
                    )));
                }
                let weight = if self.use_image_spacing {
                    scale * spacing
                } else {
                    scale
                };
                let w2 = weight * weight;
                Ok(w2.is_finite().then_some(w2))
            })
            .collect()
    }

    fn run<T: Copy + Default>(&self, input: &Grid<T>, mut field: Vec<f64>) -> FilterResult<FGrid> {
        let weights = self.axis_weights(input)?;
        let ceiling = self.ceiling.unwrap_or(f64::INFINITY);
        let reached = |v: f64| v.is_finite() && v <= ceiling;
        let strides = input.strides();

        let mut envelope = Envelope::default();
        let mut line_in = Vec::new();
        let mut line_out = Vec::new();
        let mut first_pass = true;

        for (axis, w2) in weights.iter().enumerate() {
            let Some(w2) = *w2 else {
                trace!("parabolic pass: axis {axis} frozen");
                continue;
            };
            let rebinarize = self.mode == ParabolicMode::PerAxis && !first_pass;
            first_pass = false;

            let n = input.dims()[axis];
            let stride = strides[axis];
            line_in.resize(n, 0.0);
            line_out.resize(n, 0.0);

            for start in input.line_starts(axis) {
                for (j, slot) in line_in.iter_mut().enumerate() {
                    let v = field[start + j * stride];
                    *slot = if !rebinarize {
                        v
                    } else if reached(v) {
                        0.0
                    } else {
                        f64::INFINITY
                    };
                }
                envelope.run(&line_in, w2, ceiling, &mut line_out);
                for (j, &d) in line_out.iter().enumerate() {
                    field[start + j * stride] = d;
                }
            }
            trace!("parabolic pass: axis {axis}, squared weight {w2}, {n} samples per line");
        }

        let mut out: FGrid = input.create_template();
        for (o, &v) in out.data_mut().iter_mut().zip(&field) {
            *o = if reached(v) { v } else { f64::INFINITY };
        }
        Ok(out)
    }
}

/// Compute the lower envelope of parabolas along a single line
///
/// `out[p] = min_q f[q] + (weight * (p - q))^2`, restricted to samples with
/// `f[q] <= ceiling`; results above `ceiling` are infinity. A weight whose
/// square overflows only lets each sample see itself.
///
/// # Panics
///
/// Panics if `f` and `out` have different lengths.
pub fn lower_envelope(f: &[f64], weight: f64, ceiling: f64, out: &mut [f64]) {
    assert_eq!(f.len(), out.len(), "line length mismatch");
    let w2 = weight * weight;
    if w2.is_finite() {
        Envelope::default().run(f, w2, ceiling, out);
    } else {
        for (o, &v) in out.iter_mut().zip(f) {
            *o = if v.is_finite() && v <= ceiling { v } else { f64::INFINITY };
        }
    }
}

/// Reusable stack for the envelope scan
#[derive(Debug, Default)]
struct Envelope {
    /// Roots of the parabolas on the envelope, left to right
    sites: Vec<usize>,
    /// Abscissa where each parabola becomes minimal
    bounds: Vec<f64>,
}

impl Envelope {
    fn run(&mut self, f: &[f64], w2: f64, ceiling: f64, out: &mut [f64]) {
        self.sites.clear();
        self.bounds.clear();

        if w2 == 0.0 {
            // Flat parabolas: every sample sees the line minimum
            let min = f
                .iter()
                .copied()
                .filter(|v| v.is_finite() && *v <= ceiling)
                .fold(f64::INFINITY, f64::min);
            out.fill(min);
            return;
        }

        for (q, &fq) in f.iter().enumerate() {
            if !(fq.is_finite() && fq <= ceiling) {
                continue;
            }
            let xq = q as f64;
            let hq = fq + w2 * xq * xq;

            let mut start = f64::NEG_INFINITY;
            while let (Some(&p), Some(&lo)) = (self.sites.last(), self.bounds.last()) {
                let xp = p as f64;
                let hp = f[p] + w2 * xp * xp;
                let s = (hq - hp) / (2.0 * w2 * (xq - xp));
                if s <= lo {
                    self.sites.pop();
                    self.bounds.pop();
                } else {
                    start = s;
                    break;
                }
            }
            self.sites.push(q);
            self.bounds.push(start);
        }

        if self.sites.is_empty() {
            out.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (p, o) in out.iter_mut().enumerate() {
            let x = p as f64;
            while k + 1 < self.sites.len() && self.bounds[k + 1] < x {
                k += 1;
            }
            let site = self.sites[k];
            let dx = x - site as f64;
            let d = f[site] + w2 * dx * dx;
            *o = if d.is_finite() && d <= ceiling {
                d
            } else {
                f64::INFINITY
            };
        }
    }
}
