//! Grid - N-dimensional sample container
//!
//! `Grid<T>` is a dense N-dimensional array of samples with a physical
//! spacing per axis. Two instantiations are used throughout the library:
//!
//! - [`BGrid`] (`Grid<u8>`) for binary images, where 0 is background and any
//!   non-zero value is foreground
//! - [`FGrid`] (`Grid<f64>`) for real-valued intermediate fields
//!
//! See [`serial`] for serialization support.
//!
//! # Examples
//!
//! ```
//! use paramorph_core::BGrid;
//!
//! // A 9x7 binary grid with one foreground voxel
//! let mut grid = BGrid::new(&[9, 7]).unwrap();
//! grid.set(&[4, 3], 1).unwrap();
//! assert_eq!(grid.get(&[4, 3]).unwrap(), 1);
//! assert_eq!(grid.count_nonzero(), 1);
//! ```

pub mod serial;

use crate::error::{Error, Result};

/// N-dimensional grid
///
/// # Memory Layout
///
/// Data is stored with axis 0 varying fastest and no padding. The sample at
/// index `[i0, i1, ..]` lives at offset `i0 * strides[0] + i1 * strides[1] + ..`
/// where `strides[0] == 1` and `strides[k] == strides[k - 1] * dims[k - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    /// Extent of each axis
    dims: Vec<usize>,
    /// Physical distance between neighbouring samples along each axis
    spacing: Vec<f64>,
    /// Sample data
    data: Vec<T>,
}

/// Binary grid (0 = background, non-zero = foreground)
pub type BGrid = Grid<u8>;

/// Floating-point grid
///
/// Double precision keeps squared distances exact for integer offsets well
/// beyond any practical radius.
pub type FGrid = Grid<f64>;

/// Validate dimensions and return the total number of samples.
fn checked_size(dims: &[usize]) -> Result<usize> {
    if dims.is_empty() || dims.contains(&0) {
        return Err(Error::InvalidDimension(dims.to_vec()));
    }
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| Error::InvalidDimension(dims.to_vec()))
}

impl<T: Copy + Default> Grid<T> {
    /// Create a new grid with all samples set to `T::default()`
    ///
    /// Spacing defaults to 1.0 along every axis.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `dims` is empty or any extent is 0.
    pub fn new(dims: &[usize]) -> Result<Self> {
        Self::new_with_value(dims, T::default())
    }

    /// Create a new grid with all samples set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `dims` is empty or any extent is 0.
    pub fn new_with_value(dims: &[usize], value: T) -> Result<Self> {
        let size = checked_size(dims)?;
        Ok(Grid {
            dims: dims.to_vec(),
            spacing: vec![1.0; dims.len()],
            data: vec![value; size],
        })
    }

    /// Create a grid from raw data laid out with axis 0 fastest
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or the data length doesn't
    /// match the product of the extents.
    pub fn from_data(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let size = checked_size(dims)?;
        if data.len() != size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {:?} = {}",
                data.len(),
                dims,
                size
            )));
        }
        Ok(Grid {
            dims: dims.to_vec(),
            spacing: vec![1.0; dims.len()],
            data,
        })
    }

    /// Create a grid with the same dimensions and spacing, zeroed data.
    pub fn create_template<U: Copy + Default>(&self) -> Grid<U> {
        Grid {
            dims: self.dims.clone(),
            spacing: self.spacing.clone(),
            data: vec![U::default(); self.data.len()],
        }
    }
}

impl<T: Copy> Grid<T> {
    /// Number of axes
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Extent of each axis
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a grid holds at least one sample
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Physical spacing per axis
    #[inline]
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Set the physical spacing per axis
    ///
    /// # Errors
    ///
    /// Returns `Error::AxisCountMismatch` if `spacing` has the wrong length and
    /// `Error::InvalidParameter` if any component is not finite and positive.
    pub fn set_spacing(&mut self, spacing: &[f64]) -> Result<()> {
        if spacing.len() != self.dims.len() {
            return Err(Error::AxisCountMismatch {
                expected: self.dims.len(),
                actual: spacing.len(),
            });
        }
        if let Some(bad) = spacing.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(Error::InvalidParameter(format!(
                "spacing must be finite and positive, got {bad}"
            )));
        }
        self.spacing.copy_from_slice(spacing);
        Ok(())
    }

    /// Builder form of [`Grid::set_spacing`]
    pub fn with_spacing(mut self, spacing: &[f64]) -> Result<Self> {
        self.set_spacing(spacing)?;
        Ok(self)
    }

    /// Offset between neighbouring samples along each axis
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.dims.len());
        let mut acc = 1;
        for &d in &self.dims {
            strides.push(acc);
            acc *= d;
        }
        strides
    }

    /// Convert an N-D index to a linear offset
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the index has the wrong number of
    /// components or any component is out of range.
    pub fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.dims.len() || index.iter().zip(&self.dims).any(|(i, d)| i >= d) {
            return Err(Error::IndexOutOfBounds {
                index: index.to_vec(),
                dims: self.dims.clone(),
            });
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&i, &d) in index.iter().zip(&self.dims) {
            offset += i * stride;
            stride *= d;
        }
        Ok(offset)
    }

    /// Convert a linear offset back to an N-D index
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    pub fn index_of(&self, offset: usize) -> Vec<usize> {
        assert!(offset < self.data.len(), "offset {offset} out of range");
        let mut rest = offset;
        self.dims
            .iter()
            .map(|&d| {
                let i = rest % d;
                rest /= d;
                i
            })
            .collect()
    }

    /// Get the sample at `index`
    #[inline]
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let offset = self.offset(index)?;
        Ok(self.data[offset])
    }

    /// Set the sample at `index`
    #[inline]
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = self.offset(index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Get raw access to the sample data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the sample data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its sample data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Set all samples to the specified value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every sample, keeping dimensions and spacing
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(T) -> U,
    {
        Grid {
            dims: self.dims.clone(),
            spacing: self.spacing.clone(),
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Check that two grids have the same dimensions
    pub fn check_same_shape<U: Copy>(&self, other: &Grid<U>) -> Result<()> {
        if self.dims != other.dims {
            return Err(Error::IncompatibleShapes(
                self.dims.clone(),
                other.dims.clone(),
            ));
        }
        Ok(())
    }

    /// Iterate over the starting offsets of every 1-D line along `axis`
    ///
    /// Each line has `dims()[axis]` samples separated by `strides()[axis]`.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= ndim()`.
    pub fn line_starts(&self, axis: usize) -> LineStarts {
        assert!(axis < self.dims.len(), "axis {axis} out of range");
        let stride: usize = self.dims[..axis].iter().product();
        let block = stride * self.dims[axis];
        LineStarts {
            stride,
            block,
            count: self.data.len() / self.dims[axis],
            next: 0,
        }
    }
}

impl Grid<u8> {
    /// Number of foreground (non-zero) samples
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Indices of all foreground samples, in storage order
    pub fn foreground_indices(&self) -> Vec<Vec<usize>> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(offset, _)| self.index_of(offset))
            .collect()
    }

    /// True if every foreground sample of `self` is also foreground in `other`
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleShapes` if the dimensions differ.
    pub fn is_subset_of(&self, other: &Grid<u8>) -> Result<bool> {
        self.check_same_shape(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .all(|(&a, &b)| a == 0 || b != 0))
    }
}

/// Iterator over line start offsets, see [`Grid::line_starts`]
#[derive(Debug, Clone)]
pub struct LineStarts {
    stride: usize,
    block: usize,
    count: usize,
    next: usize,
}

impl Iterator for LineStarts {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.count {
            return None;
        }
        let outer = self.next / self.stride;
        let inner = self.next % self.stride;
        self.next += 1;
        Some(outer * self.block + inner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.count - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for LineStarts {}
