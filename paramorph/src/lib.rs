//! paramorph - Binary morphology by parabolic passes
//!
//! Dilation of N-dimensional binary grids by discs, spheres, ellipsoids and
//! boxes. The structuring element is never materialized: a squared-distance
//! field is built by separable 1-D lower-envelope passes, short-circuited at
//! the radius, and thresholded.
//!
//! # Overview
//!
//! - [`Grid`]: N-dimensional sample container with physical spacing
//! - [`filter`]: parabolic proximity passes and binary thresholding
//! - [`morph`]: the dilation filter, its parameters and JSON configuration
//!
//! # Example
//!
//! ```
//! use paramorph::BGrid;
//! use paramorph::morph::{ShapeMode, dilate_para_uniform};
//!
//! let mut grid = BGrid::new(&[9, 9]).unwrap();
//! grid.set(&[4, 4], 1).unwrap();
//!
//! let disc = dilate_para_uniform(&grid, 2.0, ShapeMode::Circular).unwrap();
//! assert_eq!(disc.count_nonzero(), 13);
//! let block = dilate_para_uniform(&grid, 2.0, ShapeMode::Rectangular).unwrap();
//! assert_eq!(block.count_nonzero(), 25);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use paramorph_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use paramorph_filter as filter;
pub use paramorph_morph as morph;
