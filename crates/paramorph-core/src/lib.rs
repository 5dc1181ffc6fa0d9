//! paramorph-core - Basic data structures for N-dimensional morphology
//!
//! This crate provides the containers shared by the rest of the paramorph
//! workspace:
//!
//! - [`Grid`] - Dense N-dimensional sample array with per-axis spacing
//! - [`BGrid`] - Binary grid (`Grid<u8>`)
//! - [`FGrid`] - Floating-point grid (`Grid<f64>`)
//! - [`serial`](grid::serial) - Text-header + binary serialization of grids

pub mod error;
pub mod grid;

pub use error::{Error, Result};
pub use grid::serial::SerialSample;
pub use grid::{BGrid, FGrid, Grid, LineStarts};
