//! paramorph-morph - Binary dilation by parabolic passes
//!
//! This crate provides:
//!
//! - [`BinaryDilatePara`]: dilation of binary grids by a disc/sphere or box
//! - [`ParameterStore`]: radius, shape and the values derived from them
//! - [`DilateParaConfig`]: JSON configuration of the filter
//!
//! The heavy lifting is done by the separable passes in
//! [`paramorph_filter`].

mod error;
pub mod binary_para;
pub mod config;
pub mod params;

pub use binary_para::{BinaryDilatePara, dilate_para, dilate_para_uniform};
pub use config::{DilateParaConfig, RadiusSpec, load_config};
pub use error::{MorphError, MorphResult, StageKind};
pub use params::{
    DerivedParameters, ParameterStore, ShapeMode, WINDOW_TOLERANCE, derive_parameters,
};
