//! Pure domain types with minimal dependencies
//!
//! Core geometry, coordinate mapping, selection and annotation types used
//! throughout the crate. Nothing here touches rasters or encoders.

pub mod annotation;
pub mod geometry;
pub mod mapping;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use mapping::*;
pub use selection::*;
