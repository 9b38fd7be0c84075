//! Shape rasterization and raster compositing
//!
//! - geometry.rs: shared shape math (arrow heads, rect normalization)
//! - flatten.rs: the compositor that bakes annotations into one raster
//! - stamp.rs: bitmap-font timestamp/watermark stamping

pub mod flatten;
pub mod geometry;
pub mod stamp;

pub use flatten::{StampPlan, Watermark, flatten};
