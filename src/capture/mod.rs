//! Captured raster input and the consumers that read cropped output
//!
//! This module consolidates:
//! - The per-session captured frame and color sampling (image.rs)
//! - OCR/translation consumer contracts (ocr.rs)

pub mod image;
pub mod ocr;

pub use image::{CapturedFrame, ColorSampler};
pub use ocr::{OcrOutcome, Translator, recognize};
