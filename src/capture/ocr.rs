//! OCR consumer using rusty-tesseract
//!
//! Receives the cropped export raster and returns recognized text. Empty or
//! whitespace-only recognition is reported as [`OcrOutcome::NoText`] rather
//! than an error.

use std::collections::HashMap;

use anyhow::Context;
use image::RgbaImage;

/// Result of running OCR over a cropped selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Non-empty recognized text, trimmed
    Text(String),
    /// Recognition ran but found no text
    NoText,
}

/// Run OCR on a cropped raster.
///
/// Small selections are upscaled first; tesseract needs text at least
/// 10-12 pixels tall to recognize reliably.
pub fn recognize(img: &RgbaImage) -> anyhow::Result<OcrOutcome> {
    use rusty_tesseract::{Args, Image};

    log::info!(
        "Running OCR with rusty-tesseract on {}x{} image",
        img.width(),
        img.height()
    );

    let dynamic_img = image::DynamicImage::ImageRgba8(img.clone());
    let min_dimension = img.width().min(img.height());
    let processed_img = if min_dimension < 100 {
        log::info!("Upscaling small OCR image 4x");
        dynamic_img.resize(
            img.width() * 4,
            img.height() * 4,
            image::imageops::FilterType::Lanczos3,
        )
    } else if min_dimension < 200 {
        log::info!("Upscaling small OCR image 2x");
        dynamic_img.resize(
            img.width() * 2,
            img.height() * 2,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        dynamic_img
    };

    let tess_img =
        Image::from_dynamic_image(&processed_img).context("failed to create tesseract image")?;

    let dpi = if min_dimension < 200 { 300 } else { 150 };
    let args = Args {
        lang: "eng".to_string(),
        config_variables: HashMap::new(),
        dpi: Some(dpi),
        psm: Some(11), // Fully automatic page segmentation
        oem: Some(3),  // Default OCR Engine Mode
    };

    let text = rusty_tesseract::image_to_string(&tess_img, &args)
        .context("tesseract recognition failed")?;
    Ok(classify_text(&text))
}

fn classify_text(raw: &str) -> OcrOutcome {
    let text = raw.trim();
    if text.is_empty() {
        OcrOutcome::NoText
    } else {
        OcrOutcome::Text(text.to_string())
    }
}

/// Translation consumer contract. Network transport, timeout and retry
/// policy belong to the implementor, not this crate.
pub trait Translator {
    fn translate(&self, text: &str) -> anyhow::Result<String>;
}
