//! Quality-tiered export pipeline: crop the flattened raster to the mapped
//! selection and encode it for delivery
//!
//! File delivery honors the active [`QualityTier`]; clipboard delivery is
//! always lossless regardless of the tier.

pub mod worker;

use std::io;

use image::RgbaImage;
use thiserror::Error;

use crate::config::QualityTier;
use crate::domain::{Rect, ViewMapping};

/// Recoverable failures of a single export attempt. None of these close
/// the session.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Zero-area or out-of-bounds selection: aborted silently, no artifact
    #[error("selection region is empty or outside the capture")]
    DegenerateSelection,
    /// The view has no usable dimensions, nothing can be mapped
    #[error("view dimensions are degenerate")]
    DegenerateView,
    /// Mapped selection does not intersect the flattened raster
    #[error("selection does not intersect the captured raster")]
    CropOutOfBounds,
    /// Raster-to-bytes conversion failed; the session stays open for retry
    #[error("image encoding failed: {0}")]
    Encode(String),
}

/// Encoding family of an exported byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedFormat {
    Lossless,
    Lossy,
}

impl EncodedFormat {
    /// File extension the consumer should use
    pub fn extension(self) -> &'static str {
        match self {
            EncodedFormat::Lossless => "png",
            EncodedFormat::Lossy => "jpg",
        }
    }
}

/// Encoded export artifact, tagged with its format for the consumer
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: EncodedFormat,
}

impl EncodedImage {
    /// Default timestamped file name for file-save consumers
    pub fn suggested_file_name(&self) -> String {
        chrono::Local::now()
            .format(&format!("Screenshot_%Y-%m-%d_%H-%M-%S.{}", self.format.extension()))
            .to_string()
    }
}

/// Crop the flattened raster to the mapped selection rectangle.
///
/// Selections partially outside the raster are clipped to the overlap;
/// zero-area and fully-outside selections abort per the error taxonomy.
pub fn crop_selection(
    flattened: &RgbaImage,
    mapping: &ViewMapping,
    selection_view: Rect,
) -> Result<RgbaImage, ExportError> {
    if mapping.is_degenerate() {
        return Err(ExportError::DegenerateView);
    }
    if selection_view.is_degenerate() {
        return Err(ExportError::DegenerateSelection);
    }

    let a = mapping
        .project(selection_view.top_left())
        .ok_or(ExportError::DegenerateView)?;
    let b = mapping
        .project(selection_view.bottom_right())
        .ok_or(ExportError::DegenerateView)?;
    let selection_image = Rect::from_corners(a, b);

    let (image_w, image_h) = mapping.image_size();
    let raster = Rect {
        x: 0.0,
        y: 0.0,
        w: image_w as f32,
        h: image_h as f32,
    };
    let overlap = selection_image
        .intersect(raster)
        .ok_or(ExportError::CropOutOfBounds)?;

    let (x, y, w, h) = mapping.image_rect_to_pixels(overlap);
    if w == 0 || h == 0 {
        return Err(ExportError::CropOutOfBounds);
    }
    Ok(image::imageops::crop_imm(flattened, x, y, w, h).to_image())
}

/// Encode a cropped raster per the quality tier policy (file delivery)
pub fn encode(
    cropped: &RgbaImage,
    tier: QualityTier,
    downscale_enabled: bool,
) -> Result<EncodedImage, ExportError> {
    if !tier.is_lossy() {
        return encode_lossless(cropped);
    }

    let mut working = cropped.clone();
    if tier.downscales() && downscale_enabled {
        let w = (working.width() / 2).max(1);
        let h = (working.height() / 2).max(1);
        working = image::imageops::resize(&working, w, h, image::imageops::FilterType::Lanczos3);
    }

    // JPEG carries no alpha channel
    let rgb = image::DynamicImage::ImageRgba8(working).to_rgb8();
    let mut bytes = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
        io::Cursor::new(&mut bytes),
        tier.jpeg_quality(),
    );
    rgb.write_with_encoder(encoder)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(EncodedImage {
        bytes,
        format: EncodedFormat::Lossy,
    })
}

/// Clipboard delivery is always lossless, whatever the active tier
pub fn encode_for_clipboard(cropped: &RgbaImage) -> Result<EncodedImage, ExportError> {
    encode_lossless(cropped)
}

fn encode_lossless(img: &RgbaImage) -> Result<EncodedImage, ExportError> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, img).map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(EncodedImage {
        bytes,
        format: EncodedFormat::Lossless,
    })
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use image::Rgba;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

    fn base(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([120, 130, 140, 255]))
    }

    #[test]
    fn zero_area_selection_aborts_without_bytes() {
        let img = base(100, 100);
        let mapping = ViewMapping::new(100.0, 100.0, 100, 100);
        let p = Point::new(40.0, 40.0);
        let err = crop_selection(&img, &mapping, Rect::from_corners(p, p)).unwrap_err();
        assert!(matches!(err, ExportError::DegenerateSelection));
    }

    #[test]
    fn degenerate_view_aborts() {
        let img = base(100, 100);
        let mapping = ViewMapping::new(0.0, 0.0, 100, 100);
        let rect = Rect::from_corners(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        let err = crop_selection(&img, &mapping, rect).unwrap_err();
        assert!(matches!(err, ExportError::DegenerateView));
    }

    #[test]
    fn selection_fully_outside_is_crop_out_of_bounds() {
        // 200x100 view over a 100x100 raster: 50 units of letterbox padding
        // on each horizontal side
        let img = base(100, 100);
        let mapping = ViewMapping::new(200.0, 100.0, 100, 100);
        let rect = Rect::from_corners(Point::new(0.0, 10.0), Point::new(40.0, 60.0));
        let err = crop_selection(&img, &mapping, rect).unwrap_err();
        assert!(matches!(err, ExportError::CropOutOfBounds));
    }

    #[test]
    fn partially_outside_selection_clips_to_overlap() {
        let img = base(100, 100);
        let mapping = ViewMapping::new(200.0, 100.0, 100, 100);
        // Spans the left padding and 30 view units of image
        let rect = Rect::from_corners(Point::new(20.0, 0.0), Point::new(80.0, 50.0));
        let cropped = crop_selection(&img, &mapping, rect).unwrap();
        assert_eq!(cropped.dimensions(), (30, 50));
    }

    #[test]
    fn maximum_tier_is_png_at_full_size() {
        let cropped = base(40, 30);
        let out = encode(&cropped, QualityTier::Maximum, true).unwrap();
        assert_eq!(out.format, EncodedFormat::Lossless);
        assert!(out.bytes.starts_with(PNG_MAGIC));
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn minimum_tier_downscales_half_per_axis() {
        let cropped = base(400, 300);
        let out = encode(&cropped, QualityTier::Minimum, true).unwrap();
        assert_eq!(out.format, EncodedFormat::Lossy);
        assert!(out.bytes.starts_with(JPEG_MAGIC));
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 150));
    }

    #[test]
    fn minimum_tier_keeps_size_when_downscale_disabled() {
        let cropped = base(400, 300);
        let out = encode(&cropped, QualityTier::Minimum, false).unwrap();
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 300));
    }

    #[test]
    fn medium_tier_is_lossy_without_downscale() {
        let cropped = base(64, 64);
        let out = encode(&cropped, QualityTier::Medium, true).unwrap();
        assert_eq!(out.format, EncodedFormat::Lossy);
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn clipboard_is_lossless_even_on_minimum_tier() {
        let cropped = base(64, 64);
        let file = encode(&cropped, QualityTier::Minimum, true).unwrap();
        let clip = encode_for_clipboard(&cropped).unwrap();
        assert_eq!(file.format, EncodedFormat::Lossy);
        assert_eq!(clip.format, EncodedFormat::Lossless);
        assert!(clip.bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn format_tag_picks_the_extension() {
        assert_eq!(EncodedFormat::Lossless.extension(), "png");
        assert_eq!(EncodedFormat::Lossy.extension(), "jpg");
    }
}
