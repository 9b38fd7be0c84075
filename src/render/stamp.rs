//! Bitmap-font text stamping for timestamp and watermark marks
//!
//! Stamps are burned into the flattened raster with the 8x8 basic font,
//! integer-scaled to the configured point size. Glyphs outside the basic
//! set fall back to '?'.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

/// Glyph cell edge in font units
const GLYPH_SIZE: u32 = 8;

/// Integer glyph scale for a nominal point size
pub fn glyph_scale(point_size: u32) -> u32 {
    (point_size / GLYPH_SIZE).max(1)
}

/// Pixel dimensions of a single-line stamp at the given scale
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    (chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale)
}

/// Draw a single line of text with its top-left corner at (x, y).
///
/// Pixels outside the image are skipped; the color's alpha channel blends
/// the stamp over the existing raster.
pub fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, scale: u32, color: [u8; 4]) {
    let scale = scale.max(1) as i32;
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
        let Some(glyph) = glyph else {
            cursor_x += GLYPH_SIZE as i32 * scale;
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            for col_idx in 0..GLYPH_SIZE as i32 {
                if (*row >> col_idx) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col_idx * scale;
                let py = y + row_idx as i32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let tx = px + sx;
                        let ty = py + sy;
                        if tx >= 0
                            && ty >= 0
                            && (tx as u32) < img.width()
                            && (ty as u32) < img.height()
                        {
                            let dst = *img.get_pixel(tx as u32, ty as u32);
                            img.put_pixel(tx as u32, ty as u32, blend_pixel(dst, color));
                        }
                    }
                }
            }
        }
        cursor_x += GLYPH_SIZE as i32 * scale;
    }
}

fn blend_pixel(dst: Rgba<u8>, src: [u8; 4]) -> Rgba<u8> {
    let alpha = src[3] as f32 / 255.0;
    if alpha >= 0.999 {
        return Rgba([src[0], src[1], src[2], 255]);
    }
    let inv = 1.0 - alpha;
    Rgba([
        (src[0] as f32 * alpha + dst.0[0] as f32 * inv).round() as u8,
        (src[1] as f32 * alpha + dst.0[1] as f32 * inv).round() as u8,
        (src[2] as f32 * alpha + dst.0[2] as f32 * inv).round() as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_size_scales_with_glyph_scale() {
        assert_eq!(text_size("abc", 1), (24, 8));
        assert_eq!(text_size("abc", 3), (72, 24));
        assert_eq!(glyph_scale(24), 3);
        assert_eq!(glyph_scale(4), 1);
    }

    #[test]
    fn opaque_stamp_marks_pixels() {
        let mut img = RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 255]));
        draw_text(&mut img, 0, 0, "X", 1, [255, 255, 255, 255]);
        let lit = img.pixels().filter(|p| p.0[0] > 0).count();
        assert!(lit > 0, "stamp drew nothing");
    }

    #[test]
    fn translucent_stamp_blends_instead_of_replacing() {
        let mut img = RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 255]));
        draw_text(&mut img, 0, 0, "X", 1, [255, 255, 255, 77]); // ~30% alpha
        let max = img.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(max > 0 && max < 128, "expected a dim blend, got {max}");
    }

    #[test]
    fn out_of_bounds_stamp_is_clipped_not_panicking() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        draw_text(&mut img, -4, -4, "XY", 2, [255, 0, 0, 255]);
        draw_text(&mut img, 100, 100, "XY", 2, [255, 0, 0, 255]);
    }
}
