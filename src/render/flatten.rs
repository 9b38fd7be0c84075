//! Raster compositing: bake annotations and stamps into a single image
//!
//! The compositor copies the captured base raster, rasterizes the shape
//! snapshot in list order with tiny-skia, applies blur regions against the
//! working buffer, and finally burns in the optional timestamp/watermark
//! stamps. The input raster is never mutated.

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{arrow, blur};
use super::stamp;
use crate::config::{Settings, ShapeColor};
use crate::domain::{Point, Rect, Shape, ShapeKind, ViewMapping};

/// Timestamp stamp point size
const TIMESTAMP_POINT_SIZE: u32 = 16;
/// Inset of the timestamp from the selection's bottom-right corner
const STAMP_MARGIN: i32 = 8;
/// Watermark opacity relative to the active color
const WATERMARK_ALPHA: f32 = 0.3;

/// Watermark stamp content
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    pub text: String,
    pub point_size: u32,
}

/// Resolved stamp request handed to the compositor.
///
/// The timestamp text is formatted up front so flattening itself stays
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampPlan {
    pub timestamp: Option<String>,
    pub watermark: Option<Watermark>,
    pub color: ShapeColor,
}

impl StampPlan {
    /// Build the plan from session settings, formatting the timestamp now
    pub fn from_settings(settings: &Settings) -> Self {
        let timestamp = settings.timestamp_enabled.then(|| {
            chrono::Local::now()
                .format(&settings.timestamp_format)
                .to_string()
        });
        let watermark = (settings.watermark_enabled && !settings.watermark_text.trim().is_empty())
            .then(|| Watermark {
                text: settings.watermark_text.clone(),
                point_size: settings.watermark_size,
            });
        Self {
            timestamp,
            watermark,
            color: settings.shape_color,
        }
    }
}

/// Flatten the annotation snapshot over a copy of the base raster.
///
/// `selection_view` is the committed selection rectangle in view space; it
/// only positions the stamps. Output dimensions always equal the input's.
pub fn flatten(
    base: &RgbaImage,
    shapes: &[Shape],
    mapping: &ViewMapping,
    selection_view: Rect,
    stamps: &StampPlan,
) -> RgbaImage {
    let mut working = base.clone();

    for shape in shapes {
        draw_shape(&mut working, shape, mapping);
    }

    if stamps.timestamp.is_some() || stamps.watermark.is_some() {
        draw_stamps(&mut working, mapping, selection_view, stamps);
    }

    working
}

/// Map a view-space point to raster pixel coordinates (top-down rows).
///
/// Points outside the letterboxed image area are inert.
fn view_to_pixel(mapping: &ViewMapping, p: Point) -> Option<(f32, f32)> {
    let image = mapping.to_image_space(p)?;
    let (_, image_h) = mapping.image_size();
    Some((image.x, image_h as f32 - image.y))
}

fn draw_shape(working: &mut RgbaImage, shape: &Shape, mapping: &ViewMapping) {
    let scale = mapping.scale();
    if scale <= 0.0 {
        return;
    }
    let scaled_width = (shape.width * scale).max(1.0);
    let [r, g, b, a] = shape.color.to_rgba_u8();

    match &shape.kind {
        ShapeKind::Freehand(points) => {
            let pixels: Vec<(f32, f32)> = points
                .iter()
                .filter_map(|p| view_to_pixel(mapping, *p))
                .collect();
            if pixels.len() < 2 {
                return;
            }
            with_pixmap(working, |pixmap| {
                let mut pb = PathBuilder::new();
                pb.move_to(pixels[0].0, pixels[0].1);
                for (x, y) in &pixels[1..] {
                    pb.line_to(*x, *y);
                }
                let Some(path) = pb.finish() else {
                    return;
                };
                stroke_path(pixmap, &path, scaled_width, (r, g, b, a));
            });
        }
        ShapeKind::Line { start, end } => {
            let Some((x0, y0)) = view_to_pixel(mapping, *start) else {
                return;
            };
            let Some((x1, y1)) = view_to_pixel(mapping, *end) else {
                return;
            };
            with_pixmap(working, |pixmap| {
                let mut pb = PathBuilder::new();
                pb.move_to(x0, y0);
                pb.line_to(x1, y1);
                let Some(path) = pb.finish() else {
                    return;
                };
                stroke_path(pixmap, &path, scaled_width, (r, g, b, a));
            });
        }
        ShapeKind::Arrow { start, end } => {
            let Some((x0, y0)) = view_to_pixel(mapping, *start) else {
                return;
            };
            let Some((x1, y1)) = view_to_pixel(mapping, *end) else {
                return;
            };
            let head_length = arrow::head_length(scaled_width, scale);
            with_pixmap(working, |pixmap| {
                let mut pb = PathBuilder::new();
                pb.move_to(x0, y0);
                pb.line_to(x1, y1);
                if let Some(path) = pb.finish() {
                    stroke_path(pixmap, &path, scaled_width, (r, g, b, a));
                }

                // Filled triangular head over the shaft tip
                if let Some((w1x, w1y, w2x, w2y)) =
                    arrow::head_points(x0, y0, x1, y1, head_length)
                {
                    let mut pb = PathBuilder::new();
                    pb.move_to(x1, y1);
                    pb.line_to(w1x, w1y);
                    pb.line_to(w2x, w2y);
                    pb.close();
                    if let Some(head) = pb.finish() {
                        let mut paint = Paint::default();
                        paint.set_color_rgba8(r, g, b, a);
                        paint.anti_alias = true;
                        pixmap.fill_path(
                            &head,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
            });
        }
        ShapeKind::Redact { start, end } => {
            let Some((x0, y0)) = view_to_pixel(mapping, *start) else {
                return;
            };
            let Some((x1, y1)) = view_to_pixel(mapping, *end) else {
                return;
            };
            let (min_x, min_y, max_x, max_y) = super::geometry::normalize_rect(x0, y0, x1, y1);
            with_pixmap(working, |pixmap| {
                if let Some(rect) =
                    tiny_skia::Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
                {
                    let mut paint = Paint::default();
                    paint.set_color_rgba8(r, g, b, a);
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            });
        }
        ShapeKind::Highlight { start, end } => {
            let Some((x0, y0)) = view_to_pixel(mapping, *start) else {
                return;
            };
            let Some((x1, y1)) = view_to_pixel(mapping, *end) else {
                return;
            };
            let (min_x, min_y, max_x, max_y) = super::geometry::normalize_rect(x0, y0, x1, y1);
            with_pixmap(working, |pixmap| {
                let mut pb = PathBuilder::new();
                pb.move_to(min_x, min_y);
                pb.line_to(max_x, min_y);
                pb.line_to(max_x, max_y);
                pb.line_to(min_x, max_y);
                pb.close();
                let Some(path) = pb.finish() else {
                    return;
                };
                stroke_path(pixmap, &path, scaled_width, (r, g, b, a));
            });
        }
        ShapeKind::Blur { start, end } => {
            // Samples the working buffer, not the base: a blur placed after
            // other marks blurs those marks too.
            blur_region(working, mapping, *start, *end);
        }
    }
}

/// Convert to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

fn stroke_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, width: f32, rgba: (u8, u8, u8, u8)) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.0, rgba.1, rgba.2, rgba.3);
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
}

/// Gaussian-blur the rect between two view points, in place
fn blur_region(working: &mut RgbaImage, mapping: &ViewMapping, start: Point, end: Point) {
    let Some((x0, y0)) = view_to_pixel(mapping, start) else {
        return;
    };
    let Some((x1, y1)) = view_to_pixel(mapping, end) else {
        return;
    };
    let (min_x, min_y, max_x, max_y) = super::geometry::normalize_rect(x0, y0, x1, y1);

    let x = min_x.max(0.0) as u32;
    let y = min_y.max(0.0) as u32;
    let w = ((max_x.min(working.width() as f32) - x as f32).max(0.0)) as u32;
    let h = ((max_y.min(working.height() as f32) - y as f32).max(0.0)) as u32;
    if w == 0 || h == 0 {
        return;
    }

    let patch = image::imageops::crop_imm(working, x, y, w, h).to_image();
    let blurred = image::imageops::blur(&patch, blur::RADIUS);
    image::imageops::replace(working, &blurred, x as i64, y as i64);
}

fn draw_stamps(
    working: &mut RgbaImage,
    mapping: &ViewMapping,
    selection_view: Rect,
    stamps: &StampPlan,
) {
    let Some(selection_image) = mapping.rect_to_image_space(selection_view) else {
        return;
    };
    let (sx, sy, sw, sh) = mapping.image_rect_to_pixels(selection_image);
    if sw == 0 || sh == 0 {
        return;
    }

    if let Some(text) = &stamps.timestamp {
        let scale = stamp::glyph_scale(TIMESTAMP_POINT_SIZE);
        let (tw, th) = stamp::text_size(text, scale);
        let x = sx as i32 + sw as i32 - tw as i32 - STAMP_MARGIN;
        let y = sy as i32 + sh as i32 - th as i32 - STAMP_MARGIN;
        stamp::draw_text(working, x, y, text, scale, stamps.color.to_rgba_u8());
    }

    if let Some(mark) = &stamps.watermark {
        let scale = stamp::glyph_scale(mark.point_size);
        let (tw, th) = stamp::text_size(&mark.text, scale);
        let x = sx as i32 + (sw as i32 - tw as i32) / 2;
        let y = sy as i32 + (sh as i32 - th as i32) / 2;
        stamp::draw_text(
            working,
            x,
            y,
            &mark.text,
            scale,
            stamps.color.to_rgba_u8_with_alpha(WATERMARK_ALPHA),
        );
    }
}
