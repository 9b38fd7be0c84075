//! Display-only magnified preview of a dragged sub-region
//!
//! The magnify rectangle never enters the annotation list and never
//! participates in flatten or export. The preview samples the base raster
//! scaled by the active zoom factor, anchored at the rectangle's top-left
//! corner.

use image::{Rgba, RgbaImage};

use crate::config::ZoomFactor;
use crate::domain::{Point, Rect, ViewMapping};

/// Transient magnify-rect drag plus the active zoom factor.
///
/// The rectangle is recomputed from the fixed drag start and the current
/// point, the same way selection creation is, so it never inverts.
#[derive(Debug, Clone, Copy)]
pub struct MagnifierState {
    rect: Rect,
    drag_start: Option<Point>,
    zoom: ZoomFactor,
}

impl MagnifierState {
    pub fn new(zoom: ZoomFactor) -> Self {
        Self {
            rect: Rect::default(),
            drag_start: None,
            zoom,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn zoom(&self) -> ZoomFactor {
        self.zoom
    }

    pub fn begin(&mut self, p: Point) {
        self.drag_start = Some(p);
        self.rect = Rect::from_corners(p, p);
    }

    pub fn drag(&mut self, p: Point) {
        if let Some(start) = self.drag_start {
            self.rect = Rect::from_corners(start, p);
        }
    }

    pub fn end(&mut self) {
        self.drag_start = None;
    }

    pub fn clear(&mut self) {
        self.drag_start = None;
        self.rect = Rect::default();
    }

    /// Modifier-gated scroll: cycle through the discrete factors
    pub fn cycle_zoom(&mut self) -> ZoomFactor {
        self.zoom = self.zoom.next();
        self.zoom
    }

    /// Stepper controls clamp at the ends instead of wrapping
    pub fn step_zoom_up(&mut self) -> ZoomFactor {
        self.zoom = self.zoom.step_up();
        self.zoom
    }

    pub fn step_zoom_down(&mut self) -> ZoomFactor {
        self.zoom = self.zoom.step_down();
        self.zoom
    }
}

/// Render the magnified preview for the current rect.
///
/// The output covers `rect.size * zoom` view units anchored at the rect's
/// top-left corner, showing the rect's content scaled by the zoom factor.
/// Returns `None` for an empty rect or a degenerate view.
pub fn render_preview(
    base: &RgbaImage,
    mapping: &ViewMapping,
    rect: Rect,
    zoom: ZoomFactor,
) -> Option<RgbaImage> {
    if rect.is_degenerate() || mapping.is_degenerate() {
        return None;
    }
    let factor = zoom.factor();
    let out_w = (rect.w * factor).round() as u32;
    let out_h = (rect.h * factor).round() as u32;
    if out_w == 0 || out_h == 0 {
        return None;
    }

    let mut out = RgbaImage::from_pixel(out_w, out_h, Rgba([0, 0, 0, 0]));
    for oy in 0..out_h {
        for ox in 0..out_w {
            let view = Point::new(
                rect.x + ox as f32 / factor,
                rect.y + oy as f32 / factor,
            );
            let Some(image) = mapping.to_image_space(view) else {
                continue;
            };
            let Some((px, py)) = mapping.image_point_to_pixel(image) else {
                continue;
            };
            out.put_pixel(ox, oy, *base.get_pixel(px, py));
        }
    }
    Some(out)
}
