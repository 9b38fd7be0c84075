//! View-space to image-space coordinate mapping
//!
//! The captured raster is aspect-fit into the interaction view, leaving
//! symmetric letterbox padding on one axis. View space has its origin
//! top-left with y growing downward; image space uses a bottom-left origin,
//! so the mapping flips the vertical axis.

use super::geometry::{Point, Rect};

/// Fixed per-session mapping between the interaction view and the raster.
///
/// Built once when the session opens; the scale factor never changes while
/// the session is alive.
#[derive(Clone, Copy, Debug)]
pub struct ViewMapping {
    view_w: f32,
    view_h: f32,
    image_w: f32,
    image_h: f32,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ViewMapping {
    pub fn new(view_w: f32, view_h: f32, image_w: u32, image_h: u32) -> Self {
        let image_w = image_w as f32;
        let image_h = image_h as f32;
        let scale = if image_w > 0.0 && image_h > 0.0 {
            (view_w / image_w).min(view_h / image_h)
        } else {
            0.0
        };
        Self {
            view_w,
            view_h,
            image_w,
            image_h,
            scale,
            offset_x: (view_w - image_w * scale) / 2.0,
            offset_y: (view_h - image_h * scale) / 2.0,
        }
    }

    /// Aspect-fit scale factor (view units per image pixel)
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether the view has usable dimensions.
    ///
    /// A degenerate view maps every point out of bounds; callers ignore the
    /// gesture instead of crashing.
    pub fn is_degenerate(&self) -> bool {
        self.scale <= 0.0 || !self.scale.is_finite()
    }

    /// Map a view-space point to image-pixel coordinates.
    ///
    /// Returns `None` when the unscaled point falls outside the raster or
    /// the view is degenerate; such points are inert.
    pub fn to_image_space(&self, p: Point) -> Option<Point> {
        if self.is_degenerate() {
            return None;
        }
        let x = (p.x - self.offset_x) / self.scale;
        let y = (p.y - self.offset_y) / self.scale;
        if x < 0.0 || x > self.image_w || y < 0.0 || y > self.image_h {
            return None;
        }
        Some(Point::new(x, self.image_h - y))
    }

    /// Same transform as [`to_image_space`](Self::to_image_space) without
    /// the bounds check. Used by the export crop, which clips against the
    /// raster itself.
    pub fn project(&self, p: Point) -> Option<Point> {
        if self.is_degenerate() {
            return None;
        }
        let x = (p.x - self.offset_x) / self.scale;
        let y = (p.y - self.offset_y) / self.scale;
        Some(Point::new(x, self.image_h - y))
    }

    /// Inverse of [`to_image_space`](Self::to_image_space)
    pub fn to_view_space(&self, p: Point) -> Option<Point> {
        if self.is_degenerate() {
            return None;
        }
        if p.x < 0.0 || p.x > self.image_w || p.y < 0.0 || p.y > self.image_h {
            return None;
        }
        Some(Point::new(
            p.x * self.scale + self.offset_x,
            (self.image_h - p.y) * self.scale + self.offset_y,
        ))
    }

    /// Map a view-space rect to an image-space rect (bottom-left origin).
    ///
    /// `None` when either corner lies outside the raster.
    pub fn rect_to_image_space(&self, r: Rect) -> Option<Rect> {
        let a = self.to_image_space(r.top_left())?;
        let b = self.to_image_space(r.bottom_right())?;
        Some(Rect::from_corners(a, b))
    }

    /// Convert an image-space rect to raster pixel rows/columns, with the
    /// top-down row order the pixel buffer uses. Clamped to the raster.
    pub fn image_rect_to_pixels(&self, r: Rect) -> (u32, u32, u32, u32) {
        let x = r.x.max(0.0).min(self.image_w) as u32;
        // Image space grows upward; pixel rows grow downward.
        let top = (self.image_h - r.bottom()).max(0.0).min(self.image_h) as u32;
        let w = (r.w.min(self.image_w - x as f32).max(0.0)).round() as u32;
        let h = (r.h.min(self.image_h - top as f32).max(0.0)).round() as u32;
        (x, top, w, h)
    }

    /// Raster pixel column/row for an image-space point, `None` outside
    pub fn image_point_to_pixel(&self, p: Point) -> Option<(u32, u32)> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.image_w || p.y > self.image_h {
            return None;
        }
        let row = (self.image_h - p.y).min(self.image_h - 1.0);
        Some((p.x as u32, row.max(0.0) as u32))
    }

    pub fn view_size(&self) -> (f32, f32) {
        (self.view_w, self.view_h)
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_w as u32, self.image_h as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_without_letterbox() {
        // view 1000x800 over a 2000x1600 raster: scale 0.5, no padding
        let m = ViewMapping::new(1000.0, 800.0, 2000, 1600);
        assert_eq!(m.scale(), 0.5);
        let p = m.to_image_space(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(p, Point::new(200.0, 1400.0));
    }

    #[test]
    fn letterbox_offsets_are_symmetric() {
        // 1000x1000 view over a 2:1 raster leaves 250 units above and below
        let m = ViewMapping::new(1000.0, 1000.0, 2000, 1000);
        let p = m.to_image_space(Point::new(500.0, 500.0)).unwrap();
        assert_eq!(p, Point::new(1000.0, 500.0));
        // Points inside the padding band are out of bounds
        assert!(m.to_image_space(Point::new(500.0, 100.0)).is_none());
        assert!(m.to_image_space(Point::new(500.0, 900.0)).is_none());
    }

    #[test]
    fn round_trip_within_tolerance() {
        let m = ViewMapping::new(1280.0, 720.0, 1920, 1080);
        for (x, y) in [(0.0, 0.0), (640.0, 360.0), (1279.0, 719.0), (13.0, 77.0)] {
            let view = Point::new(x, y);
            let image = m.to_image_space(view).unwrap();
            let back = m.to_view_space(image).unwrap();
            assert!(back.distance(view) < 1e-3, "{view:?} -> {image:?} -> {back:?}");
        }
    }

    #[test]
    fn degenerate_view_maps_nothing() {
        let m = ViewMapping::new(0.0, 0.0, 1920, 1080);
        assert!(m.is_degenerate());
        assert!(m.to_image_space(Point::new(10.0, 10.0)).is_none());
        assert!(m.to_view_space(Point::new(10.0, 10.0)).is_none());

        let m = ViewMapping::new(100.0, 100.0, 0, 0);
        assert!(m.is_degenerate());
        assert!(m.to_image_space(Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn selection_rect_maps_to_pixel_crop() {
        let m = ViewMapping::new(1000.0, 800.0, 2000, 1600);
        let view_rect = Rect::from_corners(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let img = m.rect_to_image_space(view_rect).unwrap();
        let (x, y, w, h) = m.image_rect_to_pixels(img);
        assert_eq!((x, y, w, h), (200, 200, 400, 300));
    }
}
