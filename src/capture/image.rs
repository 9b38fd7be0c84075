//! Captured screen raster for one annotation session

use std::sync::Arc;

use image::RgbaImage;

use crate::domain::{Point, ViewMapping};

/// A captured screen raster plus the logical view geometry it is shown in.
///
/// Supplied once per session by the capture collaborator; the pixel buffer
/// is never mutated after construction.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    rgba: RgbaImage,
    view_w: f32,
    view_h: f32,
}

impl CapturedFrame {
    pub fn new(rgba: RgbaImage, view_w: f32, view_h: f32) -> Self {
        log::debug!(
            "Captured frame: {}x{} pixels in a {view_w}x{view_h} view",
            rgba.width(),
            rgba.height()
        );
        Self {
            rgba,
            view_w,
            view_h,
        }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// The fixed view-to-image mapping for this session
    pub fn mapping(&self) -> ViewMapping {
        ViewMapping::new(self.view_w, self.view_h, self.width(), self.height())
    }

    /// Build the pixel lookup for the color-pick tool.
    ///
    /// Constructed once when the pick drag begins; every sampled point of
    /// the drag goes through the same sampler.
    pub fn color_sampler(self: &Arc<Self>) -> ColorSampler {
        ColorSampler {
            frame: Arc::clone(self),
            mapping: self.mapping(),
        }
    }
}

/// Cached pixel lookup for color picking
pub struct ColorSampler {
    frame: Arc<CapturedFrame>,
    mapping: ViewMapping,
}

impl ColorSampler {
    /// Sample the pixel under a view-space point, `None` outside the image
    pub fn sample(&self, view_point: Point) -> Option<[u8; 4]> {
        let image_point = self.mapping.to_image_space(view_point)?;
        let (x, y) = self.mapping.image_point_to_pixel(image_point)?;
        Some(self.frame.rgba.get_pixel(x, y).0)
    }
}
