//! Shared geometry calculations for shape rasterization

/// Arrow geometry constants
pub mod arrow {
    /// Arrowhead wing angle off the reverse shaft direction (30 degrees)
    pub const HEAD_ANGLE: f32 = 0.523_598_8; // 30.0_f32.to_radians()
    /// Head length relative to the scaled stroke width
    pub const HEAD_WIDTH_FACTOR: f32 = 3.5;
    /// Minimum head length in image pixels at scale 1.0
    pub const HEAD_MIN_LENGTH: f32 = 20.0;
    /// Minimum arrow length to get a head at all
    pub const MIN_LENGTH: f32 = 1.0;

    /// Arrowhead length for a given scaled stroke width and session scale
    pub fn head_length(scaled_width: f32, scale: f32) -> f32 {
        (HEAD_WIDTH_FACTOR * scaled_width).max(HEAD_MIN_LENGTH * scale)
    }

    /// Calculate the two wing points of the filled triangular head.
    ///
    /// Both wings sit `head_length` from the tip, rotated ±HEAD_ANGLE off
    /// the reverse shaft direction. Returns
    /// `(wing1_x, wing1_y, wing2_x, wing2_y)`, or `None` for a degenerate
    /// segment.
    pub fn head_points(
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        head_length: f32,
    ) -> Option<(f32, f32, f32, f32)> {
        let dx = end_x - start_x;
        let dy = end_y - start_y;
        let length = (dx * dx + dy * dy).sqrt();
        if length < MIN_LENGTH {
            return None;
        }

        // Reverse unit direction (pointing from tip back toward start)
        let rx = -dx / length;
        let ry = -dy / length;

        let cos_a = HEAD_ANGLE.cos();
        let sin_a = HEAD_ANGLE.sin();

        let wing1_x = end_x + (rx * cos_a - ry * sin_a) * head_length;
        let wing1_y = end_y + (rx * sin_a + ry * cos_a) * head_length;

        let wing2_x = end_x + (rx * cos_a + ry * sin_a) * head_length;
        let wing2_y = end_y + (-rx * sin_a + ry * cos_a) * head_length;

        Some((wing1_x, wing1_y, wing2_x, wing2_y))
    }
}

/// Blur region constants
pub mod blur {
    /// Fixed Gaussian blur radius for blur shapes, independent of any UI
    /// blur setting
    pub const RADIUS: f32 = 30.0;
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}
