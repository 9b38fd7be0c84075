//! Geometric types for selection regions and annotation coordinates

/// Point in view-space coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in view-space coordinates.
///
/// Width and height are always non-negative: construction goes through
/// [`Rect::from_corners`], which normalizes via min/max of the two points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Build a normalized rectangle from two arbitrary corner points
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: a.x.max(b.x) - x,
            h: a.y.max(b.y) - y,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// A rectangle with zero area produces no crop region and no export
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect {
                x: left,
                y: top,
                w: right - left,
                h: bottom - top,
            })
        } else {
            None
        }
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let corners = [
            (Point::new(10.0, 10.0), Point::new(50.0, 40.0)),
            (Point::new(50.0, 40.0), Point::new(10.0, 10.0)),
            (Point::new(50.0, 10.0), Point::new(10.0, 40.0)),
            (Point::new(10.0, 40.0), Point::new(50.0, 10.0)),
        ];
        for (a, b) in corners {
            let r = Rect::from_corners(a, b);
            assert_eq!(
                r,
                Rect {
                    x: 10.0,
                    y: 10.0,
                    w: 40.0,
                    h: 30.0
                }
            );
        }
    }

    #[test]
    fn zero_area_rect_is_degenerate() {
        let p = Point::new(5.0, 5.0);
        assert!(Rect::from_corners(p, p).is_degenerate());
        assert!(!Rect::from_corners(p, Point::new(6.0, 6.0)).is_degenerate());
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Rect::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = Rect::from_corners(Point::new(20.0, 20.0), Point::new(30.0, 30.0));
        assert_eq!(a.intersect(b), None);
        let c = Rect::from_corners(Point::new(5.0, 5.0), Point::new(15.0, 15.0));
        assert_eq!(
            a.intersect(c),
            Some(Rect {
                x: 5.0,
                y: 5.0,
                w: 5.0,
                h: 5.0
            })
        );
    }
}
