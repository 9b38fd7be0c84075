//! Selection rectangle state machine and resize handle hit-testing

use super::geometry::{Point, Rect};

/// Distance tolerance for grabbing a handle, in view-space units
pub const HANDLE_GRAB_DISTANCE: f32 = 20.0;

/// Resize handles on the committed selection rectangle
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    #[default]
    None,
    /// North-West corner
    NW,
    /// North edge midpoint
    N,
    /// North-East corner
    NE,
    /// East edge midpoint
    E,
    /// South-East corner
    SE,
    /// South edge midpoint
    S,
    /// South-West corner
    SW,
    /// West edge midpoint
    W,
}

impl ResizeHandle {
    /// Hit-test a gesture-begin point against the rectangle's handles.
    ///
    /// The four corners are tested before the four edge midpoints, and the
    /// nearest corner wins a tie with any edge.
    pub fn hit_test(rect: Rect, p: Point) -> ResizeHandle {
        let corners = [
            (ResizeHandle::NW, rect.top_left()),
            (ResizeHandle::NE, Point::new(rect.right(), rect.top())),
            (ResizeHandle::SE, rect.bottom_right()),
            (ResizeHandle::SW, Point::new(rect.left(), rect.bottom())),
        ];
        let mut best = ResizeHandle::None;
        let mut best_dist = HANDLE_GRAB_DISTANCE;
        for (handle, corner) in corners {
            let d = p.distance(corner);
            if d < best_dist {
                best = handle;
                best_dist = d;
            }
        }
        if best != ResizeHandle::None {
            return best;
        }

        let midpoints = [
            (ResizeHandle::N, Point::new(rect.center().x, rect.top())),
            (ResizeHandle::E, Point::new(rect.right(), rect.center().y)),
            (ResizeHandle::S, Point::new(rect.center().x, rect.bottom())),
            (ResizeHandle::W, Point::new(rect.left(), rect.center().y)),
        ];
        for (handle, mid) in midpoints {
            let d = p.distance(mid);
            if d < best_dist {
                best = handle;
                best_dist = d;
            }
        }
        best
    }

    /// Recompute the rectangle from this handle's fixed anchor and the
    /// current drag point. Always min/max from the anchor, never an
    /// incremental delta, so the rectangle can never invert.
    pub fn resize(self, origin: Rect, p: Point) -> Rect {
        match self {
            ResizeHandle::None => origin,
            ResizeHandle::NW => Rect::from_corners(origin.bottom_right(), p),
            ResizeHandle::NE => {
                Rect::from_corners(Point::new(origin.left(), origin.bottom()), p)
            }
            ResizeHandle::SE => Rect::from_corners(origin.top_left(), p),
            ResizeHandle::SW => {
                Rect::from_corners(Point::new(origin.right(), origin.top()), p)
            }
            ResizeHandle::N => vertical_resize(origin, origin.bottom(), p.y),
            ResizeHandle::S => vertical_resize(origin, origin.top(), p.y),
            ResizeHandle::W => horizontal_resize(origin, origin.right(), p.x),
            ResizeHandle::E => horizontal_resize(origin, origin.left(), p.x),
        }
    }
}

fn vertical_resize(origin: Rect, fixed_y: f32, y: f32) -> Rect {
    Rect {
        x: origin.x,
        y: fixed_y.min(y),
        w: origin.w,
        h: (fixed_y - y).abs(),
    }
}

fn horizontal_resize(origin: Rect, fixed_x: f32, x: f32) -> Rect {
    Rect {
        x: fixed_x.min(x),
        y: origin.y,
        w: (fixed_x - x).abs(),
        h: origin.h,
    }
}

/// Phase of the selection gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPhase {
    Idle,
    /// A new rectangle is being dragged out from its start point
    Creating { start: Point },
    Committed,
    /// A committed rectangle is being resized by one handle
    Resizing {
        handle: ResizeHandle,
        origin: Rect,
    },
}

/// Selection rectangle plus its gesture state machine.
///
/// `Idle -> Creating -> Committed` and `Committed -> Resizing -> Committed`.
#[derive(Debug, Clone, Copy)]
pub struct SelectionState {
    pub rect: Rect,
    pub phase: SelectionPhase,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            phase: SelectionPhase::Idle,
        }
    }
}

impl SelectionState {
    /// Gesture-begin: grab a handle of the committed rect, or start creating
    pub fn begin(&mut self, p: Point) {
        if self.phase == SelectionPhase::Committed {
            let handle = ResizeHandle::hit_test(self.rect, p);
            if handle != ResizeHandle::None {
                self.phase = SelectionPhase::Resizing {
                    handle,
                    origin: self.rect,
                };
                return;
            }
        }
        self.rect = Rect::from_corners(p, p);
        self.phase = SelectionPhase::Creating { start: p };
    }

    /// Drag update: recompute the rectangle from the fixed anchor
    pub fn drag(&mut self, p: Point) {
        match self.phase {
            SelectionPhase::Creating { start } => {
                self.rect = Rect::from_corners(start, p);
            }
            SelectionPhase::Resizing { handle, origin } => {
                self.rect = handle.resize(origin, p);
            }
            SelectionPhase::Idle | SelectionPhase::Committed => {}
        }
    }

    /// Gesture-end: commit whatever was being created or resized.
    ///
    /// Returns true if a gesture actually finished.
    pub fn end(&mut self) -> bool {
        match self.phase {
            SelectionPhase::Creating { .. } | SelectionPhase::Resizing { .. } => {
                self.phase = SelectionPhase::Committed;
                true
            }
            _ => false,
        }
    }

    /// Session reset: back to an empty, idle selection
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
