//! Annotation tool modes and the shape model
//!
//! Shapes store coordinates in view space; the single view-to-image
//! transform happens at flatten time. A shape is never mutated after it is
//! appended to the list; edits are modeled as undo plus recreate.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};
use crate::config::ShapeColor;

/// Active interaction tool. Exactly one is active at a time; switching
/// modes discards any transient in-progress shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Selection,
    Freehand,
    Line,
    Arrow,
    Redact,
    Highlight,
    Blur,
    ColorPick,
    Magnify,
}

impl ToolMode {
    /// Whether drags in this mode build an annotation shape
    pub fn draws_shape(self) -> bool {
        matches!(
            self,
            ToolMode::Freehand
                | ToolMode::Line
                | ToolMode::Arrow
                | ToolMode::Redact
                | ToolMode::Highlight
                | ToolMode::Blur
        )
    }
}

/// Geometry variant of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Ordered sequence of sampled drag points
    Freehand(Vec<Point>),
    Line { start: Point, end: Point },
    Arrow { start: Point, end: Point },
    /// Solid fill over the bounding rect of start/end
    Redact { start: Point, end: Point },
    /// Stroked outline of the bounding rect of start/end
    Highlight { start: Point, end: Point },
    /// Gaussian blur of the bounding rect, sampled from the working buffer
    Blur { start: Point, end: Point },
}

/// One committed (or in-progress) annotation mark.
///
/// Color and stroke width are captured at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: ShapeColor,
    pub width: f32,
}

impl Shape {
    /// Start a transient shape for the given tool at the drag origin
    pub fn begin(tool: ToolMode, start: Point, color: ShapeColor, width: f32) -> Option<Self> {
        let kind = match tool {
            ToolMode::Freehand => ShapeKind::Freehand(vec![start]),
            ToolMode::Line => ShapeKind::Line { start, end: start },
            ToolMode::Arrow => ShapeKind::Arrow { start, end: start },
            ToolMode::Redact => ShapeKind::Redact { start, end: start },
            ToolMode::Highlight => ShapeKind::Highlight { start, end: start },
            ToolMode::Blur => ShapeKind::Blur { start, end: start },
            _ => return None,
        };
        Some(Self { kind, color, width })
    }

    /// Feed a sampled drag point into the transient shape
    pub fn update(&mut self, p: Point) {
        match &mut self.kind {
            ShapeKind::Freehand(points) => points.push(p),
            ShapeKind::Line { end, .. }
            | ShapeKind::Arrow { end, .. }
            | ShapeKind::Redact { end, .. }
            | ShapeKind::Highlight { end, .. }
            | ShapeKind::Blur { end, .. } => *end = p,
        }
    }

    /// Bounding rect for the two-point rectangle kinds
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Freehand(points) => {
                let mut min = Point::new(f32::MAX, f32::MAX);
                let mut max = Point::new(f32::MIN, f32::MIN);
                for p in points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                Rect::from_corners(min, max)
            }
            ShapeKind::Line { start, end }
            | ShapeKind::Arrow { start, end }
            | ShapeKind::Redact { start, end }
            | ShapeKind::Highlight { start, end }
            | ShapeKind::Blur { start, end } => Rect::from_corners(*start, *end),
        }
    }
}

/// Append-only ordered list of committed shapes.
///
/// Paint order equals list order; later entries occlude earlier ones.
#[derive(Debug, Clone, Default)]
pub struct AnnotationList {
    shapes: Vec<Shape>,
}

impl AnnotationList {
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Undo: remove and return the most recently appended shape
    pub fn pop_last(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    /// Session reset
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Immutable snapshot handed to the compositor; the live list stays
    /// with the interaction thread.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(tool: ToolMode) -> Shape {
        Shape::begin(tool, Point::new(1.0, 2.0), ShapeColor::default(), 4.0).unwrap()
    }

    #[test]
    fn freehand_accumulates_every_sampled_point() {
        let mut s = shape(ToolMode::Freehand);
        s.update(Point::new(2.0, 3.0));
        s.update(Point::new(3.0, 4.0));
        match &s.kind {
            ShapeKind::Freehand(points) => assert_eq!(points.len(), 3),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn two_point_kinds_only_track_the_end() {
        let mut s = shape(ToolMode::Line);
        s.update(Point::new(5.0, 5.0));
        s.update(Point::new(9.0, 9.0));
        assert_eq!(
            s.kind,
            ShapeKind::Line {
                start: Point::new(1.0, 2.0),
                end: Point::new(9.0, 9.0),
            }
        );
    }

    #[test]
    fn non_drawing_tools_begin_nothing() {
        for tool in [ToolMode::Selection, ToolMode::ColorPick, ToolMode::Magnify] {
            assert!(Shape::begin(tool, Point::default(), ShapeColor::default(), 1.0).is_none());
            assert!(!tool.draws_shape());
        }
    }

    #[test]
    fn pop_last_is_lifo() {
        let mut list = AnnotationList::default();
        list.push(shape(ToolMode::Line));
        list.push(shape(ToolMode::Redact));
        let popped = list.pop_last().unwrap();
        assert!(matches!(popped.kind, ShapeKind::Redact { .. }));
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
