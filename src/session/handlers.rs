//! Gesture handlers
//!
//! Pure-ish update functions: `(session, event) -> Transition`, dispatched
//! on the active tool mode. The caller (overlay chrome) reacts to the
//! returned transition; the handlers themselves never touch presentation.

use crate::domain::{Point, SelectionPhase, Shape, ToolMode};
use crate::export::worker::ExportDelivery;

use super::state::Session;

/// A pointer gesture in view-space coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Begin(Point),
    Drag(Point),
    End(Point),
}

/// Observable outcome of one gesture event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Nothing observable changed
    Inert,
    /// The selection rectangle moved or resized
    SelectionChanged,
    /// A selection gesture finished
    SelectionCommitted,
    /// The transient shape gained a point
    ShapeProgress,
    /// The transient shape was appended to the annotation list
    ShapeCommitted,
    /// Color-pick sampled this pixel under the pointer
    ColorSampled([u8; 4]),
    /// The magnify rect moved; the preview should re-render
    MagnifierChanged,
    /// Quick-capture selection is complete: the consumer should export
    /// now and close the session
    QuickCaptureReady,
}

/// Route a gesture event to the active tool's handler
pub fn handle_gesture(session: &mut Session, event: GestureEvent) -> Transition {
    if session.mapping().is_degenerate() {
        return Transition::Inert;
    }
    match session.tool {
        ToolMode::Selection => handle_selection(session, event),
        ToolMode::ColorPick => handle_color_pick(session, event),
        ToolMode::Magnify => handle_magnify(session, event),
        _ => handle_draw(session, event),
    }
}

fn handle_selection(session: &mut Session, event: GestureEvent) -> Transition {
    match event {
        GestureEvent::Begin(p) => {
            session.selection.begin(p);
            Transition::SelectionChanged
        }
        GestureEvent::Drag(p) => {
            if matches!(session.selection.phase, SelectionPhase::Idle) {
                return Transition::Inert;
            }
            session.selection.drag(p);
            Transition::SelectionChanged
        }
        GestureEvent::End(p) => {
            session.selection.drag(p);
            if !session.selection.end() {
                return Transition::Inert;
            }
            if session.kind.exports_on_selection() && !session.selection.rect.is_degenerate() {
                return Transition::QuickCaptureReady;
            }
            Transition::SelectionCommitted
        }
    }
}

fn handle_draw(session: &mut Session, event: GestureEvent) -> Transition {
    match event {
        GestureEvent::Begin(p) => {
            session.transient =
                Shape::begin(session.tool, p, session.color, session.stroke_width);
            if session.transient.is_some() {
                Transition::ShapeProgress
            } else {
                Transition::Inert
            }
        }
        GestureEvent::Drag(p) => match &mut session.transient {
            Some(shape) => {
                shape.update(p);
                Transition::ShapeProgress
            }
            None => Transition::Inert,
        },
        GestureEvent::End(p) => match session.transient.take() {
            Some(mut shape) => {
                shape.update(p);
                session.annotations.push(shape);
                Transition::ShapeCommitted
            }
            None => Transition::Inert,
        },
    }
}

fn handle_color_pick(session: &mut Session, event: GestureEvent) -> Transition {
    match event {
        GestureEvent::Begin(p) => {
            // One sampler per drag; every sampled point reuses it.
            let sampler = session.frame().color_sampler();
            let sampled = sampler.sample(p);
            session.sampler = Some(sampler);
            match sampled {
                Some(rgba) => Transition::ColorSampled(rgba),
                None => Transition::Inert,
            }
        }
        GestureEvent::Drag(p) => match session.sampler.as_ref().and_then(|s| s.sample(p)) {
            Some(rgba) => Transition::ColorSampled(rgba),
            None => Transition::Inert,
        },
        GestureEvent::End(p) => {
            let sampled = session.sampler.take().and_then(|s| s.sample(p));
            match sampled {
                Some(rgba) => Transition::ColorSampled(rgba),
                None => Transition::Inert,
            }
        }
    }
}

fn handle_magnify(session: &mut Session, event: GestureEvent) -> Transition {
    match event {
        GestureEvent::Begin(p) => {
            session.magnifier.begin(p);
            Transition::MagnifierChanged
        }
        GestureEvent::Drag(p) => {
            session.magnifier.drag(p);
            Transition::MagnifierChanged
        }
        GestureEvent::End(p) => {
            session.magnifier.drag(p);
            session.magnifier.end();
            Transition::MagnifierChanged
        }
    }
}

/// Quick-capture follow-up: run the export the gesture asked for.
///
/// Returns false if an export was already in flight for this session.
pub fn trigger_quick_export(session: &mut Session) -> bool {
    session.request_export(ExportDelivery::Clipboard)
}
