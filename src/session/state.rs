//! Interactive annotation session state
//!
//! One session owns the captured frame, the selection state machine, the
//! annotation list and the export slot. Exactly one session is live at a
//! time; opening a new capture tears the previous session down first.

use std::sync::Arc;

use crate::capture::{CapturedFrame, ColorSampler};
use crate::config::{Settings, ShapeColor, ZoomFactor};
use crate::domain::{AnnotationList, SelectionState, Shape, ToolMode, ViewMapping};
use crate::export::worker::{ExportDelivery, ExportJob, ExportWorker};
use crate::export::{EncodedImage, ExportError};
use crate::magnifier::MagnifierState;
use crate::render::StampPlan;

/// What the session was opened for.
///
/// Quick-capture kinds export immediately when the selection gesture ends
/// and then close; interactive sessions stay open for annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    #[default]
    Interactive,
    QuickOcr,
    QuickTranslate,
}

impl SessionKind {
    pub fn exports_on_selection(self) -> bool {
        matches!(self, SessionKind::QuickOcr | SessionKind::QuickTranslate)
    }
}

/// Mutable state of one annotation session.
///
/// Gesture handling mutates this synchronously on the interaction thread;
/// flatten and encode run on the export worker over snapshots.
pub struct Session {
    pub kind: SessionKind,
    frame: Arc<CapturedFrame>,
    mapping: ViewMapping,
    pub selection: SelectionState,
    pub tool: ToolMode,
    pub annotations: AnnotationList,
    /// In-progress shape of the current drag, not yet in the list
    pub transient: Option<Shape>,
    pub color: ShapeColor,
    pub stroke_width: f32,
    pub magnifier: MagnifierState,
    /// Pixel lookup for the active color-pick drag
    pub(crate) sampler: Option<ColorSampler>,
    pub settings: Settings,
    exporter: ExportWorker,
}

impl Session {
    pub fn new(frame: CapturedFrame, settings: Settings, kind: SessionKind) -> Self {
        let frame = Arc::new(frame);
        let mapping = frame.mapping();
        if mapping.is_degenerate() {
            log::warn!("Session opened with a degenerate view, gestures will be inert");
        }
        Self {
            kind,
            frame,
            mapping,
            selection: SelectionState::default(),
            tool: ToolMode::Selection,
            annotations: AnnotationList::default(),
            transient: None,
            color: settings.shape_color,
            stroke_width: settings.stroke_width,
            magnifier: MagnifierState::new(settings.magnifier_zoom),
            sampler: None,
            settings,
            exporter: ExportWorker::default(),
        }
    }

    pub fn frame(&self) -> &Arc<CapturedFrame> {
        &self.frame
    }

    pub fn mapping(&self) -> ViewMapping {
        self.mapping
    }

    /// Switch the active tool. Selecting the already-active tool toggles
    /// back to selection. Any transient shape or drag state is discarded.
    pub fn set_tool(&mut self, tool: ToolMode) {
        let next = if tool == self.tool {
            ToolMode::Selection
        } else {
            tool
        };
        if next != self.tool {
            log::debug!("Tool mode {:?} -> {next:?}", self.tool);
        }
        self.tool = next;
        self.transient = None;
        self.sampler = None;
        self.magnifier.end();
        if self.tool != ToolMode::Magnify {
            self.magnifier.clear();
        }
    }

    /// Remove the most recently committed shape
    pub fn undo(&mut self) -> Option<Shape> {
        self.annotations.pop_last()
    }

    pub fn clear_annotations(&mut self) {
        self.transient = None;
        self.annotations.clear();
    }

    /// Modifier-scroll zoom cycle; the new factor is written back so it
    /// persists across sessions
    pub fn cycle_magnifier_zoom(&mut self) -> ZoomFactor {
        let zoom = self.magnifier.cycle_zoom();
        self.settings.magnifier_zoom = zoom;
        self.settings.save();
        zoom
    }

    fn stamp_plan(&self) -> StampPlan {
        let mut plan = StampPlan::from_settings(&self.settings);
        plan.color = self.color;
        plan
    }

    /// Snapshot the session for the export worker.
    ///
    /// The annotation list is cloned so the worker never shares mutable
    /// state with the interaction thread.
    pub fn export_job(&self, delivery: ExportDelivery) -> ExportJob {
        ExportJob {
            frame: Arc::clone(&self.frame),
            shapes: self.annotations.snapshot(),
            mapping: self.mapping,
            selection_view: self.selection.rect,
            stamps: self.stamp_plan(),
            tier: self.settings.quality,
            downscale_enabled: self.settings.downscale_minimum,
            delivery,
        }
    }

    /// Kick off a background export; false if one is already in flight
    pub fn request_export(&mut self, delivery: ExportDelivery) -> bool {
        self.exporter.submit(self.export_job(delivery))
    }

    pub fn export_in_flight(&self) -> bool {
        self.exporter.in_flight()
    }

    /// Poll for a finished export result
    pub fn poll_export(&mut self) -> Option<Result<EncodedImage, ExportError>> {
        self.exporter.try_recv()
    }

    /// Block for the in-flight export, mainly for quick-capture flows
    pub fn wait_export(&mut self) -> Option<Result<EncodedImage, ExportError>> {
        self.exporter.wait()
    }

    /// Tear the session down before a new capture opens.
    ///
    /// Cancels any in-flight gesture, discards the transient shape and
    /// abandons any running export. The raster drops with the session.
    pub fn teardown(&mut self) {
        self.selection.clear();
        self.transient = None;
        self.sampler = None;
        self.annotations.clear();
        self.magnifier.clear();
        self.exporter.abandon();
        log::debug!("Session torn down");
    }
}
