//! Background flatten-and-encode worker
//!
//! Flatten and encode are CPU-bound raster passes, so they run on a worker
//! thread over an immutable snapshot of the session state. The interaction
//! thread hands the snapshot off and polls for the result; it never blocks
//! on encoding. At most one export per session is in flight at a time, and
//! abandoning the handle discards the result cleanly.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, bounded};

use super::{EncodedImage, ExportError, crop_selection, encode, encode_for_clipboard};
use crate::capture::CapturedFrame;
use crate::config::QualityTier;
use crate::domain::{Rect, Shape, ViewMapping};
use crate::render::StampPlan;

/// Where the encoded bytes are headed; clipboard delivery forces lossless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDelivery {
    File,
    Clipboard,
}

/// Immutable snapshot of everything one export needs
#[derive(Clone)]
pub struct ExportJob {
    pub frame: Arc<CapturedFrame>,
    pub shapes: Vec<Shape>,
    pub mapping: ViewMapping,
    pub selection_view: Rect,
    pub stamps: StampPlan,
    pub tier: QualityTier,
    pub downscale_enabled: bool,
    pub delivery: ExportDelivery,
}

impl ExportJob {
    /// Run the full flatten-crop-encode pipeline synchronously
    pub fn run(&self) -> Result<EncodedImage, ExportError> {
        let flattened = crate::render::flatten(
            self.frame.rgba(),
            &self.shapes,
            &self.mapping,
            self.selection_view,
            &self.stamps,
        );
        let cropped = crop_selection(&flattened, &self.mapping, self.selection_view)?;
        match self.delivery {
            ExportDelivery::File => encode(&cropped, self.tier, self.downscale_enabled),
            ExportDelivery::Clipboard => encode_for_clipboard(&cropped),
        }
    }
}

/// Per-session export scheduler; owns the single in-flight slot
#[derive(Default)]
pub struct ExportWorker {
    pending: Option<Receiver<Result<EncodedImage, ExportError>>>,
}

impl ExportWorker {
    /// Hand a job off to a worker thread.
    ///
    /// Returns false without starting anything if an export for this
    /// session is already in flight.
    pub fn submit(&mut self, job: ExportJob) -> bool {
        if self.in_flight() {
            log::debug!("Export already in flight, ignoring request");
            return false;
        }
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let result = job.run();
            if tx.send(result).is_err() {
                // Session closed while we were encoding; discard.
                log::debug!("Export result abandoned");
            }
        });
        self.pending = Some(rx);
        true
    }

    /// Whether an export is still running or its result unclaimed
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Non-blocking poll for the finished result
    pub fn try_recv(&mut self) -> Option<Result<EncodedImage, ExportError>> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                None
            }
        }
    }

    /// Block until the in-flight export finishes
    pub fn wait(&mut self) -> Option<Result<EncodedImage, ExportError>> {
        let rx = self.pending.take()?;
        rx.recv().ok()
    }

    /// Session teardown: any in-flight export completes on its thread and
    /// is discarded
    pub fn abandon(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Abandoning in-flight export");
        }
    }
}
