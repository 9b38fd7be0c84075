//! snipmark: screenshot region selection, annotation and export
//!
//! The crate covers the interaction core of a screenshot annotator: the
//! selection/resize state machine, the shape model, the view-to-image
//! coordinate mapping, the compositor that bakes annotations into a raster,
//! and the quality-tiered export pipeline. Screen capture acquisition,
//! network services and window chrome are external collaborators consumed
//! through the narrow interfaces in [`capture`] and [`export`].

pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod magnifier;
pub mod render;
pub mod session;

pub use capture::CapturedFrame;
pub use config::{QualityTier, Settings, ShapeColor, ZoomFactor};
pub use domain::{
    AnnotationList, Point, Rect, ResizeHandle, SelectionState, Shape, ShapeKind, ToolMode,
    ViewMapping,
};
pub use export::worker::{ExportDelivery, ExportJob, ExportWorker};
pub use export::{EncodedFormat, EncodedImage, ExportError};
pub use render::{StampPlan, Watermark, flatten};
pub use session::{GestureEvent, Session, SessionKind, Transition, handle_gesture};
