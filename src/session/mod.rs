//! Annotation session: mutable state plus gesture handlers

pub mod handlers;
pub mod state;

pub use handlers::{GestureEvent, Transition, handle_gesture, trigger_quick_export};
pub use state::{Session, SessionKind};
