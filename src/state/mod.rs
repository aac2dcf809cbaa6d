//! Workspace state machine (pure).
//!
//! All state transitions are plain functions and methods testable without
//! any I/O.

pub mod command;
pub mod preview;
pub mod selection;
pub mod workspace;

// Re-export for convenience
pub use command::Command;
pub use preview::{
    resolve_preview_url, PreviewSession, PreviewSessionId, PreviewSignal, PreviewTracker,
    SignalOutcome,
};
pub use selection::{reconcile, Selection, SelectionEvent};
pub use workspace::{Clock, ListingState, Workspace};
