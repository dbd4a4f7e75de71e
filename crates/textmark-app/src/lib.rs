//! TextMark Application
//!
//! The application shell: the workspace that wires the annotation store
//! and document binding together, and the demo viewer overlay.

mod viewer;
mod workspace;

pub use viewer::{Viewer, DEMO_PAGE_COUNT, OVERLAY_LINES};
pub use workspace::{Workspace, WorkspaceEvent, DOCUMENT_PROCESSING_DELAY};
