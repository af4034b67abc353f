//! Lifecycle engine services.
//!
//! Handler logic stays thin; these services own the idea state machine, the
//! document upload/scan pipeline, and the retention sweep, and are unit
//! testable without HTTP.

pub mod document_pipeline;
pub mod idea_lifecycle;
pub mod retention;
