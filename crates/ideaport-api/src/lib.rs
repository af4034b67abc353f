//! ideaport API: HTTP surface, lifecycle engine, and background task
//! handlers for the idea-submission portal.
//!
//! Exposed as a library so integration tests can build the application state
//! and router without going through `main`.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod task_handlers;
pub mod utils;
