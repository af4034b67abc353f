//! Task Queue collaborator: at-least-once asynchronous execution of scan and
//! notification jobs, decoupled from the request path.

pub mod context;
pub mod queue;

pub use context::{empty_context_weak, TaskHandlerContext};
pub use queue::{TaskQueue, TaskQueueConfig};
