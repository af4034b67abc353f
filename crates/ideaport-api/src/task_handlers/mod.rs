//! Background task handlers and dispatch.
//!
//! The worker claims tasks and hands them back here through the
//! `TaskHandlerContext` implementation on `AppState`, which routes by task
//! type.

pub mod notification_handler;
pub mod virus_scan_handler;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use ideaport_core::models::{Task, TaskType};
use ideaport_worker::TaskHandlerContext;

use crate::state::AppState;
pub use notification_handler::NotificationTaskHandler;
pub use virus_scan_handler::VirusScanTaskHandler;

/// One handler per task family. Handlers return a JSON result persisted on
/// the task row, or a `TaskError` deciding whether the queue retries.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn process(&self, task: &Task, state: Arc<AppState>) -> Result<serde_json::Value>;
}

#[async_trait]
impl TaskHandlerContext for AppState {
    async fn dispatch_task(self: Arc<Self>, task: &Task) -> Result<serde_json::Value> {
        match task.task_type {
            TaskType::VirusScan => VirusScanTaskHandler.process(task, self.clone()).await,
            TaskType::SubmissionConfirmation | TaskType::ContributorNotification => {
                NotificationTaskHandler.process(task, self.clone()).await
            }
        }
    }
}
