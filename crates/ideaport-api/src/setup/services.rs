//! Service initialization and application state setup

use sqlx::PgPool;
use std::sync::{Arc, Weak};

use crate::state::{AppState, DbState, DocumentConfig, SecurityConfig};
use ideaport_core::Config;
use ideaport_services::{EmailService, VirusScanner};
use ideaport_storage::Storage;
use ideaport_worker::{TaskHandlerContext, TaskQueue, TaskQueueConfig};

fn task_queue_config(config: &Config) -> TaskQueueConfig {
    TaskQueueConfig {
        max_workers: config.task_queue_max_workers,
        poll_interval_ms: config.task_queue_poll_interval_ms,
        default_timeout_seconds: config.task_queue_default_timeout_seconds,
        max_retries: config.task_queue_max_retries,
    }
}

/// Build the shared application state.
///
/// The state's own queue handle submits tasks only; the consuming worker
/// pool is started separately with [`start_worker`] once the state exists,
/// because dispatch needs a (weak) reference back to the state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    scanner: Arc<dyn VirusScanner>,
) -> Arc<AppState> {
    let db = DbState::new(pool);

    let email = EmailService::from_config(config);
    if email.is_none() {
        tracing::info!("SMTP not configured; notification emails will be skipped");
    }

    let submit_queue = TaskQueue::new_no_worker(db.task_repository.clone(), task_queue_config(config));

    Arc::new(AppState {
        documents: DocumentConfig {
            max_file_size: config.max_document_size_bytes,
            allowed_extensions: config.document_allowed_extensions.clone(),
        },
        security: SecurityConfig {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
        },
        storage,
        scanner,
        email,
        task_queue: submit_queue,
        db,
        config: config.clone(),
    })
}

/// Start the worker pool consuming the task table, dispatching back into the
/// application state. The returned handle must stay alive for the pool to
/// keep running.
pub fn start_worker(config: &Config, state: &Arc<AppState>, pool: PgPool) -> TaskQueue {
    let context: Weak<dyn TaskHandlerContext> =
        Arc::downgrade(&(state.clone() as Arc<dyn TaskHandlerContext>));

    let worker = TaskQueue::new(
        state.db.task_repository.clone(),
        task_queue_config(config),
        context,
        Some(pool),
    );

    tracing::info!(
        max_workers = config.task_queue_max_workers,
        max_retries = config.task_queue_max_retries,
        "Task queue system initialized"
    );

    worker
}
