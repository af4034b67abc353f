//! Retention sweep: purge documents past the configured retention window.
//!
//! Runs periodically in the background. Each document is handled
//! independently; one failed deletion never blocks the rest of the sweep.
//! The sweep does not distinguish by scan status: PENDING, CLEAN, and
//! INFECTED records past the window are all purged.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use ideaport_db::DocumentRepository;
use ideaport_storage::{Storage, StorageError};

use crate::state::AppState;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RetentionSweepResult {
    /// Records older than the cutoff that the sweep examined.
    pub processed: usize,
    /// Records whose object and row were removed.
    pub deleted: usize,
    /// Records skipped this sweep because their stored object could not be
    /// deleted; they are retried on the next run.
    pub failed: usize,
}

/// Delete every document uploaded before the retention cutoff.
pub async fn cleanup_old_files(
    documents: &DocumentRepository,
    storage: &Arc<dyn Storage>,
    retention_days: i64,
) -> RetentionSweepResult {
    let cutoff = Utc::now() - ChronoDuration::days(retention_days);

    let expired = match documents.list_uploaded_before(cutoff).await {
        Ok(expired) => expired,
        Err(e) => {
            tracing::error!(error = %e, "Retention sweep failed to list expired documents");
            return RetentionSweepResult::default();
        }
    };

    let mut result = RetentionSweepResult {
        processed: expired.len(),
        ..Default::default()
    };

    for document in expired {
        match storage.delete(&document.file_path).await {
            // Already gone (e.g. removed after an infected verdict): the row
            // can still be purged.
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    document_id = %document.id,
                    key = %document.file_path,
                    "Retention sweep failed to delete stored object, skipping record"
                );
                result.failed += 1;
                continue;
            }
        }

        match documents.delete(document.id).await {
            Ok(_) => result.deleted += 1,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    document_id = %document.id,
                    "Retention sweep failed to delete document record"
                );
                result.failed += 1;
            }
        }
    }

    tracing::info!(
        processed = result.processed,
        deleted = result.deleted,
        failed = result.failed,
        retention_days = retention_days,
        "Retention sweep finished"
    );

    result
}

/// Spawn the periodic retention sweep for the application's lifetime.
pub fn spawn_retention_sweep(state: Arc<AppState>) {
    let interval_secs = state.config.retention_sweep_interval_secs;
    let retention_days = state.config.document_retention_days;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            cleanup_old_files(&state.db.document_repository, &state.storage, retention_days)
                .await;
        }
    });

    tracing::info!(
        interval_secs = interval_secs,
        retention_days = retention_days,
        "Retention sweep scheduled"
    );
}
