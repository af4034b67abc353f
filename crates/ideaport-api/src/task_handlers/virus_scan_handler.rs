//! Asynchronous virus scan of an uploaded document.
//!
//! Verdict mapping: infected -> record INFECTED and delete the stored
//! object (the record is retained for audit); clean -> record CLEAN.
//! Collaborator transport errors are recoverable and retried by the queue
//! with exponential backoff; once retries are exhausted the document simply
//! stays PENDING.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use ideaport_core::models::{Task, TaskType, VirusScanPayload, VirusScanStatus};
use ideaport_core::TaskError;
use ideaport_services::ScanVerdict;
use ideaport_storage::StorageError;

use crate::state::AppState;
use crate::task_handlers::TaskHandler;

#[derive(Clone)]
pub struct VirusScanTaskHandler;

#[async_trait]
impl TaskHandler for VirusScanTaskHandler {
    async fn process(&self, task: &Task, state: Arc<AppState>) -> Result<serde_json::Value> {
        if task.task_type != TaskType::VirusScan {
            return Err(TaskError::unrecoverable(anyhow::anyhow!(
                "Invalid task type for virus scan handler"
            ))
            .into());
        }

        let payload: VirusScanPayload = task
            .try_payload_as()
            .map_err(|e| TaskError::unrecoverable(anyhow::anyhow!("Invalid scan payload: {}", e)))?;

        let document = state
            .db
            .document_repository
            .get(payload.document_id)
            .await?
            .ok_or_else(|| {
                tracing::error!(document_id = %payload.document_id, "Document not found for scan");
                TaskError::unrecoverable(anyhow::anyhow!(
                    "Document not found: {}",
                    payload.document_id
                ))
            })?;

        // Duplicate scan deliveries for an already-settled document just
        // re-confirm the verdict; the terminal write is last-write-wins.
        if document.virus_scan_status.is_terminal() {
            tracing::info!(
                document_id = %document.id,
                status = %document.virus_scan_status,
                "Document already scanned, re-confirming verdict"
            );
            return Ok(json!({
                "status": document.virus_scan_status.to_string(),
                "note": "already scanned",
            }));
        }

        let data = match state.storage.download(&document.file_path).await {
            Ok(data) => data,
            Err(StorageError::NotFound(key)) => {
                return Err(TaskError::unrecoverable(anyhow::anyhow!(
                    "Stored object missing for scan: {}",
                    key
                ))
                .into());
            }
            Err(e) => {
                return Err(TaskError::recoverable(anyhow::anyhow!(
                    "Failed to download stored object: {}",
                    e
                ))
                .into());
            }
        };

        tracing::info!(
            document_id = %document.id,
            file_name = %document.file_name,
            "Scanning uploaded file"
        );

        match state.scanner.scan_bytes(&data).await {
            Ok(ScanVerdict::Infected(virus_name)) => {
                tracing::warn!(
                    document_id = %document.id,
                    file_name = %document.file_name,
                    virus = %virus_name,
                    "Virus detected in uploaded file"
                );

                state
                    .db
                    .document_repository
                    .record_scan_verdict(
                        document.id,
                        VirusScanStatus::Infected,
                        &format!("Virus detected: {}", virus_name),
                    )
                    .await?;

                // The record stays for audit; only the stored bytes go.
                if let Err(e) = state.storage.delete(&document.file_path).await {
                    tracing::error!(
                        error = %e,
                        document_id = %document.id,
                        key = %document.file_path,
                        "Failed to delete infected object from storage"
                    );
                }

                Ok(json!({ "status": "infected", "virus": virus_name }))
            }
            Ok(ScanVerdict::Clean) => {
                state
                    .db
                    .document_repository
                    .record_scan_verdict(document.id, VirusScanStatus::Clean, "clean")
                    .await?;

                tracing::info!(document_id = %document.id, "File is clean");

                Ok(json!({ "status": "clean" }))
            }
            Err(e) => Err(TaskError::recoverable(anyhow::anyhow!(
                "Virus scan failed: {}",
                e
            ))
            .into()),
        }
    }
}
