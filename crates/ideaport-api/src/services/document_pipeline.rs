//! Document upload pipeline and scan-status reads.
//!
//! Upload order matters: validate, store the bytes, then create the PENDING
//! record, then enqueue the scan. A storage failure leaves no record; a
//! record-insert failure triggers best-effort removal of the stored object.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use ideaport_core::constants::DOCUMENT_KEY_PREFIX;
use ideaport_core::models::{
    DocumentResponse, DownloadUrlResponse, ScanStatusResponse, Task, TaskType, User,
    VirusScanPayload,
};
use ideaport_core::validation::{
    sanitize_filename, validate_file_extension, validate_file_size,
};
use ideaport_core::AppError;
use ideaport_db::{DocumentRepository, IdeaRepository};
use ideaport_storage::Storage;
use ideaport_worker::TaskQueue;

use crate::constants::DOWNLOAD_URL_EXPIRY_SECS;
use crate::state::AppState;

pub struct DocumentPipelineService {
    ideas: IdeaRepository,
    documents: DocumentRepository,
    storage: Arc<dyn Storage>,
    task_queue: TaskQueue,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl DocumentPipelineService {
    pub fn new(state: &AppState) -> Self {
        Self {
            ideas: state.db.idea_repository.clone(),
            documents: state.db.document_repository.clone(),
            storage: state.storage.clone(),
            task_queue: state.task_queue.clone(),
            max_file_size: state.documents.max_file_size,
            allowed_extensions: state.documents.allowed_extensions.clone(),
        }
    }

    /// Upload a file for an idea and schedule its virus scan.
    pub async fn upload(
        &self,
        uploader: &User,
        idea_id: Uuid,
        data: Vec<u8>,
        original_name: &str,
    ) -> Result<DocumentResponse, AppError> {
        if self.ideas.get(idea_id).await?.is_none() {
            return Err(AppError::Validation("Idea not found".to_string()));
        }

        validate_file_size(data.len(), self.max_file_size)?;
        let extension = validate_file_extension(original_name, &self.allowed_extensions)?;
        let display_name = sanitize_filename(original_name);

        // Storage key is system-assigned and independent of the client name,
        // so colliding or hostile filenames cannot address other objects.
        let storage_key = format!(
            "{}/{}/{}.{}",
            DOCUMENT_KEY_PREFIX,
            idea_id,
            Uuid::new_v4(),
            extension
        );

        let file_size = data.len() as i64;
        self.storage
            .upload_with_key(&storage_key, data)
            .await
            .map_err(|e| AppError::FileUpload(format!("Failed to store file: {}", e)))?;

        let document = match self
            .documents
            .create(
                idea_id,
                &display_name,
                &storage_key,
                file_size,
                &extension,
                uploader.id,
            )
            .await
        {
            Ok(document) => document,
            Err(e) => {
                // The object is already stored; remove it so a failed insert
                // leaves nothing behind.
                let storage = self.storage.clone();
                let orphan_key = storage_key.clone();
                tokio::spawn(async move {
                    if let Err(delete_err) = storage.delete(&orphan_key).await {
                        tracing::error!(
                            error = %delete_err,
                            key = %orphan_key,
                            "Failed to clean up stored object after record-insert failure"
                        );
                    }
                });
                return Err(e);
            }
        };

        let payload = VirusScanPayload {
            document_id: document.id,
        };
        if let Err(e) = self
            .task_queue
            .submit_task(TaskType::VirusScan, Task::payload_from(&payload), None)
            .await
        {
            // Known gap: the document stays PENDING with no automatic
            // re-scan path; an operator can re-enqueue the scan.
            tracing::error!(
                error = %e,
                document_id = %document.id,
                "Failed to enqueue virus scan; document remains pending"
            );
        }

        tracing::info!(
            document_id = %document.id,
            idea_id = %idea_id,
            file_name = %document.file_name,
            file_size = file_size,
            "Document uploaded, scan scheduled"
        );

        Ok(document.into())
    }

    /// Current scan state of a document: {status, result}.
    pub async fn scan_status(&self, document_id: Uuid) -> Result<ScanStatusResponse, AppError> {
        let document = self
            .documents
            .get(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        Ok(document.into())
    }

    /// Time-bounded download URL for a document's stored object.
    ///
    /// Fails with a user-visible error when the storage collaborator cannot
    /// produce one, e.g. after an infected object was removed.
    pub async fn download_url(&self, document_id: Uuid) -> Result<DownloadUrlResponse, AppError> {
        let document = self
            .documents
            .get(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        match self.storage.exists(&document.file_path).await {
            Ok(true) => {}
            Ok(false) => {
                // Infected uploads lose their stored object while the record
                // is retained; downloads must fail in a way the caller can see.
                return Err(AppError::NotFound(
                    "Stored file is no longer available".to_string(),
                ));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to check stored file: {}",
                    e
                )));
            }
        }

        let url = self
            .storage
            .get_presigned_url(
                &document.file_path,
                Duration::from_secs(DOWNLOAD_URL_EXPIRY_SECS),
            )
            .await
            .map_err(|e| AppError::Storage(format!("Failed to generate download URL: {}", e)))?;

        Ok(DownloadUrlResponse { url })
    }

    pub async fn list_documents(&self, idea_id: Uuid) -> Result<Vec<DocumentResponse>, AppError> {
        if self.ideas.get(idea_id).await?.is_none() {
            return Err(AppError::NotFound("Idea not found".to_string()));
        }

        let documents = self.documents.list_for_idea(idea_id).await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }
}
