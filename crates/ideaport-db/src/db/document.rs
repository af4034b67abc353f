use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::idea::is_unique_violation;
use ideaport_core::models::{Document, VirusScanStatus};
use ideaport_core::AppError;

const DOCUMENT_COLUMNS: &str = r#"
    id,
    idea_id,
    file_name,
    file_path,
    file_size,
    file_type,
    uploaded_by,
    uploaded_at,
    virus_scan_status,
    virus_scan_result
"#;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a document record in PENDING state. Called only after the
    /// object has been stored; `file_path` is unique per stored object.
    #[tracing::instrument(skip(self, file_name, file_path))]
    pub async fn create(
        &self,
        idea_id: Uuid,
        file_name: &str,
        file_path: &str,
        file_size: i64,
        file_type: &str,
        uploaded_by: Uuid,
    ) -> Result<Document, AppError> {
        let result = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO documents (idea_id, file_name, file_path, file_size, file_type, uploaded_by, virus_scan_status)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING')
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(idea_id)
        .bind(file_name)
        .bind(file_path)
        .bind(file_size)
        .bind(file_type)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(document) => {
                tracing::info!(
                    document_id = %document.id,
                    idea_id = %idea_id,
                    file_size = file_size,
                    "Document record created"
                );
                Ok(document)
            }
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                "A document with this storage path already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, document_id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_for_idea(&self, idea_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE idea_id = $1 ORDER BY uploaded_at DESC"
        ))
        .bind(idea_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// Terminal scan write. Racing scans may both reach this; the update is
    /// unconditional so the last write wins, which the pipeline tolerates.
    #[tracing::instrument(skip(self, result))]
    pub async fn record_scan_verdict(
        &self,
        document_id: Uuid,
        status: VirusScanStatus,
        result: &str,
    ) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            UPDATE documents
            SET virus_scan_status = $2,
                virus_scan_result = $3
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(document_id)
        .bind(status.to_string())
        .bind(result)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref document) = document {
            tracing::info!(
                document_id = %document.id,
                status = %document.virus_scan_status,
                "Scan verdict recorded"
            );
        }

        Ok(document)
    }

    /// Documents uploaded before the cutoff, regardless of scan status.
    /// Used by the retention sweep.
    #[tracing::instrument(skip(self))]
    pub async fn list_uploaded_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE uploaded_at < $1 ORDER BY uploaded_at ASC"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, document_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
