use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::document_pipeline::DocumentPipelineService;
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;
use ideaport_core::models::{DocumentResponse, DownloadUrlResponse, ScanStatusResponse};

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Document uploaded, scan scheduled", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let form = extract_upload_form(multipart).await?;

    let service = DocumentPipelineService::new(&state);
    let document = service
        .upload(&user, form.idea_id, form.data, &form.original_filename)
        .await?;

    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/scan-status",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Scan status", body = ScanStatusResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn scan_status(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(document_id): Path<Uuid>,
) -> Result<Json<ScanStatusResponse>, HttpAppError> {
    let service = DocumentPipelineService::new(&state);
    let status = service.scan_status(document_id).await?;
    Ok(Json(status))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/download",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Time-bounded download URL", body = DownloadUrlResponse),
        (status = 404, description = "Document or stored file missing", body = ErrorResponse)
    )
)]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DownloadUrlResponse>, HttpAppError> {
    let service = DocumentPipelineService::new(&state);
    let url = service.download_url(document_id).await?;
    Ok(Json(url))
}
