use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::document_pipeline::DocumentPipelineService;
use crate::services::idea_lifecycle::IdeaLifecycleService;
use crate::state::AppState;
use ideaport_core::models::{
    AddContributorRequest, ContributorResponse, CreateIdeaRequest, DocumentResponse,
    IdeaDetailResponse, UpdateIdeaRequest,
};

#[utoipa::path(
    post,
    path = "/api/v1/ideas",
    tag = "ideas",
    request_body = CreateIdeaRequest,
    responses(
        (status = 200, description = "Idea created in draft", body = IdeaDetailResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Duplicate title in campaign", body = ErrorResponse)
    )
)]
pub async fn create_idea(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateIdeaRequest>,
) -> Result<Json<IdeaDetailResponse>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let idea = service.create_idea(&user, request).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea detail", body = IdeaDetailResponse),
        (status = 404, description = "Idea not found", body = ErrorResponse)
    )
)]
pub async fn get_idea(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaDetailResponse>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let idea = service.get_idea(&user, idea_id).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    put,
    path = "/api/v1/ideas/{id}",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = UpdateIdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = IdeaDetailResponse),
        (status = 403, description = "Caller is not the submitter", body = ErrorResponse)
    )
)]
pub async fn update_idea(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
    Json(request): Json<UpdateIdeaRequest>,
) -> Result<Json<IdeaDetailResponse>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let idea = service.update_idea(&user, idea_id, request).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas/{id}/submit",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea submitted", body = IdeaDetailResponse),
        (status = 409, description = "Idea is not in draft", body = ErrorResponse)
    )
)]
pub async fn submit_idea(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaDetailResponse>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let idea = service.submit_idea(&user, idea_id).await?;
    Ok(Json(idea))
}

#[utoipa::path(
    post,
    path = "/api/v1/ideas/{id}/contributors",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    request_body = AddContributorRequest,
    responses(
        (status = 200, description = "Contributor added", body = ContributorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User is already a contributor", body = ErrorResponse)
    )
)]
pub async fn add_contributor(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
    Json(request): Json<AddContributorRequest>,
) -> Result<Json<ContributorResponse>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let contributor = service
        .add_contributor(&user, idea_id, request.user_id)
        .await?;
    Ok(Json(contributor))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}/contributors",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Contributors", body = [ContributorResponse])
    )
)]
pub async fn list_contributors(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Vec<ContributorResponse>>, HttpAppError> {
    let service = IdeaLifecycleService::new(&state);
    let contributors = service.list_contributors(&user, idea_id).await?;
    Ok(Json(contributors))
}

#[utoipa::path(
    get,
    path = "/api/v1/ideas/{id}/documents",
    tag = "ideas",
    params(("id" = Uuid, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Documents attached to the idea", body = [DocumentResponse])
    )
)]
pub async fn list_idea_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<Vec<DocumentResponse>>, HttpAppError> {
    // Visibility follows the idea itself.
    let lifecycle = IdeaLifecycleService::new(&state);
    lifecycle.load_visible(&user, idea_id).await?;

    let service = DocumentPipelineService::new(&state);
    let documents = service.list_documents(idea_id).await?;
    Ok(Json(documents))
}
