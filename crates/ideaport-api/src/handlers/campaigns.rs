use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use ideaport_core::models::{
    CampaignResponse, CampaignStatus, CreateCampaignRequest, UpdateCampaignRequest,
};
use ideaport_core::AppError;

fn validate_dates(
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    request_body = CreateCampaignRequest,
    responses(
        (status = 200, description = "Campaign created", body = CampaignResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    )
)]
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<Json<CampaignResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    validate_dates(request.start_date, request.end_date)?;

    let campaign = state
        .db
        .campaign_repository
        .create(
            request.name.trim(),
            &request.description,
            request.status.unwrap_or(CampaignStatus::Planning),
            request.start_date,
            request.end_date,
        )
        .await?;

    Ok(Json(campaign.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/campaigns/{id}",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Campaign", body = CampaignResponse),
        (status = 404, description = "Campaign not found", body = ErrorResponse)
    )
)]
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignResponse>, HttpAppError> {
    let campaign = state
        .db
        .campaign_repository
        .get(campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

    Ok(Json(campaign.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/campaigns/{id}",
    tag = "campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignResponse),
        (status = 404, description = "Campaign not found", body = ErrorResponse)
    )
)]
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<CampaignResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        validate_dates(start, end)?;
    }

    let campaign = state
        .db
        .campaign_repository
        .update(
            campaign_id,
            request.name.as_deref().map(str::trim),
            request.description.as_deref(),
            request.status,
            request.start_date,
            request.end_date,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

    Ok(Json(campaign.into()))
}
