//! OpenAPI document for the portal API.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use ideaport_core::models::{
    AddContributorRequest, CampaignResponse, CampaignStatus, ContributorResponse, ContributorRole,
    CreateCampaignRequest, CreateIdeaRequest, DocumentResponse, DownloadUrlResponse,
    ExpectedImpact, IdeaDetailResponse, IdeaStatus, ScanStatusResponse, UpdateCampaignRequest,
    UpdateIdeaRequest, UserResponse, VirusScanStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health,
        crate::handlers::campaigns::create_campaign,
        crate::handlers::campaigns::get_campaign,
        crate::handlers::campaigns::update_campaign,
        crate::handlers::ideas::create_idea,
        crate::handlers::ideas::get_idea,
        crate::handlers::ideas::update_idea,
        crate::handlers::ideas::submit_idea,
        crate::handlers::ideas::add_contributor,
        crate::handlers::ideas::list_contributors,
        crate::handlers::ideas::list_idea_documents,
        crate::handlers::documents::upload_document,
        crate::handlers::documents::scan_status,
        crate::handlers::documents::download_document,
    ),
    components(schemas(
        ErrorResponse,
        CreateCampaignRequest,
        UpdateCampaignRequest,
        CampaignResponse,
        CampaignStatus,
        CreateIdeaRequest,
        UpdateIdeaRequest,
        IdeaDetailResponse,
        IdeaStatus,
        ExpectedImpact,
        AddContributorRequest,
        ContributorResponse,
        ContributorRole,
        DocumentResponse,
        ScanStatusResponse,
        DownloadUrlResponse,
        VirusScanStatus,
        UserResponse,
    )),
    tags(
        (name = "campaigns", description = "Time-boxed idea campaigns"),
        (name = "ideas", description = "Idea lifecycle and contributors"),
        (name = "documents", description = "Document upload and virus-scan status"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
