pub mod campaign;
pub mod contributor;
pub mod document;
pub mod idea;
pub mod task;
pub mod user;

pub use campaign::{Campaign, CampaignResponse, CampaignStatus, CreateCampaignRequest, UpdateCampaignRequest};
pub use contributor::{AddContributorRequest, Contributor, ContributorResponse, ContributorRole};
pub use document::{
    Document, DocumentResponse, DownloadUrlResponse, ScanStatusResponse, VirusScanStatus,
};
pub use idea::{
    CreateIdeaRequest, ExpectedImpact, Idea, IdeaDetailResponse, IdeaStatus, UpdateIdeaRequest,
};
pub use task::{
    ContributorNotificationPayload, SubmissionConfirmationPayload, Task, TaskPayload, TaskStatus,
    TaskType, VirusScanPayload,
};
pub use user::{User, UserResponse};
