//! Idea lifecycle engine.
//!
//! Owns the DRAFT -> SUBMITTED transition and contributor management.
//! The later transitions (UNDER_EVALUATION, EVALUATED, RECOGNIZED) are
//! driven by external panel-review tooling and have no operation here.
//!
//! Authorization is enforced in the engine, not the transport layer: only
//! the submitter may mutate an idea or trigger submit/add-contributor;
//! everyone else gets read-only access once the idea has left DRAFT.

use ideaport_core::models::{
    Contributor, ContributorResponse, ContributorRole, CreateIdeaRequest, Idea,
    IdeaDetailResponse, SubmissionConfirmationPayload, ContributorNotificationPayload, Task,
    UpdateIdeaRequest, User,
};
use ideaport_core::validation::{
    parse_expected_impact, validate_idea_description, validate_idea_title,
};
use ideaport_core::AppError;
use ideaport_db::{
    CampaignRepository, ContributorRepository, DocumentRepository, IdeaRepository, UserRepository,
};
use ideaport_worker::TaskQueue;
use uuid::Uuid;

use crate::state::AppState;

pub struct IdeaLifecycleService {
    ideas: IdeaRepository,
    campaigns: CampaignRepository,
    contributors: ContributorRepository,
    documents: DocumentRepository,
    users: UserRepository,
    task_queue: TaskQueue,
}

impl IdeaLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            ideas: state.db.idea_repository.clone(),
            campaigns: state.db.campaign_repository.clone(),
            contributors: state.db.contributor_repository.clone(),
            documents: state.db.document_repository.clone(),
            users: state.db.user_repository.clone(),
            task_queue: state.task_queue.clone(),
        }
    }

    /// Create a draft idea. The submitter becomes its first contributor with
    /// role SUBMITTER atomically with the idea row.
    pub async fn create_idea(
        &self,
        submitter: &User,
        request: CreateIdeaRequest,
    ) -> Result<IdeaDetailResponse, AppError> {
        let title = validate_idea_title(&request.title)?;
        let description = validate_idea_description(&request.description)?;
        let expected_impact = parse_expected_impact(&request.expected_impact)?;

        if self.campaigns.get(request.campaign_id).await?.is_none() {
            return Err(AppError::Validation("Campaign not found".to_string()));
        }

        let idea = self
            .ideas
            .create_with_submitter(
                submitter.id,
                request.campaign_id,
                &title,
                &description,
                expected_impact,
            )
            .await?;

        self.detail(idea).await
    }

    /// Fetch an idea with its campaign, submitter, contributors, and documents.
    pub async fn get_idea(
        &self,
        caller: &User,
        idea_id: Uuid,
    ) -> Result<IdeaDetailResponse, AppError> {
        let idea = self.load_visible(caller, idea_id).await?;
        self.detail(idea).await
    }

    /// Update the submitter-editable fields of an idea.
    pub async fn update_idea(
        &self,
        caller: &User,
        idea_id: Uuid,
        request: UpdateIdeaRequest,
    ) -> Result<IdeaDetailResponse, AppError> {
        let idea = self.load_owned(caller, idea_id).await?;

        let title = request
            .title
            .as_deref()
            .map(validate_idea_title)
            .transpose()?;
        let description = request
            .description
            .as_deref()
            .map(validate_idea_description)
            .transpose()?;
        let expected_impact = request
            .expected_impact
            .as_deref()
            .map(parse_expected_impact)
            .transpose()?;

        let updated = self
            .ideas
            .update_fields(
                idea.id,
                title.as_deref(),
                description.as_deref(),
                expected_impact,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

        self.detail(updated).await
    }

    /// Submit a draft idea: DRAFT -> SUBMITTED, submitted_at set once.
    ///
    /// A confirmation email task is enqueued fire-and-forget; a failure to
    /// enqueue never rolls back the transition.
    pub async fn submit_idea(
        &self,
        caller: &User,
        idea_id: Uuid,
    ) -> Result<IdeaDetailResponse, AppError> {
        self.load_owned(caller, idea_id).await?;

        let submitted = match self.ideas.submit_draft(idea_id).await? {
            Some(idea) => idea,
            None => {
                return Err(AppError::Conflict(
                    "Only draft ideas can be submitted".to_string(),
                ));
            }
        };

        let payload = SubmissionConfirmationPayload { idea_id: submitted.id };
        if let Err(e) = self
            .task_queue
            .submit_task(
                ideaport_core::models::TaskType::SubmissionConfirmation,
                Task::payload_from(&payload),
                None,
            )
            .await
        {
            tracing::warn!(
                error = %e,
                idea_id = %submitted.id,
                "Failed to enqueue submission confirmation; idea remains submitted"
            );
        }

        self.detail(submitted).await
    }

    /// Add a user as CONTRIBUTOR to an idea.
    ///
    /// Uniqueness of (idea, user) is settled by the atomic create-or-fail
    /// insert; concurrent duplicates yield exactly one row and one conflict.
    pub async fn add_contributor(
        &self,
        caller: &User,
        idea_id: Uuid,
        user_id: Uuid,
    ) -> Result<ContributorResponse, AppError> {
        self.load_owned(caller, idea_id).await?;

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let contributor: Contributor = self
            .contributors
            .add(idea_id, user.id, ContributorRole::Contributor)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("User is already a contributor".to_string())
            })?;

        let payload = ContributorNotificationPayload {
            idea_id,
            user_id: user.id,
        };
        if let Err(e) = self
            .task_queue
            .submit_task(
                ideaport_core::models::TaskType::ContributorNotification,
                Task::payload_from(&payload),
                None,
            )
            .await
        {
            tracing::warn!(
                error = %e,
                idea_id = %idea_id,
                user_id = %user.id,
                "Failed to enqueue contributor notification"
            );
        }

        Ok(ContributorResponse::from_parts(contributor, user.into()))
    }

    pub async fn list_contributors(
        &self,
        caller: &User,
        idea_id: Uuid,
    ) -> Result<Vec<ContributorResponse>, AppError> {
        self.load_visible(caller, idea_id).await?;

        let contributors = self.contributors.list_with_users(idea_id).await?;
        Ok(contributors
            .into_iter()
            .map(|(contributor, user)| ContributorResponse::from_parts(contributor, user.into()))
            .collect())
    }

    /// Load an idea the caller may read. Draft ideas are visible only to
    /// their submitter and staff.
    pub(crate) async fn load_visible(
        &self,
        caller: &User,
        idea_id: Uuid,
    ) -> Result<Idea, AppError> {
        let idea = self
            .ideas
            .get(idea_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

        if idea.status.is_draft() && idea.submitter_id != caller.id && !caller.is_staff {
            // Drafts are indistinguishable from missing ideas to other users.
            return Err(AppError::NotFound("Idea not found".to_string()));
        }

        Ok(idea)
    }

    /// Load an idea the caller may mutate: the submitter only.
    async fn load_owned(&self, caller: &User, idea_id: Uuid) -> Result<Idea, AppError> {
        let idea = self
            .ideas
            .get(idea_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;

        if idea.submitter_id != caller.id {
            return Err(AppError::PermissionDenied(
                "Only the submitter can modify this idea".to_string(),
            ));
        }

        Ok(idea)
    }

    async fn detail(&self, idea: Idea) -> Result<IdeaDetailResponse, AppError> {
        let campaign = self
            .campaigns
            .get(idea.campaign_id)
            .await?
            .ok_or_else(|| AppError::Internal("Idea references missing campaign".to_string()))?;

        let submitter = self
            .users
            .get(idea.submitter_id)
            .await?
            .ok_or_else(|| AppError::Internal("Idea references missing submitter".to_string()))?;

        let contributors = self
            .contributors
            .list_with_users(idea.id)
            .await?
            .into_iter()
            .map(|(contributor, user)| ContributorResponse::from_parts(contributor, user.into()))
            .collect();

        let documents = self
            .documents
            .list_for_idea(idea.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(IdeaDetailResponse {
            id: idea.id,
            title: idea.title,
            description: idea.description,
            expected_impact: idea.expected_impact,
            submitter: submitter.into(),
            campaign: campaign.into(),
            status: idea.status,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
            submitted_at: idea.submitted_at,
            recognized_at: idea.recognized_at,
            contributors,
            documents,
        })
    }
}
