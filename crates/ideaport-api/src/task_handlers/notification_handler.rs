//! Outbound email notifications: submission confirmations and contributor
//! notices.
//!
//! These run outside the request path; the originating operation has already
//! succeeded by the time a notification executes. Send failures are retried
//! by the queue and never surface to the original caller. Without SMTP
//! configured the handler logs and completes.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use ideaport_core::models::{
    ContributorNotificationPayload, SubmissionConfirmationPayload, Task, TaskType, User,
};
use ideaport_core::TaskError;

use crate::state::AppState;
use crate::task_handlers::TaskHandler;

#[derive(Clone)]
pub struct NotificationTaskHandler;

#[async_trait]
impl TaskHandler for NotificationTaskHandler {
    async fn process(&self, task: &Task, state: Arc<AppState>) -> Result<serde_json::Value> {
        match task.task_type {
            TaskType::SubmissionConfirmation => self.submission_confirmation(task, state).await,
            TaskType::ContributorNotification => self.contributor_notification(task, state).await,
            TaskType::VirusScan => Err(TaskError::unrecoverable(anyhow::anyhow!(
                "Invalid task type for notification handler"
            ))
            .into()),
        }
    }
}

impl NotificationTaskHandler {
    async fn submission_confirmation(
        &self,
        task: &Task,
        state: Arc<AppState>,
    ) -> Result<serde_json::Value> {
        let payload: SubmissionConfirmationPayload = task
            .try_payload_as()
            .map_err(|e| TaskError::unrecoverable(anyhow::anyhow!("Invalid payload: {}", e)))?;

        let idea = state
            .db
            .idea_repository
            .get(payload.idea_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!("Idea not found: {}", payload.idea_id))
            })?;

        let submitter = state
            .db
            .user_repository
            .get(idea.submitter_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!(
                    "Submitter not found: {}",
                    idea.submitter_id
                ))
            })?;

        let campaign = state
            .db
            .campaign_repository
            .get(idea.campaign_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!(
                    "Campaign not found: {}",
                    idea.campaign_id
                ))
            })?;

        let subject = format!("Idea Submitted: {}", idea.title);
        let body = format!(
            "Dear {},\n\n\
             Your idea \"{}\" has been successfully submitted for evaluation.\n\n\
             Idea ID: {}\n\
             Campaign: {}\n\n\
             You can track the status of your idea in the dashboard.\n\n\
             Best regards,\n\
             The Ideation Portal Team\n",
            display_name(&submitter),
            idea.title,
            idea.id,
            campaign.name,
        );

        self.deliver(&state, &submitter.email, &subject, &body).await
    }

    async fn contributor_notification(
        &self,
        task: &Task,
        state: Arc<AppState>,
    ) -> Result<serde_json::Value> {
        let payload: ContributorNotificationPayload = task
            .try_payload_as()
            .map_err(|e| TaskError::unrecoverable(anyhow::anyhow!("Invalid payload: {}", e)))?;

        let idea = state
            .db
            .idea_repository
            .get(payload.idea_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!("Idea not found: {}", payload.idea_id))
            })?;

        let contributor = state
            .db
            .user_repository
            .get(payload.user_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!("User not found: {}", payload.user_id))
            })?;

        let campaign = state
            .db
            .campaign_repository
            .get(idea.campaign_id)
            .await?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!(
                    "Campaign not found: {}",
                    idea.campaign_id
                ))
            })?;

        let subject = format!("You've been added as a contributor to: {}", idea.title);
        let body = format!(
            "Dear {},\n\n\
             You have been added as a contributor to the idea \"{}\".\n\n\
             Idea ID: {}\n\
             Campaign: {}\n\n\
             You can now collaborate on this idea in the dashboard.\n\n\
             Best regards,\n\
             The Ideation Portal Team\n",
            display_name(&contributor),
            idea.title,
            idea.id,
            campaign.name,
        );

        self.deliver(&state, &contributor.email, &subject, &body)
            .await
    }

    async fn deliver(
        &self,
        state: &Arc<AppState>,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<serde_json::Value> {
        let Some(email) = state.email.as_ref() else {
            tracing::info!(
                recipient = %to,
                subject = %subject,
                "SMTP not configured, skipping notification delivery"
            );
            return Ok(json!({ "status": "skipped", "reason": "smtp not configured" }));
        };

        email.send(to, subject, body).await.map_err(|e| {
            tracing::error!(error = %e, recipient = %to, "Failed to send notification email");
            TaskError::recoverable(anyhow::anyhow!("Email delivery failed: {}", e))
        })?;

        Ok(json!({ "status": "sent", "recipient": to }))
    }
}

fn display_name(user: &User) -> String {
    user.full_name
        .clone()
        .unwrap_or_else(|| user.username.clone())
}
