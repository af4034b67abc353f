use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::campaign::CampaignResponse;
use super::contributor::ContributorResponse;
use super::document::DocumentResponse;
use super::user::UserResponse;

/// Review workflow states for an idea.
///
/// DRAFT is the initial state; SUBMITTED is reached through the submit
/// operation. The remaining transitions (UNDER_EVALUATION, EVALUATED,
/// RECOGNIZED) are driven by external panel-review tooling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdeaStatus {
    Draft,
    Submitted,
    UnderEvaluation,
    Evaluated,
    Recognized,
}

impl IdeaStatus {
    /// Whether the idea is still visible only to its submitter (and staff).
    pub fn is_draft(&self) -> bool {
        matches!(self, IdeaStatus::Draft)
    }
}

impl Display for IdeaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            IdeaStatus::Draft => write!(f, "DRAFT"),
            IdeaStatus::Submitted => write!(f, "SUBMITTED"),
            IdeaStatus::UnderEvaluation => write!(f, "UNDER_EVALUATION"),
            IdeaStatus::Evaluated => write!(f, "EVALUATED"),
            IdeaStatus::Recognized => write!(f, "RECOGNIZED"),
        }
    }
}

impl FromStr for IdeaStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(IdeaStatus::Draft),
            "SUBMITTED" => Ok(IdeaStatus::Submitted),
            "UNDER_EVALUATION" => Ok(IdeaStatus::UnderEvaluation),
            "EVALUATED" => Ok(IdeaStatus::Evaluated),
            "RECOGNIZED" => Ok(IdeaStatus::Recognized),
            _ => Err(anyhow::anyhow!("Invalid idea status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectedImpact {
    High,
    Medium,
    Low,
}

impl Display for ExpectedImpact {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExpectedImpact::High => write!(f, "HIGH"),
            ExpectedImpact::Medium => write!(f, "MEDIUM"),
            ExpectedImpact::Low => write!(f, "LOW"),
        }
    }
}

impl FromStr for ExpectedImpact {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(ExpectedImpact::High),
            "MEDIUM" => Ok(ExpectedImpact::Medium),
            "LOW" => Ok(ExpectedImpact::Low),
            _ => Err(anyhow::anyhow!("Invalid impact level: {}", s)),
        }
    }
}

/// A proposal submitted by a user within a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub expected_impact: ExpectedImpact,
    pub submitter_id: Uuid,
    pub campaign_id: Uuid,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    /// Set by the external evaluation tooling; no in-scope transition writes it.
    pub recognized_at: Option<DateTime<Utc>>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Idea {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Idea {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            expected_impact: row.get::<String, _>("expected_impact").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse expected_impact: {}", e).into())
            })?,
            submitter_id: row.get("submitter_id"),
            campaign_id: row.get("campaign_id"),
            status: row.get::<String, _>("status").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse idea status: {}", e).into())
            })?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            submitted_at: row.get("submitted_at"),
            recognized_at: row.get("recognized_at"),
        })
    }
}

/// Input for creating a draft idea. `expected_impact` arrives as text and is
/// parsed so a bad value maps to a validation error instead of a decode
/// failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIdeaRequest {
    pub campaign_id: Uuid,
    pub title: String,
    pub description: String,
    pub expected_impact: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIdeaRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub expected_impact: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdeaDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub expected_impact: ExpectedImpact,
    pub submitter: UserResponse,
    pub campaign: CampaignResponse,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub recognized_at: Option<DateTime<Utc>>,
    pub contributors: Vec<ContributorResponse>,
    pub documents: Vec<DocumentResponse>,
}
