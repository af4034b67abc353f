use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserResponse;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributorRole {
    Submitter,
    Contributor,
}

impl Display for ContributorRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContributorRole::Submitter => write!(f, "SUBMITTER"),
            ContributorRole::Contributor => write!(f, "CONTRIBUTOR"),
        }
    }
}

impl FromStr for ContributorRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTER" => Ok(ContributorRole::Submitter),
            "CONTRIBUTOR" => Ok(ContributorRole::Contributor),
            _ => Err(anyhow::anyhow!("Invalid contributor role: {}", s)),
        }
    }
}

/// A user associated with an idea, either its originating submitter or an
/// added collaborator. One row per (idea, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub user_id: Uuid,
    pub role: ContributorRole,
    pub added_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Contributor {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Contributor {
            id: row.get("id"),
            idea_id: row.get("idea_id"),
            user_id: row.get("user_id"),
            role: row.get::<String, _>("role").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse contributor role: {}", e).into())
            })?,
            added_at: row.get("added_at"),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddContributorRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContributorResponse {
    pub id: Uuid,
    pub user: UserResponse,
    pub role: ContributorRole,
    pub added_at: DateTime<Utc>,
}

impl ContributorResponse {
    pub fn from_parts(contributor: Contributor, user: UserResponse) -> Self {
        ContributorResponse {
            id: contributor.id,
            user,
            role: contributor.role,
            added_at: contributor.added_at,
        }
    }
}
