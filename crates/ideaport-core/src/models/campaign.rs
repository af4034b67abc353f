use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Planning,
    Active,
    Closed,
}

impl Display for CampaignStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CampaignStatus::Planning => write!(f, "PLANNING"),
            CampaignStatus::Active => write!(f, "ACTIVE"),
            CampaignStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNING" => Ok(CampaignStatus::Planning),
            "ACTIVE" => Ok(CampaignStatus::Active),
            "CLOSED" => Ok(CampaignStatus::Closed),
            _ => Err(anyhow::anyhow!("Invalid campaign status: {}", s)),
        }
    }
}

/// A time-boxed container ideas are submitted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Campaign {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Campaign {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            status: row.get::<String, _>("status").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse campaign status: {}", e).into())
            })?,
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
    pub status: Option<CampaignStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        CampaignResponse {
            id: campaign.id,
            name: campaign.name,
            description: campaign.description,
            status: campaign.status,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_status_display() {
        assert_eq!(CampaignStatus::Planning.to_string(), "PLANNING");
        assert_eq!(CampaignStatus::Active.to_string(), "ACTIVE");
        assert_eq!(CampaignStatus::Closed.to_string(), "CLOSED");
    }

    #[test]
    fn test_campaign_status_from_str() {
        assert_eq!(
            "ACTIVE".parse::<CampaignStatus>().unwrap(),
            CampaignStatus::Active
        );
        assert!("active".parse::<CampaignStatus>().is_err());
        assert!("UNKNOWN".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_campaign_response_from_campaign() {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            name: "Q3 Innovation".to_string(),
            description: "Quarterly innovation drive".to_string(),
            status: CampaignStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            created_at: now,
            updated_at: now,
        };

        let response = CampaignResponse::from(campaign.clone());
        assert_eq!(response.id, campaign.id);
        assert_eq!(response.name, "Q3 Innovation");
        assert_eq!(response.status, CampaignStatus::Active);
    }
}
