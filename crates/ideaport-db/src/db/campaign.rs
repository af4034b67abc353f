use chrono::NaiveDate;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use ideaport_core::models::{Campaign, CampaignStatus};
use ideaport_core::AppError;

const CAMPAIGN_COLUMNS: &str = r#"
    id,
    name,
    description,
    status,
    start_date,
    end_date,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, name, description))]
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        status: CampaignStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Campaign, AppError> {
        let campaign = sqlx::query_as::<Postgres, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (name, description, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(description)
        .bind(status.to_string())
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(campaign_id = %campaign.id, name = %campaign.name, "Campaign created");

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, campaign_id: Uuid) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<Postgres, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1"
        ))
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self, name, description))]
    pub async fn update(
        &self,
        campaign_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        status: Option<CampaignStatus>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<Postgres, Campaign>(&format!(
            r#"
            UPDATE campaigns
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(campaign_id)
        .bind(name)
        .bind(description)
        .bind(status.map(|s| s.to_string()))
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(campaign)
    }
}
