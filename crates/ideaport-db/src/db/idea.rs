use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use ideaport_core::models::{ExpectedImpact, Idea};
use ideaport_core::AppError;

const IDEA_COLUMNS: &str = r#"
    id,
    title,
    description,
    expected_impact,
    submitter_id,
    campaign_id,
    status,
    created_at,
    updated_at,
    submitted_at,
    recognized_at
"#;

#[derive(Clone)]
pub struct IdeaRepository {
    pool: PgPool,
}

impl IdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a draft idea and its SUBMITTER contributor row in one
    /// transaction: either both records exist afterwards or neither does.
    ///
    /// A duplicate (title, campaign) pair maps to `AppError::Conflict`.
    #[tracing::instrument(skip(self, title, description))]
    pub async fn create_with_submitter(
        &self,
        submitter_id: Uuid,
        campaign_id: Uuid,
        title: &str,
        description: &str,
        expected_impact: ExpectedImpact,
    ) -> Result<Idea, AppError> {
        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query_as::<Postgres, Idea>(&format!(
            r#"
            INSERT INTO ideas (title, description, expected_impact, submitter_id, campaign_id, status)
            VALUES ($1, $2, $3, $4, $5, 'DRAFT')
            RETURNING {IDEA_COLUMNS}
            "#,
        ))
        .bind(title)
        .bind(description)
        .bind(expected_impact.to_string())
        .bind(submitter_id)
        .bind(campaign_id)
        .fetch_one(&mut *tx)
        .await;

        let idea = match insert {
            Ok(idea) => idea,
            Err(e) => {
                if is_unique_violation(&e) {
                    return Err(AppError::Conflict(
                        "An idea with this title already exists in the campaign".to_string(),
                    ));
                }
                return Err(e.into());
            }
        };

        sqlx::query(
            r#"
            INSERT INTO contributors (idea_id, user_id, role)
            VALUES ($1, $2, 'SUBMITTER')
            "#,
        )
        .bind(idea.id)
        .bind(submitter_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            idea_id = %idea.id,
            campaign_id = %campaign_id,
            submitter_id = %submitter_id,
            "Idea created in draft"
        );

        Ok(idea)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, idea_id: Uuid) -> Result<Option<Idea>, AppError> {
        let idea = sqlx::query_as::<Postgres, Idea>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1"
        ))
        .bind(idea_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(idea)
    }

    /// Update the submitter-editable fields. Only the provided fields change.
    #[tracing::instrument(skip(self, title, description))]
    pub async fn update_fields(
        &self,
        idea_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        expected_impact: Option<ExpectedImpact>,
    ) -> Result<Option<Idea>, AppError> {
        let result = sqlx::query_as::<Postgres, Idea>(&format!(
            r#"
            UPDATE ideas
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                expected_impact = COALESCE($4, expected_impact),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {IDEA_COLUMNS}
            "#,
        ))
        .bind(idea_id)
        .bind(title)
        .bind(description)
        .bind(expected_impact.map(|i| i.to_string()))
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(idea) => Ok(idea),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                "An idea with this title already exists in the campaign".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Transition DRAFT -> SUBMITTED as a single conditional update.
    ///
    /// Returns `None` when the idea is not currently in DRAFT (including when
    /// it does not exist); the caller distinguishes the two. Two racing
    /// submits resolve atomically: exactly one sees the row.
    #[tracing::instrument(skip(self))]
    pub async fn submit_draft(&self, idea_id: Uuid) -> Result<Option<Idea>, AppError> {
        let idea = sqlx::query_as::<Postgres, Idea>(&format!(
            r#"
            UPDATE ideas
            SET status = 'SUBMITTED',
                submitted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'DRAFT'
            RETURNING {IDEA_COLUMNS}
            "#,
        ))
        .bind(idea_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref idea) = idea {
            tracing::info!(idea_id = %idea.id, "Idea submitted");
        }

        Ok(idea)
    }

    /// Recognition timestamp hook for the external evaluation tooling.
    #[tracing::instrument(skip(self))]
    pub async fn mark_recognized(
        &self,
        idea_id: Uuid,
        recognized_at: DateTime<Utc>,
    ) -> Result<Option<Idea>, AppError> {
        let idea = sqlx::query_as::<Postgres, Idea>(&format!(
            r#"
            UPDATE ideas
            SET status = 'RECOGNIZED',
                recognized_at = $2,
                updated_at = NOW()
            WHERE id = $1 AND status = 'EVALUATED'
            RETURNING {IDEA_COLUMNS}
            "#,
        ))
        .bind(idea_id)
        .bind(recognized_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(idea)
    }
}

/// True when the error is a Postgres unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
