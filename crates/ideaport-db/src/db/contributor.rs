use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use ideaport_core::models::{Contributor, ContributorRole, User};
use ideaport_core::AppError;

#[derive(Clone)]
pub struct ContributorRepository {
    pool: PgPool,
}

impl ContributorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomic create-or-fail insert for the (idea, user) uniqueness invariant.
    ///
    /// Returns `Ok(None)` when the pair already exists. Concurrent calls for
    /// the same pair resolve at the database: exactly one row, one `None`.
    #[tracing::instrument(skip(self))]
    pub async fn add(
        &self,
        idea_id: Uuid,
        user_id: Uuid,
        role: ContributorRole,
    ) -> Result<Option<Contributor>, AppError> {
        let contributor = sqlx::query_as::<Postgres, Contributor>(
            r#"
            INSERT INTO contributors (idea_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (idea_id, user_id) DO NOTHING
            RETURNING id, idea_id, user_id, role, added_at
            "#,
        )
        .bind(idea_id)
        .bind(user_id)
        .bind(role.to_string())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref contributor) = contributor {
            tracing::info!(
                idea_id = %idea_id,
                user_id = %user_id,
                role = %contributor.role,
                "Contributor added"
            );
        }

        Ok(contributor)
    }

    /// Contributors of an idea with their user records, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_with_users(
        &self,
        idea_id: Uuid,
    ) -> Result<Vec<(Contributor, User)>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id AS contributor_id,
                c.idea_id,
                c.user_id,
                c.role,
                c.added_at,
                u.id AS user_id_pk,
                u.username,
                u.email,
                u.full_name,
                u.is_staff,
                u.created_at AS user_created_at
            FROM contributors c
            JOIN users u ON u.id = c.user_id
            WHERE c.idea_id = $1
            ORDER BY c.added_at ASC
            "#,
        )
        .bind(idea_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let contributor = Contributor {
                id: row.get("contributor_id"),
                idea_id: row.get("idea_id"),
                user_id: row.get("user_id"),
                role: row.get::<String, _>("role").parse().map_err(|e| {
                    AppError::Internal(format!("Failed to parse contributor role: {}", e))
                })?,
                added_at: row.get("added_at"),
            };
            let user = User {
                id: row.get("user_id_pk"),
                username: row.get("username"),
                email: row.get("email"),
                full_name: row.get("full_name"),
                is_staff: row.get("is_staff"),
                created_at: row.get("user_created_at"),
            };
            result.push((contributor, user));
        }

        Ok(result)
    }
}
