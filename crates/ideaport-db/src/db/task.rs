use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use ideaport_core::models::{Task, TaskStatus, TaskType};

/// Channel name for PostgreSQL LISTEN/NOTIFY when a new task is created.
pub const TASK_NOTIFY_CHANNEL: &str = "ideaport_new_task";

const TASK_COLUMNS: &str = r#"
    id,
    task_type,
    status,
    payload,
    result,
    scheduled_at,
    started_at,
    completed_at,
    retry_count,
    max_retries,
    timeout_seconds,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new task and notify workers in the same transaction.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_task(
        &self,
        task_type: TaskType,
        payload: serde_json::Value,
        scheduled_at: Option<DateTime<Utc>>,
        max_retries: Option<i32>,
        timeout_seconds: Option<i32>,
    ) -> Result<Task> {
        let scheduled_at = scheduled_at.unwrap_or_else(Utc::now);
        let max_retries = max_retries.unwrap_or(3);
        let status = if scheduled_at > Utc::now() {
            TaskStatus::Scheduled
        } else {
            TaskStatus::Pending
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction for task creation")?;

        let task: Task = sqlx::query_as::<Postgres, Task>(&format!(
            r#"
            INSERT INTO tasks (task_type, status, payload, scheduled_at, max_retries, timeout_seconds)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_type.to_string())
        .bind(status.to_string())
        .bind(payload)
        .bind(scheduled_at)
        .bind(max_retries)
        .bind(timeout_seconds)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert task into database")?;

        // Wake workers immediately instead of waiting for the poll interval.
        // Non-fatal: workers discover the task via polling if NOTIFY fails.
        if let Err(e) = sqlx::query("SELECT pg_notify($1, '')")
            .bind(TASK_NOTIFY_CHANNEL)
            .execute(&mut *tx)
            .await
        {
            tracing::warn!(
                error = %e,
                task_id = %task.id,
                "Failed to send pg_notify for new task, workers will discover task via polling"
            );
        }

        tx.commit()
            .await
            .context("Failed to commit transaction for task creation")?;

        tracing::info!(
            task_id = %task.id,
            task_type = %task.task_type,
            "Task created"
        );

        Ok(task)
    }

    /// Claim the next runnable task, marking it running.
    /// Uses FOR UPDATE SKIP LOCKED for concurrent worker safety.
    #[tracing::instrument(skip(self))]
    pub async fn claim_next_task(&self) -> Result<Option<Task>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let task: Option<Task> = sqlx::query_as::<Postgres, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE status IN ('pending', 'scheduled')
                AND scheduled_at <= NOW()
            ORDER BY scheduled_at ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        ))
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch next task")?;

        let claimed = if let Some(task) = task {
            let updated: Task = sqlx::query_as::<Postgres, Task>(&format!(
                r#"
                UPDATE tasks
                SET status = 'running',
                    started_at = NOW(),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING {TASK_COLUMNS}
                "#,
            ))
            .bind(task.id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to update task status")?;
            Some(updated)
        } else {
            None
        };

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(claimed)
    }

    #[tracing::instrument(skip(self, result))]
    pub async fn mark_completed(&self, task_id: Uuid, result: serde_json::Value) -> Result<Task> {
        let task: Task = sqlx::query_as::<Postgres, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'completed',
                result = $2,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(result)
        .fetch_one(&self.pool)
        .await
        .context("Failed to mark task as completed")?;

        tracing::info!(task_id = %task_id, task_type = %task.task_type, "Task completed");

        Ok(task)
    }

    #[tracing::instrument(skip(self, error))]
    pub async fn mark_failed(&self, task_id: Uuid, error: serde_json::Value) -> Result<Task> {
        let task: Task = sqlx::query_as::<Postgres, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'failed',
                result = $2,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(error)
        .fetch_one(&self.pool)
        .await
        .context("Failed to mark task as failed")?;

        tracing::error!(task_id = %task_id, task_type = %task.task_type, "Task failed");

        Ok(task)
    }

    /// Schedule the next retry attempt after a backoff delay.
    /// Increments the retry counter and pushes scheduled_at into the future.
    #[tracing::instrument(skip(self))]
    pub async fn schedule_retry(&self, task_id: Uuid, backoff_seconds: u64) -> Result<Task> {
        let task: Task = sqlx::query_as::<Postgres, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'scheduled',
                retry_count = retry_count + 1,
                started_at = NULL,
                scheduled_at = NOW() + make_interval(secs => $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(backoff_seconds as f64)
        .fetch_one(&self.pool)
        .await
        .context("Failed to schedule task retry")?;

        tracing::info!(
            task_id = %task_id,
            retry_count = task.retry_count,
            max_retries = task.max_retries,
            backoff_seconds = backoff_seconds,
            "Task retry scheduled"
        );

        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, task_id: Uuid) -> Result<Option<Task>> {
        let task: Option<Task> = sqlx::query_as::<Postgres, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch task")?;

        Ok(task)
    }
}
