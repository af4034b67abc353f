use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    VirusScan,
    SubmissionConfirmation,
    ContributorNotification,
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskType::VirusScan => write!(f, "virus_scan"),
            TaskType::SubmissionConfirmation => write!(f, "submission_confirmation"),
            TaskType::ContributorNotification => write!(f, "contributor_notification"),
        }
    }
}

impl FromStr for TaskType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "virus_scan" => Ok(TaskType::VirusScan),
            "submission_confirmation" => Ok(TaskType::SubmissionConfirmation),
            "contributor_notification" => Ok(TaskType::ContributorNotification),
            _ => Err(anyhow::anyhow!("Invalid task type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Scheduled,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            "scheduled" => Ok(TaskStatus::Scheduled),
            _ => Err(anyhow::anyhow!("Invalid task status: {}", s)),
        }
    }
}

/// One unit of asynchronous work, delivered at least once by the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub payload: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub timeout_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Task {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Task {
            id: row.get("id"),
            task_type: row.get::<String, _>("task_type").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse task_type: {}", e).into())
            })?,
            status: row.get::<String, _>("status").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse task status: {}", e).into())
            })?,
            payload: row.get("payload"),
            result: row.get("result"),
            scheduled_at: row.get("scheduled_at"),
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
            retry_count: row.get("retry_count"),
            max_retries: row.get("max_retries"),
            timeout_seconds: row.get("timeout_seconds"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

impl Task {
    pub fn is_ready_to_run(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::Scheduled)
            && self.scheduled_at <= Utc::now()
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Extract the payload as a typed struct, returning an error on failure.
    pub fn try_payload_as<P: TaskPayload>(&self) -> Result<P, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Create a payload value from a typed struct.
    pub fn payload_from<P: TaskPayload>(payload: &P) -> serde_json::Value {
        serde_json::to_value(payload).unwrap_or_default()
    }
}

/// Trait for type-safe task payloads
pub trait TaskPayload: Serialize + for<'de> Deserialize<'de> {
    fn task_type() -> TaskType;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirusScanPayload {
    pub document_id: Uuid,
}

impl TaskPayload for VirusScanPayload {
    fn task_type() -> TaskType {
        TaskType::VirusScan
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfirmationPayload {
    pub idea_id: Uuid,
}

impl TaskPayload for SubmissionConfirmationPayload {
    fn task_type() -> TaskType {
        TaskType::SubmissionConfirmation
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorNotificationPayload {
    pub idea_id: Uuid,
    pub user_id: Uuid,
}

impl TaskPayload for ContributorNotificationPayload {
    fn task_type() -> TaskType {
        TaskType::ContributorNotification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_task(status: TaskStatus, retry_count: i32) -> Task {
        Task {
            id: Uuid::new_v4(),
            task_type: TaskType::VirusScan,
            status,
            payload: serde_json::json!({}),
            result: None,
            scheduled_at: Utc::now() - chrono::Duration::seconds(10),
            started_at: None,
            completed_at: None,
            retry_count,
            max_retries: 3,
            timeout_seconds: Some(300),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_type_display_round_trip() {
        for task_type in [
            TaskType::VirusScan,
            TaskType::SubmissionConfirmation,
            TaskType::ContributorNotification,
        ] {
            assert_eq!(
                task_type.to_string().parse::<TaskType>().unwrap(),
                task_type
            );
        }
        assert!("transcode".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_task_status_from_str() {
        assert_eq!("pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!("failed".parse::<TaskStatus>().unwrap(), TaskStatus::Failed);
        assert!("cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_is_ready_to_run() {
        assert!(test_task(TaskStatus::Pending, 0).is_ready_to_run());
        assert!(test_task(TaskStatus::Scheduled, 0).is_ready_to_run());
        assert!(!test_task(TaskStatus::Running, 0).is_ready_to_run());

        let mut future = test_task(TaskStatus::Scheduled, 0);
        future.scheduled_at = Utc::now() + chrono::Duration::seconds(3600);
        assert!(!future.is_ready_to_run());
    }

    #[test]
    fn test_can_retry() {
        assert!(test_task(TaskStatus::Failed, 2).can_retry());
        assert!(!test_task(TaskStatus::Failed, 3).can_retry());
        assert!(!test_task(TaskStatus::Failed, 5).can_retry());
    }

    #[test]
    fn test_typed_payload_round_trip() {
        let document_id = Uuid::new_v4();
        let payload = VirusScanPayload { document_id };
        let mut task = test_task(TaskStatus::Pending, 0);
        task.payload = Task::payload_from(&payload);

        let decoded: VirusScanPayload = task.try_payload_as().unwrap();
        assert_eq!(decoded.document_id, document_id);
    }

    #[test]
    fn test_mismatched_payload_fails() {
        let mut task = test_task(TaskStatus::Pending, 0);
        task.payload = serde_json::json!({"unexpected": true});
        assert!(task.try_payload_as::<VirusScanPayload>().is_err());
    }
}
