use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-document scan states. PENDING is the initial state; CLEAN and
/// INFECTED are terminal. Racing scans may repeat a terminal write (last
/// write wins).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VirusScanStatus {
    Pending,
    Clean,
    Infected,
}

impl VirusScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VirusScanStatus::Clean | VirusScanStatus::Infected)
    }
}

impl Display for VirusScanStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VirusScanStatus::Pending => write!(f, "PENDING"),
            VirusScanStatus::Clean => write!(f, "CLEAN"),
            VirusScanStatus::Infected => write!(f, "INFECTED"),
        }
    }
}

impl FromStr for VirusScanStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(VirusScanStatus::Pending),
            "CLEAN" => Ok(VirusScanStatus::Clean),
            "INFECTED" => Ok(VirusScanStatus::Infected),
            _ => Err(anyhow::anyhow!("Invalid virus scan status: {}", s)),
        }
    }
}

/// A file attached to an idea, subject to asynchronous virus scanning.
///
/// `file_path` is the opaque storage key; it is system-assigned, unique per
/// stored object, and never exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
    pub virus_scan_status: VirusScanStatus,
    pub virus_scan_result: Option<String>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Document {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Document {
            id: row.get("id"),
            idea_id: row.get("idea_id"),
            file_name: row.get("file_name"),
            file_path: row.get("file_path"),
            file_size: row.get("file_size"),
            file_type: row.get("file_type"),
            uploaded_by: row.get("uploaded_by"),
            uploaded_at: row.get("uploaded_at"),
            virus_scan_status: row
                .get::<String, _>("virus_scan_status")
                .parse()
                .map_err(|e| {
                    sqlx::Error::Decode(
                        format!("Failed to parse virus_scan_status: {}", e).into(),
                    )
                })?,
            virus_scan_result: row.get("virus_scan_result"),
        })
    }
}

/// Client-facing document shape. The storage key stays internal.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
    pub virus_scan_status: VirusScanStatus,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            idea_id: doc.idea_id,
            file_name: doc.file_name,
            file_size: doc.file_size,
            file_type: doc.file_type,
            uploaded_by: doc.uploaded_by,
            uploaded_at: doc.uploaded_at,
            virus_scan_status: doc.virus_scan_status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanStatusResponse {
    pub id: Uuid,
    pub status: VirusScanStatus,
    pub result: Option<String>,
}

impl From<Document> for ScanStatusResponse {
    fn from(doc: Document) -> Self {
        ScanStatusResponse {
            id: doc.id,
            status: doc.virus_scan_status,
            result: doc.virus_scan_result,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document(status: VirusScanStatus) -> Document {
        Document {
            id: Uuid::new_v4(),
            idea_id: Uuid::new_v4(),
            file_name: "proposal.pdf".to_string(),
            file_path: "ideas/abc/xyz.pdf".to_string(),
            file_size: 2048,
            file_type: "pdf".to_string(),
            uploaded_by: Some(Uuid::new_v4()),
            uploaded_at: Utc::now(),
            virus_scan_status: status,
            virus_scan_result: None,
        }
    }

    #[test]
    fn test_scan_status_terminality() {
        assert!(!VirusScanStatus::Pending.is_terminal());
        assert!(VirusScanStatus::Clean.is_terminal());
        assert!(VirusScanStatus::Infected.is_terminal());
    }

    #[test]
    fn test_scan_status_round_trip() {
        for status in [
            VirusScanStatus::Pending,
            VirusScanStatus::Clean,
            VirusScanStatus::Infected,
        ] {
            assert_eq!(
                status.to_string().parse::<VirusScanStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_document_response_omits_storage_key() {
        let doc = test_document(VirusScanStatus::Pending);
        let json = serde_json::to_value(DocumentResponse::from(doc)).unwrap();
        assert!(json.get("file_path").is_none());
        assert_eq!(json["file_name"], "proposal.pdf");
        assert_eq!(json["virus_scan_status"], "PENDING");
    }

    #[test]
    fn test_scan_status_response_carries_result() {
        let mut doc = test_document(VirusScanStatus::Infected);
        doc.virus_scan_result = Some("Eicar-Test-Signature".to_string());
        let response = ScanStatusResponse::from(doc);
        assert_eq!(response.status, VirusScanStatus::Infected);
        assert_eq!(response.result.as_deref(), Some("Eicar-Test-Signature"));
    }
}
