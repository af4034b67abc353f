//! Test fixtures: file blobs and API-driven entity creation.

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{api_path, TestApp};
use crate::helpers::auth::TestUser;

/// Minimal valid PDF bytes.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n"
        .to_vec()
}

/// Create an active campaign spanning today and return its id.
pub async fn create_active_campaign(app: &TestApp, user: &TestUser) -> Uuid {
    let response = app
        .client()
        .post(&api_path("/campaigns"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "name": format!("Campaign {}", Uuid::new_v4()),
            "description": "Integration test campaign",
            "status": "ACTIVE",
            "start_date": "2026-01-01",
            "end_date": "2026-12-31",
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Create a draft idea in the given campaign and return its response body.
pub async fn create_draft_idea(
    app: &TestApp,
    user: &TestUser,
    campaign_id: Uuid,
    title: &str,
) -> Value {
    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": campaign_id,
            "title": title,
            "description": "An idea created by integration tests",
            "expected_impact": "HIGH",
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json()
}

/// Upload a file to an idea; returns the raw test response.
pub async fn upload_file(
    app: &TestApp,
    user: &TestUser,
    idea_id: Uuid,
    file_name: &str,
    data: Vec<u8>,
) -> axum_test::TestResponse {
    let form = MultipartForm::new()
        .add_text("idea_id", idea_id.to_string())
        .add_part("file", Part::bytes(data).file_name(file_name));

    app.client()
        .post(&api_path("/documents"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(form)
        .await
}
