mod helpers;

use helpers::auth::create_test_user;
use helpers::fixtures::{create_active_campaign, create_draft_idea};
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn create_idea_starts_draft_with_submitter_contributor() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "alice", false).await;
    let campaign_id = create_active_campaign(&app, &user).await;

    let idea = create_draft_idea(&app, &user, campaign_id, "Solar-powered kiosks").await;

    assert_eq!(idea["status"], "DRAFT");
    assert_eq!(idea["title"], "Solar-powered kiosks");
    assert!(idea["submitted_at"].is_null());

    let contributors = idea["contributors"].as_array().unwrap();
    assert_eq!(contributors.len(), 1);
    assert_eq!(contributors[0]["role"], "SUBMITTER");
    assert_eq!(
        contributors[0]["user"]["id"].as_str().unwrap(),
        user.id().to_string()
    );
}

#[tokio::test]
async fn create_idea_validates_input() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "bob", false).await;
    let campaign_id = create_active_campaign(&app, &user).await;

    // Whitespace-only title
    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": campaign_id,
            "title": "   ",
            "description": "valid description",
            "expected_impact": "HIGH",
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Title over 200 chars
    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": campaign_id,
            "title": "x".repeat(201),
            "description": "valid description",
            "expected_impact": "HIGH",
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Unknown impact level
    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": campaign_id,
            "title": "A fine title",
            "description": "valid description",
            "expected_impact": "URGENT",
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Unknown campaign
    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": uuid::Uuid::new_v4(),
            "title": "A fine title",
            "description": "valid description",
            "expected_impact": "HIGH",
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Nothing was created along the way
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ideas")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn duplicate_title_in_campaign_conflicts() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "carol", false).await;
    let campaign_id = create_active_campaign(&app, &user).await;

    create_draft_idea(&app, &user, campaign_id, "Reusable packaging").await;

    let response = app
        .client()
        .post(&api_path("/ideas"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "campaign_id": campaign_id,
            "title": "Reusable packaging",
            "description": "Different description, same title",
            "expected_impact": "LOW",
        }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn submit_transitions_once_and_enqueues_confirmation() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "dave", false).await;
    let campaign_id = create_active_campaign(&app, &user).await;
    let idea = create_draft_idea(&app, &user, campaign_id, "Office composting").await;
    let idea_id = idea["id"].as_str().unwrap();

    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/submit", idea_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let submitted: Value = response.json();
    assert_eq!(submitted["status"], "SUBMITTED");
    assert!(!submitted["submitted_at"].is_null());

    // Second submit hits the state-machine precondition
    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/submit", idea_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");

    // Status never regressed
    let response = app
        .client()
        .get(&api_path(&format!("/ideas/{}", idea_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    let fetched: Value = response.json();
    assert_eq!(fetched["status"], "SUBMITTED");

    // Confirmation task queued exactly once
    let tasks = app.tasks_of_type("submission_confirmation").await;
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn only_submitter_can_mutate() {
    let app = setup_test_app().await;
    let owner = create_test_user(app.pool(), "erin", false).await;
    let intruder = create_test_user(app.pool(), "frank", false).await;
    let campaign_id = create_active_campaign(&app, &owner).await;
    let idea = create_draft_idea(&app, &owner, campaign_id, "Bike-to-work program").await;
    let idea_id = idea["id"].as_str().unwrap().to_string();

    // Submit the idea so it becomes visible to others
    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/submit", idea_id)))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .await;
    assert_eq!(response.status_code(), 200);

    // Read works for everyone once out of draft
    let response = app
        .client()
        .get(&api_path(&format!("/ideas/{}", idea_id)))
        .add_header("Authorization", format!("Bearer {}", intruder.token))
        .await;
    assert_eq!(response.status_code(), 200);

    // Mutation is submitter-only
    let response = app
        .client()
        .put(&api_path(&format!("/ideas/{}", idea_id)))
        .add_header("Authorization", format!("Bearer {}", intruder.token))
        .json(&json!({ "title": "Hijacked title" }))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/contributors", idea_id)))
        .add_header("Authorization", format!("Bearer {}", intruder.token))
        .json(&json!({ "user_id": intruder.id() }))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn draft_ideas_hidden_from_other_users() {
    let app = setup_test_app().await;
    let owner = create_test_user(app.pool(), "grace", false).await;
    let other = create_test_user(app.pool(), "heidi", false).await;
    let staff = create_test_user(app.pool(), "ivan", true).await;
    let campaign_id = create_active_campaign(&app, &owner).await;
    let idea = create_draft_idea(&app, &owner, campaign_id, "Quiet rooms").await;
    let idea_id = idea["id"].as_str().unwrap();

    let response = app
        .client()
        .get(&api_path(&format!("/ideas/{}", idea_id)))
        .add_header("Authorization", format!("Bearer {}", other.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .client()
        .get(&api_path(&format!("/ideas/{}", idea_id)))
        .add_header("Authorization", format!("Bearer {}", staff.token))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn add_contributor_enforces_uniqueness() {
    let app = setup_test_app().await;
    let owner = create_test_user(app.pool(), "judy", false).await;
    let collaborator = create_test_user(app.pool(), "ken", false).await;
    let campaign_id = create_active_campaign(&app, &owner).await;
    let idea = create_draft_idea(&app, &owner, campaign_id, "Lunch-and-learn series").await;
    let idea_id = idea["id"].as_str().unwrap().to_string();

    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/contributors", idea_id)))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .json(&json!({ "user_id": collaborator.id() }))
        .await;
    assert_eq!(response.status_code(), 200);
    let added: Value = response.json();
    assert_eq!(added["role"], "CONTRIBUTOR");

    // Same pair again: exactly one row, one conflict
    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/contributors", idea_id)))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .json(&json!({ "user_id": collaborator.id() }))
        .await;
    assert_eq!(response.status_code(), 409);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM contributors WHERE user_id = $1")
            .bind(collaborator.id())
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(count, 1);

    // Unknown user is a 404, not a conflict
    let response = app
        .client()
        .post(&api_path(&format!("/ideas/{}/contributors", idea_id)))
        .add_header("Authorization", format!("Bearer {}", owner.token))
        .json(&json!({ "user_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), 404);

    // Notification task queued for the successful add only
    let tasks = app.tasks_of_type("contributor_notification").await;
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn unauthenticated_requests_rejected() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/ideas/does-not-matter")).await;
    assert_eq!(response.status_code(), 401);

    let response = app.client().post(&api_path("/ideas")).json(&json!({})).await;
    assert_eq!(response.status_code(), 401);
}
