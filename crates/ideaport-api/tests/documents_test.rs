mod helpers;

use helpers::auth::create_test_user;
use helpers::fixtures::{create_active_campaign, create_draft_idea, create_test_pdf, upload_file};
use helpers::scanner::ScriptedVerdict;
use helpers::{api_path, setup_test_app};
use serde_json::Value;
use uuid::Uuid;

async fn idea_for_upload(app: &helpers::TestApp, user: &helpers::auth::TestUser) -> Uuid {
    let campaign_id = create_active_campaign(app, user).await;
    let idea = create_draft_idea(app, user, campaign_id, "Document hub").await;
    idea["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn upload_creates_pending_document_and_enqueues_scan() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "alice", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "proposal.pdf", create_test_pdf()).await;
    assert_eq!(response.status_code(), 200);

    let document: Value = response.json();
    assert_eq!(document["virus_scan_status"], "PENDING");
    assert_eq!(document["file_name"], "proposal.pdf");
    assert_eq!(document["file_type"], "pdf");
    assert!(document.get("file_path").is_none());

    // Object stored under a system-assigned key
    assert_eq!(app.storage.file_count(), 1);
    let key = app.storage.keys().pop().unwrap();
    assert!(key.starts_with(&format!("ideas/{}/", idea_id)));

    // Scan job enqueued for the new document
    let tasks = app.tasks_of_type("virus_scan").await;
    assert_eq!(tasks.len(), 1);
    let document_id = document["id"].as_str().unwrap();
    assert_eq!(tasks[0].payload["document_id"].as_str().unwrap(), document_id);
}

#[tokio::test]
async fn oversized_upload_rejected_without_side_effects() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "bob", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let big = vec![0u8; 15 * 1024 * 1024];
    let response = upload_file(&app, &user, idea_id, "huge.pdf", big).await;
    assert_eq!(response.status_code(), 413);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(app.storage.file_count(), 0);
}

#[tokio::test]
async fn disallowed_extension_rejected_without_side_effects() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "carol", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "malware.exe", vec![1, 2, 3]).await;
    assert_eq!(response.status_code(), 400);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(app.storage.file_count(), 0);
}

#[tokio::test]
async fn upload_to_unknown_idea_rejected() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "dave", false).await;

    let response =
        upload_file(&app, &user, Uuid::new_v4(), "proposal.pdf", create_test_pdf()).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(app.storage.file_count(), 0);
}

#[tokio::test]
async fn hostile_filename_sanitized_for_display() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "erin", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(
        &app,
        &user,
        idea_id,
        "../../etc/my report (1).pdf",
        create_test_pdf(),
    )
    .await;
    assert_eq!(response.status_code(), 200);

    let document: Value = response.json();
    let display = document["file_name"].as_str().unwrap();
    assert!(!display.contains('/'));
    assert!(!display.contains(' '));
    assert!(display.ends_with(".pdf"));
}

#[tokio::test]
async fn clean_verdict_recorded_and_object_kept() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "frank", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "clean.pdf", create_test_pdf()).await;
    let document: Value = response.json();
    let document_id = document["id"].as_str().unwrap();

    app.scanner.set_verdict(ScriptedVerdict::Clean);
    let task = app.tasks_of_type("virus_scan").await.pop().unwrap();
    let result = app.dispatch(&task).await.unwrap();
    assert_eq!(result["status"], "clean");

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}/scan-status", document_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let status: Value = response.json();
    assert_eq!(status["status"], "CLEAN");

    // Stored object remains retrievable
    assert_eq!(app.storage.file_count(), 1);
    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}/download", document_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn infected_verdict_removes_object_and_keeps_record() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "grace", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "infected.pdf", create_test_pdf()).await;
    let document: Value = response.json();
    let document_id = document["id"].as_str().unwrap();

    app.scanner
        .set_verdict(ScriptedVerdict::Infected("Eicar-Test-Signature".to_string()));
    let task = app.tasks_of_type("virus_scan").await.pop().unwrap();
    let result = app.dispatch(&task).await.unwrap();
    assert_eq!(result["status"], "infected");

    // Terminal INFECTED state with diagnostic, record retained for audit
    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}/scan-status", document_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let status: Value = response.json();
    assert_eq!(status["status"], "INFECTED");
    assert!(status["result"]
        .as_str()
        .unwrap()
        .contains("Eicar-Test-Signature"));

    // Stored object is gone; download now fails with a visible error
    assert_eq!(app.storage.file_count(), 0);
    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}/download", document_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn transport_error_leaves_document_pending() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "heidi", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "flaky.pdf", create_test_pdf()).await;
    let document: Value = response.json();
    let document_id = document["id"].as_str().unwrap();

    app.scanner.set_verdict(ScriptedVerdict::TransportError);
    let task = app.tasks_of_type("virus_scan").await.pop().unwrap();
    let result = app.dispatch(&task).await;
    assert!(result.is_err());

    // The failure is recoverable: the queue retries it, the document stays
    // PENDING in the meantime.
    let err = result.unwrap_err();
    let recoverable = err
        .downcast_ref::<ideaport_core::TaskError>()
        .map(|te| te.is_recoverable())
        .unwrap_or(true);
    assert!(recoverable);

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}/scan-status", document_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    let status: Value = response.json();
    assert_eq!(status["status"], "PENDING");
}

#[tokio::test]
async fn duplicate_scan_of_settled_document_reconfirms() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "ivan", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "twice.pdf", create_test_pdf()).await;
    assert_eq!(response.status_code(), 200);

    let task = app.tasks_of_type("virus_scan").await.pop().unwrap();
    app.dispatch(&task).await.unwrap();

    // Re-delivery of the same job (at-least-once queue) is harmless
    let result = app.dispatch(&task).await.unwrap();
    assert_eq!(result["status"], "CLEAN");
    assert_eq!(result["note"], "already scanned");
    assert_eq!(app.scanner.scan_count(), 1);
}

#[tokio::test]
async fn scan_of_deleted_document_is_unrecoverable() {
    let app = setup_test_app().await;
    let user = create_test_user(app.pool(), "judy", false).await;
    let idea_id = idea_for_upload(&app, &user).await;

    let response = upload_file(&app, &user, idea_id, "gone.pdf", create_test_pdf()).await;
    let document: Value = response.json();
    let document_id: Uuid = document["id"].as_str().unwrap().parse().unwrap();

    sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(document_id)
        .execute(app.pool())
        .await
        .unwrap();

    let task = app.tasks_of_type("virus_scan").await.pop().unwrap();
    let err = app.dispatch(&task).await.unwrap_err();
    let recoverable = err
        .downcast_ref::<ideaport_core::TaskError>()
        .map(|te| te.is_recoverable())
        .unwrap_or(true);
    assert!(!recoverable);
}
