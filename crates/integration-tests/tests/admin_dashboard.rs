//! Dashboard listing and status updates.

use grievance_core::{ComplaintId, ComplaintStatus, UserRole};
use grievance_integration_tests::{TestApp, assert_redirect, body, client};
use grievance_server::db::GrievanceStore;
use reqwest::StatusCode;

async fn lodge(app: &TestApp, username: &str, text: &str) -> ComplaintId {
    let user = app
        .seed_account(
            username,
            &format!("{username}@example.com"),
            "password",
            UserRole::User,
        )
        .await;
    app.store
        .create_complaint(user.id, text)
        .await
        .expect("Failed to lodge complaint")
        .id
}

#[tokio::test]
async fn test_alice_billing_error_scenario() {
    let app = TestApp::spawn().await;
    let id = lodge(&app, "alice", "billing error").await;
    let client = client();
    app.login_admin(&client).await;

    let page = body(app.get(&client, "/admin-dashboard").await).await;
    assert!(page.contains("alice"));
    assert!(page.contains("billing error"));
    assert!(page.contains("Pending"));

    let resp = app
        .post_form(
            &client,
            &format!("/update-status/{id}"),
            &[("status", "resolved")],
        )
        .await;
    assert_redirect(&resp, "/admin-dashboard");

    let page = body(app.get(&client, "/admin-dashboard").await).await;
    assert!(page.contains("Complaint status updated."));
    assert!(page.contains("Resolved"));
    assert_eq!(
        app.store.status_of(id).await,
        Some(ComplaintStatus::resolved())
    );
}

#[tokio::test]
async fn test_unauthenticated_requests_redirect_without_leaking() {
    let app = TestApp::spawn().await;
    let id = lodge(&app, "alice", "secret grievance").await;
    let client = client();

    let resp = app.get(&client, "/admin-dashboard").await;
    assert_redirect(&resp, "/admin-login");
    assert!(!body(resp).await.contains("secret grievance"));

    let resp = app
        .post_form(
            &client,
            &format!("/update-status/{id}"),
            &[("status", "resolved")],
        )
        .await;
    assert_redirect(&resp, "/admin-login");
    assert_eq!(app.store.status_of(id).await, Some(ComplaintStatus::pending()));

    // Authorization is checked before the ID is parsed
    let resp = app
        .post_form(&client, "/update-status/abc", &[("status", "resolved")])
        .await;
    assert_redirect(&resp, "/admin-login");
}

#[tokio::test]
async fn test_status_update_is_idempotent() {
    let app = TestApp::spawn().await;
    let id = lodge(&app, "alice", "water outage").await;
    let client = client();
    app.login_admin(&client).await;

    for _ in 0..2 {
        let resp = app
            .post_form(
                &client,
                &format!("/update-status/{id}"),
                &[("status", "in_progress")],
            )
            .await;
        assert_redirect(&resp, "/admin-dashboard");
    }

    let expected = ComplaintStatus::parse("in_progress").expect("valid status");
    assert_eq!(app.store.status_of(id).await, Some(expected));
    let rows = app.store.list_complaints(None).await.expect("list");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_free_form_status_is_stored_verbatim() {
    let app = TestApp::spawn().await;
    let id = lodge(&app, "alice", "pothole").await;
    let client = client();
    app.login_admin(&client).await;

    app.post_form(
        &client,
        &format!("/update-status/{id}"),
        &[("status", "  escalated  ")],
    )
    .await;

    let expected = ComplaintStatus::parse("escalated").expect("valid status");
    assert_eq!(app.store.status_of(id).await, Some(expected));
    assert!(body(app.get(&client, "/admin-dashboard").await).await.contains("escalated"));
}

#[tokio::test]
async fn test_missing_complaint_flashes_not_found() {
    let app = TestApp::spawn().await;
    let client = client();
    app.login_admin(&client).await;

    let resp = app
        .post_form(&client, "/update-status/999", &[("status", "resolved")])
        .await;
    assert_redirect(&resp, "/admin-dashboard");

    let page = body(app.get(&client, "/admin-dashboard").await).await;
    assert!(page.contains("Complaint #999 not found"));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::spawn().await;
    let client = client();
    app.login_admin(&client).await;

    for raw in ["abc", "0", "-3"] {
        let resp = app
            .post_form(
                &client,
                &format!("/update-status/{raw}"),
                &[("status", "resolved")],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "id {raw}");
    }
}

#[tokio::test]
async fn test_blank_status_writes_nothing() {
    let app = TestApp::spawn().await;
    let id = lodge(&app, "alice", "noise complaint").await;
    let client = client();
    app.login_admin(&client).await;

    let resp = app
        .post_form(&client, &format!("/update-status/{id}"), &[("status", "   ")])
        .await;
    assert_redirect(&resp, "/admin-dashboard");
    assert_eq!(app.store.status_of(id).await, Some(ComplaintStatus::pending()));

    let page = body(app.get(&client, "/admin-dashboard").await).await;
    assert!(page.contains("Invalid status"));
}

#[tokio::test]
async fn test_dashboard_filter_and_summary() {
    let app = TestApp::spawn().await;
    let first = lodge(&app, "alice", "billing error").await;
    lodge(&app, "bob", "late delivery").await;
    app.store
        .update_status(first, &ComplaintStatus::resolved())
        .await
        .expect("update");

    let client = client();
    app.login_admin(&client).await;

    let page = body(app.get(&client, "/admin-dashboard?status=resolved").await).await;
    assert!(page.contains("billing error"));
    assert!(!page.contains("late delivery"));
    assert!(page.contains("2 complaint(s) in total."));

    let page = body(app.get(&client, "/admin-dashboard").await).await;
    assert!(page.contains("billing error"));
    assert!(page.contains("late delivery"));
}

#[tokio::test]
async fn test_store_outage_is_a_generic_server_error() {
    let app = TestApp::spawn().await;
    let client = client();
    app.login_admin(&client).await;

    app.store.set_unavailable(true);
    let resp = app.get(&client, "/admin-dashboard").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(resp).await, "Internal server error");
}

#[tokio::test]
async fn test_session_store_outage_is_a_server_error_not_a_login_redirect() {
    let app = TestApp::spawn().await;
    let client = client();
    app.login_admin(&client).await;

    app.sessions.set_unavailable(true);
    let resp = app.get(&client, "/admin-dashboard").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(reqwest::header::LOCATION).is_none());
    assert_eq!(body(resp).await, "Internal server error");

    app.sessions.set_unavailable(false);
    let resp = app.get(&client, "/admin-dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
