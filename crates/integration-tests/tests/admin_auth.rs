//! Admin login and logout.

use grievance_core::UserRole;
use grievance_integration_tests::{ADMIN_EMAIL, TestApp, assert_redirect, body, client};
use reqwest::StatusCode;

#[tokio::test]
async fn test_valid_admin_login_reaches_dashboard() {
    let app = TestApp::spawn().await;
    let client = client();

    app.login_admin(&client).await;

    let resp = app.get(&client, "/admin-dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("Signed in as admin"));
}

#[tokio::test]
async fn test_wrong_password_rerenders_without_session() {
    let app = TestApp::spawn().await;
    let client = client();

    let resp = app
        .post_form(
            &client,
            "/admin-login",
            &[("email", ADMIN_EMAIL), ("password", "not-the-password")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("Invalid admin credentials"));

    let resp = app.get(&client, "/admin-dashboard").await;
    assert_redirect(&resp, "/admin-login");
}

#[tokio::test]
async fn test_unknown_and_malformed_emails_are_rejected() {
    let app = TestApp::spawn().await;
    let client = client();

    for email in ["nobody@grievance.test", "not-an-email", ""] {
        let resp = app
            .post_form(
                &client,
                "/admin-login",
                &[("email", email), ("password", "whatever")],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body(resp).await.contains("Invalid admin credentials"));
    }
}

#[tokio::test]
async fn test_complainant_cannot_log_in_as_admin() {
    let app = TestApp::spawn().await;
    app.seed_account("alice", "alice@example.com", "alice-pw", UserRole::User)
        .await;
    let client = client();

    let resp = app
        .post_form(
            &client,
            "/admin-login",
            &[("email", "alice@example.com"), ("password", "alice-pw")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("Invalid admin credentials"));

    // A complainant session does not open the dashboard either
    app.login_user(&client, "alice@example.com", "alice-pw").await;
    let resp = app.get(&client, "/admin-dashboard").await;
    assert_redirect(&resp, "/admin-login");
}

#[tokio::test]
async fn test_logout_ends_admin_session() {
    let app = TestApp::spawn().await;
    let client = client();
    app.login_admin(&client).await;

    let resp = app.post_form(&client, "/admin-logout", &[]).await;
    assert_redirect(&resp, "/admin-login");

    let resp = app.get(&client, "/admin-dashboard").await;
    assert_redirect(&resp, "/admin-login");
}

#[tokio::test]
async fn test_admin_login_page_renders() {
    let app = TestApp::spawn().await;
    let resp = app.get(&client(), "/admin-login").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("action=\"/admin-login\""));
}

#[tokio::test]
async fn test_admin_logout_keeps_complainant_session() {
    let app = TestApp::spawn().await;
    app.seed_account("alice", "alice@example.com", "alice-pw", UserRole::User)
        .await;
    let client = client();
    app.login_admin(&client).await;
    app.login_user(&client, "alice@example.com", "alice-pw").await;

    let resp = app.post_form(&client, "/admin-logout", &[]).await;
    assert_redirect(&resp, "/admin-login");

    assert_redirect(&app.get(&client, "/admin-dashboard").await, "/admin-login");
    assert_eq!(
        app.get(&client, "/complaints").await.status(),
        StatusCode::OK
    );
}
