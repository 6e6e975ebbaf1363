//! Complainant registration, login and complaint lodging.

use grievance_core::UserRole;
use grievance_server::db::GrievanceStore;
use grievance_integration_tests::{TestApp, assert_redirect, body, client};
use reqwest::{StatusCode, header::LOCATION};

async fn register(app: &TestApp, client: &reqwest::Client, username: &str, email: &str) {
    let resp = app
        .post_form(
            client,
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", "password"),
            ],
        )
        .await;
    assert_redirect(&resp, "/complaints");
}

#[tokio::test]
async fn test_register_lodge_and_track() {
    let app = TestApp::spawn().await;
    let client = client();
    register(&app, &client, "alice", "alice@example.com").await;

    let resp = app
        .post_form(&client, "/complaints", &[("complaint_text", "billing error")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers()[LOCATION]
        .to_str()
        .expect("ascii location")
        .to_owned();
    assert_eq!(location, "/complaints/1");

    let page = body(app.get(&client, &location).await).await;
    assert!(page.contains("Complaint lodged."));
    assert!(page.contains("billing error"));
    assert!(page.contains("Pending"));

    let page = body(app.get(&client, "/complaints").await).await;
    assert!(page.contains("/complaints/1"));
}

#[tokio::test]
async fn test_unauthenticated_complaint_routes_redirect_to_login() {
    let app = TestApp::spawn().await;
    let client = client();

    for path in ["/complaints", "/complaints/new", "/complaints/1"] {
        let resp = app.get(&client, path).await;
        assert_redirect(&resp, "/login");
    }

    let resp = app
        .post_form(&client, "/complaints", &[("complaint_text", "billing error")])
        .await;
    assert_redirect(&resp, "/login");
    assert!(app.store.list_complaints(None).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_blank_complaint_is_rerendered() {
    let app = TestApp::spawn().await;
    let client = client();
    register(&app, &client, "alice", "alice@example.com").await;

    let resp = app
        .post_form(&client, "/complaints", &[("complaint_text", "   \n ")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("Complaint text is required"));
    assert!(app.store.list_complaints(None).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_other_users_complaints_are_not_found() {
    let app = TestApp::spawn().await;
    let alice = client();
    register(&app, &alice, "alice", "alice@example.com").await;
    app.post_form(&alice, "/complaints", &[("complaint_text", "billing error")])
        .await;

    let bob = client();
    register(&app, &bob, "bob", "bob@example.com").await;
    let resp = app.get(&bob, "/complaints/1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.get(&bob, "/complaints/zero").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::spawn().await;
    register(&app, &client(), "alice", "alice@example.com").await;

    let resp = app
        .post_form(
            &client(),
            "/register",
            &[
                ("username", "alice2"),
                ("email", "Alice@Example.com"),
                ("password", "password"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        body(resp)
            .await
            .contains("An account with this email or username already exists")
    );
}

#[tokio::test]
async fn test_user_login_is_scoped_to_complainants() {
    let app = TestApp::spawn().await;
    app.seed_account("alice", "alice@example.com", "alice-pw", UserRole::User)
        .await;
    let client = client();

    let resp = app
        .post_form(
            &client,
            "/login",
            &[("email", "alice@example.com"), ("password", "wrong")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body(resp).await.contains("Invalid credentials"));

    // Admin credentials do not work on the complainant login
    let resp = app
        .post_form(
            &client,
            "/login",
            &[
                ("email", grievance_integration_tests::ADMIN_EMAIL),
                ("password", grievance_integration_tests::ADMIN_PASSWORD),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    app.login_user(&client, "alice@example.com", "alice-pw").await;
    let resp = app.post_form(&client, "/logout", &[]).await;
    assert_redirect(&resp, "/");
    assert_redirect(&app.get(&client, "/complaints").await, "/login");
}

#[tokio::test]
async fn test_lodging_during_store_outage_fails_cleanly() {
    let app = TestApp::spawn().await;
    let client = client();
    register(&app, &client, "alice", "alice@example.com").await;

    app.store.set_unavailable(true);
    let resp = app
        .post_form(&client, "/complaints", &[("complaint_text", "billing error")])
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(resp).await, "Internal server error");
}
