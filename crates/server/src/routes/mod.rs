//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Welcome text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (store ping)
//!
//! # Admin
//! GET  /admin-login            - Admin login page
//! POST /admin-login            - Admin login action
//! POST /admin-logout           - Admin logout
//! GET  /admin-dashboard        - All complaints (requires admin)
//! POST /update-status/{id}     - Change a complaint's status (requires admin)
//!
//! # Complainants
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout
//! GET  /complaints             - Own complaints (requires user)
//! GET  /complaints/new         - Lodge form (requires user)
//! POST /complaints             - Lodge a complaint (requires user)
//! GET  /complaints/{id}        - Track one complaint (requires user)
//! ```

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};

use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin-login",
            get(auth::admin_login_page).post(auth::admin_login),
        )
        .route("/admin-logout", post(auth::admin_logout))
        .route("/admin-dashboard", get(admin::dashboard))
        .route("/update-status/{id}", post(admin::update_status))
}

/// Create the complainant auth routes router.
pub fn user_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the complaint routes router.
pub fn complaint_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(complaints::index).post(complaints::create))
        .route("/new", get(complaints::new_page))
        .route("/{id}", get(complaints::show))
}

/// Build the full application router (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(admin_routes())
        .merge(user_auth_routes())
        .nest("/complaints", complaint_routes())
}

/// Timestamp format used in every listing.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
