//! Authentication route handlers.
//!
//! Admins and complainants log in through separate pages that share one
//! credential check. A failed login re-renders the form with a message and
//! leaves the session untouched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use grievance_core::UserRole;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    clear_current_admin, clear_current_user, set_current_admin, set_current_user, take_flash,
};
use crate::models::{CurrentAdmin, CurrentUser, Flash};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Message shown when admin login fails for any reason.
pub const INVALID_ADMIN_CREDENTIALS: &str = "Invalid admin credentials";

/// Message shown when complainant login fails for any reason.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data (both roles).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_login.html")]
pub struct AdminLoginTemplate {
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub email: String,
}

/// Complainant login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub username: String,
    pub email: String,
}

// =============================================================================
// Admin
// =============================================================================

/// Display the admin login page.
pub async fn admin_login_page(session: Session) -> impl IntoResponse {
    AdminLoginTemplate {
        flash: take_flash(&session).await,
        error: None,
        email: String::new(),
    }
}

/// Handle admin login form submission.
///
/// # Errors
///
/// Returns `AppError` if the store or session fails.
pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state
        .auth()
        .login(&form.email, &form.password, UserRole::Admin)
        .await
    {
        Ok(user) => {
            set_current_admin(&session, &CurrentAdmin::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "admin logged in");
            Ok(Redirect::to("/admin-dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("admin login rejected");
            Ok(AdminLoginTemplate {
                flash: None,
                error: Some(INVALID_ADMIN_CREDENTIALS.to_owned()),
                email: form.email,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Log the admin out.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be cleared.
pub async fn admin_logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/admin-login"))
}

// =============================================================================
// Complainants
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        flash: take_flash(&session).await,
        error: None,
        email: String::new(),
    }
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns `AppError` if the store or session fails.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state
        .auth()
        .login(&form.email, &form.password, UserRole::User)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, None);
            tracing::info!(user_id = %user.id, "user logged in");
            Ok(Redirect::to("/complaints").into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok(LoginTemplate {
            flash: None,
            error: Some(INVALID_CREDENTIALS.to_owned()),
            email: form.email,
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        flash: take_flash(&session).await,
        error: None,
        username: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// On success the new account is logged in immediately.
///
/// # Errors
///
/// Returns `AppError` if the store or session fails.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match state
        .auth()
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, None);
            Ok(Redirect::to("/complaints").into_response())
        }
        Err(e) => match e.user_message() {
            Some(message) => Ok(RegisterTemplate {
                flash: None,
                error: Some(message),
                username: form.username,
                email: form.email,
            }
            .into_response()),
            None => Err(e.into()),
        },
    }
}

/// Log the complainant out.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be cleared.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
