//! Authentication extractors.
//!
//! Admin and complainant identities live under separate session keys, so
//! holding one never satisfies the other extractor. Both extractors run
//! before any other handler argument is parsed: an unauthenticated request
//! is redirected without touching the store or validating input. A session
//! backend failure is a server error, not a missing identity.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::de::DeserializeOwned;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentAdmin, CurrentUser, session_keys};

/// Extractor that requires an admin session.
///
/// Redirects to `/admin-login` when absent.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Extractor that requires a complainant session.
///
/// Redirects to `/login` when absent.
pub struct RequireUser(pub CurrentUser);

/// Rejection for a missing identity: a redirect to the matching login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    AdminLogin,
    UserLogin,
}

impl AuthRejection {
    /// Login page this rejection redirects to.
    #[must_use]
    pub const fn location(self) -> &'static str {
        match self {
            Self::AdminLogin => "/admin-login",
            Self::UserLogin => "/login",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(self.location()).into_response()
    }
}

async fn identity<T: DeserializeOwned>(
    parts: &Parts,
    key: &str,
    rejection: AuthRejection,
) -> Result<T, Response> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Err(rejection.into_response());
    };
    match session.get::<T>(key).await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(rejection.into_response()),
        Err(e) => Err(AppError::Session(e).into_response()),
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity(parts, session_keys::CURRENT_ADMIN, AuthRejection::AdminLogin)
            .await
            .map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity(parts, session_keys::CURRENT_USER, AuthRejection::UserLogin)
            .await
            .map(Self)
    }
}

/// Store the logged-in admin, issuing a fresh session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Remove the admin identity and issue a fresh session ID.
///
/// A complainant identity held by the same browser is left in place.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove_value(session_keys::CURRENT_ADMIN).await?;
    session.cycle_id().await
}

/// Store the logged-in complainant, issuing a fresh session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the complainant identity and issue a fresh session ID.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove_value(session_keys::CURRENT_USER).await?;
    session.cycle_id().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_redirect_to_matching_login() {
        let admin = AuthRejection::AdminLogin.into_response();
        assert_eq!(admin.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(admin.headers()["location"], "/admin-login");

        let user = AuthRejection::UserLogin.into_response();
        assert_eq!(user.headers()["location"], "/login");
    }
}
