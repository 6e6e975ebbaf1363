//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Authentication and authorization
//! failures never reach this type: they re-render forms or redirect. What
//! remains maps to 404 or a generic 500 whose details only go to the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed unexpectedly.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Auth(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::NotFound(_) => "Not found".to_owned(),
            _ => "Internal server error".to_owned(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("complaint 7".to_string());
        assert_eq!(err.to_string(), "Not found: complaint 7");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Timeout(Duration::from_secs(5)))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Session(tower_sessions::session::Error::Store(
                tower_sessions::session_store::Error::Backend("down".to_owned())
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_store_details_are_not_exposed() {
        let response = AppError::Store(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
            .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        assert_eq!(&body[..], b"Internal server error");
    }
}
