//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] grievance_core::EmailError),

    /// Invalid credentials (unknown email, wrong role, or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email or username already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password missing or unusable.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Username empty or too long.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show on the form that caused the error.
    ///
    /// Returns `None` for internal failures, which must not be echoed.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::InvalidEmail(e) => Some(format!("Invalid email: {e}")),
            Self::InvalidCredentials => Some("Invalid credentials".to_owned()),
            Self::UserAlreadyExists => {
                Some("An account with this email or username already exists".to_owned())
            }
            Self::WeakPassword(msg) | Self::InvalidUsername(msg) => Some(msg.clone()),
            Self::Store(_) | Self::PasswordHash => None,
        }
    }
}
