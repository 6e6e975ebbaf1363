//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use grievance_core::{Email, UserId};

use super::User;

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's username.
    pub username: String,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Session-stored complainant identity.
///
/// Complaints are always attributed to `id`, never to a client-supplied value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's username.
    pub username: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// A one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class used by the templates.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "flash flash-success",
            FlashLevel::Error => "flash flash-error",
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for storing the logged-in complainant.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}
