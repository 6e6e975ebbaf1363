//! User domain types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use grievance_core::{Email, UserId, UserRole};

/// An account (complainant or admin).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name shown on the admin dashboard.
    pub username: String,
    /// Login credential.
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored password hash, as needed for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: SecretString,
}
