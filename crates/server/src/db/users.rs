//! User repository.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgConnection;

use grievance_core::{Email, UserId, UserRole};

use super::{NewUser, StoreError, map_constraint_violation};
use crate::models::{User, UserCredentials};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: UserId,
    username: String,
    email: Email,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            username: row.username,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for `users` queries on a single connection.
pub struct UserRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> UserRepository<'c> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Get an account and its password hash by email and role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn find_by_email(
        &mut self,
        email: &Email,
        role: UserRole,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r"
            SELECT user_id, username, email, role, created_at, password_hash
            FROM users
            WHERE email = $1 AND role = $2
            ",
        )
        .bind(email)
        .bind(role)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|r| UserCredentials {
            user: r.user.into(),
            password_hash: SecretString::from(r.password_hash),
        }))
    }

    /// Insert an account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email or username already exists.
    /// Returns `StoreError::Database` for other database errors.
    pub async fn create(&mut self, new_user: &NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, username, email, role, created_at
            ",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(new_user.password_hash.expose_secret())
        .bind(new_user.role)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_constraint_violation(e, "email or username already exists"))?;

        Ok(row.into())
    }
}
