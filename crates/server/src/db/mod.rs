//! Relational store access.
//!
//! # Database
//!
//! ## Tables
//!
//! - `users` - Accounts for complainants and admins (argon2 password hashes)
//! - `complaints` - Lodged complaints, many-to-one with `users`
//! - `tower_sessions.session` - Session storage (created by the session store migration)
//!
//! # Layers
//!
//! - [`ConnectionProvider`] - bounded, retry-once acquisition of pooled connections
//! - [`users`] / [`complaints`] - repositories running queries on one connection
//! - [`GrievanceStore`] - the seam handlers depend on; [`PgStore`] is the
//!   production implementation
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p grievance-cli -- migrate
//! ```

pub mod complaints;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;
pub mod provider;
pub mod store;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use provider::ConnectionProvider;
pub use store::{GrievanceStore, NewUser};

/// Embedded schema migrations for the `users` and `complaints` tables.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be obtained, even after a retry.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The operation did not finish within the configured bound.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., duplicate email, unknown user).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// The pool hands out one connection per request-scoped unit of work; the
/// guard returns it when dropped.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(acquire_timeout)
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique or foreign-key violation to [`StoreError::Conflict`].
pub(crate) fn map_constraint_violation(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
    {
        return StoreError::Conflict(what.to_owned());
    }
    StoreError::Database(e)
}
