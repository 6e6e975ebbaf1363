//! CLI subcommands.

pub mod account;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

use grievance_server::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account could not be created.
    #[error("Account error: {0}")]
    Account(#[from] AuthError),
}

/// Read the database URL from `GRIEVANCE_DATABASE_URL`, falling back to
/// `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("GRIEVANCE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("GRIEVANCE_DATABASE_URL"))
}
