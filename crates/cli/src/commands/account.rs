//! Account creation command.
//!
//! Goes through the same service as `/register`, so CLI-created accounts get
//! the same validation and argon2 hashing.

use std::time::Duration;

use grievance_core::{UserId, UserRole};
use grievance_server::db::{self, ConnectionProvider, PgStore};
use grievance_server::services::auth::AuthService;

use super::{CommandError, database_url};

const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create an account with `role`.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CommandError::Account` if the input is invalid or the email or
/// username is taken, `CommandError::Database` if the database is
/// unreachable.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<UserId, CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url, STORE_TIMEOUT).await?;
    let store = PgStore::new(ConnectionProvider::new(pool, STORE_TIMEOUT));

    tracing::info!("Creating {} account: {}", role, email);
    let user = AuthService::new(&store)
        .create_account(username, email, password, role)
        .await?;

    Ok(user.id)
}
