//! Database migration command.
//!
//! Applies the embedded schema migrations (`crates/server/migrations/`) and
//! creates the `tower_sessions` schema used by the session store.

use std::time::Duration;

use tower_sessions_sqlx_store::PostgresStore;

use grievance_server::db;

use super::{CommandError, database_url};

/// Run all migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url, Duration::from_secs(10)).await?;

    tracing::info!("Running schema migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete");
    Ok(())
}
