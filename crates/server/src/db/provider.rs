//! Connection provider.
//!
//! Hands out one pooled connection per unit of work. The returned guard puts
//! the connection back into the pool when dropped, so every exit path of a
//! handler (success, validation failure, store error, panic unwind) releases
//! it.

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::pool::PoolConnection;

use super::StoreError;

/// Acquires store handles with a bounded wait and a single retry.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    pool: PgPool,
    timeout: Duration,
}

impl ConnectionProvider {
    /// Create a provider over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Acquire a connection.
    ///
    /// A connection-class failure (I/O, TLS, pool timeout) is retried once.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if both attempts fail, or
    /// `StoreError::Timeout` if the retry itself does not finish in time.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        match self.try_acquire().await {
            Ok(conn) => Ok(conn),
            Err(e) if is_retryable(&e) => {
                tracing::warn!(error = %e, "store connection failed, retrying once");
                self.try_acquire().await.map_err(|e| match e {
                    AcquireError::Elapsed => StoreError::Timeout(self.timeout),
                    AcquireError::Sqlx(e) => StoreError::Unavailable(e),
                })
            }
            Err(AcquireError::Sqlx(e)) => Err(StoreError::Unavailable(e)),
            Err(AcquireError::Elapsed) => Err(StoreError::Timeout(self.timeout)),
        }
    }

    /// Run a store operation under the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error, or `StoreError::Timeout`.
    pub async fn bounded<F, T>(&self, op: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    async fn try_acquire(&self) -> Result<PoolConnection<Postgres>, AcquireError> {
        match tokio::time::timeout(self.timeout, self.pool.acquire()).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(AcquireError::Sqlx(e)),
            Err(_) => Err(AcquireError::Elapsed),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AcquireError {
    #[error("{0}")]
    Sqlx(sqlx::Error),
    #[error("acquire timed out")]
    Elapsed,
}

/// Whether a failed acquisition is worth one more attempt.
fn is_retryable(e: &AcquireError) -> bool {
    match e {
        AcquireError::Elapsed => true,
        AcquireError::Sqlx(e) => is_connection_error(e),
    }
}

const fn is_connection_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
    )
}
