//! Complaint repository.
//!
//! Listings are ordered by `created_at` then `complaint_id` so the dashboard
//! is stable between refreshes.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use grievance_core::{ComplaintId, ComplaintStatus, UserId};

use super::{StoreError, map_constraint_violation};
use crate::models::{Complaint, ComplaintWithUser, StatusCount};

#[derive(Debug, sqlx::FromRow)]
struct ComplaintRow {
    complaint_id: ComplaintId,
    user_id: UserId,
    complaint_text: String,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
}

impl From<ComplaintRow> for Complaint {
    fn from(row: ComplaintRow) -> Self {
        Self {
            id: row.complaint_id,
            user_id: row.user_id,
            text: row.complaint_text,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DashboardRow {
    complaint_id: ComplaintId,
    username: String,
    complaint_text: String,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
}

impl From<DashboardRow> for ComplaintWithUser {
    fn from(row: DashboardRow) -> Self {
        Self {
            id: row.complaint_id,
            username: row.username,
            text: row.complaint_text,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusCountRow {
    status: ComplaintStatus,
    count: i64,
}

/// Repository for `complaints` queries on a single connection.
pub struct ComplaintRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ComplaintRepository<'c> {
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a complaint; `status` and `created_at` come from column defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if `user_id` does not reference a user.
    pub async fn create(&mut self, user_id: UserId, text: &str) -> Result<Complaint, StoreError> {
        let row = sqlx::query_as::<_, ComplaintRow>(
            r"
            INSERT INTO complaints (user_id, complaint_text)
            VALUES ($1, $2)
            RETURNING complaint_id, user_id, complaint_text, status, created_at
            ",
        )
        .bind(user_id)
        .bind(text)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_constraint_violation(e, "complaint must reference an existing user"))?;

        Ok(row.into())
    }

    /// List all complaints with the submitting user's username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_with_users(
        &mut self,
        status: Option<&ComplaintStatus>,
    ) -> Result<Vec<ComplaintWithUser>, StoreError> {
        let rows = sqlx::query_as::<_, DashboardRow>(
            r"
            SELECT c.complaint_id, u.username, c.complaint_text, c.status, c.created_at
            FROM complaints c
            JOIN users u ON c.user_id = u.user_id
            WHERE ($1::text IS NULL OR c.status = $1)
            ORDER BY c.created_at ASC, c.complaint_id ASC
            ",
        )
        .bind(status.map(ComplaintStatus::as_str))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count complaints per status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, StoreError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r"
            SELECT status, COUNT(*) AS count
            FROM complaints
            GROUP BY status
            ORDER BY status
            ",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StatusCount {
                status: r.status,
                count: r.count,
            })
            .collect())
    }

    /// List one user's complaints.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn list_for_user(&mut self, user_id: UserId) -> Result<Vec<Complaint>, StoreError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(
            r"
            SELECT complaint_id, user_id, complaint_text, status, created_at
            FROM complaints
            WHERE user_id = $1
            ORDER BY created_at ASC, complaint_id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a complaint owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_for_user(
        &mut self,
        user_id: UserId,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, StoreError> {
        let row = sqlx::query_as::<_, ComplaintRow>(
            r"
            SELECT complaint_id, user_id, complaint_text, status, created_at
            FROM complaints
            WHERE complaint_id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Set the status of a complaint.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was updated, `false` if the complaint doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn update_status(
        &mut self,
        id: ComplaintId,
        status: &ComplaintStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE complaints
            SET status = $1
            WHERE complaint_id = $2
            ",
        )
        .bind(status)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
