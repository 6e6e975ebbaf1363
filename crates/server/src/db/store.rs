//! The store seam handlers depend on.

use async_trait::async_trait;
use secrecy::SecretString;

use grievance_core::{ComplaintId, ComplaintStatus, Email, UserId, UserRole};

use super::StoreError;
use crate::models::{Complaint, ComplaintWithUser, StatusCount, User, UserCredentials};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    /// Argon2 PHC string, never a plaintext password.
    pub password_hash: SecretString,
    pub role: UserRole,
}

/// Persistent storage for users and complaints.
///
/// Every method is one request-scoped unit of work: implementations acquire a
/// handle, run at most one statement, and release the handle before
/// returning.
#[async_trait]
pub trait GrievanceStore: Send + Sync {
    /// Find the account with this email and role, including its password hash.
    async fn find_user_by_email(
        &self,
        email: &Email,
        role: UserRole,
    ) -> Result<Option<UserCredentials>, StoreError>;

    /// Create an account.
    ///
    /// Fails with `StoreError::Conflict` if the email or username is taken.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError>;

    /// Lodge a complaint for `user_id` with the default status and the
    /// current time as `created_at`.
    async fn create_complaint(&self, user_id: UserId, text: &str)
    -> Result<Complaint, StoreError>;

    /// All complaints joined with the submitter's username, oldest first
    /// (`created_at`, then `complaint_id`), optionally restricted to one status.
    async fn list_complaints(
        &self,
        status: Option<&ComplaintStatus>,
    ) -> Result<Vec<ComplaintWithUser>, StoreError>;

    /// Complaint counts grouped by status, ordered by status.
    async fn count_by_status(&self) -> Result<Vec<StatusCount>, StoreError>;

    /// One user's complaints, oldest first.
    async fn list_user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>, StoreError>;

    /// A complaint, but only if `user_id` submitted it.
    async fn get_user_complaint(
        &self,
        user_id: UserId,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, StoreError>;

    /// Set a complaint's status. Returns `false` if no complaint has that ID.
    ///
    /// Concurrent updates of the same complaint are last-write-wins.
    async fn update_status(
        &self,
        id: ComplaintId,
        status: &ComplaintStatus,
    ) -> Result<bool, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
