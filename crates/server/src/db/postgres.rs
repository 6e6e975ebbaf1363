//! `PostgreSQL` implementation of [`GrievanceStore`].

use async_trait::async_trait;

use grievance_core::{ComplaintId, ComplaintStatus, Email, UserId, UserRole};

use super::complaints::ComplaintRepository;
use super::users::UserRepository;
use super::{ConnectionProvider, GrievanceStore, NewUser, StoreError};
use crate::models::{Complaint, ComplaintWithUser, StatusCount, User, UserCredentials};

/// Store backed by `PostgreSQL`.
///
/// Each call acquires its own connection from the provider; the guard is
/// dropped (and the connection returned) when the call returns.
#[derive(Debug, Clone)]
pub struct PgStore {
    provider: ConnectionProvider,
}

impl PgStore {
    #[must_use]
    pub const fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl GrievanceStore for PgStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
        role: UserRole,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(UserRepository::new(&mut conn).find_by_email(email, role))
            .await
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(UserRepository::new(&mut conn).create(new_user))
            .await
    }

    async fn create_complaint(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<Complaint, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(ComplaintRepository::new(&mut conn).create(user_id, text))
            .await
    }

    async fn list_complaints(
        &self,
        status: Option<&ComplaintStatus>,
    ) -> Result<Vec<ComplaintWithUser>, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(ComplaintRepository::new(&mut conn).list_with_users(status))
            .await
    }

    async fn count_by_status(&self) -> Result<Vec<StatusCount>, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(ComplaintRepository::new(&mut conn).count_by_status())
            .await
    }

    async fn list_user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(ComplaintRepository::new(&mut conn).list_for_user(user_id))
            .await
    }

    async fn get_user_complaint(
        &self,
        user_id: UserId,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(ComplaintRepository::new(&mut conn).get_for_user(user_id, id))
            .await
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: &ComplaintStatus,
    ) -> Result<bool, StoreError> {
        let mut conn = self.provider.acquire().await?;
        let updated = self
            .provider
            .bounded(ComplaintRepository::new(&mut conn).update_status(id, status))
            .await?;
        tracing::debug!(complaint_id = %id, %status, updated, "complaint status update");
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.provider.acquire().await?;
        self.provider
            .bounded(async {
                sqlx::query("SELECT 1").execute(&mut *conn).await?;
                Ok::<(), StoreError>(())
            })
            .await
    }
}
