//! In-memory [`GrievanceStore`] for tests.
//!
//! Mirrors the `PostgreSQL` schema's constraints: unique email and username,
//! complaints must reference an existing user, new complaints start as
//! `pending`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;

use grievance_core::{ComplaintId, ComplaintStatus, Email, UserId, UserRole};

use super::{GrievanceStore, NewUser, StoreError};
use crate::models::{Complaint, ComplaintWithUser, StatusCount, User, UserCredentials};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<(User, SecretString)>,
    complaints: Vec<Complaint>,
}

/// Store that keeps both tables in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current stored status of a complaint, bypassing ownership checks.
    pub async fn status_of(&self, id: ComplaintId) -> Option<ComplaintStatus> {
        self.tables
            .read()
            .await
            .complaints
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status.clone())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn next_id(len: usize) -> Result<i32, StoreError> {
    i32::try_from(len + 1).map_err(|_| StoreError::Conflict("id space exhausted".to_owned()))
}

#[async_trait]
impl GrievanceStore for MemoryStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
        role: UserRole,
    ) -> Result<Option<UserCredentials>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| &u.email == email && u.role == role)
            .map(|(user, hash)| UserCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|(u, _)| u.email == new_user.email || u.username == new_user.username)
        {
            return Err(StoreError::Conflict(
                "email or username already exists".to_owned(),
            ));
        }

        let user = User {
            id: UserId::new(next_id(tables.users.len())?),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
            created_at: Utc::now(),
        };
        tables
            .users
            .push((user.clone(), new_user.password_hash.clone()));
        Ok(user)
    }

    async fn create_complaint(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<Complaint, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|(u, _)| u.id == user_id) {
            return Err(StoreError::Conflict(
                "complaint must reference an existing user".to_owned(),
            ));
        }

        let complaint = Complaint {
            id: ComplaintId::new(next_id(tables.complaints.len())?),
            user_id,
            text: text.to_owned(),
            status: ComplaintStatus::pending(),
            created_at: Utc::now(),
        };
        tables.complaints.push(complaint.clone());
        Ok(complaint)
    }

    async fn list_complaints(
        &self,
        status: Option<&ComplaintStatus>,
    ) -> Result<Vec<ComplaintWithUser>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<ComplaintWithUser> = tables
            .complaints
            .iter()
            .filter(|c| status.is_none_or(|s| &c.status == s))
            .filter_map(|c| {
                tables
                    .users
                    .iter()
                    .find(|(u, _)| u.id == c.user_id)
                    .map(|(u, _)| ComplaintWithUser {
                        id: c.id,
                        username: u.username.clone(),
                        text: c.text.clone(),
                        status: c.status.clone(),
                        created_at: c.created_at,
                    })
            })
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn count_by_status(&self) -> Result<Vec<StatusCount>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut counts: Vec<StatusCount> = Vec::new();
        for complaint in &tables.complaints {
            match counts.iter_mut().find(|c| c.status == complaint.status) {
                Some(entry) => entry.count += 1,
                None => counts.push(StatusCount {
                    status: complaint.status.clone(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str()));
        Ok(counts)
    }

    async fn list_user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Complaint> = tables
            .complaints
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| (c.created_at, c.id));
        Ok(rows)
    }

    async fn get_user_complaint(
        &self,
        user_id: UserId,
        id: ComplaintId,
    ) -> Result<Option<Complaint>, StoreError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .complaints
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: &ComplaintStatus,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        Ok(tables
            .complaints
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| c.status = status.clone())
            .is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str, role: UserRole) -> NewUser {
        NewUser {
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: SecretString::from("$argon2id$stub"),
            role,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store
            .create_user(&new_user("alice", "alice@example.com", UserRole::User))
            .await
            .unwrap();

        let err = store
            .create_user(&new_user("alice2", "ALICE@example.com", UserRole::User))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_complaint_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store
            .create_complaint(UserId::new(99), "billing error")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_role_is_part_of_lookup() {
        let store = MemoryStore::new();
        let email = Email::parse("alice@example.com").unwrap();
        store
            .create_user(&new_user("alice", "alice@example.com", UserRole::User))
            .await
            .unwrap();

        assert!(
            store
                .find_user_by_email(&email, UserRole::Admin)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .find_user_by_email(&email, UserRole::User)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_update_missing_complaint_affects_nothing() {
        let store = MemoryStore::new();
        let updated = store
            .update_status(ComplaintId::new(1), &ComplaintStatus::resolved())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_listing_filters_and_counts() {
        let store = MemoryStore::new();
        let alice = store
            .create_user(&new_user("alice", "alice@example.com", UserRole::User))
            .await
            .unwrap();
        let first = store.create_complaint(alice.id, "billing error").await.unwrap();
        store.create_complaint(alice.id, "water outage").await.unwrap();
        store
            .update_status(first.id, &ComplaintStatus::resolved())
            .await
            .unwrap();

        let all = store.list_complaints(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "alice");

        let resolved = store
            .list_complaints(Some(&ComplaintStatus::resolved()))
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].text, "billing error");

        let counts = store.count_by_status().await.unwrap();
        assert_eq!(
            counts,
            vec![
                StatusCount {
                    status: ComplaintStatus::pending(),
                    count: 1
                },
                StatusCount {
                    status: ComplaintStatus::resolved(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(store.list_complaints(None).await.is_err());
    }
}
