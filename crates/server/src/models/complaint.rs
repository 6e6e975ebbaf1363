//! Complaint domain types.

use chrono::{DateTime, Utc};

use grievance_core::{ComplaintId, ComplaintStatus, UserId};

/// A lodged complaint.
#[derive(Debug, Clone)]
pub struct Complaint {
    pub id: ComplaintId,
    /// The submitting user.
    pub user_id: UserId,
    pub text: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

/// A complaint joined with its submitter's username (dashboard row).
#[derive(Debug, Clone)]
pub struct ComplaintWithUser {
    pub id: ComplaintId,
    pub username: String,
    pub text: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

/// Number of complaints carrying a given status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ComplaintStatus,
    pub count: i64,
}
