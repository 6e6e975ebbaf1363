//! Complaint status.
//!
//! Status is a free-form string: admins may type any label. The values the
//! front end knows how to badge are exposed as constants.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ComplaintStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The status is empty after trimming.
    #[error("status cannot be empty")]
    Empty,
    /// The status exceeds the column width.
    #[error("status must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The status label of a complaint.
///
/// ```
/// use grievance_core::ComplaintStatus;
///
/// let status = ComplaintStatus::parse("  resolved ").unwrap();
/// assert_eq!(status, ComplaintStatus::resolved());
/// assert!(status.is_well_known());
///
/// let custom = ComplaintStatus::parse("escalated to ministry").unwrap();
/// assert!(!custom.is_well_known());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintStatus(String);

impl ComplaintStatus {
    /// Maximum length, matching `complaints.status VARCHAR(50)`.
    pub const MAX_LENGTH: usize = 50;

    pub const PENDING: &'static str = "pending";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const RESOLVED: &'static str = "resolved";
    pub const REJECTED: &'static str = "rejected";

    /// Statuses with dedicated display treatment, in workflow order.
    pub const WELL_KNOWN: [&'static str; 4] = [
        Self::PENDING,
        Self::IN_PROGRESS,
        Self::RESOLVED,
        Self::REJECTED,
    ];

    /// Parse a status submitted by an admin.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] if the trimmed value is empty or too long.
    pub fn parse(s: &str) -> Result<Self, StatusError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StatusError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(StatusError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Status given to every newly lodged complaint.
    #[must_use]
    pub fn pending() -> Self {
        Self(Self::PENDING.to_owned())
    }

    #[must_use]
    pub fn resolved() -> Self {
        Self(Self::RESOLVED.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of [`Self::WELL_KNOWN`].
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(&self.0.as_str())
    }

    /// Human-readable label (`in_progress` becomes `In progress`).
    #[must_use]
    pub fn label(&self) -> String {
        let spaced = self.0.replace('_', " ");
        let mut chars = spaced.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl Default for ComplaintStatus {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComplaintStatus {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ComplaintStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ComplaintStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ComplaintStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(ComplaintStatus::default().as_str(), "pending");
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(
            ComplaintStatus::parse("\tin_progress\n").unwrap().as_str(),
            "in_progress"
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_long() {
        assert_eq!(ComplaintStatus::parse("   "), Err(StatusError::Empty));
        assert!(matches!(
            ComplaintStatus::parse(&"x".repeat(51)),
            Err(StatusError::TooLong { max: 50 })
        ));
        assert!(ComplaintStatus::parse(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_label() {
        assert_eq!(ComplaintStatus::parse("in_progress").unwrap().label(), "In progress");
        assert_eq!(ComplaintStatus::pending().label(), "Pending");
    }
}
