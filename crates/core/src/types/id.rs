//! Newtype IDs for type-safe row references.
//!
//! Both `users.user_id` and `complaints.complaint_id` are `SERIAL` columns, so
//! every ID wraps an `i32`. The `define_id!` macro keeps a `UserId` from ever
//! being passed where a `ComplaintId` is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`, `parse_positive()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use grievance_core::define_id;
/// define_id!(TicketId);
///
/// let id = TicketId::parse_positive("42").unwrap();
/// assert_eq!(id.as_i32(), 42);
/// assert!(TicketId::parse_positive("0").is_none());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// Parse an ID from a URL path segment.
            ///
            /// Only strictly positive integers are accepted, mirroring what a
            /// `SERIAL` column can hold.
            #[must_use]
            pub fn parse_positive(s: &str) -> Option<Self> {
                s.parse::<i32>().ok().filter(|id| *id > 0).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);
define_id!(ComplaintId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_accepts_positive() {
        assert_eq!(ComplaintId::parse_positive("7"), Some(ComplaintId::new(7)));
    }

    #[test]
    fn test_parse_positive_rejects_non_positive_and_garbage() {
        assert!(ComplaintId::parse_positive("0").is_none());
        assert!(ComplaintId::parse_positive("-3").is_none());
        assert!(ComplaintId::parse_positive("abc").is_none());
        assert!(ComplaintId::parse_positive("").is_none());
        assert!(ComplaintId::parse_positive("99999999999").is_none());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&UserId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
