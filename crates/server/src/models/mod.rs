//! Domain models.
//!
//! These types are validated domain objects, separate from the row types the
//! repositories decode.

pub mod complaint;
pub mod session;
pub mod user;

pub use complaint::{Complaint, ComplaintWithUser, StatusCount};
pub use session::{CurrentAdmin, CurrentUser, Flash, FlashLevel, keys as session_keys};
pub use user::{User, UserCredentials};
