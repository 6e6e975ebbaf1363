//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login for admins and complainants, registration

pub mod auth;
