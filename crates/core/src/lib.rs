//! Grievance Desk Core - Shared types library.
//!
//! This crate provides common types used across all Grievance Desk components:
//! - `server` - HTTP server (complaint lodging and the admin dashboard)
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and complaint statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
