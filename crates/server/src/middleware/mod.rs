//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span, echoed in `x-request-id`)
//! 4. Security headers
//! 5. Session layer (signed cookie, pluggable store)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, RequireAdmin, RequireUser, clear_current_admin,
    clear_current_user, set_current_admin, set_current_user,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, push_flash, take_flash};
