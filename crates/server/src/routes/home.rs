//! Home page route handler.

/// Text served at `/`.
pub const WELCOME_TEXT: &str = "Welcome to AI Grievance Lodging System";

/// Static welcome text; no session required.
pub async fn index() -> &'static str {
    WELCOME_TEXT
}
