//! Session layer and flash messages.
//!
//! Session IDs travel in a signed cookie; the signing key is derived from
//! `GRIEVANCE_SESSION_SECRET`. Session data lives in whatever
//! [`SessionStore`] the caller supplies (`PostgreSQL` in production).

use sha2::{Digest, Sha512};
use tower_sessions::{
    Expiry, Session, SessionManagerLayer, SessionStore,
    cookie::{Key, SameSite, time},
    service::SignedCookie,
};

use crate::config::ServerConfig;
use crate::models::{Flash, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "grievance_session";

/// Derive the 64-byte cookie signing key from the configured secret.
#[must_use]
pub fn signing_key(config: &ServerConfig) -> Key {
    let digest = Sha512::digest(config.session_secret_bytes());
    Key::from(digest.as_slice())
}

/// Create the session layer over `store`.
///
/// Cookies are `HttpOnly`, `SameSite=Lax`, `Secure` when the base URL is
/// HTTPS, and expire after `session_expiry` of inactivity.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &ServerConfig) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    let expiry_secs = i64::try_from(config.session_expiry.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(expiry_secs)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config))
}

/// Queue a flash message for the next rendered page.
///
/// A failed write only loses the notice, so it is logged rather than
/// propagated.
pub async fn push_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!(error = %e, "failed to store flash message");
    }
}

/// Take (and clear) the pending flash message, if any.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read flash message");
            None
        }
    }
}
