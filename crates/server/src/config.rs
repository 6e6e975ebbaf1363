//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GRIEVANCE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `GRIEVANCE_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `GRIEVANCE_HOST` - Bind address (default: 127.0.0.1)
//! - `GRIEVANCE_PORT` - Listen port (default: 5000)
//! - `GRIEVANCE_BASE_URL` - Public URL (default: <http://localhost:5000>)
//! - `GRIEVANCE_STORE_TIMEOUT_SECS` - Per-operation store timeout (default: 5)
//! - `GRIEVANCE_SESSION_EXPIRY_HOURS` - Session inactivity expiry (default: 24)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "supersecret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https://` enables secure cookies
    pub base_url: String,
    /// Secret the session cookie signing key is derived from
    pub session_secret: SecretString,
    /// Session inactivity expiry
    pub session_expiry: Duration,
    /// Bound on connection acquisition and on each query
    pub store_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("GRIEVANCE_DATABASE_URL")?;
        let host = parse_env("GRIEVANCE_HOST", "127.0.0.1")?;
        let port = parse_env("GRIEVANCE_PORT", "5000")?;
        let base_url = get_env_or_default("GRIEVANCE_BASE_URL", "http://localhost:5000");

        let session_secret = get_required_env("GRIEVANCE_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "GRIEVANCE_SESSION_SECRET")?;
        validate_secret_strength(&session_secret, "GRIEVANCE_SESSION_SECRET")?;

        let session_expiry = hours_to_duration(
            "GRIEVANCE_SESSION_EXPIRY_HOURS",
            parse_env("GRIEVANCE_SESSION_EXPIRY_HOURS", "24")?,
        )?;
        let store_timeout_secs: u64 = parse_env("GRIEVANCE_STORE_TIMEOUT_SECS", "5")?;
        if store_timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GRIEVANCE_STORE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret: SecretString::from(session_secret),
            session_expiry,
            store_timeout: Duration::from_secs(store_timeout_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// The raw session secret bytes.
    #[must_use]
    pub fn session_secret_bytes(&self) -> &[u8] {
        self.session_secret.expose_secret().as_bytes()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Convert a whole number of hours into a `Duration`, rejecting overflow.
fn hours_to_duration(key: &str, hours: u64) -> Result<Duration, ConfigError> {
    hours
        .checked_mul(60 * 60)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(key.to_string(), format!("{hours} hours is too large"))
        })
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/grievance"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            session_expiry: Duration::from_secs(3600),
            store_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_common_default_secret_is_rejected() {
        let err = validate_secret_strength("supersecret", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_low_entropy_secret_is_rejected() {
        let result = validate_secret_strength(&"a".repeat(40), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_random_secret_is_accepted() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_session_secret_length() {
        assert!(validate_session_secret("short", "TEST_SESSION").is_err());
        assert!(validate_session_secret(&"a".repeat(32), "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_session_expiry_hours() {
        assert_eq!(
            hours_to_duration("TEST_HOURS", 24).unwrap(),
            Duration::from_secs(86_400)
        );
        assert!(matches!(
            hours_to_duration("TEST_HOURS", u64::MAX),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_socket_addr_and_secure_flag() {
        let config = test_config("http://localhost:5000");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(!config.is_secure());
        assert!(test_config("https://grievance.example.gov").is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", test_config("http://localhost:5000"));
        assert!(!debug_output.contains("postgres://localhost/grievance"));
        assert!(!debug_output.contains(&"x".repeat(32)));
    }
}
