//! Authentication service.
//!
//! Password login for both roles and complainant registration. Login is one
//! code path parameterised by [`UserRole`], so an admin account cannot sign
//! in through `/login` and a complainant cannot reach the dashboard.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use grievance_core::{Email, UserRole};

use crate::db::{GrievanceStore, NewUser, StoreError};
use crate::models::User;

/// Maximum username length (matches the `users.username` column).
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn GrievanceStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn GrievanceStore) -> Self {
        Self { store }
    }

    /// Check an email/password pair against accounts with `role`.
    ///
    /// A malformed email is reported as `InvalidCredentials` so the login
    /// form never distinguishes why a sign-in failed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    /// Returns `AuthError::Store` if the store is unreachable.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let credentials = self
            .store
            .find_user_by_email(&email, role)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, credentials.password_hash.expose_secret())?;

        Ok(credentials.user)
    }

    /// Register a complainant account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `InvalidUsername` or `WeakPassword`
    /// for bad input, `AuthError::UserAlreadyExists` on a duplicate.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.create_account(username, email, password, UserRole::User)
            .await
    }

    /// Create an account with an explicit role (used by the CLI for admins).
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`].
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let username = validate_username(username)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let new_user = NewUser {
            username,
            email,
            password_hash: hash_password(password)?,
            role,
        };

        let user = self
            .store
            .create_user(&new_user)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }
}

fn validate_username(username: &str) -> Result<String, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidUsername(
            "Username is required".to_owned(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(username.to_owned())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::WeakPassword("Password is required".to_owned()));
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<SecretString, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| SecretString::from(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
