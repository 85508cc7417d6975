//! Authentication service.
//!
//! Validates credentials locally before delegating to the auth
//! collaborator, so malformed input never reaches the backend.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use tracing::instrument;

use pinstick_core::{Email, Session};

use crate::backend::AuthBackend;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
///
/// Handles sign-in, account creation, sign-out, and password recovery.
/// Session transitions are observed separately through
/// [`AuthBackend::watch_session`].
pub struct AuthService<A> {
    backend: Arc<A>,
}

impl<A: AuthBackend> AuthService<A> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(backend: Arc<A>) -> Self {
        Self { backend }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong, and `AuthError::TooManyRequests` when the backend throttles
    /// repeated attempts.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let session = self.backend.sign_in(&email, password).await?;
        tracing::info!(user = %session.user_id, "signed in");

        Ok(session)
    }

    /// Create a new account and sign it in.
    ///
    /// The display name is stored on the profile; an empty name is kept as
    /// unset and later rendered as a placeholder.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::EmailAlreadyInUse` if the email is already
    /// registered.
    #[instrument(skip(self, password))]
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let session = self
            .backend
            .create_account(&email, password, display_name)
            .await?;
        tracing::info!(user = %session.user_id, "account created");

        Ok(session)
    }

    /// Sign out the current identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` if the backend rejects the request;
    /// the session subscription still observes the transition when it
    /// succeeds.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.sign_out().await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Send a password-reset message.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// and `AuthError::AccountNotFound` if no account uses this address.
    #[instrument(skip(self))]
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        self.backend.send_password_reset(&email).await
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("12345"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("123456").is_ok());
    }
}
