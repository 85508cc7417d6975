//! Authentication error types.

use thiserror::Error;

use pinstick_core::EmailError;

use crate::backend::BackendError;

/// Errors that can occur during authentication operations.
///
/// Each variant corresponds to a coded failure reason from the auth
/// collaborator, plus the local validation failures caught before a
/// request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or unknown user at sign-in).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account exists for this email.
    #[error("no account found for this email")]
    AccountNotFound,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    EmailAlreadyInUse,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The session is missing or expired.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// Too many attempts; the backend throttled the request.
    #[error("too many attempts, try again later")]
    TooManyRequests,

    /// The backend could not be reached.
    #[error("auth backend error: {0}")]
    Backend(#[from] BackendError),
}
