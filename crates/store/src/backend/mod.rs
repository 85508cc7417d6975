//! Backend collaborator traits.
//!
//! The remote service behind the app exposes three narrow surfaces:
//! authentication with a session subscription, a per-user cart document
//! with live change delivery and a merge-upsert write, and a read-only
//! product catalog. Everything above this module talks to the backend
//! exclusively through these traits; [`memory::MemoryBackend`] implements
//! all three in-process for tests and the demo binary.

pub mod memory;

use std::future::Future;

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use pinstick_core::{CartLine, Email, Product, Session, UserId};

use crate::services::auth::AuthError;

/// Errors surfaced by the document-store and catalog collaborators.
///
/// `Clone` so a single failure can be fanned out to every live
/// subscriber of a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached or refused the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The current identity is not allowed to touch this document.
    #[error("permission denied")]
    PermissionDenied,

    /// The backend throttled the request.
    #[error("rate limited")]
    RateLimited,
}

/// The full current state of a user's cart document.
#[derive(Debug, Clone, PartialEq)]
pub enum CartDocument {
    /// The document does not exist yet; treated as an empty cart, not an
    /// error. It is created by the first merge-upsert write.
    Absent,
    /// The document exists with the given item sequence.
    Present {
        /// The document's `items` field.
        items: Vec<CartLine>,
    },
}

/// One delivery on a cart document subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum CartUpdate {
    /// A full snapshot of the document, delivered on every change
    /// (including the echo of the subscriber's own writes).
    Snapshot(CartDocument),
    /// The subscription itself failed; the document state is unknown.
    Failed(BackendError),
}

/// Authentication collaborator.
///
/// Session state is pushed through a `watch` channel: the receiver always
/// holds the current identity (or `None` when signed out) and wakes on
/// every sign-in and sign-out.
pub trait AuthBackend: Send + Sync + 'static {
    /// Subscribe to session transitions.
    fn watch_session(&self) -> watch::Receiver<Option<Session>>;

    /// Sign in with an email and password.
    fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Create an account and sign it in.
    fn create_account(
        &self,
        email: &Email,
        password: &str,
        display_name: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Sign out the current identity.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Send a password-reset message to the given address.
    fn send_password_reset(&self, email: &Email)
    -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Document-store collaborator holding one cart document per user.
pub trait CartDocuments: Send + Sync + 'static {
    /// Subscribe to the cart document keyed by `user`.
    ///
    /// The current document state is delivered immediately, then again on
    /// every change. Dropping the receiver detaches the subscription; it
    /// is the only cancellation primitive.
    fn watch_cart(&self, user: &UserId) -> mpsc::UnboundedReceiver<CartUpdate>;

    /// Merge-upsert the document's `items` field.
    ///
    /// Creates the document if absent, otherwise replaces `items` and
    /// leaves other fields untouched. The entire item sequence is written
    /// on every call; there is no line-level patch.
    fn merge_items(
        &self,
        user: &UserId,
        items: Vec<CartLine>,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Read-only product catalog collaborator.
pub trait ProductCatalog: Send + Sync + 'static {
    /// List products, optionally restricted to an exact category match.
    ///
    /// Category filtering happens backend-side; free-text matching is a
    /// local concern of the catalog service.
    fn list_products(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send;
}
