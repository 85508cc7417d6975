//! Cart synchronizer error types.

use thiserror::Error;

/// Errors reported directly to callers submitting cart mutations.
///
/// Mutations are fire-and-forget: once accepted, any backend failure is
/// routed to the notification channel instead of a caller. The only
/// direct failure is local rejection of the submission itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// The synchronizer has shut down and no longer accepts mutations.
    #[error("cart synchronizer is shut down")]
    Closed,
}
