//! User-facing notification channel.
//!
//! Failures inside fire-and-forget operations cannot be returned to a
//! caller, so they are converted into [`Notice`] values and pushed onto a
//! channel the presentation layer drains into alert dialogs. Nothing here
//! is fatal; a dropped receiver simply discards notices.

use core::fmt;

use tokio::sync::mpsc;

/// A non-fatal, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A cart mutation was attempted without an active identity.
    SignInRequired,
    /// The cart document subscription failed; the local view may be stale.
    SyncFailed {
        /// Backend-provided failure description.
        reason: String,
    },
    /// A cart write was rejected; the action must be repeated by the user.
    WriteFailed {
        /// Backend-provided failure description.
        reason: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignInRequired => write!(f, "Sign in to start shopping"),
            Self::SyncFailed { reason } => write!(f, "Could not load your cart: {reason}"),
            Self::WriteFailed { reason } => write!(f, "Could not save your cart: {reason}"),
        }
    }
}

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Create a notifier and the receiver the presentation layer drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver a notice.
    ///
    /// Also logs it, so notices are visible even when no receiver is
    /// attached.
    pub fn notify(&self, notice: Notice) {
        tracing::warn!(%notice, "user notice");
        let _ = self.tx.send(notice);
    }
}
