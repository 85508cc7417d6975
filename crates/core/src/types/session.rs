//! Session identity surfaced by the auth collaborator.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::UserId;

/// Fallback shown when a user never set a display name.
pub const PLACEHOLDER_DISPLAY_NAME: &str = "Pin & Stick user";

/// The authenticated user context.
///
/// A session is present between sign-in and sign-out; absence means
/// signed out. Every transition between identities invalidates any cart
/// loaded for the previous identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user id assigned by the auth collaborator.
    pub user_id: UserId,
    /// Email the account was created with.
    pub email: Email,
    /// Optional profile display name.
    pub display_name: Option<String>,
}

impl Session {
    /// The display name, falling back to a placeholder when unset.
    #[must_use]
    pub fn display_name_or_placeholder(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(PLACEHOLDER_DISPLAY_NAME)
    }
}
