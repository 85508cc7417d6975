//! Pure cart state.
//!
//! A [`Cart`] is an ordered sequence of [`CartLine`]s, unique by product
//! id. All mutation here is pure and synchronous; persistence and
//! subscription handling live in the store crate's synchronizer.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::line::CartLine;

/// The current user's cart.
///
/// Invariants:
/// - no two lines share the same product id; merging an existing id
///   increments its quantity instead of appending
/// - quantities are never set below 1 through [`Cart::set_quantity`]
///
/// `count` and `total` are always derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from a remote document's item sequence.
    ///
    /// Lines arriving with a duplicate id are merged into the first
    /// occurrence, so the uniqueness invariant holds even for documents
    /// written by older clients.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.merge(line);
        }
        cart
    }

    /// The line sequence, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Total price: sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Merge a line into the cart.
    ///
    /// If a line with the same id exists, its quantity is incremented by
    /// the incoming line's quantity; otherwise the line is appended.
    pub fn merge(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    /// Remove the line matching `id`.
    ///
    /// Returns `true` if a line was removed; removing an absent id leaves
    /// the cart unchanged.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        self.lines.len() != before
    }

    /// Replace the matching line's quantity.
    ///
    /// Quantities below 1 are rejected, not clamped, and an absent id
    /// leaves the cart unchanged. Returns `true` if a line was updated.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        let Ok(quantity @ 1..) = u32::try_from(quantity) else {
            return false;
        };

        match self.lines.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Discard all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
