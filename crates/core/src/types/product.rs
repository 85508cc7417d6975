//! Catalog product type.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A product as listed by the catalog collaborator.
///
/// Catalog reads are outside the cart core; this type exists so screens
/// can hand a listed product to [`crate::RawProduct`] (and from there to
/// the cart) without re-fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Category used for filtered listings.
    pub category: String,
    /// Optional long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
