//! Cart lines and the product normalization rules.
//!
//! Products arrive from screens and remote documents as loosely typed data
//! (numeric strings, missing fields, alternate image keys). Normalization
//! never fails: every malformed field is replaced by a documented default
//! instead of being surfaced as an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::id::ProductId;
use crate::types::product::Product;

/// Name used when the source product has none.
pub const PLACEHOLDER_NAME: &str = "Unnamed product";

/// Image URL used when the source product has none.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Category used when the source product has none.
pub const DEFAULT_CATEGORY: &str = "general";

/// A loosely typed product as it arrives from a screen or a remote
/// document, before normalization.
///
/// The image URL may be carried under either `imageUrl` or `image`;
/// `imageUrl` wins when both are present. The price may be a JSON number
/// or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProduct {
    /// Stable product identifier, if the source has one.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Price in any JSON representation.
    pub price: Option<Value>,
    /// Preferred image URL key.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    /// Fallback image URL key.
    pub image: Option<String>,
    /// Product category.
    pub category: Option<String>,
}

impl From<&Product> for RawProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.as_str().to_owned()),
            name: Some(product.name.clone()),
            price: serde_json::Number::from_f64(product.price).map(Value::Number),
            image_url: Some(product.image_url.clone()),
            image: None,
            category: Some(product.category.clone()),
        }
    }
}

/// One product entry with quantity in a user's cart.
///
/// Field names match the remote document layout, so a cart line serializes
/// directly into the document's `items` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable product identifier; lines are unique by `id` within a cart.
    pub id: ProductId,
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Unit price.
    #[serde(default)]
    pub price: f64,
    /// Image URL.
    #[serde(default = "default_image")]
    pub image: String,
    /// Product category.
    #[serde(default = "default_category")]
    pub category: String,
    /// Positive quantity.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_name() -> String {
    PLACEHOLDER_NAME.to_owned()
}

fn default_image() -> String {
    PLACEHOLDER_IMAGE.to_owned()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

const fn default_quantity() -> u32 {
    1
}

impl CartLine {
    /// Normalize a raw product into a cart line.
    ///
    /// Applies the defaulting rules: a missing id is synthesized as
    /// `temp-<timestamp>`, the price is coerced (0 on failure), the image
    /// falls back through `imageUrl`, `image`, then a placeholder, and the
    /// requested quantity is coerced to a positive integer (1 on failure).
    #[must_use]
    pub fn from_raw(raw: &RawProduct, quantity: i64) -> Self {
        let id = raw
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("temp-{}", Utc::now().timestamp_millis()));

        let image = raw
            .image_url
            .clone()
            .or_else(|| raw.image.clone())
            .unwrap_or_else(default_image);

        Self {
            id: ProductId::new(id),
            name: raw.name.clone().unwrap_or_else(default_name),
            price: coerce_price(raw.price.as_ref()),
            image,
            category: raw.category.clone().unwrap_or_else(default_category),
            quantity: coerce_quantity(quantity),
        }
    }

    /// Line subtotal: price times quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Coerce a JSON value into a price.
///
/// Accepts numbers and numeric strings; anything else (including absence)
/// coerces to 0.
#[must_use]
pub fn coerce_price(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a requested quantity into a positive integer.
///
/// Non-positive or out-of-range values coerce to 1.
#[must_use]
pub fn coerce_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity)
        .ok()
        .filter(|&q| q >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_product() {
        let raw = RawProduct {
            id: Some("p1".into()),
            name: Some("Cat pin".into()),
            price: Some(json!(4.5)),
            image_url: Some("https://cdn.example.com/p1.png".into()),
            image: None,
            category: Some("pins".into()),
        };

        let line = CartLine::from_raw(&raw, 2);
        assert_eq!(line.id.as_str(), "p1");
        assert_eq!(line.name, "Cat pin");
        assert!((line.price - 4.5).abs() < f64::EPSILON);
        assert_eq!(line.image, "https://cdn.example.com/p1.png");
        assert_eq!(line.category, "pins");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_missing_id_synthesized_with_temp_prefix() {
        let line = CartLine::from_raw(&RawProduct::default(), 1);
        assert!(line.id.as_str().starts_with("temp-"));
    }

    #[test]
    fn test_all_defaults_applied() {
        let line = CartLine::from_raw(&RawProduct::default(), 1);
        assert_eq!(line.name, PLACEHOLDER_NAME);
        assert!((line.price - 0.0).abs() < f64::EPSILON);
        assert_eq!(line.image, PLACEHOLDER_IMAGE);
        assert_eq!(line.category, DEFAULT_CATEGORY);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_string_price_coerced() {
        let raw = RawProduct {
            id: Some("p1".into()),
            price: Some(json!("19.99")),
            ..RawProduct::default()
        };

        let line = CartLine::from_raw(&raw, 1);
        assert!((line.price - 19.99).abs() < f64::EPSILON);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_unparseable_price_coerces_to_zero() {
        for price in [json!("not a number"), json!(true), json!(null), json!([1])] {
            let raw = RawProduct {
                id: Some("p1".into()),
                price: Some(price),
                ..RawProduct::default()
            };
            let line = CartLine::from_raw(&raw, 1);
            assert!((line.price - 0.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_image_falls_back_through_keys() {
        let raw = RawProduct {
            id: Some("p1".into()),
            image_url: None,
            image: Some("https://cdn.example.com/alt.png".into()),
            ..RawProduct::default()
        };
        assert_eq!(
            CartLine::from_raw(&raw, 1).image,
            "https://cdn.example.com/alt.png"
        );

        let both = RawProduct {
            id: Some("p1".into()),
            image_url: Some("https://cdn.example.com/main.png".into()),
            image: Some("https://cdn.example.com/alt.png".into()),
            ..RawProduct::default()
        };
        assert_eq!(
            CartLine::from_raw(&both, 1).image,
            "https://cdn.example.com/main.png"
        );
    }

    #[test]
    fn test_non_positive_quantity_coerces_to_one() {
        assert_eq!(coerce_quantity(0), 1);
        assert_eq!(coerce_quantity(-3), 1);
        assert_eq!(coerce_quantity(i64::MIN), 1);
        assert_eq!(coerce_quantity(5), 5);
    }

    #[test]
    fn test_line_deserializes_with_missing_fields() {
        let line: CartLine = serde_json::from_value(json!({ "id": "p1" })).expect("deserialize");
        assert_eq!(line.name, PLACEHOLDER_NAME);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_line_total() {
        let raw = RawProduct {
            id: Some("p1".into()),
            price: Some(json!(2.5)),
            ..RawProduct::default()
        };
        let line = CartLine::from_raw(&raw, 4);
        assert!((line.line_total() - 10.0).abs() < f64::EPSILON);
    }
}
