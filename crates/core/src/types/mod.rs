//! Core types for Pin & Stick.
//!
//! This module provides type-safe wrappers and pure state for the cart
//! domain.

pub mod cart;
pub mod email;
pub mod id;
pub mod line;
pub mod product;
pub mod session;

pub use cart::Cart;
pub use email::{Email, EmailError};
pub use id::*;
pub use line::{CartLine, DEFAULT_CATEGORY, PLACEHOLDER_IMAGE, PLACEHOLDER_NAME, RawProduct};
pub use product::Product;
pub use session::{PLACEHOLDER_DISPLAY_NAME, Session};
