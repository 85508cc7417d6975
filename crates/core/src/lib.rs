//! Pin & Stick Core - Shared domain types.
//!
//! This crate provides the common types used across all Pin & Stick
//! components:
//! - `store` - Cart synchronization, authentication, and catalog services
//! - `integration-tests` - End-to-end tests against the in-memory backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no backend
//! access, no async. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, cart lines, the pure cart state, and
//!   the product normalization rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
