//! Application services.
//!
//! - [`auth`] - Credential validation and sign-in/out flows
//! - [`cart`] - The cart synchronizer
//! - [`catalog`] - Cached read-only product listings

pub mod auth;
pub mod cart;
pub mod catalog;
