//! Pin & Stick store services.
//!
//! The cart synchronizer and its collaborators. The remote
//! authentication + document-store service sits behind the traits in
//! [`backend`]; the services in [`services`] are what screens talk to.
//!
//! # Lifecycle
//!
//! Construct a backend, then:
//!
//! ```rust
//! use std::sync::Arc;
//! use pinstick_store::backend::{AuthBackend, memory::MemoryBackend};
//! use pinstick_store::notify::Notifier;
//! use pinstick_store::services::cart::CartSync;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = Arc::new(MemoryBackend::new());
//! let (notifier, _notices) = Notifier::channel();
//! let (cart, task) = CartSync::spawn(backend.watch_session(), Arc::clone(&backend), notifier);
//!
//! // ... hand `cart` clones to screens ...
//!
//! cart.shutdown();
//! task.await.expect("clean shutdown");
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod notify;
pub mod services;

pub use config::{ConfigError, StoreConfig};
pub use notify::{Notice, Notifier};
pub use services::auth::{AuthError, AuthService};
pub use services::cart::{CartError, CartHandle, CartSnapshot, CartSync, SyncPhase};
pub use services::catalog::{CatalogService, ProductFilter};
