//! Integration tests for Pin & Stick.
//!
//! Tests drive the real synchronizer actor against the in-memory backend;
//! no network or external service is involved.
//!
//! # Test Categories
//!
//! - `cart_sync` - Synchronizer state machine, mutations, echoes, races
//! - `auth` - Credential validation and session transitions
//! - `catalog` - Filtered listings and caching

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pinstick_core::{RawProduct, Session};
use pinstick_store::backend::AuthBackend;
use pinstick_store::backend::memory::MemoryBackend;
use pinstick_store::{AuthService, CartHandle, CartSnapshot, CartSync, Notice, Notifier, SyncPhase};

/// How long to wait for an expected snapshot or notice before failing.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// A fully wired synchronizer over a fresh in-memory backend.
pub struct TestContext {
    pub backend: Arc<MemoryBackend>,
    pub auth: AuthService<MemoryBackend>,
    pub cart: CartHandle,
    pub notices: mpsc::UnboundedReceiver<Notice>,
    pub task: JoinHandle<()>,
}

impl TestContext {
    /// Spawn a synchronizer against a fresh backend.
    #[must_use]
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let (notifier, notices) = Notifier::channel();
        let (cart, task) = CartSync::spawn(
            backend.watch_session(),
            Arc::clone(&backend),
            notifier,
        );

        let auth = AuthService::new(Arc::clone(&backend));

        Self {
            backend,
            auth,
            cart,
            notices,
            task,
        }
    }

    /// Create an account, then wait until its (empty) cart is synced.
    pub async fn sign_up(&self, email: &str, name: &str) -> Session {
        let session = self
            .auth
            .create_account(email, "secret1", name)
            .await
            .expect("account creation");
        self.wait_for(|snapshot| snapshot.phase == SyncPhase::Synced)
            .await;
        session
    }

    /// Wait until the published snapshot satisfies the predicate.
    ///
    /// # Panics
    ///
    /// Panics if the predicate does not hold within [`SETTLE_TIMEOUT`].
    pub async fn wait_for(&self, predicate: impl Fn(&CartSnapshot) -> bool) {
        let mut snapshots = self.cart.watch();
        let wait = async {
            loop {
                if predicate(&snapshots.borrow_and_update()) {
                    break;
                }
                snapshots.changed().await.expect("synchronizer alive");
            }
        };

        tokio::time::timeout(SETTLE_TIMEOUT, wait)
            .await
            .expect("snapshot should settle");
    }

    /// Receive the next user notice.
    ///
    /// # Panics
    ///
    /// Panics if no notice arrives within [`SETTLE_TIMEOUT`].
    pub async fn next_notice(&mut self) -> Notice {
        tokio::time::timeout(SETTLE_TIMEOUT, self.notices.recv())
            .await
            .expect("notice should arrive")
            .expect("notifier alive")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A raw product with just an id and price, as screens typically submit.
#[must_use]
pub fn raw_product(id: &str, price: f64) -> RawProduct {
    RawProduct {
        id: Some(id.to_owned()),
        price: serde_json::Number::from_f64(price).map(serde_json::Value::Number),
        ..RawProduct::default()
    }
}
