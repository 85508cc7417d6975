//! In-process backend used by tests and the demo binary.
//!
//! Implements all three collaborator traits over plain maps. The document
//! store broadcasts every write to the user's live subscribers, so a
//! synchronizer observing its own write receives the echo exactly like a
//! change originated on another device.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use pinstick_core::{CartLine, Email, Product, Session, UserId};

use crate::backend::{
    AuthBackend, BackendError, CartDocument, CartDocuments, CartUpdate, ProductCatalog,
};
use crate::services::auth::AuthError;

struct Account {
    password: String,
    session: Session,
}

/// In-memory auth, document-store, and catalog backend.
pub struct MemoryBackend {
    session_tx: watch::Sender<Option<Session>>,
    accounts: Mutex<HashMap<String, Account>>,
    carts: Mutex<HashMap<UserId, Vec<CartLine>>>,
    subscribers: Mutex<HashMap<UserId, Vec<mpsc::UnboundedSender<CartUpdate>>>>,
    products: Mutex<Vec<Product>>,
    fail_writes: AtomicBool,
    catalog_reads: AtomicU64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty backend with no signed-in session.
    #[must_use]
    pub fn new() -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            session_tx,
            accounts: Mutex::new(HashMap::new()),
            carts: Mutex::new(HashMap::new()),
            subscribers: Mutex::new(HashMap::new()),
            products: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            catalog_reads: AtomicU64::new(0),
        }
    }

    /// Replace the catalog contents.
    pub fn seed_products(&self, products: Vec<Product>) {
        *self.products.lock().expect("lock poisoned") = products;
    }

    /// Make subsequent `merge_items` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of catalog reads that reached the backend.
    #[must_use]
    pub fn catalog_reads(&self) -> u64 {
        self.catalog_reads.load(Ordering::SeqCst)
    }

    /// The durably stored cart document, if it exists.
    #[must_use]
    pub fn stored_cart(&self, user: &UserId) -> Option<Vec<CartLine>> {
        self.carts.lock().expect("lock poisoned").get(user).cloned()
    }

    /// Write a cart document as if from another device and notify
    /// subscribers.
    pub fn push_remote_cart(&self, user: &UserId, items: Vec<CartLine>) {
        self.carts
            .lock()
            .expect("lock poisoned")
            .insert(user.clone(), items.clone());
        self.broadcast(user, CartUpdate::Snapshot(CartDocument::Present { items }));
    }

    /// Deliver a subscription failure to the user's live subscribers.
    pub fn emit_sync_error(&self, user: &UserId, error: BackendError) {
        self.broadcast(user, CartUpdate::Failed(error));
    }

    fn broadcast(&self, user: &UserId, update: CartUpdate) {
        let mut subscribers = self.subscribers.lock().expect("lock poisoned");
        if let Some(senders) = subscribers.get_mut(user) {
            senders.retain(|sender| sender.send(update.clone()).is_ok());
        }
    }
}

impl AuthBackend for MemoryBackend {
    fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        let accounts = self.accounts.lock().expect("lock poisoned");
        let account = accounts
            .get(email.as_str())
            .filter(|account| account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = account.session.clone();
        drop(accounts);

        let _ = self.session_tx.send(Some(session.clone()));
        Ok(session)
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let mut accounts = self.accounts.lock().expect("lock poisoned");
        if accounts.contains_key(email.as_str()) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let session = Session {
            user_id: UserId::new(Uuid::new_v4().to_string()),
            email: email.clone(),
            display_name: (!display_name.is_empty()).then(|| display_name.to_owned()),
        };
        accounts.insert(
            email.as_str().to_owned(),
            Account {
                password: password.to_owned(),
                session: session.clone(),
            },
        );
        drop(accounts);

        let _ = self.session_tx.send(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let _ = self.session_tx.send(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthError> {
        let accounts = self.accounts.lock().expect("lock poisoned");
        if !accounts.contains_key(email.as_str()) {
            return Err(AuthError::AccountNotFound);
        }

        tracing::info!(%email, "password reset message sent");
        Ok(())
    }
}

impl CartDocuments for MemoryBackend {
    fn watch_cart(&self, user: &UserId) -> mpsc::UnboundedReceiver<CartUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();

        // The subscription delivers the current document state immediately,
        // then again on every change.
        let initial = self
            .stored_cart(user)
            .map_or(CartDocument::Absent, |items| CartDocument::Present { items });
        let _ = tx.send(CartUpdate::Snapshot(initial));

        self.subscribers
            .lock()
            .expect("lock poisoned")
            .entry(user.clone())
            .or_default()
            .push(tx);

        rx
    }

    async fn merge_items(&self, user: &UserId, items: Vec<CartLine>) -> Result<(), BackendError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("injected write failure".into()));
        }

        self.carts
            .lock()
            .expect("lock poisoned")
            .insert(user.clone(), items.clone());
        self.broadcast(user, CartUpdate::Snapshot(CartDocument::Present { items }));
        Ok(())
    }
}

impl ProductCatalog for MemoryBackend {
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, BackendError> {
        self.catalog_reads.fetch_add(1, Ordering::SeqCst);

        let products = self.products.lock().expect("lock poisoned");
        Ok(products
            .iter()
            .filter(|product| {
                category.is_none_or(|category| product.category.eq_ignore_ascii_case(category))
            })
            .cloned()
            .collect())
    }
}
