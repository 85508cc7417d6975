//! Cart synchronizer.
//!
//! Owns the in-memory cart for the current identity, mirrors it to the
//! remote per-user document, and reflects concurrent remote changes
//! (another device, or the echo of its own writes) into the local view.
//!
//! # Execution model
//!
//! A single actor task owns all state, so delivery of session changes,
//! document snapshots, and mutation commands is serialized and no locking
//! is needed. Consumers hold a cheap cloneable [`CartHandle`]: mutations
//! are fire-and-forget commands on an unbounded channel (no backpressure
//! by design), and reads come from a `watch`-published [`CartSnapshot`]
//! that never touches I/O.
//!
//! # Identity races
//!
//! The session subscription and the document subscription race: a stale
//! document snapshot for a previous identity must never overwrite a newly
//! loaded cart. Each present identity gets a fresh epoch token; the
//! document forwarder tags every delivery with the epoch it was attached
//! under, the actor discards deliveries from superseded epochs, and the
//! old forwarder is aborted before the next one attaches.

mod error;

pub use error::CartError;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use pinstick_core::{Cart, CartLine, ProductId, RawProduct, Session, UserId};

use crate::backend::{CartDocument, CartDocuments, CartUpdate};
use crate::notify::{Notice, Notifier};

/// Where the synchronizer stands with respect to the remote document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// The session collaborator has not been observed yet.
    Uninitialized,
    /// No identity; the cart is forced empty and mutations are rejected.
    Anonymous,
    /// An identity is present, awaiting the first remote read.
    Loading,
    /// Steady state; remote updates replace local state wholesale.
    Synced,
}

/// An immutable view of the synchronizer's current state.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    /// Current synchronization phase.
    pub phase: SyncPhase,
    /// Local cart state for the current identity.
    pub cart: Cart,
}

impl CartSnapshot {
    /// Sum of quantities across all lines. Pure; never triggers I/O.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Sum of price times quantity across all lines. Pure; never
    /// triggers I/O.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    /// Whether the first remote read for the current identity is still
    /// outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, SyncPhase::Uninitialized | SyncPhase::Loading)
    }
}

/// Mutation commands accepted by the actor.
#[derive(Debug)]
enum Command {
    Add { product: RawProduct, quantity: i64 },
    Remove { id: ProductId },
    SetQuantity { id: ProductId, quantity: i64 },
    Shutdown,
}

/// A document delivery tagged with the epoch it was attached under.
#[derive(Debug)]
struct DocEvent {
    epoch: u64,
    update: CartUpdate,
}

/// Cloneable handle to a running synchronizer.
#[derive(Debug, Clone)]
pub struct CartHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<CartSnapshot>,
}

impl CartHandle {
    /// Add a product to the cart.
    ///
    /// The product is normalized per the defaulting rules; a line with
    /// the same id has its quantity incremented instead of a new line
    /// being appended. Without an active identity the attempt is reported
    /// through the notification channel and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Closed`] if the synchronizer has shut down.
    pub fn add_to_cart(&self, product: RawProduct, quantity: i64) -> Result<(), CartError> {
        self.send(Command::Add { product, quantity })
    }

    /// Add a single unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Closed`] if the synchronizer has shut down.
    pub fn add(&self, product: RawProduct) -> Result<(), CartError> {
        self.add_to_cart(product, 1)
    }

    /// Remove the line matching `id`. Silent no-op without an active
    /// identity; idempotent for absent ids.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Closed`] if the synchronizer has shut down.
    pub fn remove_from_cart(&self, id: ProductId) -> Result<(), CartError> {
        self.send(Command::Remove { id })
    }

    /// Replace the matching line's quantity. Silent no-op without an
    /// active identity or when `quantity < 1`; an absent id leaves the
    /// cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Closed`] if the synchronizer has shut down.
    pub fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CartError> {
        self.send(Command::SetQuantity { id, quantity })
    }

    /// Current derived unit count.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.snapshot.borrow().count()
    }

    /// Current derived total price.
    #[must_use]
    pub fn cart_total(&self) -> f64 {
        self.snapshot.borrow().total()
    }

    /// Clone of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot.clone()
    }

    /// Ask the synchronizer to detach its subscriptions and stop.
    ///
    /// Already-issued writes are not cancelable and run to completion.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    fn send(&self, command: Command) -> Result<(), CartError> {
        self.commands.send(command).map_err(|_| CartError::Closed)
    }
}

/// The synchronizer actor.
///
/// Constructed through [`CartSync::spawn`]; never handled directly.
pub struct CartSync<D> {
    documents: Arc<D>,
    notifier: Notifier,
    sessions: watch::Receiver<Option<Session>>,
    commands: mpsc::UnboundedReceiver<Command>,
    doc_events: mpsc::UnboundedReceiver<DocEvent>,
    doc_events_tx: mpsc::UnboundedSender<DocEvent>,
    forwarder: Option<JoinHandle<()>>,
    session: Option<Session>,
    epoch: u64,
    phase: SyncPhase,
    cart: Cart,
    snapshot_tx: watch::Sender<CartSnapshot>,
}

impl<D: CartDocuments> CartSync<D> {
    /// Attach to the session subscription and start the actor.
    ///
    /// Returns the consumer handle and the actor's join handle; awaiting
    /// the latter after [`CartHandle::shutdown`] completes teardown.
    #[must_use]
    pub fn spawn(
        sessions: watch::Receiver<Option<Session>>,
        documents: Arc<D>,
        notifier: Notifier,
    ) -> (CartHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (doc_events_tx, doc_events) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(CartSnapshot {
            phase: SyncPhase::Uninitialized,
            cart: Cart::new(),
        });

        let actor = Self {
            documents,
            notifier,
            sessions,
            commands: command_rx,
            doc_events,
            doc_events_tx,
            forwarder: None,
            session: None,
            epoch: 0,
            phase: SyncPhase::Uninitialized,
            cart: Cart::new(),
            snapshot_tx,
        };

        let task = tokio::spawn(actor.run());

        (
            CartHandle {
                commands: command_tx,
                snapshot,
            },
            task,
        )
    }

    async fn run(mut self) {
        // First observation moves Uninitialized to Anonymous or Loading.
        self.observe_session();

        loop {
            tokio::select! {
                changed = self.sessions.changed() => {
                    if changed.is_err() {
                        tracing::warn!("session subscription closed, shutting down");
                        break;
                    }
                    self.observe_session();
                }
                Some(event) = self.doc_events.recv() => {
                    self.apply_document(event);
                }
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
            }
        }

        self.detach_document_subscription();
    }

    /// React to the current session value.
    ///
    /// Identity loss takes precedence over anything in flight: the old
    /// document subscription is detached and the cart cleared before the
    /// new state is considered.
    fn observe_session(&mut self) {
        let session = self.sessions.borrow_and_update().clone();
        if session == self.session && self.phase != SyncPhase::Uninitialized {
            return;
        }

        self.detach_document_subscription();
        self.epoch += 1;
        self.cart.clear();
        self.session = session;

        match &self.session {
            None => {
                tracing::info!("no identity, cart cleared");
                self.phase = SyncPhase::Anonymous;
                self.publish();
            }
            Some(session) => {
                let user = session.user_id.clone();
                tracing::info!(%user, "identity present, loading cart");
                self.phase = SyncPhase::Loading;
                self.publish();
                self.attach_document_subscription(&user);
            }
        }
    }

    /// Attach a forwarder for the given user's document subscription.
    fn attach_document_subscription(&mut self, user: &UserId) {
        let mut updates = self.documents.watch_cart(user);
        let events = self.doc_events_tx.clone();
        let epoch = self.epoch;

        self.forwarder = Some(tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                if events.send(DocEvent { epoch, update }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Detach the current document subscription, if any.
    fn detach_document_subscription(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }

    /// Apply a document delivery, discarding superseded epochs.
    fn apply_document(&mut self, event: DocEvent) {
        if event.epoch != self.epoch {
            tracing::debug!(
                stale = event.epoch,
                current = self.epoch,
                "discarding stale document event"
            );
            return;
        }

        match event.update {
            CartUpdate::Snapshot(document) => {
                let items = match document {
                    CartDocument::Absent => Vec::new(),
                    CartDocument::Present { items } => items,
                };
                tracing::debug!(lines = items.len(), "remote cart snapshot received");
                self.cart = Cart::from_lines(items);
                self.phase = SyncPhase::Synced;
                self.publish();
            }
            CartUpdate::Failed(error) => {
                tracing::error!(%error, "cart subscription failed");
                self.notifier.notify(Notice::SyncFailed {
                    reason: error.to_string(),
                });
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Add { product, quantity } => self.add_to_cart(&product, quantity),
            Command::Remove { id } => self.remove_from_cart(&id),
            Command::SetQuantity { id, quantity } => self.update_quantity(&id, quantity),
            Command::Shutdown => {}
        }
    }

    fn add_to_cart(&mut self, product: &RawProduct, quantity: i64) {
        let Some(user) = self.current_user() else {
            tracing::warn!("add_to_cart without an active identity");
            self.notifier.notify(Notice::SignInRequired);
            return;
        };

        let line = CartLine::from_raw(product, quantity);
        tracing::debug!(id = %line.id, quantity = line.quantity, "adding to cart");

        self.cart.merge(line);
        self.publish();
        self.push_write(user);
    }

    fn remove_from_cart(&mut self, id: &ProductId) {
        let Some(user) = self.current_user() else {
            return;
        };

        self.cart.remove(id);
        self.publish();
        self.push_write(user);
    }

    fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let Some(user) = self.current_user() else {
            return;
        };
        if quantity < 1 {
            return;
        }

        self.cart.set_quantity(id, quantity);
        self.publish();
        self.push_write(user);
    }

    fn current_user(&self) -> Option<UserId> {
        self.session.as_ref().map(|session| session.user_id.clone())
    }

    /// Issue a full-cart write for the current line sequence.
    ///
    /// Fire-and-forget: local state stays optimistic, the write is not
    /// cancelable once issued, and a failure is routed to the notification
    /// channel for the user to retry the action.
    fn push_write(&self, user: UserId) {
        let documents = Arc::clone(&self.documents);
        let items = self.cart.lines().to_vec();
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            if let Err(error) = documents.merge_items(&user, items).await {
                tracing::error!(%user, %error, "cart write failed");
                notifier.notify(Notice::WriteFailed {
                    reason: error.to_string(),
                });
            }
        });
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(CartSnapshot {
            phase: self.phase,
            cart: self.cart.clone(),
        });
    }
}
