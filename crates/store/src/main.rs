//! Pin & Stick store - scripted demo session.
//!
//! Wires the cart synchronizer, auth, and catalog services to the
//! in-memory backend and walks through a typical session: create an
//! account, browse the catalog, fill the cart, observe a change from a
//! second device, sign out.
//!
//! Configuration is optional here (the in-memory backend needs none);
//! when present it is used to initialize Sentry, the same way a real
//! deployment would.

use std::sync::Arc;
use std::time::Duration;

use pinstick_core::{Product, RawProduct};
use pinstick_store::backend::AuthBackend;
use pinstick_store::backend::memory::MemoryBackend;
use pinstick_store::services::catalog::{CatalogService, ProductFilter};
use pinstick_store::{AuthService, CartHandle, CartSync, Notifier, StoreConfig, SyncPhase};

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Wait until the published snapshot settles in the given phase.
async fn wait_for_phase(cart: &CartHandle, phase: SyncPhase) {
    let mut snapshots = cart.watch();
    let wait = async {
        while snapshots.borrow_and_update().phase != phase {
            if snapshots.changed().await.is_err() {
                break;
            }
        }
    };

    if tokio::time::timeout(Duration::from_secs(2), wait).await.is_err() {
        tracing::warn!(?phase, "timed out waiting for phase");
    }
}

fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: "pin-cat".into(),
            name: "Cosmic cat pin".into(),
            price: 4.5,
            image_url: "https://cdn.pinstick.example/pin-cat.png".into(),
            category: "pins".into(),
            description: Some("Enamel pin, 30mm".into()),
        },
        Product {
            id: "sticker-sun".into(),
            name: "Sunrise sticker".into(),
            price: 1.99,
            image_url: "https://cdn.pinstick.example/sticker-sun.png".into(),
            category: "stickers".into(),
            description: None,
        },
    ]
}

#[tokio::main]
async fn main() {
    // Load .env if present; configuration stays optional for the demo.
    dotenvy::dotenv().ok();
    let config = StoreConfig::from_env().ok();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pinstick_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if config.is_none() {
        tracing::warn!("no configuration in environment, running with demo defaults");
    }

    let backend = Arc::new(MemoryBackend::new());
    backend.seed_products(demo_products());

    let (notifier, mut notices) = Notifier::channel();
    let alerts = tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            tracing::info!(alert = %notice, "would show alert dialog");
        }
    });

    let auth = AuthService::new(Arc::clone(&backend));
    let catalog = CatalogService::new(Arc::clone(&backend));
    let (cart, task) = CartSync::spawn(backend.watch_session(), Arc::clone(&backend), notifier);

    // Mutations before sign-in are rejected with a notice, never a write.
    let _ = cart.add(RawProduct {
        id: Some("pin-cat".into()),
        ..RawProduct::default()
    });

    let session = auth
        .create_account("demo@pinstick.example", "hunter22", "Demo")
        .await
        .expect("account creation");
    tracing::info!(user = %session.user_id, name = session.display_name_or_placeholder(), "session started");
    wait_for_phase(&cart, SyncPhase::Synced).await;

    let pins = catalog
        .list(&ProductFilter {
            category: Some("pins".into()),
            name_query: None,
        })
        .await
        .expect("catalog read");
    tracing::info!(products = pins.len(), "browsing pins");

    for product in &pins {
        let _ = cart.add_to_cart(RawProduct::from(product), 2);
    }
    let _ = cart.add(RawProduct {
        id: Some("sticker-sun".into()),
        name: Some("Sunrise sticker".into()),
        price: Some(serde_json::json!("1.99")),
        ..RawProduct::default()
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = cart.snapshot();
    let total = format!("{:.2}", snapshot.total());
    tracing::info!(count = snapshot.count(), total = %total, "cart after shopping");

    // A second device empties the document; the subscription reflects it.
    backend.push_remote_cart(&session.user_id, Vec::new());
    tokio::time::sleep(Duration::from_millis(50)).await;
    tracing::info!(count = cart.cart_count(), "cart after remote clear");

    auth.sign_out().await.expect("sign out");
    wait_for_phase(&cart, SyncPhase::Anonymous).await;
    tracing::info!(count = cart.cart_count(), "cart after sign-out");

    cart.shutdown();
    task.await.expect("synchronizer shutdown");
    alerts.abort();
}
