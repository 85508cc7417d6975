//! Catalog listing and caching behavior.

use std::sync::Arc;

use pinstick_core::Product;
use pinstick_store::backend::memory::MemoryBackend;
use pinstick_store::{CatalogService, ProductFilter};

fn product(id: &str, name: &str, category: &str, price: f64) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price,
        image_url: format!("https://cdn.pinstick.example/{id}.png"),
        category: category.into(),
        description: None,
    }
}

fn seeded_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed_products(vec![
        product("pin-cat", "Cosmic cat pin", "pins", 4.5),
        product("pin-moon", "Moon pin", "pins", 3.0),
        product("sticker-sun", "Sunrise sticker", "stickers", 1.99),
    ]);
    backend
}

#[tokio::test]
async fn test_category_filter_is_exact_match() {
    let backend = seeded_backend();
    let catalog = CatalogService::new(Arc::clone(&backend));

    let pins = catalog
        .list(&ProductFilter {
            category: Some("pins".into()),
            name_query: None,
        })
        .await
        .expect("list");

    assert_eq!(pins.len(), 2);
    assert!(pins.iter().all(|p| p.category == "pins"));
}

#[tokio::test]
async fn test_name_query_is_case_insensitive_substring() {
    let backend = seeded_backend();
    let catalog = CatalogService::new(Arc::clone(&backend));

    let hits = catalog
        .list(&ProductFilter {
            category: None,
            name_query: Some("PIN".into()),
        })
        .await
        .expect("list");

    assert_eq!(hits.len(), 2);

    let none = catalog
        .list(&ProductFilter {
            category: None,
            name_query: Some("mug".into()),
        })
        .await
        .expect("list");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_category_pages_are_cached() {
    let backend = seeded_backend();
    let catalog = CatalogService::new(Arc::clone(&backend));

    let filter = ProductFilter {
        category: Some("pins".into()),
        name_query: None,
    };

    catalog.list(&filter).await.expect("list");
    assert_eq!(backend.catalog_reads(), 1);

    // Second read (even with a different local name filter) hits the cache.
    catalog
        .list(&ProductFilter {
            category: Some("pins".into()),
            name_query: Some("cat".into()),
        })
        .await
        .expect("list");
    assert_eq!(backend.catalog_reads(), 1);

    // A different category is a different page.
    catalog
        .list(&ProductFilter {
            category: Some("stickers".into()),
            name_query: None,
        })
        .await
        .expect("list");
    assert_eq!(backend.catalog_reads(), 2);
}

#[tokio::test]
async fn test_unfiltered_listing_returns_everything() {
    let backend = seeded_backend();
    let catalog = CatalogService::new(Arc::clone(&backend));

    let all = catalog.list(&ProductFilter::default()).await.expect("list");
    assert_eq!(all.len(), 3);
}
