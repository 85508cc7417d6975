//! Catalog read service.
//!
//! Read-only product listings, outside the cart core. The category filter
//! is pushed to the backend (an exact-match query); the free-text name
//! filter is applied locally over the fetched page. Per-category pages
//! are cached with `moka` for five minutes.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use pinstick_core::Product;

use crate::backend::{BackendError, ProductCatalog};

/// Cache key for catalog pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CatalogKey {
    All,
    Category(String),
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match, applied backend-side.
    pub category: Option<String>,
    /// Case-insensitive substring match on the product name, applied
    /// locally.
    pub name_query: Option<String>,
}

/// Cached catalog reads.
#[derive(Clone)]
pub struct CatalogService<C> {
    catalog: Arc<C>,
    cache: Cache<CatalogKey, Arc<Vec<Product>>>,
}

impl<C: ProductCatalog> CatalogService<C> {
    /// Cache time-to-live for category pages.
    const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Create a new catalog service.
    #[must_use]
    pub fn new(catalog: Arc<C>) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Self::CACHE_TTL)
            .build();

        Self { catalog, cache }
    }

    /// List products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when the category page is not cached and
    /// the backend read fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, BackendError> {
        let key = filter.category.as_ref().map_or(CatalogKey::All, |category| {
            CatalogKey::Category(category.to_lowercase())
        });

        let page = match self.cache.get(&key).await {
            Some(page) => page,
            None => {
                let category = match &key {
                    CatalogKey::All => None,
                    CatalogKey::Category(category) => Some(category.as_str()),
                };
                let page = Arc::new(self.catalog.list_products(category).await?);
                tracing::debug!(products = page.len(), "catalog page fetched");
                self.cache.insert(key, Arc::clone(&page)).await;
                page
            }
        };

        let products = match &filter.name_query {
            None => page.as_ref().clone(),
            Some(query) => {
                let query = query.to_lowercase();
                page.iter()
                    .filter(|product| product.name.to_lowercase().contains(&query))
                    .cloned()
                    .collect()
            }
        };

        Ok(products)
    }
}
