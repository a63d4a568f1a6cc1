//! Fan-out of one query across several listing providers.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use puller_core::CanonicalProduct;

use crate::client::SerpApiClient;

/// A source of normalized listings for a search query.
///
/// Implementations never fail: a provider that cannot answer returns an
/// empty list and logs the reason.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn fetch_listings(&self, query: &str) -> Vec<CanonicalProduct>;
}

#[async_trait]
impl ListingProvider for SerpApiClient {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn fetch_listings(&self, query: &str) -> Vec<CanonicalProduct> {
        SerpApiClient::fetch_listings(self, query).await
    }
}

/// Queries every provider concurrently and concatenates their listings in
/// provider order.
pub async fn aggregate_listings(
    providers: &[Arc<dyn ListingProvider>],
    query: &str,
) -> Vec<CanonicalProduct> {
    let fetches = providers.iter().map(|p| p.fetch_listings(query));
    let batches = join_all(fetches).await;

    let mut products = Vec::with_capacity(batches.iter().map(Vec::len).sum());
    for (provider, batch) in providers.iter().zip(batches) {
        tracing::debug!(
            provider = provider.name(),
            count = batch.len(),
            "provider returned listings"
        );
        products.extend(batch);
    }
    products
}
