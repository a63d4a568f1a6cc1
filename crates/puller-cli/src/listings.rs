//! Command handlers. Both return listings for `main` to print; logging goes
//! to stderr so stdout stays valid JSON.

use std::path::Path;

use anyhow::Context;
use puller_core::{AppConfig, CanonicalProduct};
use puller_scraper::{normalize_value, prioritize, SerpApiClient, SerpApiConfig};

/// Runs one live search. Unlike the server, a failed search is an error here
/// so the process exits non-zero.
pub(crate) async fn search(
    config: &AppConfig,
    query: &str,
    unordered: bool,
) -> anyhow::Result<Vec<CanonicalProduct>> {
    let client = SerpApiClient::new(SerpApiConfig::from_app_config(config))?;
    let products = client
        .try_fetch_listings(query)
        .await
        .with_context(|| format!("search for \"{query}\" failed"))?;

    tracing::info!(query, count = products.len(), unordered, "search complete");
    Ok(if unordered {
        products
    } else {
        prioritize(products)
    })
}

pub(crate) fn normalize_file(path: &Path) -> anyhow::Result<Vec<CanonicalProduct>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    normalize_document(&text).with_context(|| format!("failed to normalize {}", path.display()))
}

/// Parses a saved provider response body and returns prioritized listings.
pub(crate) fn normalize_document(text: &str) -> anyhow::Result<Vec<CanonicalProduct>> {
    let value: serde_json::Value = serde_json::from_str(text).context("response is not JSON")?;
    Ok(prioritize(normalize_value(value)))
}
