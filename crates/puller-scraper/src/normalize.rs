//! Normalization from raw shopping results to [`puller_core::CanonicalProduct`].
//!
//! Link selection is delegated to [`crate::link`]; this module handles naming,
//! pricing, and the per-field defaults.

use puller_core::{CanonicalProduct, Currency, Price, Rating};
use reqwest::Url;

use crate::link::{default_resolver, LinkResolver};
use crate::types::{RawListingItem, RawShoppingResponse};

/// Platform label when neither the merchant nor the link names a known
/// retailer.
pub const PLATFORM: &str = "GoogleShopping";

/// Lowercase needle and label, checked against the merchant name and then the
/// link host.
const KNOWN_PLATFORMS: &[(&str, &str)] = &[
    ("amazon", "Amazon"),
    ("walmart", "Walmart"),
    ("bestbuy", "Best Buy"),
    ("best buy", "Best Buy"),
    ("ebay", "eBay"),
    ("newegg", "Newegg"),
];

const DEFAULT_NAME: &str = "No Title";
const DEFAULT_SELLER: &str = "Unknown Seller";
const DEFAULT_SHIPPING: &str = "N/A";
const DEFAULT_CONDITION: &str = "New";

/// Normalizes every listing in `response` with the default link rules.
///
/// Output order is primary, then inline, then featured results, each in
/// provider order. One product is produced per raw item.
#[must_use]
pub fn normalize_response(response: &RawShoppingResponse) -> Vec<CanonicalProduct> {
    normalize_response_with(response, default_resolver())
}

/// Like [`normalize_response`], with an explicit link policy.
#[must_use]
pub fn normalize_response_with(
    response: &RawShoppingResponse,
    resolver: &LinkResolver,
) -> Vec<CanonicalProduct> {
    let products: Vec<CanonicalProduct> = response
        .merged_items()
        .map(|item| normalize_item(item, resolver))
        .collect();

    tracing::debug!(
        primary = response.shopping_results.len(),
        inline = response.inline_shopping_results.len(),
        featured = response.featured_shopping_results.len(),
        total = products.len(),
        "normalized shopping response"
    );

    products
}

/// Normalizes an untyped provider response body.
#[must_use]
pub fn normalize_value(value: serde_json::Value) -> Vec<CanonicalProduct> {
    normalize_response(&RawShoppingResponse::from_value(value))
}

/// Normalizes a single raw listing. Missing fields get defaults; nothing here
/// can fail.
#[must_use]
pub fn normalize_item(item: &RawListingItem, resolver: &LinkResolver) -> CanonicalProduct {
    let name = canonical_name(item.str_field("title"), item.str_field("brand"));
    let link = resolver.resolve(item, &name);
    let source = item.non_empty_str("source");

    let rating = item
        .f64_field("rating")
        .filter(|value| *value > 0.0)
        .map(|value| Rating {
            value,
            count: item.u64_field("reviews").unwrap_or(0),
        });

    let shipping = item
        .str_field("delivery")
        .or_else(|| item.str_field("shipping"))
        .unwrap_or(DEFAULT_SHIPPING);

    let condition = item
        .non_empty_str("condition")
        .or_else(|| item.non_empty_str("second_hand_condition"))
        .unwrap_or(DEFAULT_CONDITION);

    CanonicalProduct {
        price: canonical_price(item),
        seller: source.unwrap_or(DEFAULT_SELLER).to_owned(),
        platform: derive_platform(source, &link, resolver).to_owned(),
        link,
        image: item.str_field("thumbnail").unwrap_or_default().to_owned(),
        rating,
        shipping: Some(shipping.to_owned()),
        condition: Some(condition.to_owned()),
        name,
    }
}

/// Prefixes the brand onto the title unless the title already mentions it.
fn canonical_name(title: Option<&str>, brand: Option<&str>) -> String {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_NAME);

    match brand.map(str::trim).filter(|b| !b.is_empty()) {
        Some(brand) if !title.to_lowercase().contains(&brand.to_lowercase()) => {
            format!("{brand} {title}")
        }
        _ => title.to_owned(),
    }
}

/// Names the retailer behind a listing from its merchant, then from its link
/// host. Fallback search links say nothing about the merchant and are skipped.
fn derive_platform(source: Option<&str>, link: &str, resolver: &LinkResolver) -> &'static str {
    let source = source.map(str::to_lowercase);
    let host = if resolver.is_fallback_link(link) {
        None
    } else {
        Url::parse(link)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    };

    [source, host]
        .into_iter()
        .flatten()
        .find_map(|haystack| known_platform(&haystack))
        .unwrap_or(PLATFORM)
}

fn known_platform(haystack: &str) -> Option<&'static str> {
    KNOWN_PLATFORMS
        .iter()
        .find(|(needle, _)| haystack.contains(*needle))
        .map(|(_, label)| *label)
}

fn canonical_price(item: &RawListingItem) -> Price {
    let value = item.f64_field("extracted_price").unwrap_or(0.0);
    let formatted = item
        .non_empty_str("price")
        .map_or_else(|| format!("${value}"), ToOwned::to_owned);

    Price {
        value,
        currency: Currency::from_formatted(&formatted),
        formatted,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
