use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shopping listing normalized from a provider response into the shape the
/// storefront renders and caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Brand-prefixed title, e.g. `"Sony WH-1000XM4"`. Never empty.
    pub name: String,
    pub price: Price,
    /// Merchant label from the provider, e.g. `"Amazon"`.
    pub seller: String,
    /// Retailer behind the listing, e.g. `"Amazon"`, or `"GoogleShopping"` when
    /// no known retailer matches.
    pub platform: String,
    /// Absolute purchase URL. Never on the search provider's own domain.
    pub link: String,
    /// Thumbnail URL, or empty when the provider sent none.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Numeric price as reported by the provider; `0.0` when unknown.
    pub value: f64,
    pub currency: Currency,
    /// Display string, e.g. `"$348.00"`.
    pub formatted: String,
}

/// Currencies the storefront distinguishes. Anything without a `$` in its
/// display price is assumed Canadian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
}

impl Currency {
    /// Infers the currency from a provider display price.
    #[must_use]
    pub fn from_formatted(formatted: &str) -> Self {
        if formatted.contains('$') {
            Currency::Usd
        } else {
            Currency::Cad
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average star rating, always `> 0`.
    pub value: f64,
    /// Number of reviews behind the average.
    pub count: u64,
}

/// A cached search: the exact query string and the products it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultCacheEntry {
    pub query: String,
    pub results: Vec<CanonicalProduct>,
    pub created_at: DateTime<Utc>,
}

impl SearchResultCacheEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(query: impl Into<String>, results: Vec<CanonicalProduct>) -> Self {
        Self {
            query: query.into(),
            results,
            created_at: Utc::now(),
        }
    }
}
