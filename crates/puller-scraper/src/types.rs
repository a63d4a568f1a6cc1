//! Raw response types for the `SerpApi` `google_shopping` engine.
//!
//! ## Observed shape
//!
//! ### Result arrays
//! Listings arrive in up to three top-level arrays: `shopping_results`,
//! `inline_shopping_results`, and `featured_shopping_results`. Any of them may
//! be absent, and the provider occasionally sends `null` in their place. All
//! three deserialize to an empty list in that case.
//!
//! ### Listing items
//! Items are heterogeneous. Fields appear and disappear between result
//! arrays, and `rating`/`extracted_price` have been seen as strings. Items are
//! therefore kept as raw JSON and read through typed accessors that treat a
//! field of the wrong type as absent, so one odd item never fails the batch.
//!
//! ### Errors
//! Invalid keys and exhausted plans come back as HTTP 200 with a top-level
//! `"error"` string and no result arrays.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response from `GET /search.json?engine=google_shopping`.
#[derive(Debug, Default, Deserialize)]
pub struct RawShoppingResponse {
    #[serde(default, deserialize_with = "lenient_items")]
    pub shopping_results: Vec<RawListingItem>,

    #[serde(default, deserialize_with = "lenient_items")]
    pub inline_shopping_results: Vec<RawListingItem>,

    #[serde(default, deserialize_with = "lenient_items")]
    pub featured_shopping_results: Vec<RawListingItem>,

    /// Provider-reported error message, present on failed searches.
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

impl RawShoppingResponse {
    /// Builds a response from an arbitrary JSON value. Anything that is not an
    /// object yields an empty response.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// All items in merge order: primary, then inline, then featured.
    pub fn merged_items(&self) -> impl Iterator<Item = &RawListingItem> {
        self.shopping_results
            .iter()
            .chain(&self.inline_shopping_results)
            .chain(&self.featured_shopping_results)
    }

    /// Total number of items across the three arrays.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.shopping_results.len()
            + self.inline_shopping_results.len()
            + self.featured_shopping_results.len()
    }
}

/// A single listing as sent by the provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawListingItem(Value);

impl From<Value> for RawListingItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl RawListingItem {
    /// Returns the string at `key`, or `None` when absent or not a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Like [`Self::str_field`], but an empty string also counts as absent.
    #[must_use]
    pub fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.str_field(key).filter(|s| !s.is_empty())
    }

    /// Returns the number at `key`, or `None` when absent or not a number.
    #[must_use]
    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Returns the non-negative integer at `key`.
    #[must_use]
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Returns `key[0].link`, e.g. the first entry of `sellers`.
    #[must_use]
    pub fn first_nested_link(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)?
            .as_array()?
            .first()?
            .get("link")?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<RawListingItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().map(RawListingItem::from).collect(),
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_arrays_deserialize_empty() {
        let response: RawShoppingResponse =
            serde_json::from_value(json!({ "search_metadata": {} })).unwrap();
        assert_eq!(response.item_count(), 0);
        assert!(response.error.is_none());
    }

    #[test]
    fn null_and_non_array_fields_deserialize_empty() {
        let response: RawShoppingResponse = serde_json::from_value(json!({
            "shopping_results": null,
            "inline_shopping_results": "oops",
            "featured_shopping_results": { "title": "not a list" }
        }))
        .unwrap();
        assert_eq!(response.item_count(), 0);
    }

    #[test]
    fn merged_items_keeps_array_order() {
        let response: RawShoppingResponse = serde_json::from_value(json!({
            "featured_shopping_results": [{ "title": "featured" }],
            "shopping_results": [{ "title": "primary-1" }, { "title": "primary-2" }],
            "inline_shopping_results": [{ "title": "inline" }]
        }))
        .unwrap();
        let titles: Vec<_> = response
            .merged_items()
            .map(|item| item.str_field("title").unwrap())
            .collect();
        assert_eq!(titles, vec!["primary-1", "primary-2", "inline", "featured"]);
    }

    #[test]
    fn non_object_items_are_kept() {
        let response: RawShoppingResponse =
            serde_json::from_value(json!({ "shopping_results": [42, null, "x"] })).unwrap();
        assert_eq!(response.item_count(), 3);
        assert!(response.shopping_results[0].str_field("title").is_none());
    }

    #[test]
    fn provider_error_is_captured() {
        let response: RawShoppingResponse =
            serde_json::from_value(json!({ "error": "Invalid API key." })).unwrap();
        assert_eq!(response.error.as_deref(), Some("Invalid API key."));
    }

    #[test]
    fn from_value_tolerates_non_object() {
        assert_eq!(
            RawShoppingResponse::from_value(json!([1, 2])).item_count(),
            0
        );
        assert_eq!(RawShoppingResponse::from_value(Value::Null).item_count(), 0);
    }

    #[test]
    fn accessors_ignore_wrong_types() {
        let item = RawListingItem::from(json!({
            "title": 12,
            "extracted_price": "348",
            "reviews": -3,
            "sellers": "nope"
        }));
        assert!(item.str_field("title").is_none());
        assert!(item.f64_field("extracted_price").is_none());
        assert!(item.u64_field("reviews").is_none());
        assert!(item.first_nested_link("sellers").is_none());
    }

    #[test]
    fn first_nested_link_reads_first_entry_only() {
        let item = RawListingItem::from(json!({
            "sellers": [{ "name": "a" }, { "link": "https://b.example/1" }]
        }));
        assert!(item.first_nested_link("sellers").is_none());

        let item = RawListingItem::from(json!({
            "sellers": [{ "link": "https://a.example/1" }]
        }));
        assert_eq!(
            item.first_nested_link("sellers"),
            Some("https://a.example/1")
        );
    }
}
