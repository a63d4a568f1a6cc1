//! Outbound purchase-link resolution for raw shopping listings.
//!
//! The provider frequently hands back links to its own redirect pages rather
//! than to the merchant. [`LinkResolver::resolve`] walks a fixed chain of
//! candidates and falls back to a marketplace search for the product name, so
//! every listing ends up with a usable merchant-side URL.

use std::sync::LazyLock;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::types::RawListingItem;

/// Hostname substring identifying the search provider's own pages.
pub const PROVIDER_HOST_MARKER: &str = "google";

/// Marketplace search used when no merchant link survives resolution.
pub const FALLBACK_SEARCH_BASE: &str = "https://www.amazon.com/s";

/// Query parameters that carry the real destination on provider redirects.
const REDIRECT_PARAMS: [&str; 3] = ["url", "adurl", "q"];

/// Nested arrays whose first entry may hold a merchant link, in priority order.
const NESTED_LINK_SOURCES: [&str; 3] = ["sellers", "buying_options", "inline_seller_listings"];

/// Bytes left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static DEFAULT_RESOLVER: LazyLock<LinkResolver> = LazyLock::new(LinkResolver::default);

/// Returns the process-wide resolver for the Google Shopping integration.
pub(crate) fn default_resolver() -> &'static LinkResolver {
    &DEFAULT_RESOLVER
}

/// Resolves the purchase link for `item` with the default provider rules.
///
/// See [`LinkResolver::resolve`].
#[must_use]
pub fn resolve_link(item: &RawListingItem, fallback_name: &str) -> String {
    DEFAULT_RESOLVER.resolve(item, fallback_name)
}

/// Link-resolution policy: which host marks the provider's own pages, and
/// which marketplace search serves as the last resort.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    /// Lowercased hostname substring that disqualifies a URL.
    provider_marker: String,
    /// Search endpoint without a query string, e.g. `https://www.amazon.com/s`.
    fallback_search_base: String,
    /// Host of `fallback_search_base` with any `www.` prefix removed.
    fallback_host: Option<String>,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(PROVIDER_HOST_MARKER, FALLBACK_SEARCH_BASE)
    }
}

impl LinkResolver {
    #[must_use]
    pub fn new(provider_marker: &str, fallback_search_base: &str) -> Self {
        let fallback_host = Url::parse(fallback_search_base)
            .ok()
            .and_then(|u| u.host_str().map(bare_host));
        Self {
            provider_marker: provider_marker.to_ascii_lowercase(),
            fallback_search_base: fallback_search_base.trim_end_matches('?').to_owned(),
            fallback_host,
        }
    }

    /// Returns `true` if `url` is an absolute URL with a host that is not on
    /// the provider's domain.
    #[must_use]
    pub fn accepts(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        parsed
            .host_str()
            .is_some_and(|host| !host.to_ascii_lowercase().contains(&self.provider_marker))
    }

    /// Picks the purchase URL for `item`.
    ///
    /// Resolution order:
    /// 1. `product_link`, else `link`.
    /// 2. The first entry of `sellers`, `buying_options`, then
    ///    `inline_seller_listings`.
    /// 3. The destination embedded in the step-1 URL's `url`, `adurl`, or `q`
    ///    parameter, when that URL is a provider redirect.
    /// 4. A marketplace search for `fallback_name`.
    ///
    /// Each step only wins if its URL passes [`Self::accepts`]. Never fails.
    #[must_use]
    pub fn resolve(&self, item: &RawListingItem, fallback_name: &str) -> String {
        let primary = item
            .non_empty_str("product_link")
            .or_else(|| item.non_empty_str("link"))
            .unwrap_or_default();

        if self.accepts(primary) {
            return primary.to_owned();
        }

        for source in NESTED_LINK_SOURCES {
            if let Some(link) = item.first_nested_link(source) {
                if self.accepts(link) {
                    tracing::trace!(source, "resolved link from nested listing");
                    return link.to_owned();
                }
            }
        }

        if let Some(target) = extract_redirect_target(primary) {
            if self.accepts(&target) {
                tracing::trace!("resolved link from provider redirect");
                return target;
            }
        }

        tracing::debug!(
            name = fallback_name,
            "no merchant link survived resolution; using marketplace search"
        );
        self.fallback_url(fallback_name)
    }

    /// Builds the marketplace search URL for `name`.
    #[must_use]
    pub fn fallback_url(&self, name: &str) -> String {
        let query = utf8_percent_encode(name, URI_COMPONENT);
        format!("{}?k={query}", self.fallback_search_base)
    }

    /// Returns `true` if `url` is on the fallback marketplace's domain.
    ///
    /// A leading `www.` is ignored on both sides. Unparseable URLs are never
    /// fallback links.
    #[must_use]
    pub fn is_fallback_link(&self, url: &str) -> bool {
        let Some(fallback_host) = self.fallback_host.as_deref() else {
            return false;
        };
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(bare_host))
            .is_some_and(|host| host == fallback_host)
    }
}

/// Extracts the real destination from a provider redirect URL.
///
/// Looks at the `url`, `adurl`, and `q` parameters in that order and returns
/// the first non-empty one, percent-decoded once more on top of the query
/// string decoding. Returns `None` if `url` does not parse or carries none of
/// those parameters.
#[must_use]
pub fn extract_redirect_target(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let raw = REDIRECT_PARAMS.iter().find_map(|key| {
        parsed
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    })?;
    percent_decode_str(&raw)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

fn bare_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_owned(),
        None => host,
    }
}

#[cfg(test)]
#[path = "link_test.rs"]
mod tests;
