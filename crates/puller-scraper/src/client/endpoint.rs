//! Endpoint helpers for the provider client.
//!
//! Request URLs carry the API key in their query string, so anything that
//! ends up in logs or errors goes through [`redacted_endpoint`] first.

use reqwest::Url;

/// Returns the request URL without its query string or fragment.
///
/// Given `"https://serpapi.com/search.json?q=x&api_key=secret"`, returns
/// `"https://serpapi.com/search.json"`.
#[must_use]
pub(super) fn redacted_endpoint(url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    stripped.to_string()
}

/// Extracts the hostname for use in error messages, falling back to the
/// redacted endpoint when the URL has no host.
#[must_use]
pub(super) fn extract_domain(url: &Url) -> String {
    url.host_str()
        .map_or_else(|| redacted_endpoint(url), str::to_owned)
}
