//! HTTP client for the `SerpApi` shopping-search endpoint.

mod endpoint;

use std::time::Duration;

use puller_core::{AppConfig, CanonicalProduct};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::link::LinkResolver;
use crate::normalize::normalize_response_with;
use crate::rate_limit::retry_on_rate_limit;
use crate::types::RawShoppingResponse;

use endpoint::{extract_domain, redacted_endpoint};

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";
pub const DEFAULT_ENGINE: &str = "google_shopping";

const PROVIDER_NAME: &str = "serpapi";

/// Connection settings and retry policy for [`SerpApiClient`].
#[derive(Clone)]
pub struct SerpApiConfig {
    /// Provider credential. Searches degrade to empty results without it.
    pub api_key: Option<String>,
    pub base_url: String,
    pub engine: String,
    /// Optional country code, sent as `gl`.
    pub country: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Fixed wait before retrying a 429.
    pub rate_limit_backoff: Duration,
    /// Number of retries after the first 429.
    pub max_retries: u32,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            engine: DEFAULT_ENGINE.to_owned(),
            country: None,
            timeout_secs: 30,
            user_agent: "puller/0.1 (listing-aggregator)".to_owned(),
            rate_limit_backoff: Duration::from_secs(5),
            max_retries: 1,
        }
    }
}

impl SerpApiConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.serpapi_key.clone(),
            base_url: config.serpapi_base_url.clone(),
            engine: DEFAULT_ENGINE.to_owned(),
            country: config.serpapi_country.clone(),
            timeout_secs: config.scraper_request_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            rate_limit_backoff: Duration::from_secs(config.scraper_rate_limit_backoff_secs),
            max_retries: config.scraper_max_retries,
        }
    }
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("engine", &self.engine)
            .field("country", &self.country)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_backoff", &self.rate_limit_backoff)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Fetches shopping listings for a query and normalizes them.
///
/// HTTP 429 is retried after a fixed backoff (once by default). Every other
/// failure ends the search. [`Self::fetch_listings`] turns any failure into an
/// empty list; [`Self::try_fetch_listings`] reports it.
#[derive(Debug)]
pub struct SerpApiClient {
    client: Client,
    config: SerpApiConfig,
    resolver: LinkResolver,
}

impl SerpApiClient {
    /// Creates a client with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: SerpApiConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            config,
            resolver: LinkResolver::default(),
        })
    }

    /// Replaces the default link policy.
    #[must_use]
    pub fn with_resolver(mut self, resolver: LinkResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SerpApiConfig {
        &self.config
    }

    /// Searches for `query` and returns normalized listings, or an empty list
    /// if the search fails for any reason. Failures are logged.
    pub async fn fetch_listings(&self, query: &str) -> Vec<CanonicalProduct> {
        match self.try_fetch_listings(query).await {
            Ok(products) => products,
            Err(err @ ScraperError::MissingCredential { .. }) => {
                tracing::error!(query, error = %err, "shopping search skipped");
                Vec::new()
            }
            Err(err) => {
                tracing::error!(
                    query,
                    error = %err,
                    "shopping search failed; returning no listings"
                );
                Vec::new()
            }
        }
    }

    /// Searches for `query` and returns normalized listings.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingCredential`]: no API key configured.
    /// - [`ScraperError::InvalidEndpoint`]: `base_url` is not a valid URL.
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status (not retried).
    /// - [`ScraperError::Http`]: network or TLS failure (not retried).
    /// - [`ScraperError::Deserialize`]: response body is not valid JSON.
    pub async fn try_fetch_listings(
        &self,
        query: &str,
    ) -> Result<Vec<CanonicalProduct>, ScraperError> {
        let url = self.search_url(query)?;

        let response = retry_on_rate_limit(
            self.config.max_retries,
            self.config.rate_limit_backoff,
            || self.fetch_once(&url, query),
        )
        .await?;

        if let Some(message) = &response.error {
            tracing::warn!(query, provider_error = %message, "provider reported a search error");
        }

        let products = normalize_response_with(&response, &self.resolver);
        tracing::info!(query, count = products.len(), "fetched shopping listings");
        Ok(products)
    }

    async fn fetch_once(
        &self,
        url: &Url,
        query: &str,
    ) -> Result<RawShoppingResponse, ScraperError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ScraperError::Http(e.without_url()))?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: redacted_endpoint(url),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::Http(e.without_url()))?;
        serde_json::from_str::<RawShoppingResponse>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("shopping results for \"{query}\""),
            source: e,
        })
    }

    /// Returns the request URL a search for `query` would use. The URL
    /// contains the API key; pass it through redaction before logging.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingCredential`] without an API key, or
    /// [`ScraperError::InvalidEndpoint`] if `base_url` does not parse.
    pub fn search_url(&self, query: &str) -> Result<Url, ScraperError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ScraperError::MissingCredential {
                provider: PROVIDER_NAME,
            })?;
        Self::build_search_url(&self.config, query, api_key)
    }

    /// `engine`, `q`, `api_key`, `direct_link=true`, plus `gl` when a country
    /// is configured.
    fn build_search_url(
        config: &SerpApiConfig,
        query: &str,
        api_key: &str,
    ) -> Result<Url, ScraperError> {
        let mut url = Url::parse(&config.base_url).map_err(|e| ScraperError::InvalidEndpoint {
            endpoint: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("engine", &config.engine)
                .append_pair("q", query)
                .append_pair("api_key", api_key)
                .append_pair("direct_link", "true");
            if let Some(country) = &config.country {
                pairs.append_pair("gl", country);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
