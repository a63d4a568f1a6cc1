pub mod aggregate;
pub mod client;
pub mod error;
pub mod link;
pub mod normalize;
pub mod prioritize;
mod rate_limit;
pub mod types;

pub use aggregate::{aggregate_listings, ListingProvider};
pub use client::{SerpApiClient, SerpApiConfig};
pub use error::ScraperError;
pub use link::{resolve_link, LinkResolver};
pub use normalize::{normalize_response, normalize_value};
pub use prioritize::prioritize;
pub use types::{RawListingItem, RawShoppingResponse};
