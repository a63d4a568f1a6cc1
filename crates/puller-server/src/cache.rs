use std::{collections::HashMap, sync::Arc};

use puller_core::{CanonicalProduct, SearchResultCacheEntry};
use tokio::sync::RwLock;

/// In-memory store of search results keyed by the exact query string.
///
/// Lookups are case-sensitive and never match on substrings: `"Laptop"` and
/// `"laptop stand"` are distinct entries from `"laptop"`.
#[derive(Debug, Clone, Default)]
pub struct SearchCache {
    entries: Arc<RwLock<HashMap<String, SearchResultCacheEntry>>>,
}

impl SearchCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, query: &str) -> Option<SearchResultCacheEntry> {
        self.entries.read().await.get(query).cloned()
    }

    /// Stores `results` under `query`, replacing any prior entry for that key.
    pub async fn put(&self, query: &str, results: Vec<CanonicalProduct>) -> SearchResultCacheEntry {
        let entry = SearchResultCacheEntry::new(query, results);
        let replaced = self
            .entries
            .write()
            .await
            .insert(query.to_owned(), entry.clone());
        if replaced.is_some() {
            tracing::debug!(query, "replaced cached search results");
        }
        entry
    }

    /// Removes the entry for `query`. Returns `true` if one existed.
    pub async fn remove(&self, query: &str) -> bool {
        self.entries.write().await.remove(query).is_some()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
