use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use puller_core::CanonicalProduct;
use puller_scraper::{aggregate_listings, prioritize};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta, ResultSource};

/// Query used when the request names none.
const DEFAULT_QUERY: &str = "laptop";

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct EvictedData {
    query: String,
    evicted: bool,
}

type SearchResponse = Json<ApiResponse<Vec<CanonicalProduct>>>;

pub(super) async fn search_by_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> SearchResponse {
    let query = resolve_query(None, params.q);
    cached_search(&state, query, req_id).await
}

pub(super) async fn search_by_path(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(path_query): Path<String>,
    Query(params): Query<SearchParams>,
) -> SearchResponse {
    let query = resolve_query(Some(path_query), params.q);
    cached_search(&state, query, req_id).await
}

pub(super) async fn evict_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(query): Path<String>,
) -> Result<Json<ApiResponse<EvictedData>>, ApiError> {
    if !state.cache.remove(&query).await {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no cached results for \"{query}\""),
        ));
    }

    tracing::info!(query, "evicted cached search results");
    Ok(Json(ApiResponse {
        data: EvictedData {
            query,
            evicted: true,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Path parameter first, then `?q=`, then [`DEFAULT_QUERY`]. Empty values are
/// skipped.
fn resolve_query(path_query: Option<String>, param_query: Option<String>) -> String {
    path_query
        .filter(|q| !q.is_empty())
        .or_else(|| param_query.filter(|q| !q.is_empty()))
        .unwrap_or_else(|| DEFAULT_QUERY.to_owned())
}

/// Serves `query` from the cache when an entry exists for that exact string.
/// Otherwise queries every provider and caches the combined results.
async fn cached_search(state: &AppState, query: String, req_id: RequestId) -> SearchResponse {
    if let Some(entry) = state.cache.get(&query).await {
        tracing::info!(
            query,
            count = entry.results.len(),
            "serving cached search results"
        );
        return Json(ApiResponse {
            data: prioritize(entry.results),
            meta: ResponseMeta::with_source(req_id.0, ResultSource::Cache),
        });
    }

    let listings = aggregate_listings(&state.providers, &query).await;
    tracing::info!(
        query,
        count = listings.len(),
        "caching fresh search results"
    );
    let entry = state.cache.put(&query, listings).await;

    Json(ApiResponse {
        data: entry.results,
        meta: ResponseMeta::with_source(req_id.0, ResultSource::New),
    })
}
