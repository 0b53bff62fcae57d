//! Like API endpoints
//!
//! Handles HTTP requests for per-visitor article likes:
//! - GET /api/likes/{slug} - Aggregate and per-visitor like counts
//! - POST /api/likes/{slug}?count=N - Set the visitor's like count
//!
//! Both verbs derive the visitor identity from the forwarded client address,
//! so a visitor's likes follow them across requests without any account.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::responses::{ApiError, LikesResponse};
use crate::api::AppState;

/// Address used when no forwarded-client-address header is present, e.g.
/// when running locally without a fronting proxy.
const FALLBACK_ADDRESS: &str = "0.0.0.0";

/// Build the likes router
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(get_likes_handler).post(upsert_likes_handler))
}

/// Query parameters for the like upsert
#[derive(Debug, Deserialize)]
pub struct UpsertLikesQuery {
    /// Kept as a raw string so a non-numeric value becomes a 400 with the
    /// endpoint's own error body instead of a framework rejection.
    pub count: Option<String>,
}

/// GET /api/likes/{slug} - Get aggregate and per-visitor like counts
///
/// Always succeeds: an unknown slug reports zero likes rather than 404.
async fn get_likes_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<LikesResponse>, ApiError> {
    let user_id = derive_visitor_id(&state, &headers)?;
    let counts = state.like_service.get(&slug, &user_id).await?;
    Ok(Json(counts.into()))
}

/// POST /api/likes/{slug}?count=N - Set the visitor's like count
///
/// The count is the visitor's new total for this article, not a delta.
async fn upsert_likes_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<UpsertLikesQuery>,
    headers: HeaderMap,
) -> Result<Json<LikesResponse>, ApiError> {
    let requested = query
        .count
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid count"))?;

    let user_id = derive_visitor_id(&state, &headers)?;
    let counts = state
        .like_service
        .upsert(&slug, &user_id, requested)
        .await?;
    Ok(Json(counts.into()))
}

/// Extract the client address from the forwarded-client-address header.
///
/// Fronting proxies append to x-forwarded-for, so the first comma-separated
/// token is the original client.
fn client_address(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .unwrap_or(FALLBACK_ADDRESS)
        .to_string()
}

fn derive_visitor_id(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let address = client_address(headers);
    Ok(state.identity.derive(&address)?)
}
