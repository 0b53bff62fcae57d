//! View API endpoints
//!
//! Handles HTTP requests for article view counts:
//! - GET /api/views/{slug} - Current view count, 404 for unseen slugs
//! - POST /api/views/{slug} - Record one view, creating the article if new
//!
//! No visitor identity is involved; every accepted POST counts.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::responses::{ApiError, ViewsResponse};
use crate::api::AppState;

/// Build the views router
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(get_views_handler).post(increment_views_handler))
}

/// GET /api/views/{slug} - Get the view count for an article
async fn get_views_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ViewsResponse>, ApiError> {
    let view_count = state.view_service.get(&slug).await?;
    Ok(Json(ViewsResponse { view_count }))
}

/// POST /api/views/{slug} - Record one view
async fn increment_views_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ViewsResponse>, ApiError> {
    let view_count = state.view_service.increment(&slug).await?;
    Ok(Json(ViewsResponse { view_count }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::test_server;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_get_unseen_slug_returns_404_with_message() {
        let server = test_server().await;

        let res = server.get("/api/views/never-seen").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.json::<Value>(),
            json!({ "message": "Article with slug 'never-seen' not found" })
        );
    }

    #[tokio::test]
    async fn test_post_creates_then_increments() {
        let server = test_server().await;

        let res = server.post("/api/views/my-post").await;
        res.assert_status_ok();
        assert_eq!(res.json::<Value>(), json!({ "viewCount": 1 }));

        let res = server.post("/api/views/my-post").await;
        assert_eq!(res.json::<Value>(), json!({ "viewCount": 2 }));

        let res = server.get("/api/views/my-post").await;
        res.assert_status_ok();
        assert_eq!(res.json::<Value>(), json!({ "viewCount": 2 }));
    }

    #[tokio::test]
    async fn test_slugs_are_counted_independently() {
        let server = test_server().await;

        server.post("/api/views/one").await.assert_status_ok();
        server.post("/api/views/one").await.assert_status_ok();
        server.post("/api/views/two").await.assert_status_ok();

        let res = server.get("/api/views/one").await;
        assert_eq!(res.json::<Value>(), json!({ "viewCount": 2 }));
        let res = server.get("/api/views/two").await;
        assert_eq!(res.json::<Value>(), json!({ "viewCount": 1 }));
    }

    #[tokio::test]
    async fn test_unrecognized_method_is_rejected() {
        let server = test_server().await;

        let res = server.delete("/api/views/my-post").await;
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
