//! API layer - HTTP handlers and routing
//!
//! This module contains the HTTP API endpoints for the Tally counter
//! service:
//! - Like endpoints (aggregate + per-visitor like counts)
//! - View endpoints (per-article view counts)

pub mod likes;
pub mod responses;
pub mod views;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{IdentityHasher, LikeService, ViewService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub like_service: Arc<LikeService>,
    pub view_service: Arc<ViewService>,
    pub identity: Arc<IdentityHasher>,
}

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/likes", likes::router())
        .nest("/views", views::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // The counter API is called cross-origin from the blog frontend
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxLikeRepository};
    use crate::db::{create_test_pool, migrations};
    use axum_test::TestServer;

    /// Build a test server backed by a fresh in-memory database and a fixed
    /// identity salt.
    pub(crate) async fn test_server() -> TestServer {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState {
            like_service: Arc::new(LikeService::new(SqlxLikeRepository::boxed(pool.clone()))),
            view_service: Arc::new(ViewService::new(SqlxArticleRepository::boxed(pool))),
            identity: Arc::new(
                IdentityHasher::new(Some("test-salt")).expect("Failed to build hasher"),
            ),
        };

        let app = build_router(state, "http://localhost:3000");
        TestServer::new(app).expect("Failed to start test server")
    }
}
