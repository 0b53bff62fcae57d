//! Tally - view and like counters for a personal blog

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxArticleRepository, SqlxLikeRepository},
    },
    services::{IdentityHasher, LikeService, ViewService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tally counter service...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // The identity hasher refuses to start without a salt, so a
    // misconfigured deployment fails here instead of serving weak identities
    let identity = Arc::new(IdentityHasher::new(config.identity.ip_salt.as_deref())?);
    tracing::info!("Visitor identity hasher initialized");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories and services
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let like_repo = SqlxLikeRepository::boxed(pool.clone());

    let like_service = Arc::new(LikeService::new(like_repo));
    let view_service = Arc::new(ViewService::new(article_repo));

    // Build application state
    let state = AppState {
        like_service,
        view_service,
        identity,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
