//! View counter service
//!
//! Implements the per-article view count: a single monotonic counter,
//! incremented by exactly one per accepted request. The increment is
//! delegated to a store-level atomic upsert so concurrent requests for the
//! same slug never lose updates.

use crate::db::repositories::ArticleRepository;
use std::sync::Arc;

/// Error types for view service operations
#[derive(Debug, thiserror::Error)]
pub enum ViewServiceError {
    /// Article not found
    #[error("Article with slug '{0}' not found")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// View counter service
pub struct ViewService {
    repo: Arc<dyn ArticleRepository>,
}

impl ViewService {
    /// Create a new view service
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Get the view count for an article, failing when the slug has never
    /// been seen.
    pub async fn get(&self, slug: &str) -> Result<i64, ViewServiceError> {
        let article = self.repo.get_by_slug(slug).await?;

        article
            .map(|article| article.view_count)
            .ok_or_else(|| ViewServiceError::NotFound(slug.to_string()))
    }

    /// Record one view for an article, creating it with a count of 1 when
    /// the slug is new. Returns the post-increment count.
    pub async fn increment(&self, slug: &str) -> Result<i64, ViewServiceError> {
        let count = self.repo.increment_view(slug).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, DatabaseDriver};
    use crate::db::repositories::SqlxArticleRepository;
    use crate::db::{create_pool, create_test_pool, migrations};

    async fn setup_service() -> ViewService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ViewService::new(SqlxArticleRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_get_unknown_slug_is_not_found() {
        let service = setup_service().await;

        let result = service.get("never-seen").await;
        match result {
            Err(ViewServiceError::NotFound(slug)) => assert_eq!(slug, "never-seen"),
            other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_not_found_message_names_the_slug() {
        let service = setup_service().await;

        let err = service.get("my-post").await.expect_err("Should be not found");
        assert_eq!(err.to_string(), "Article with slug 'my-post' not found");
    }

    #[tokio::test]
    async fn test_increment_then_get() {
        let service = setup_service().await;

        assert_eq!(service.increment("post").await.expect("Increment failed"), 1);
        assert_eq!(service.increment("post").await.expect("Increment failed"), 2);
        assert_eq!(service.get("post").await.expect("Get failed"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_increments_lose_nothing() {
        // The in-memory test pool is capped at one connection, which would
        // serialize the burst; a file-backed database lets the increments
        // race across pool connections.
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            driver: DatabaseDriver::Sqlite,
            url: dir.path().join("views.db").to_string_lossy().into_owned(),
        };
        let pool = create_pool(&config).await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let service = Arc::new(ViewService::new(SqlxArticleRepository::boxed(pool)));

        let burst = 20;
        let mut handles = Vec::new();
        for _ in 0..burst {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.increment("burst-post").await.expect("Increment failed")
            }));
        }
        for handle in handles {
            handle.await.expect("Task panicked");
        }

        assert_eq!(service.get("burst-post").await.expect("Get failed"), burst);
    }
}
