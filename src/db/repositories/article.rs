//! Article repository
//!
//! Database operations for articles and their view counts.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! The view increment is a single store-level upsert, never a read followed
//! by a write in application code, so concurrent increments for the same slug
//! are all reflected.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Article;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Get article by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Atomically increment the view count for a slug, creating the article
    /// with a count of 1 if it doesn't exist yet. Returns the post-increment
    /// view count.
    async fn increment_view(&self, slug: &str) -> Result<i64>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn increment_view(&self, slug: &str) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                increment_view_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                increment_view_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Article {
    Article {
        id: row.get("id"),
        slug: row.get("slug"),
        view_count: row.get("view_count"),
        created_at: row.get("created_at"),
    }
}

async fn get_article_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Article>> {
    let row = sqlx::query("SELECT id, slug, view_count, created_at FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch article by slug")?;

    Ok(row.map(|row| row_to_article_sqlite(&row)))
}

async fn increment_view_sqlite(pool: &SqlitePool, slug: &str) -> Result<i64> {
    let row = sqlx::query(
        r#"
        INSERT INTO articles (slug, view_count) VALUES (?, 1)
        ON CONFLICT(slug) DO UPDATE SET view_count = view_count + 1
        RETURNING view_count
        "#,
    )
    .bind(slug)
    .fetch_one(pool)
    .await
    .context("Failed to increment view count")?;

    Ok(row.get("view_count"))
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Article {
    Article {
        id: row.get("id"),
        slug: row.get("slug"),
        view_count: row.get("view_count"),
        created_at: row.get("created_at"),
    }
}

async fn get_article_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Article>> {
    let row = sqlx::query("SELECT id, slug, view_count, created_at FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch article by slug")?;

    Ok(row.map(|row| row_to_article_mysql(&row)))
}

async fn increment_view_mysql(pool: &MySqlPool, slug: &str) -> Result<i64> {
    // MySQL has no RETURNING; the increment itself stays a single atomic
    // statement and the returned value is a fresh read.
    sqlx::query(
        r#"
        INSERT INTO articles (slug, view_count) VALUES (?, 1)
        ON DUPLICATE KEY UPDATE view_count = view_count + 1
        "#,
    )
    .bind(slug)
    .execute(pool)
    .await
    .context("Failed to increment view count")?;

    let row = sqlx::query("SELECT view_count FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to read view count after increment")?;

    Ok(row.get("view_count"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_repo() -> SqlxArticleRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxArticleRepository::new(pool)
    }

    #[tokio::test]
    async fn test_get_by_slug_unknown_returns_none() {
        let repo = setup_repo().await;
        let article = repo.get_by_slug("missing").await.expect("Query failed");
        assert!(article.is_none());
    }

    #[tokio::test]
    async fn test_increment_creates_article_with_count_one() {
        let repo = setup_repo().await;

        let count = repo.increment_view("first-post").await.expect("Increment failed");
        assert_eq!(count, 1);

        let article = repo
            .get_by_slug("first-post")
            .await
            .expect("Query failed")
            .expect("Article should exist after increment");
        assert_eq!(article.slug, "first-post");
        assert_eq!(article.view_count, 1);
    }

    #[tokio::test]
    async fn test_increment_is_cumulative() {
        let repo = setup_repo().await;

        repo.increment_view("post").await.expect("Increment failed");
        repo.increment_view("post").await.expect("Increment failed");
        let count = repo.increment_view("post").await.expect("Increment failed");
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_increment_tracks_slugs_independently() {
        let repo = setup_repo().await;

        repo.increment_view("a").await.expect("Increment failed");
        repo.increment_view("a").await.expect("Increment failed");
        let b = repo.increment_view("b").await.expect("Increment failed");
        assert_eq!(b, 1);

        let a = repo
            .get_by_slug("a")
            .await
            .expect("Query failed")
            .expect("Article should exist");
        assert_eq!(a.view_count, 2);
    }
}
