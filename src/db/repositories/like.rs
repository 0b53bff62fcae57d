//! Per-visitor like repository
//!
//! Database operations for the user_article_likes table.
//!
//! This module provides:
//! - `LikeRepository` trait defining the interface for like data access
//! - `SqlxLikeRepository` implementing the trait for SQLite and MySQL
//!
//! The upsert overwrites the stored count with the requested value; the
//! client always sends its new total, not a delta.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::UserArticleLike;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Like repository trait
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Sum of like counts across all visitors for a slug (0 if no rows)
    async fn total_for_slug(&self, slug: &str) -> Result<i64>;

    /// Get the like row for one (slug, user_id) pair
    async fn get(&self, slug: &str, user_id: &str) -> Result<Option<UserArticleLike>>;

    /// Set the like count for one (slug, user_id) pair to exactly `count`,
    /// creating the row if absent
    async fn upsert(&self, slug: &str, user_id: &str, count: i64) -> Result<UserArticleLike>;
}

/// SQLx-based like repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxLikeRepository {
    pool: DynDatabasePool,
}

impl SqlxLikeRepository {
    /// Create a new SQLx like repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn LikeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn total_for_slug(&self, slug: &str) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                total_for_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                total_for_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn get(&self, slug: &str, user_id: &str) -> Result<Option<UserArticleLike>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_like_sqlite(self.pool.as_sqlite().unwrap(), slug, user_id).await
            }
            DatabaseDriver::Mysql => {
                get_like_mysql(self.pool.as_mysql().unwrap(), slug, user_id).await
            }
        }
    }

    async fn upsert(&self, slug: &str, user_id: &str, count: i64) -> Result<UserArticleLike> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                upsert_like_sqlite(self.pool.as_sqlite().unwrap(), slug, user_id, count).await
            }
            DatabaseDriver::Mysql => {
                upsert_like_mysql(self.pool.as_mysql().unwrap(), slug, user_id, count).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn row_to_like_sqlite(row: &sqlx::sqlite::SqliteRow) -> UserArticleLike {
    UserArticleLike {
        id: row.get("id"),
        slug: row.get("slug"),
        user_id: row.get("user_id"),
        count: row.get("count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

async fn total_for_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(count), 0) AS total FROM user_article_likes WHERE slug = ?",
    )
    .bind(slug)
    .fetch_one(pool)
    .await
    .context("Failed to aggregate like counts")?;

    Ok(row.get("total"))
}

async fn get_like_sqlite(
    pool: &SqlitePool,
    slug: &str,
    user_id: &str,
) -> Result<Option<UserArticleLike>> {
    let row = sqlx::query(
        r#"
        SELECT id, slug, user_id, count, created_at, updated_at
        FROM user_article_likes
        WHERE slug = ? AND user_id = ?
        "#,
    )
    .bind(slug)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch like row")?;

    Ok(row.map(|row| row_to_like_sqlite(&row)))
}

async fn upsert_like_sqlite(
    pool: &SqlitePool,
    slug: &str,
    user_id: &str,
    count: i64,
) -> Result<UserArticleLike> {
    let row = sqlx::query(
        r#"
        INSERT INTO user_article_likes (slug, user_id, count) VALUES (?, ?, ?)
        ON CONFLICT(slug, user_id)
        DO UPDATE SET count = excluded.count, updated_at = CURRENT_TIMESTAMP
        RETURNING id, slug, user_id, count, created_at, updated_at
        "#,
    )
    .bind(slug)
    .bind(user_id)
    .bind(count)
    .fetch_one(pool)
    .await
    .context("Failed to upsert like row")?;

    Ok(row_to_like_sqlite(&row))
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn row_to_like_mysql(row: &sqlx::mysql::MySqlRow) -> UserArticleLike {
    UserArticleLike {
        id: row.get("id"),
        slug: row.get("slug"),
        user_id: row.get("user_id"),
        count: row.get("count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

async fn total_for_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<i64> {
    // SUM() widens to DECIMAL in MySQL, cast back to an integer type
    let row = sqlx::query(
        "SELECT CAST(COALESCE(SUM(count), 0) AS SIGNED) AS total FROM user_article_likes WHERE slug = ?",
    )
    .bind(slug)
    .fetch_one(pool)
    .await
    .context("Failed to aggregate like counts")?;

    Ok(row.get("total"))
}

async fn get_like_mysql(
    pool: &MySqlPool,
    slug: &str,
    user_id: &str,
) -> Result<Option<UserArticleLike>> {
    let row = sqlx::query(
        r#"
        SELECT id, slug, user_id, count, created_at, updated_at
        FROM user_article_likes
        WHERE slug = ? AND user_id = ?
        "#,
    )
    .bind(slug)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch like row")?;

    Ok(row.map(|row| row_to_like_mysql(&row)))
}

async fn upsert_like_mysql(
    pool: &MySqlPool,
    slug: &str,
    user_id: &str,
    count: i64,
) -> Result<UserArticleLike> {
    sqlx::query(
        r#"
        INSERT INTO user_article_likes (slug, user_id, count) VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE count = VALUES(count), updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(slug)
    .bind(user_id)
    .bind(count)
    .execute(pool)
    .await
    .context("Failed to upsert like row")?;

    let row = sqlx::query(
        r#"
        SELECT id, slug, user_id, count, created_at, updated_at
        FROM user_article_likes
        WHERE slug = ? AND user_id = ?
        "#,
    )
    .bind(slug)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .context("Failed to read like row after upsert")?;

    Ok(row_to_like_mysql(&row))
}
