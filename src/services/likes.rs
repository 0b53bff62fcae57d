//! Like counter service
//!
//! Implements the per-visitor like rules:
//! - Each visitor identity holds one like count per article, bounded by
//!   `MAX_USER_LIKE_COUNT`
//! - Upserts overwrite the stored count with the requested value
//! - The article total is the sum of all visitor counts for its slug
//!
//! Nothing is cached between requests; every call round-trips to the store.

use crate::db::repositories::LikeRepository;
use std::sync::Arc;

/// Upper bound on likes a single visitor can give a single article.
/// Matches the cap the blog frontend enforces in its like button UI.
pub const MAX_USER_LIKE_COUNT: i64 = 16;

/// Error types for like service operations
#[derive(Debug, thiserror::Error)]
pub enum LikeServiceError {
    /// Requested count is outside `[0, MAX_USER_LIKE_COUNT]`
    #[error("Invalid count")]
    InvalidCount,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Aggregate and per-visitor like counts for one article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeCounts {
    /// Sum of like counts across all visitors
    pub total_like_count: i64,
    /// The requesting visitor's own like count
    pub user_like_count: i64,
}

/// Whether a requested per-visitor count is within the accepted range
fn is_valid_count(count: i64) -> bool {
    (0..=MAX_USER_LIKE_COUNT).contains(&count)
}

/// Like counter service
pub struct LikeService {
    repo: Arc<dyn LikeRepository>,
}

impl LikeService {
    /// Create a new like service
    pub fn new(repo: Arc<dyn LikeRepository>) -> Self {
        Self { repo }
    }

    /// Get the aggregate and per-visitor like counts for an article.
    ///
    /// An unknown slug and a known slug nobody has liked both report zero;
    /// the distinction is deliberately not surfaced, so this never fails
    /// with not-found.
    pub async fn get(&self, slug: &str, user_id: &str) -> Result<LikeCounts, LikeServiceError> {
        let total_like_count = self.repo.total_for_slug(slug).await?;

        // When nobody has liked the article yet there is no row to find, so
        // skip the second query.
        let user_like_count = if total_like_count > 0 {
            self.repo
                .get(slug, user_id)
                .await?
                .map(|like| like.count)
                .unwrap_or(0)
        } else {
            0
        };

        Ok(LikeCounts {
            total_like_count,
            user_like_count,
        })
    }

    /// Set a visitor's like count for an article to exactly `requested`.
    ///
    /// The client sends its new total, not a delta. Counts outside
    /// `[0, MAX_USER_LIKE_COUNT]` are rejected before any write. The returned
    /// aggregate is re-read after the write and may already be stale under
    /// concurrent upserts from other visitors.
    pub async fn upsert(
        &self,
        slug: &str,
        user_id: &str,
        requested: i64,
    ) -> Result<LikeCounts, LikeServiceError> {
        if !is_valid_count(requested) {
            return Err(LikeServiceError::InvalidCount);
        }

        let like = self.repo.upsert(slug, user_id, requested).await?;
        let total_like_count = self.repo.total_for_slug(slug).await?;

        Ok(LikeCounts {
            total_like_count,
            user_like_count: like.count,
        })
    }
}
