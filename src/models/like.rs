//! Per-visitor like model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many likes a single derived visitor identity has given a single
/// article. Unique per (slug, user_id); overwritten on upsert, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserArticleLike {
    /// Unique identifier
    pub id: i64,
    /// Article slug
    pub slug: String,
    /// Derived visitor identity
    pub user_id: String,
    /// Like count for this visitor and article
    pub count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
