//! Article model
//!
//! An article here is only what the counter service needs to know about one:
//! its slug and its view count. Rows come into existence implicitly on the
//! first view increment or like upsert for a previously unseen slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug
    pub slug: String,
    /// View count, incremented by one per accepted view request
    pub view_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
