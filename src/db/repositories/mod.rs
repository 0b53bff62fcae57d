//! Repository layer
//!
//! Repositories own all SQL in the service. Each repository is a trait plus a
//! SQLx implementation that dispatches on the configured driver, so services
//! depend on a narrow storage interface rather than a concrete client.

pub mod article;
pub mod like;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use like::{LikeRepository, SqlxLikeRepository};
