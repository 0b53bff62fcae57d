//! Services layer - Business logic
//!
//! This module contains the business logic services for the Tally counter
//! service. Services are responsible for:
//! - Implementing the counting rules
//! - Coordinating with repositories
//! - Handling validation and error cases

pub mod identity;
pub mod likes;
pub mod views;

pub use identity::{IdentityError, IdentityHasher};
pub use likes::{LikeCounts, LikeService, LikeServiceError, MAX_USER_LIKE_COUNT};
pub use views::{ViewService, ViewServiceError};
