//! Shared API response types
//!
//! Response structures for the counter endpoints and the common error body.
//! Field names are camelCase on the wire because the blog frontend consumes
//! them directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{IdentityError, LikeCounts, LikeServiceError, ViewServiceError};

// ============================================================================
// Success bodies
// ============================================================================

/// Response for both likes endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub total_like_count: i64,
    pub user_like_count: i64,
}

impl From<LikeCounts> for LikesResponse {
    fn from(counts: LikeCounts) -> Self {
        Self {
            total_like_count: counts.total_like_count,
            user_like_count: counts.user_like_count,
        }
    }
}

/// Response for both views endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsResponse {
    pub view_count: i64,
}

// ============================================================================
// Error body
// ============================================================================

/// Error response body shared by all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Error response for API errors
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Infrastructure failures are opaque to clients; the detail only goes
    /// to the log.
    pub fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorMessage {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<LikeServiceError> for ApiError {
    fn from(err: LikeServiceError) -> Self {
        match err {
            LikeServiceError::InvalidCount => ApiError::bad_request(err.to_string()),
            LikeServiceError::InternalError(e) => {
                tracing::error!("Like service failure: {:#}", e);
                ApiError::internal_error()
            }
        }
    }
}

impl From<ViewServiceError> for ApiError {
    fn from(err: ViewServiceError) -> Self {
        match err {
            ViewServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            ViewServiceError::InternalError(e) => {
                tracing::error!("View service failure: {:#}", e);
                ApiError::internal_error()
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        tracing::error!("Identity derivation failure: {}", err);
        ApiError::internal_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likes_response_is_camel_case() {
        let body = LikesResponse {
            total_like_count: 12,
            user_like_count: 3,
        };
        let json = serde_json::to_value(&body).expect("Serialization failed");
        assert_eq!(
            json,
            serde_json::json!({ "totalLikeCount": 12, "userLikeCount": 3 })
        );
    }

    #[test]
    fn test_views_response_is_camel_case() {
        let body = ViewsResponse { view_count: 42 };
        let json = serde_json::to_value(&body).expect("Serialization failed");
        assert_eq!(json, serde_json::json!({ "viewCount": 42 }));
    }

    #[test]
    fn test_invalid_count_maps_to_bad_request() {
        let err: ApiError = LikeServiceError::InvalidCount.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid count");
    }

    #[test]
    fn test_not_found_maps_with_slug_message() {
        let err: ApiError = ViewServiceError::NotFound("my-post".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Article with slug 'my-post' not found");
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err: ApiError =
            LikeServiceError::InternalError(anyhow::anyhow!("connection refused")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
