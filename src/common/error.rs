// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ValidationError(String),
    Unauthorized(String),
    NotFound(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    /// The OAuth provider or another outbound call failed
    UpstreamFailure(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::UpstreamFailure(msg) => write!(f, "Upstream Failure: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, message, code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, "BAD_REQUEST"),
            ApiError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, msg, None, "VALIDATION_ERROR")
            }
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "Unauthenticated".to_string(),
                Some(msg),
                "UNAUTHORIZED",
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg),
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    None,
                    "DATABASE_ERROR",
                )
            }
            ApiError::UpstreamFailure(msg) => {
                error!(error = %msg, "Upstream call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream service failure".to_string(),
                    None,
                    "UPSTREAM_FAILURE",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_body_shape() {
        let (status, body) = body_json(ApiError::Unauthorized("no credentials".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthenticated");
        assert_eq!(body["message"], "no credentials");
    }

    #[tokio::test]
    async fn test_not_found_body_shape() {
        let (status, body) = body_json(ApiError::NotFound("Recipe not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Recipe not found");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_detail() {
        let (status, body) =
            body_json(ApiError::UpstreamFailure("connection reset by peer".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Upstream service failure");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[test]
    fn test_validation_result_conversion() {
        let mut result = ValidationResult::new();
        result.add_error("title", "A recipe title is required");
        match ApiError::from(result) {
            ApiError::ValidationError(msg) => assert!(msg.starts_with("title:")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
