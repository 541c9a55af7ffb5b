//! REST API error responses
//!
//! Every handler failure converges on [`ApiError`], which maps the named
//! error kinds onto status codes and a JSON `{"error": ...}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::lens::topology::UpstreamError;
use crate::store::StoreError;

/// Error type for REST handlers
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Request was malformed or missing required fields
    BadRequest(String),
    /// Store operation failed
    Store(StoreError),
    /// Upstream topology service call failed
    Upstream(UpstreamError),
    /// Server-side failure outside the store and upstream paths
    Internal(String),
}

impl ApiError {
    /// Status code this error responds with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Persist(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Store(err) => json!({ "error": err.to_string() }),
            ApiError::Upstream(err) => json!({
                "error": "Failed to query upstream topology service",
                "details": err.details,
            }),
            ApiError::Internal(message) => json!({ "error": message }),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::Upstream(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(message) => write!(f, "{}", message),
            ApiError::Store(err) => write!(f, "{}", err),
            ApiError::Upstream(err) => write!(f, "{}", err),
            ApiError::Internal(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(StoreError::InvalidInput("cidr is required".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(StoreError::NotFound("an_missing".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(StoreError::Persist("disk full".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(UpstreamError::bad_status(401, "unauthorized"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::BadRequest("src/dst are required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::Internal("task failed".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_body_carries_details() {
        let err = ApiError::from(UpstreamError::bad_status(503, "maintenance window"));
        let body = err.body();
        assert_eq!(body["details"], "maintenance window");
        assert_eq!(body["error"], "Failed to query upstream topology service");
    }

    #[test]
    fn test_store_body_uses_error_display() {
        let err = ApiError::from(StoreError::NotFound("an_x".to_string()));
        assert_eq!(err.body()["error"], "record not found: an_x");
    }
}
