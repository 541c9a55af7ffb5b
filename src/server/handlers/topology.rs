//! Handlers for upstream topology queries
//!
//! These proxy the upstream path API through the lens. The upstream
//! client is blocking, so every call runs on the blocking pool.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lens::topology::{CorrelationReport, PathQuery};
use crate::server::error::ApiError;
use crate::server::handlers::AppState;

// =============================================================================
// POST /api/topology/path
// =============================================================================

/// Fetch the raw upstream path document for a query
pub async fn path(
    State(state): State<AppState>,
    Json(query): Json<PathQuery>,
) -> Result<Json<Value>, ApiError> {
    let lens = state.lens.clone();
    let document = tokio::task::spawn_blocking(move || lens.fetch_path(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("Topology task failed: {}", e)))??;
    Ok(Json(document))
}

// =============================================================================
// POST /api/topology/path-with-devices
// =============================================================================

/// Fetch a path document and correlate its devices against the
/// approved-network store
pub async fn path_with_devices(
    State(state): State<AppState>,
    Json(query): Json<PathQuery>,
) -> Result<Json<CorrelationReport>, ApiError> {
    let lens = state.lens.clone();
    let report = tokio::task::spawn_blocking(move || lens.fetch_path_with_devices(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("Topology task failed: {}", e)))??;
    Ok(Json(report))
}

// =============================================================================
// GET /api/topology/path-image
// =============================================================================

/// Query parameters for the path image endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathImageParams {
    /// Source address, `source` accepted as an alias
    #[serde(default, alias = "source")]
    pub src: Option<String>,

    /// Destination address, `destination` accepted as an alias
    #[serde(default, alias = "destination")]
    pub dst: Option<String>,

    /// Service filter, blank or absent falls back to "any"
    #[serde(default)]
    pub service: Option<String>,
}

/// Fetch the rendered path image and pass the PNG bytes through
pub async fn path_image(
    State(state): State<AppState>,
    Query(params): Query<PathImageParams>,
) -> Result<Response, ApiError> {
    let src = params.src.as_deref().map(str::trim).unwrap_or("");
    let dst = params.dst.as_deref().map(str::trim).unwrap_or("");
    if src.is_empty() || dst.is_empty() {
        return Err(ApiError::BadRequest(
            "src/dst (or source/destination) are required".to_string(),
        ));
    }

    let mut query = PathQuery::new(src, dst);
    if let Some(service) = params
        .service
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        query = query.with_service(service);
    }

    let lens = state.lens.clone();
    let bytes = tokio::task::spawn_blocking(move || lens.fetch_path_image(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("Topology task failed: {}", e)))??;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_query_body_deserialization() {
        let json = r#"{"source": "10.0.0.1", "destination": "172.16.0.9"}"#;
        let query: PathQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.source, "10.0.0.1");
        assert_eq!(query.destination, "172.16.0.9");
        assert!(query.service.is_none());

        let json = r#"{"source": "a", "destination": "b", "service": "tcp:443"}"#;
        let query: PathQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.service.as_deref(), Some("tcp:443"));
    }

    #[test]
    fn test_image_params_accept_aliases() {
        let params: PathImageParams =
            serde_json::from_str(r#"{"source": "10.0.0.1", "destination": "10.0.0.2"}"#).unwrap();
        assert_eq!(params.src.as_deref(), Some("10.0.0.1"));
        assert_eq!(params.dst.as_deref(), Some("10.0.0.2"));

        let params: PathImageParams =
            serde_json::from_str(r#"{"src": "a", "dst": "b", "service": "any"}"#).unwrap();
        assert_eq!(params.src.as_deref(), Some("a"));
        assert_eq!(params.service.as_deref(), Some("any"));
    }
}
