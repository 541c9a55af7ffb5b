//! Handlers for the network-mapping store
//!
//! CRUD over CIDR-to-application mappings. Same contract as the network
//! handlers, with `applications` in place of `tags` and no upsert.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::handlers::AppState;
use crate::store::{MappingRecord, StoreDocument};

// =============================================================================
// GET /api/mappings
// =============================================================================

pub async fn list(State(state): State<AppState>) -> Json<StoreDocument<MappingRecord>> {
    Json(state.mappings.document())
}

// =============================================================================
// POST /api/mappings
// =============================================================================

/// Body for mapping creation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateMappingRequest {
    #[serde(default)]
    pub cidr: String,

    /// Application names served from this network
    #[serde(default)]
    pub applications: Vec<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMappingRequest>,
) -> Result<(StatusCode, Json<MappingRecord>), ApiError> {
    let record = state.mappings.create(&body.cidr, body.applications)?;
    Ok((StatusCode::CREATED, Json(record)))
}

// =============================================================================
// PUT /api/mappings/:id
// =============================================================================

/// Body for mapping updates, absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateMappingRequest {
    #[serde(default)]
    pub cidr: Option<String>,

    #[serde(default)]
    pub applications: Option<Vec<String>>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMappingRequest>,
) -> Result<Json<MappingRecord>, ApiError> {
    let record = state
        .mappings
        .update(&id, body.cidr.as_deref(), body.applications)?;
    Ok(Json(record))
}

// =============================================================================
// DELETE /api/mappings/:id
// =============================================================================

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MappingRecord>, ApiError> {
    let record = state.mappings.delete(&id)?;
    Ok(Json(record))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{"cidr": "172.16.0.0/12", "applications": ["billing", "crm"]}"#;
        let body: CreateMappingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(body.cidr, "172.16.0.0/12");
        assert_eq!(body.applications, vec!["billing", "crm"]);
    }

    #[test]
    fn test_update_request_distinguishes_absent_fields() {
        let body: UpdateMappingRequest =
            serde_json::from_str(r#"{"applications": ["billing"]}"#).unwrap();
        assert!(body.cidr.is_none());
        assert_eq!(body.applications, Some(vec!["billing".to_string()]));
    }
}
