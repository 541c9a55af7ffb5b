//! Handlers for the approved-network store
//!
//! CRUD over network records plus the tag-by-ip upsert used by the
//! dashboard's one-click approval flow.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::handlers::AppState;
use crate::store::{NetworkRecord, StoreDocument, TagOutcome};

// =============================================================================
// GET /api/networks
// =============================================================================

/// Return the full store document (meta + items)
pub async fn list(State(state): State<AppState>) -> Json<StoreDocument<NetworkRecord>> {
    Json(state.networks.document())
}

// =============================================================================
// POST /api/networks
// =============================================================================

/// Body for network creation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateNetworkRequest {
    /// CIDR in `a.b.c.d` or `a.b.c.d/len` form
    #[serde(default)]
    pub cidr: String,

    /// Tags to attach
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateNetworkRequest>,
) -> Result<(StatusCode, Json<NetworkRecord>), ApiError> {
    let record = state.networks.create(&body.cidr, body.tags)?;
    Ok((StatusCode::CREATED, Json(record)))
}

// =============================================================================
// PUT /api/networks/:id
// =============================================================================

/// Body for network updates, absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateNetworkRequest {
    #[serde(default)]
    pub cidr: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateNetworkRequest>,
) -> Result<Json<NetworkRecord>, ApiError> {
    let record = state.networks.update(&id, body.cidr.as_deref(), body.tags)?;
    Ok(Json(record))
}

// =============================================================================
// DELETE /api/networks/:id
// =============================================================================

/// Delete a record, responding with the removed record
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NetworkRecord>, ApiError> {
    let record = state.networks.delete(&id)?;
    Ok(Json(record))
}

// =============================================================================
// POST /api/networks/tag-by-ip
// =============================================================================

/// Body for the tag-by-ip upsert
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TagByIpRequest {
    /// IPv4 address, stored as a `/32` record
    #[serde(default)]
    pub ip: String,

    /// Tags to merge into the record
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Upsert a `/32` record for an IP. Responds 201 when the record was
/// created and 200 when an existing record was updated.
pub async fn tag_by_ip(
    State(state): State<AppState>,
    Json(body): Json<TagByIpRequest>,
) -> Result<(StatusCode, Json<NetworkRecord>), ApiError> {
    let (record, outcome) = state.networks.tag_by_ip(&body.ip, body.tags)?;
    let status = match outcome {
        TagOutcome::Created => StatusCode::CREATED,
        TagOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(record)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{"cidr": "10.0.0.0/24", "tags": ["Zone:DMZ"]}"#;
        let body: CreateNetworkRequest = serde_json::from_str(json).unwrap();
        assert_eq!(body.cidr, "10.0.0.0/24");
        assert_eq!(body.tags, vec!["Zone:DMZ"]);

        // Missing fields fall back to empty
        let body: CreateNetworkRequest = serde_json::from_str("{}").unwrap();
        assert!(body.cidr.is_empty());
        assert!(body.tags.is_empty());
    }

    #[test]
    fn test_update_request_distinguishes_absent_fields() {
        let body: UpdateNetworkRequest = serde_json::from_str(r#"{"cidr": "10.0.0.0/8"}"#).unwrap();
        assert_eq!(body.cidr.as_deref(), Some("10.0.0.0/8"));
        assert!(body.tags.is_none());

        let body: UpdateNetworkRequest = serde_json::from_str(r#"{"tags": []}"#).unwrap();
        assert!(body.cidr.is_none());
        assert_eq!(body.tags, Some(vec![]));
    }

    #[test]
    fn test_tag_by_ip_request_deserialization() {
        let json = r#"{"ip": "10.0.0.17", "tags": ["Env:Production"]}"#;
        let body: TagByIpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(body.ip, "10.0.0.17");
        assert_eq!(body.tags, vec!["Env:Production"]);
    }
}
