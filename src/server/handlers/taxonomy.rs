//! Handler for the tag taxonomy

use axum::Json;
use serde_json::Value;

use crate::store::tag_taxonomy;

// =============================================================================
// GET /api/taxonomy
// =============================================================================

/// Return the fixed tag taxonomy, categories in declaration order
pub async fn show() -> Json<Value> {
    Json(tag_taxonomy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_returns_all_categories() {
        let Json(value) = show().await;
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 6);
        assert!(map.contains_key("environment"));
        assert!(map.contains_key("compliance"));
    }
}
