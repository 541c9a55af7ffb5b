//! Fixed taxonomy of permitted classification tags.
//!
//! Served verbatim to UI selectors; values are conventions, not an
//! enforcement layer, so free-form tags on records stay legal.

use serde_json::{Map, Value};

/// Category names and their permitted values, in display order.
pub const TAG_CATEGORIES: &[(&str, &[&str])] = &[
    ("environment", &["Production", "Development", "QA", "DR"]),
    (
        "businessUnit",
        &["Finance", "HR", "Research", "Marketing", "IT", "Operations"],
    ),
    (
        "dataSensitivity",
        &["Public", "Internal", "Confidential", "PII"],
    ),
    (
        "application",
        &[
            "SAP-ERP",
            "CustomerPortal",
            "SharePoint",
            "ActiveDirectory",
            "CRM",
            "Custom-App",
        ],
    ),
    (
        "compliance",
        &["PCI-DSS", "SOX", "HIPAA", "GDPR", "ISO27001"],
    ),
    (
        "trustZone",
        &["Internal-Trust", "DMZ", "Untrusted-Internet", "Partner-Extranet"],
    ),
];

/// The taxonomy as one JSON object, category order preserved.
pub fn tag_taxonomy() -> Value {
    let mut map = Map::new();
    for (category, values) in TAG_CATEGORIES {
        map.insert(
            (*category).to_string(),
            Value::Array(values.iter().map(|v| Value::from(*v)).collect()),
        );
    }
    Value::Object(map)
}

/// Canonical `Category:Value` form used on stored records.
pub fn format_tag(category: &str, value: &str) -> String {
    format!("{category}:{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_preserves_category_order() {
        let taxonomy = tag_taxonomy();
        let keys: Vec<&String> = taxonomy.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "environment",
                "businessUnit",
                "dataSensitivity",
                "application",
                "compliance",
                "trustZone"
            ]
        );
    }

    #[test]
    fn test_taxonomy_values() {
        let taxonomy = tag_taxonomy();
        assert_eq!(
            taxonomy["environment"],
            serde_json::json!(["Production", "Development", "QA", "DR"])
        );
        assert_eq!(taxonomy["compliance"][0], "PCI-DSS");
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("trustZone", "DMZ"), "trustZone:DMZ");
    }
}
