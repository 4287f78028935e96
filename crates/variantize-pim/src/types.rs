//! Wire types for the PIM catalog REST API.
//!
//! Read types (`Deserialize`) model catalog responses; write payloads
//! (`Serialize`) model the bodies of the product-model create and
//! product patch calls. Products themselves deserialize directly into
//! [`variantize_core::Product`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use variantize_core::partition::ValueSlice;
use variantize_core::VariantAttributeSet;

/// Envelope for list endpoints: `{ "items": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// A family-variant descriptor as returned by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyVariant {
    pub code: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub variant_attribute_sets: Vec<VariantAttributeSet>,
}

/// Attribute metadata, used only to render human labels and pick
/// select-type editors.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeMeta {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl AttributeMeta {
    /// Whether values of this attribute come from a fixed option list.
    #[must_use]
    pub fn is_select(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "pim_catalog_simpleselect" | "pim_catalog_multiselect"
        )
    }
}

/// One option of a select attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeOption {
    pub code: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Body of a product-model create call (root or sub-model).
#[derive(Debug, Clone, Serialize)]
pub struct ProductModelPayload {
    pub code: String,
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub values: ValueSlice,
}

/// Body of a product patch call: re-parent and set variant-level values.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPatch {
    pub parent: String,
    pub values: ValueSlice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_variant_deserializes_descriptor() {
        let body = serde_json::json!({
            "code": "shirts_by_size_color",
            "labels": { "en_US": "By size and color" },
            "variant_attribute_sets": [
                { "level": 1, "axes": ["size"], "attributes": ["size"] },
                { "level": 2, "axes": ["color"], "attributes": ["color", "ean"] }
            ]
        });
        let variant: FamilyVariant =
            serde_json::from_value(body).expect("descriptor should deserialize");
        assert_eq!(variant.code, "shirts_by_size_color");
        assert_eq!(variant.variant_attribute_sets.len(), 2);
        assert_eq!(variant.variant_attribute_sets[1].axes, vec!["color"]);
    }

    #[test]
    fn list_response_defaults_missing_items() {
        let parsed: ListResponse<FamilyVariant> =
            serde_json::from_value(serde_json::json!({})).expect("empty list should parse");
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn attribute_meta_select_kinds() {
        let select: AttributeMeta = serde_json::from_value(serde_json::json!({
            "code": "color",
            "type": "pim_catalog_simpleselect"
        }))
        .expect("attribute should deserialize");
        assert!(select.is_select());

        let text: AttributeMeta = serde_json::from_value(serde_json::json!({
            "code": "name",
            "type": "pim_catalog_text"
        }))
        .expect("attribute should deserialize");
        assert!(!text.is_select());
    }

    #[test]
    fn model_payload_skips_empty_optionals() {
        let payload = ProductModelPayload {
            code: "root_1".to_owned(),
            family: "shirts".to_owned(),
            family_variant: None,
            parent: None,
            categories: vec![],
            values: ValueSlice::new(),
        };
        let json = serde_json::to_value(&payload).expect("payload should serialize");
        assert!(json.get("family_variant").is_none());
        assert!(json.get("parent").is_none());
        assert!(json.get("categories").is_none());
    }
}
