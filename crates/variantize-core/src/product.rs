//! Product and axis-value-table types.
//!
//! [`Product`] mirrors the catalog API's product shape closely enough to
//! deserialize straight off the wire; `values` uses a `BTreeMap` so that
//! every derived computation iterates attributes in a stable order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One localized/scoped value of a product attribute.
///
/// `data` is kept as raw JSON: the engine never interprets attribute
/// payloads beyond coercing the first cell to a string when seeding the
/// axis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCell {
    pub locale: Option<String>,
    pub scope: Option<String>,
    pub data: serde_json::Value,
}

impl ValueCell {
    /// A synthetic cell carrying a user-edited axis value: no locale, no
    /// scope, string data.
    #[must_use]
    pub fn overriding(value: &str) -> Self {
        Self {
            locale: None,
            scope: None,
            data: serde_json::Value::String(value.to_owned()),
        }
    }
}

/// A simple catalog product selected for conversion.
///
/// Candidates must share one family and have no parent; both conditions
/// are enforced by [`crate::validation`] before any write is attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub uuid: Uuid,
    #[serde(default)]
    pub identifier: Option<String>,
    pub family: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub values: BTreeMap<String, Vec<ValueCell>>,
}

impl Product {
    /// Display label: the identifier when present, otherwise the first
    /// eight hex characters of the uuid.
    #[must_use]
    pub fn label(&self) -> String {
        self.identifier
            .clone()
            .unwrap_or_else(|| self.uuid.simple().to_string()[..8].to_owned())
    }
}

/// Coerces a product's first value cell for `attribute` to a string.
///
/// Scalars stringify directly, structured data is JSON-serialized, and a
/// missing attribute, empty cell list, or null data all yield `""`.
#[must_use]
pub fn first_scalar_value(values: &BTreeMap<String, Vec<ValueCell>>, attribute: &str) -> String {
    let Some(cell) = values.get(attribute).and_then(|cells| cells.first()) else {
        return String::new();
    };
    match &cell.data {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// User-editable mapping `product uuid -> (axis code -> string value)`.
///
/// Seeded from each product's stored values and then mutated by edits;
/// the edited value wins over the product's natural value when building
/// write payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisValueTable {
    entries: BTreeMap<Uuid, BTreeMap<String, String>>,
}

impl AxisValueTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value for `(product, axis)`, if any.
    #[must_use]
    pub fn get(&self, product: Uuid, axis: &str) -> Option<&str> {
        self.entries
            .get(&product)
            .and_then(|row| row.get(axis))
            .map(String::as_str)
    }

    /// Like [`AxisValueTable::get`] but missing entries read as `""`,
    /// matching how group keys treat absent cells.
    #[must_use]
    pub fn value_or_empty(&self, product: Uuid, axis: &str) -> &str {
        self.get(product, axis).unwrap_or("")
    }

    pub fn set(&mut self, product: Uuid, axis: &str, value: impl Into<String>) {
        self.entries
            .entry(product)
            .or_default()
            .insert(axis.to_owned(), value.into());
    }

    /// Fills in every `(product, axis)` cell that has no value yet from
    /// the product's first stored cell for that axis. Existing entries
    /// (user edits) are never overwritten.
    pub fn seed_missing(&mut self, products: &[Product], axes: &[String]) {
        for product in products {
            for axis in axes {
                let row = self.entries.entry(product.uuid).or_default();
                if !row.contains_key(axis) {
                    row.insert(axis.clone(), first_scalar_value(&product.values, axis));
                }
            }
        }
    }

    /// The override map for one product restricted to the given axes, as
    /// consumed by the partition functions. Missing cells contribute an
    /// empty string, so an edited-to-empty and a never-set axis write the
    /// same payload.
    #[must_use]
    pub fn overrides_for(&self, product: Uuid, axes: &[String]) -> BTreeMap<String, String> {
        axes.iter()
            .map(|axis| (axis.clone(), self.value_or_empty(product, axis).to_owned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn product_with_values(values: &[(&str, serde_json::Value)]) -> Product {
        Product {
            uuid: uuid(1),
            identifier: Some("sku-1".to_owned()),
            family: "shirts".to_owned(),
            parent: None,
            categories: vec![],
            values: values
                .iter()
                .map(|(code, data)| {
                    (
                        (*code).to_owned(),
                        vec![ValueCell {
                            locale: None,
                            scope: None,
                            data: data.clone(),
                        }],
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn label_prefers_identifier() {
        let product = product_with_values(&[]);
        assert_eq!(product.label(), "sku-1");
    }

    #[test]
    fn label_falls_back_to_uuid_prefix() {
        let mut product = product_with_values(&[]);
        product.identifier = None;
        assert_eq!(product.label().len(), 8);
    }

    #[test]
    fn first_scalar_value_string() {
        let product = product_with_values(&[("color", serde_json::json!("red"))]);
        assert_eq!(first_scalar_value(&product.values, "color"), "red");
    }

    #[test]
    fn first_scalar_value_number_and_bool() {
        let product = product_with_values(&[
            ("size", serde_json::json!(42)),
            ("active", serde_json::json!(true)),
        ]);
        assert_eq!(first_scalar_value(&product.values, "size"), "42");
        assert_eq!(first_scalar_value(&product.values, "active"), "true");
    }

    #[test]
    fn first_scalar_value_serializes_structured_data() {
        let product =
            product_with_values(&[("weight", serde_json::json!({"amount": 5, "unit": "KILOGRAM"}))]);
        assert_eq!(
            first_scalar_value(&product.values, "weight"),
            r#"{"amount":5,"unit":"KILOGRAM"}"#
        );
    }

    #[test]
    fn first_scalar_value_missing_attribute_is_empty() {
        let product = product_with_values(&[]);
        assert_eq!(first_scalar_value(&product.values, "color"), "");
    }

    #[test]
    fn first_scalar_value_null_data_is_empty() {
        let product = product_with_values(&[("color", serde_json::Value::Null)]);
        assert_eq!(first_scalar_value(&product.values, "color"), "");
    }

    #[test]
    fn seed_missing_fills_only_absent_cells() {
        let product = product_with_values(&[("color", serde_json::json!("red"))]);
        let mut table = AxisValueTable::new();
        table.set(product.uuid, "color", "crimson");
        table.seed_missing(
            std::slice::from_ref(&product),
            &["color".to_owned(), "size".to_owned()],
        );

        assert_eq!(table.get(product.uuid, "color"), Some("crimson"));
        assert_eq!(table.get(product.uuid, "size"), Some(""));
    }

    #[test]
    fn overrides_for_defaults_missing_axes_to_empty() {
        let table = AxisValueTable::new();
        let overrides = table.overrides_for(uuid(9), &["color".to_owned()]);
        assert_eq!(overrides.get("color").map(String::as_str), Some(""));
    }

    #[test]
    fn overriding_cell_has_no_locale_or_scope() {
        let cell = ValueCell::overriding("blue");
        assert_eq!(cell.locale, None);
        assert_eq!(cell.scope, None);
        assert_eq!(cell.data, serde_json::json!("blue"));
    }
}
