//! Group-key derivation and code suggestions.
//!
//! The group key buckets products under a shared sub-model: the ordered
//! level-1 axis values joined with `|`. It is recomputed wherever needed
//! (validation, planning, execution) and must therefore be a pure
//! function of its inputs.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::product::{AxisValueTable, Product};
use crate::schema::FamilyVariantSchema;

/// Separator between axis values in a key. Not expected to appear in
/// attribute values; a value containing it can collide two distinct
/// tuples, which the catalog-side code uniqueness check backstops.
pub const KEY_DELIMITER: &str = "|";

/// Joins the table values of `axes` for one product, in the given axis
/// order. Missing cells contribute an empty segment.
#[must_use]
pub fn axis_key(product: Uuid, axes: &[String], table: &AxisValueTable) -> String {
    axes.iter()
        .map(|axis| table.value_or_empty(product, axis))
        .collect::<Vec<_>>()
        .join(KEY_DELIMITER)
}

/// The level-1 group key for a product: identical level-1 axis values
/// always produce an identical key.
#[must_use]
pub fn group_key(product: Uuid, schema: &FamilyVariantSchema, table: &AxisValueTable) -> String {
    axis_key(product, &schema.level1().axes, table)
}

/// Buckets products by group key, preserving first-seen order of both
/// groups and members.
#[must_use]
pub fn group_products<'a>(
    products: &'a [Product],
    schema: &FamilyVariantSchema,
    table: &AxisValueTable,
) -> Vec<(String, Vec<&'a Product>)> {
    let mut groups: Vec<(String, Vec<&'a Product>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for product in products {
        let key = group_key(product.uuid, schema, table);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(product),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![product]));
            }
        }
    }

    groups
}

/// Suggested sub-model code: the group key sanitized to the catalog's
/// code alphabet and appended to the root code.
///
/// This is only a suggestion — the plan stores the final code, and two
/// distinct keys may sanitize to the same text. Uniqueness of the stored
/// codes is enforced by the catalog, not here.
#[must_use]
pub fn suggest_sub_model_code(root_code: &str, group_key: &str) -> String {
    let sanitized: String = group_key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{root_code}__{sanitized}")
}

/// Suggested root model code: the family code plus the current unix
/// timestamp, unique enough for a fresh conversion run.
#[must_use]
pub fn suggest_root_code(family: &str) -> String {
    format!("{family}_{}", Utc::now().timestamp())
}
