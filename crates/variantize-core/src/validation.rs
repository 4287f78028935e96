//! Pre-flight validation of a conversion candidate set.
//!
//! Every check returns violations as plain data — an empty list is a
//! pass. Nothing here fails or panics: validation gates progression and
//! is always recoverable by editing inputs. Checks are deterministic for
//! the same input; duplicate enumeration follows first-seen product
//! order.

use std::collections::HashMap;
use std::fmt;

use crate::group::{axis_key, group_key};
use crate::product::{AxisValueTable, Product};
use crate::schema::FamilyVariantSchema;

/// One human-readable validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The candidate set is empty.
    EmptySelection,
    /// Not every product belongs to the first product's family.
    MixedFamilies { family: String, mismatched: usize },
    /// A product already sits in a hierarchy.
    ExistingParent { product: String, parent: String },
    /// A `(product, axis)` cell is missing or empty in the axis table.
    MissingAxisValue { product: String, axis: String },
    /// Full axis-value tuples repeated across the candidate set.
    DuplicateCombinations { keys: Vec<String> },
    /// Level-2 tuples repeated inside one level-1 group.
    DuplicateInGroup { group: String, keys: Vec<String> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptySelection => write!(f, "no products selected"),
            Violation::MixedFamilies { family, mismatched } => write!(
                f,
                "all selected products must belong to the family '{family}'; \
                 found {mismatched} product(s) with a different family"
            ),
            Violation::ExistingParent { product, parent } => {
                write!(f, "product {product} already has a parent ({parent})")
            }
            Violation::MissingAxisValue { product, axis } => {
                write!(f, "product {product} is missing a value for axis '{axis}'")
            }
            Violation::DuplicateCombinations { keys } => write!(
                f,
                "duplicate axis value combinations: {}",
                keys.join(", ")
            ),
            Violation::DuplicateInGroup { group, keys } => write!(
                f,
                "duplicate level-2 axis values within group '{group}': {}",
                keys.join(", ")
            ),
        }
    }
}

/// All products must share the first product's family. An empty set is
/// reported as its own violation.
#[must_use]
pub fn check_same_family(products: &[Product]) -> Vec<Violation> {
    let Some(first) = products.first() else {
        return vec![Violation::EmptySelection];
    };
    let mismatched = products.iter().filter(|p| p.family != first.family).count();
    if mismatched > 0 {
        vec![Violation::MixedFamilies {
            family: first.family.clone(),
            mismatched,
        }]
    } else {
        Vec::new()
    }
}

/// Only simple products convert; one violation per product that already
/// has a parent.
#[must_use]
pub fn check_no_existing_parent(products: &[Product]) -> Vec<Violation> {
    products
        .iter()
        .filter_map(|p| {
            p.parent.as_ref().map(|parent| Violation::ExistingParent {
                product: p.label(),
                parent: parent.clone(),
            })
        })
        .collect()
}

/// Every `(product, axis)` pair across all levels' axes must hold a
/// non-empty value in the table.
#[must_use]
pub fn check_axis_completeness(
    products: &[Product],
    table: &AxisValueTable,
    schema: &FamilyVariantSchema,
) -> Vec<Violation> {
    let axes = schema.all_axes();
    let mut violations = Vec::new();
    for product in products {
        for axis in &axes {
            if table.value_or_empty(product.uuid, axis).is_empty() {
                violations.push(Violation::MissingAxisValue {
                    product: product.label(),
                    axis: axis.clone(),
                });
            }
        }
    }
    violations
}

/// Axis-value combinations must be unique at every level.
///
/// The full tuple (level-1 ⧺ level-2 axis values, fixed order) must be
/// distinct across all products; keys whose every segment is empty are
/// skipped here — completeness reports those. For two-level schemas the
/// level-2 tuple must additionally be distinct among the members of each
/// level-1 group.
#[must_use]
pub fn check_unique_combinations(
    products: &[Product],
    table: &AxisValueTable,
    schema: &FamilyVariantSchema,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let all_axes = schema.all_axes();
    let full_keys: Vec<String> = products
        .iter()
        .map(|p| axis_key(p.uuid, &all_axes, table))
        .collect();
    let duplicated = duplicated_keys(&full_keys);
    if !duplicated.is_empty() {
        violations.push(Violation::DuplicateCombinations { keys: duplicated });
    }

    if !schema.is_one_level() {
        let level2_axes = &schema.deepest().axes;
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for product in products {
            let key = group_key(product.uuid, schema, table);
            let level2_key = axis_key(product.uuid, level2_axes, table);
            match index.get(&key) {
                Some(&i) => groups[i].1.push(level2_key),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![level2_key]));
                }
            }
        }
        for (group, keys) in groups {
            let duplicated = duplicated_keys(&keys);
            if !duplicated.is_empty() {
                violations.push(Violation::DuplicateInGroup {
                    group,
                    keys: duplicated,
                });
            }
        }
    }

    violations
}

/// The union of all checks, in display order. The session may advance
/// only when this is empty.
#[must_use]
pub fn check_all(
    products: &[Product],
    table: &AxisValueTable,
    schema: &FamilyVariantSchema,
) -> Vec<Violation> {
    let mut violations = check_same_family(products);
    violations.extend(check_no_existing_parent(products));
    violations.extend(check_axis_completeness(products, table, schema));
    violations.extend(check_unique_combinations(products, table, schema));
    violations
}

/// Keys appearing more than once, each reported once, in first-seen
/// order. Keys with only empty segments are excluded.
fn duplicated_keys(keys: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }

    let mut reported: Vec<String> = Vec::new();
    for key in keys {
        if is_all_empty(key) {
            continue;
        }
        if counts.get(key.as_str()).copied().unwrap_or(0) > 1 && !reported.iter().any(|k| k == key)
        {
            reported.push(key.clone());
        }
    }
    reported
}

fn is_all_empty(key: &str) -> bool {
    key.split(crate::group::KEY_DELIMITER).all(str::is_empty)
}
