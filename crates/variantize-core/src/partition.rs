//! Partitioning of a product's values across hierarchy levels.
//!
//! Each function returns the slice of `values` written to one entity of
//! the hierarchy: the root model, a sub-model, or the leaf variant.
//! Slices are disjoint by construction and their union is the product's
//! full value set minus schema attributes the product has no value for —
//! absent attributes are simply absent from the slice, never emitted as
//! null placeholders.

use std::collections::BTreeMap;

use crate::product::{Product, ValueCell};
use crate::schema::FamilyVariantSchema;

/// An attribute-code → cells slice of a product's values.
pub type ValueSlice = BTreeMap<String, Vec<ValueCell>>;

/// Values for the root product model: every attribute owned by no level.
///
/// Axis edits never apply here — axes always belong to a level.
#[must_use]
pub fn root_values(product: &Product, schema: &FamilyVariantSchema) -> ValueSlice {
    product
        .values
        .iter()
        .filter(|(code, _)| !schema.is_variant_attribute(code))
        .map(|(code, cells)| (code.clone(), cells.clone()))
        .collect()
}

/// Values owned by the level at `depth`, with axis overrides applied.
///
/// For each axis of the level present in `axis_overrides`, the product's
/// natural cells are replaced by a single synthetic cell so the edited
/// axis table wins over the stored value. An unknown `depth` yields an
/// empty slice.
#[must_use]
pub fn level_values(
    product: &Product,
    schema: &FamilyVariantSchema,
    depth: u8,
    axis_overrides: &BTreeMap<String, String>,
) -> ValueSlice {
    let Some(level) = schema.level(depth) else {
        return ValueSlice::new();
    };

    let mut slice: ValueSlice = product
        .values
        .iter()
        .filter(|(code, _)| level.owns(code))
        .map(|(code, cells)| (code.clone(), cells.clone()))
        .collect();

    for axis in &level.axes {
        if let Some(value) = axis_overrides.get(axis) {
            slice.insert(axis.clone(), vec![ValueCell::overriding(value)]);
        }
    }

    slice
}

/// Values patched onto the leaf variant: the deepest level's slice
/// (level 2 when present, else level 1).
#[must_use]
pub fn variant_values(
    product: &Product,
    schema: &FamilyVariantSchema,
    axis_overrides: &BTreeMap<String, String>,
) -> ValueSlice {
    level_values(product, schema, schema.deepest().depth, axis_overrides)
}
