//! Session preparation: everything between reading the selection file
//! and handing a validated [`ConversionRequest`] to the executor.
//!
//! Mirrors the wizard's gating: products are fetched and checked for
//! family homogeneity and absent parents, the chosen family variant is
//! normalized into a schema, the axis table is seeded and overridden,
//! and the axis/uniqueness checks must pass before a plan is accepted.

use anyhow::{anyhow, bail, Context};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use variantize_core::group::{group_products, suggest_root_code};
use variantize_core::validation::{
    check_axis_completeness, check_no_existing_parent, check_same_family,
    check_unique_combinations, Violation,
};
use variantize_core::{
    AppConfig, AxisValueTable, FamilyVariantSchema, ModelCodePlan, Product,
};
use variantize_pim::PimClient;

use crate::selection::Selection;

/// A fully validated conversion session, ready to preview or execute.
#[derive(Debug)]
pub struct Session {
    pub family: String,
    pub family_variant_code: String,
    pub products: Vec<Product>,
    pub schema: FamilyVariantSchema,
    pub axis_values: AxisValueTable,
    pub plan: ModelCodePlan,
}

/// Builds a session from a selection, failing on the first gate that
/// does not pass.
///
/// # Errors
///
/// Fails when products cannot be fetched, when any validation check
/// reports violations, when the named family variant does not exist or
/// is not convertible, or when the model-code plan is invalid.
pub async fn prepare(
    client: &PimClient,
    config: &AppConfig,
    selection: &Selection,
) -> anyhow::Result<Session> {
    let products = fetch_products(client, &selection.products, config.max_concurrent_fetches)
        .await?;

    let mut violations = check_same_family(&products);
    violations.extend(check_no_existing_parent(&products));
    bail_on_violations("selection", &violations)?;

    // check_same_family guarantees a homogeneous, non-empty set here.
    let family = products[0].family.clone();

    let variants = client
        .list_family_variants(&family)
        .await
        .with_context(|| format!("failed to list family variants for '{family}'"))?;
    if variants.is_empty() {
        bail!(
            "no family variants found for family '{family}'; \
             create a family variant in the catalog before converting products"
        );
    }
    let descriptor = variants
        .iter()
        .find(|v| v.code == selection.family_variant)
        .ok_or_else(|| {
            anyhow!(
                "family variant '{}' not found for family '{family}'; available: {}",
                selection.family_variant,
                variants
                    .iter()
                    .map(|v| v.code.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
    let schema = FamilyVariantSchema::from_sets(&descriptor.variant_attribute_sets)
        .with_context(|| format!("family variant '{}' is not convertible", descriptor.code))?;

    let mut axis_values = AxisValueTable::new();
    axis_values.seed_missing(&products, &schema.all_axes());
    for (uuid, row) in &selection.axis_values {
        for (axis, value) in row {
            axis_values.set(*uuid, axis, value.clone());
        }
    }

    let mut violations = check_axis_completeness(&products, &axis_values, &schema);
    violations.extend(check_unique_combinations(&products, &axis_values, &schema));
    bail_on_violations("axis values", &violations)?;

    let root_code = selection
        .root_code
        .clone()
        .unwrap_or_else(|| suggest_root_code(&family));
    let mut plan = ModelCodePlan::new(root_code);
    plan.sub_codes = selection.sub_codes.clone();

    let group_keys: Vec<String> = group_products(&products, &schema, &axis_values)
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    if !schema.is_one_level() {
        plan.suggest_missing_sub_codes(group_keys.iter().map(String::as_str));
    }
    plan.validate(group_keys.iter().map(String::as_str), schema.is_one_level())?;

    Ok(Session {
        family,
        family_variant_code: descriptor.code.clone(),
        products,
        schema,
        axis_values,
        plan,
    })
}

/// Fetches the selected products concurrently, preserving selection
/// order in the result.
async fn fetch_products(
    client: &PimClient,
    uuids: &[Uuid],
    max_concurrent: usize,
) -> anyhow::Result<Vec<Product>> {
    tracing::info!(count = uuids.len(), "fetching selected products");

    let results: Vec<(usize, Result<Product, variantize_pim::PimError>)> =
        stream::iter(uuids.iter().enumerate())
            .map(|(index, uuid)| async move { (index, client.get_product(*uuid).await) })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

    let mut fetched: Vec<(usize, Product)> = Vec::with_capacity(results.len());
    for (index, result) in results {
        let product = result.with_context(|| {
            format!(
                "failed to fetch product {}",
                uuids.get(index).copied().unwrap_or_default()
            )
        })?;
        fetched.push((index, product));
    }
    fetched.sort_by_key(|(index, _)| *index);

    Ok(fetched.into_iter().map(|(_, product)| product).collect())
}

fn bail_on_violations(stage: &str, violations: &[Violation]) -> anyhow::Result<()> {
    if violations.is_empty() {
        return Ok(());
    }
    let listing = violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("{stage} validation failed:\n{listing}");
}
