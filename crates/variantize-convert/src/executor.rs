//! The three-phase hierarchy executor.
//!
//! Phase 1 creates the root product model, phase 2 one sub-model per
//! level-1 group (two-level schemas only), phase 3 patches every
//! product under its parent. Phases run strictly in order; the root is
//! a hard dependency, so its failure ends the run before any other
//! write is attempted. Within phases 2 and 3 each write is independent:
//! a failure is logged and counted, and the run continues.
//!
//! Nothing is retried. Re-running after a partial success is the
//! recovery path; the catalog then rejects already-created codes, which
//! is surfaced like any other API error.

use chrono::{DateTime, Utc};

use variantize_core::group::{group_key, group_products};
use variantize_core::partition::{level_values, root_values, variant_values};
use variantize_core::{AxisValueTable, FamilyVariantSchema, ModelCodePlan, Product};
use variantize_pim::{PimClient, ProductModelPayload, ProductPatch};

use crate::log::ExecutionLog;

const ROOT_STEP: &str = "root";

/// Everything one conversion run needs, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub products: &'a [Product],
    pub schema: &'a FamilyVariantSchema,
    pub axis_values: &'a AxisValueTable,
    pub plan: &'a ModelCodePlan,
    pub family: &'a str,
    pub family_variant: &'a str,
}

/// Outcome of one conversion run.
#[derive(Debug)]
pub struct ExecutionReport {
    pub log: ExecutionLog,
    /// The root model code, set only once phase 1 succeeded. Doubles as
    /// the navigation target for "go to created model".
    pub created_root_code: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionReport {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.log.success_count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.log.error_count()
    }

    /// Whether every logged operation succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.log.error_count() == 0
    }
}

/// Drives one conversion run against the catalog.
pub struct HierarchyExecutor<'a> {
    client: &'a PimClient,
}

impl<'a> HierarchyExecutor<'a> {
    #[must_use]
    pub fn new(client: &'a PimClient) -> Self {
        Self { client }
    }

    /// Runs the full write sequence once and returns the report.
    ///
    /// Failures never propagate as errors from here — every outcome,
    /// including a root abort, is represented in the report's log.
    pub async fn execute(&self, request: &ConversionRequest<'_>) -> ExecutionReport {
        let started_at = Utc::now();
        let mut log = ExecutionLog::new();
        let mut created_root_code = None;

        if self.create_root(request, &mut log).await {
            created_root_code = Some(request.plan.root_code.clone());
            if !request.schema.is_one_level() {
                self.create_sub_models(request, &mut log).await;
            }
            self.patch_variants(request, &mut log).await;
        }

        let report = ExecutionReport {
            log,
            created_root_code,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            succeeded = report.success_count(),
            failed = report.error_count(),
            aborted = report.created_root_code.is_none(),
            "conversion run finished"
        );
        report
    }

    /// Phase 1. Returns `false` when the run must abort.
    async fn create_root(&self, request: &ConversionRequest<'_>, log: &mut ExecutionLog) -> bool {
        let root_code = &request.plan.root_code;
        log.add(
            ROOT_STEP,
            format!("Creating root product model \"{root_code}\""),
        );

        let Some(representative) = request.products.first() else {
            log.mark_error(ROOT_STEP, "no products in the conversion set");
            return false;
        };

        log.mark_running(ROOT_STEP);
        let payload = ProductModelPayload {
            code: root_code.clone(),
            family: request.family.to_owned(),
            family_variant: Some(request.family_variant.to_owned()),
            parent: None,
            categories: representative.categories.clone(),
            values: root_values(representative, request.schema),
        };

        match self.client.create_product_model(&payload).await {
            Ok(()) => {
                log.mark_success(ROOT_STEP, format!("Root model \"{root_code}\" created."));
                true
            }
            Err(err) => {
                tracing::error!(code = %root_code, error = %err, "root model creation failed; aborting run");
                log.mark_error(ROOT_STEP, err.to_string());
                false
            }
        }
    }

    /// Phase 2: one sub-model per level-1 group, best-effort.
    async fn create_sub_models(&self, request: &ConversionRequest<'_>, log: &mut ExecutionLog) {
        let level1_axes = &request.schema.level1().axes;
        for (key, members) in group_products(request.products, request.schema, request.axis_values)
        {
            let id = format!("sub_{key}");
            let Some(code) = request.plan.sub_code(&key) else {
                log.add(id.as_str(), format!("Creating sub-model (group: {key})"));
                log.mark_error(
                    &id,
                    format!("stale plan: no sub-model code configured for group \"{key}\""),
                );
                continue;
            };
            log.add(id.as_str(), format!("Creating sub-model \"{code}\" (group: {key})"));
            log.mark_running(&id);

            // The group representative supplies both the level-1 value
            // slice and the axis overrides shared by the whole group.
            let representative = members[0];
            let overrides = request
                .axis_values
                .overrides_for(representative.uuid, level1_axes);
            let payload = ProductModelPayload {
                code: code.to_owned(),
                family: request.family.to_owned(),
                family_variant: Some(request.family_variant.to_owned()),
                parent: Some(request.plan.root_code.clone()),
                categories: Vec::new(),
                values: level_values(representative, request.schema, 1, &overrides),
            };

            match self.client.create_product_model(&payload).await {
                Ok(()) => log.mark_success(&id, format!("Sub-model \"{code}\" created.")),
                Err(err) => {
                    tracing::warn!(code = %code, group = %key, error = %err, "sub-model creation failed; continuing");
                    log.mark_error(&id, err.to_string());
                }
            }
        }
    }

    /// Phase 3: patch every product, best-effort, regardless of phase-2
    /// outcomes — a missing parent surfaces as a catalog-side error on
    /// the patch itself.
    async fn patch_variants(&self, request: &ConversionRequest<'_>, log: &mut ExecutionLog) {
        let one_level = request.schema.is_one_level();
        let deepest_axes = &request.schema.deepest().axes;

        for product in request.products {
            let id = format!("patch_{}", product.uuid);
            let label = product.label();
            log.add(id.as_str(), format!("Patching product \"{label}\""));
            log.mark_running(&id);

            // Stale plan (a group key with no planned sub-model code) is
            // a session inconsistency, not a transport failure: fall
            // back to the root parent and flag it in the detail.
            let (parent, stale_group) = if one_level {
                (request.plan.root_code.clone(), None)
            } else {
                let key = group_key(product.uuid, request.schema, request.axis_values);
                match request.plan.sub_code(&key) {
                    Some(code) => (code.to_owned(), None),
                    None => (request.plan.root_code.clone(), Some(key)),
                }
            };
            if let Some(group) = &stale_group {
                tracing::warn!(product = %label, group = %group, "no sub-model code planned for group; attaching to root");
            }

            let overrides = request.axis_values.overrides_for(product.uuid, deepest_axes);
            let patch = ProductPatch {
                parent: parent.clone(),
                values: variant_values(product, request.schema, &overrides),
            };

            match self.client.patch_product(product.uuid, &patch).await {
                Ok(()) => {
                    let detail = match stale_group {
                        None => format!("Product \"{label}\" → parent \"{parent}\"."),
                        Some(group) => format!(
                            "Product \"{label}\" → parent \"{parent}\" \
                             (stale plan: no sub-model code for group \"{group}\")."
                        ),
                    };
                    log.mark_success(&id, detail);
                }
                Err(err) => {
                    tracing::warn!(product = %label, error = %err, "variant patch failed; continuing");
                    log.mark_error(&id, err.to_string());
                }
            }
        }
    }
}
