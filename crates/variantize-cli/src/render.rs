//! Plain-text rendering of the planned hierarchy and the run log.

use variantize_convert::{ExecutionReport, StepStatus};
use variantize_core::group::group_products;
use variantize_core::Product;
use variantize_pim::FamilyVariant;

use crate::labels::AxisLabels;
use crate::session::Session;

/// Prints the family-variant descriptors available for a family.
pub fn print_family_variants(family: &str, variants: &[FamilyVariant]) {
    println!("Family variants for '{family}':");
    for variant in variants {
        match variant.labels.get("en_US") {
            Some(label) => println!("  {} — {label}", variant.code),
            None => println!("  {}", variant.code),
        }
        for set in &variant.variant_attribute_sets {
            println!(
                "    level {}: axes = [{}], attributes = [{}]",
                set.level,
                set.axes.join(", "),
                set.attributes.join(", ")
            );
        }
        if variant.variant_attribute_sets.len() == 1 {
            println!("    1-level variant: root model -> variant products");
        } else {
            println!("    2-level variant: root model -> sub-models -> variant products");
        }
    }
}

/// Prints the hierarchy a run would create, annotated with axis values.
pub fn print_preview(session: &Session, labels: &AxisLabels) {
    println!("Root model: {}", session.plan.root_code);

    if session.schema.is_one_level() {
        for product in &session.products {
            println!(
                "  └─ {} ({})",
                product.label(),
                axis_summary(session, labels, product, &session.schema.all_axes())
            );
        }
        println!();
        println!("Planned operations:");
        println!("  1. create root product model \"{}\"", session.plan.root_code);
        println!(
            "  2. patch {} product(s) to set parent = \"{}\"",
            session.products.len(),
            session.plan.root_code
        );
        return;
    }

    let groups = group_products(&session.products, &session.schema, &session.axis_values);
    let level1_axes = session.schema.level1().axes.clone();
    let level2_axes = session.schema.deepest().axes.clone();
    for (key, members) in &groups {
        let sub_code = session.plan.sub_code(key).unwrap_or(key);
        let representative = members[0];
        println!(
            "  └─ Sub-model: {sub_code} ({})",
            axis_summary(session, labels, representative, &level1_axes)
        );
        for product in members {
            println!(
                "      └─ {} ({})",
                product.label(),
                axis_summary(session, labels, product, &level2_axes)
            );
        }
    }
    println!();
    println!("Planned operations:");
    println!("  1. create root product model \"{}\"", session.plan.root_code);
    println!("  2. create {} sub-product-model(s)", groups.len());
    println!(
        "  3. patch {} product(s) to set their parent",
        session.products.len()
    );
}

fn axis_summary(
    session: &Session,
    labels: &AxisLabels,
    product: &Product,
    axes: &[String],
) -> String {
    axes.iter()
        .map(|axis| {
            let value = session.axis_values.value_or_empty(product.uuid, axis);
            let rendered = if value.is_empty() {
                "—"
            } else {
                labels.option_label(axis, value)
            };
            format!("{}={rendered}", labels.axis_label(axis))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints the run log and the final tally.
pub fn print_report(report: &ExecutionReport) {
    for entry in report.log.entries() {
        let marker = match entry.status {
            StepStatus::Pending => "○",
            StepStatus::Running => "…",
            StepStatus::Success => "✓",
            StepStatus::Error => "✗",
        };
        println!("{marker} {}", entry.message);
        if let Some(detail) = &entry.detail {
            println!("    {detail}");
        }
    }

    println!();
    if report.is_clean() {
        println!("Conversion completed successfully.");
    } else {
        println!("Completed with {} error(s).", report.error_count());
    }
    println!(
        "{} operation(s) succeeded, {} failed.",
        report.success_count(),
        report.error_count()
    );
    if let Some(code) = &report.created_root_code {
        println!("Created product model: {code}");
    }
}
