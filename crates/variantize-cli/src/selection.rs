//! The selection file: the session's input boundary.
//!
//! Replaces the product-grid context of the catalog UI — the user lists
//! the product uuids to convert, names the family variant to apply, and
//! may pre-fill the model codes and axis-value overrides the wizard
//! would otherwise collect interactively.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading the selection file.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cannot read selection file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse selection file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Validation(String),
}

/// One conversion session's input.
#[derive(Debug, Clone, Deserialize)]
pub struct Selection {
    /// Uuids of the simple products to convert. Order matters: the
    /// first product is the representative whose root values seed the
    /// root model.
    pub products: Vec<Uuid>,
    /// Code of the family variant defining the hierarchy shape.
    pub family_variant: String,
    /// Root model code; suggested from the family when omitted.
    #[serde(default)]
    pub root_code: Option<String>,
    /// Sub-model codes keyed by level-1 group key; missing entries are
    /// suggested from the root code.
    #[serde(default)]
    pub sub_codes: BTreeMap<String, String>,
    /// Axis-value overrides, `product uuid -> (axis -> value)`. Cells
    /// not listed here keep the product's stored value.
    #[serde(default)]
    pub axis_values: BTreeMap<Uuid, BTreeMap<String, String>>,
}

/// Load and validate a selection from a YAML file.
///
/// # Errors
///
/// Returns `SelectionError` if the file cannot be read, parsed, or
/// fails validation.
pub fn load_selection(path: &Path) -> Result<Selection, SelectionError> {
    let content = std::fs::read_to_string(path).map_err(|e| SelectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_selection(&content)
}

/// Parse and validate selection YAML. Split from [`load_selection`] so
/// validation is testable without touching the filesystem.
///
/// # Errors
///
/// Returns `SelectionError` on parse or validation failure.
pub fn parse_selection(content: &str) -> Result<Selection, SelectionError> {
    let selection: Selection = serde_yaml::from_str(content)?;
    validate_selection(&selection)?;
    Ok(selection)
}

fn validate_selection(selection: &Selection) -> Result<(), SelectionError> {
    if selection.products.is_empty() {
        return Err(SelectionError::Validation(
            "no products selected; list at least one product uuid".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for uuid in &selection.products {
        if !seen.insert(uuid) {
            return Err(SelectionError::Validation(format!(
                "duplicate product uuid in selection: {uuid}"
            )));
        }
    }

    if selection.family_variant.trim().is_empty() {
        return Err(SelectionError::Validation(
            "family_variant must be non-empty".to_string(),
        ));
    }

    Ok(())
}
