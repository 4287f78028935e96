//! Model-code planning.
//!
//! The plan fixes the codes the executor will write: one root model code
//! and, for two-level schemas, one sub-model code per level-1 group key.
//! Codes follow the catalog's identifier alphabet.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::group::suggest_sub_model_code;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid code regex"));

/// Whether `code` is a valid catalog identifier (letters, digits,
/// underscores, hyphens; non-empty).
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// Errors found while validating a plan against a product set.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid root model code '{0}': only letters, digits, underscores and hyphens are allowed")]
    InvalidRootCode(String),

    #[error("invalid sub-model code '{code}' for group '{group}': only letters, digits, underscores and hyphens are allowed")]
    InvalidSubCode { group: String, code: String },

    #[error("no sub-model code configured for group '{0}'")]
    MissingSubCode(String),
}

/// The codes a conversion run will create: `root_code` for the root
/// model and, for two-level schemas, one entry in `sub_codes` per
/// distinct level-1 group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCodePlan {
    pub root_code: String,
    #[serde(default)]
    pub sub_codes: BTreeMap<String, String>,
}

impl ModelCodePlan {
    #[must_use]
    pub fn new(root_code: impl Into<String>) -> Self {
        Self {
            root_code: root_code.into(),
            sub_codes: BTreeMap::new(),
        }
    }

    /// The sub-model code planned for a group key, if any.
    #[must_use]
    pub fn sub_code(&self, group_key: &str) -> Option<&str> {
        self.sub_codes.get(group_key).map(String::as_str)
    }

    /// Fills a suggested code for every group key lacking one. Codes
    /// already present — user-chosen — are never overwritten.
    pub fn suggest_missing_sub_codes<'a>(
        &mut self,
        group_keys: impl IntoIterator<Item = &'a str>,
    ) {
        for key in group_keys {
            if !self.sub_codes.contains_key(key) {
                self.sub_codes
                    .insert(key.to_owned(), suggest_sub_model_code(&self.root_code, key));
            }
        }
    }

    /// Validates the plan against the group keys the product set
    /// actually produces.
    ///
    /// One-level plans only need a valid root code; two-level plans need
    /// a valid code for every group. Extra `sub_codes` entries for
    /// groups no longer present are tolerated — the executor never reads
    /// them.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidRootCode`], [`PlanError::MissingSubCode`], or
    /// [`PlanError::InvalidSubCode`], first failure wins.
    pub fn validate<'a>(
        &self,
        group_keys: impl IntoIterator<Item = &'a str>,
        one_level: bool,
    ) -> Result<(), PlanError> {
        if !is_valid_code(&self.root_code) {
            return Err(PlanError::InvalidRootCode(self.root_code.clone()));
        }
        if one_level {
            return Ok(());
        }
        for key in group_keys {
            match self.sub_code(key) {
                None => return Err(PlanError::MissingSubCode(key.to_owned())),
                Some(code) if !is_valid_code(code) => {
                    return Err(PlanError::InvalidSubCode {
                        group: key.to_owned(),
                        code: code.to_owned(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_pattern_accepts_catalog_identifiers() {
        assert!(is_valid_code("tshirt_model_001"));
        assert!(is_valid_code("ROOT-2"));
        assert!(is_valid_code("a"));
    }

    #[test]
    fn code_pattern_rejects_other_characters() {
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("has space"));
        assert!(!is_valid_code("pipe|char"));
        assert!(!is_valid_code("café"));
    }

    #[test]
    fn suggest_missing_fills_only_gaps() {
        let mut plan = ModelCodePlan::new("root");
        plan.sub_codes.insert("M".to_owned(), "my_custom".to_owned());
        plan.suggest_missing_sub_codes(["M", "L"]);
        assert_eq!(plan.sub_code("M"), Some("my_custom"));
        assert_eq!(plan.sub_code("L"), Some("root__L"));
    }

    #[test]
    fn validate_one_level_ignores_sub_codes() {
        let plan = ModelCodePlan::new("root_1");
        assert!(plan.validate(std::iter::empty::<&str>(), true).is_ok());
    }

    #[test]
    fn validate_rejects_bad_root_code() {
        let plan = ModelCodePlan::new("not ok");
        let err = plan.validate(std::iter::empty::<&str>(), true).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRootCode(_)));
    }

    #[test]
    fn validate_requires_a_code_per_group() {
        let mut plan = ModelCodePlan::new("root");
        plan.sub_codes.insert("M".to_owned(), "root__M".to_owned());
        let err = plan.validate(["M", "L"], false).unwrap_err();
        assert!(matches!(err, PlanError::MissingSubCode(ref g) if g == "L"));
    }

    #[test]
    fn validate_rejects_bad_sub_code() {
        let mut plan = ModelCodePlan::new("root");
        plan.sub_codes.insert("M".to_owned(), "bad code".to_owned());
        let err = plan.validate(["M"], false).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSubCode { ref group, .. } if group == "M"));
    }

    #[test]
    fn validate_tolerates_stale_extra_entries() {
        let mut plan = ModelCodePlan::new("root");
        plan.sub_codes.insert("M".to_owned(), "root__M".to_owned());
        plan.sub_codes.insert("GONE".to_owned(), "root__GONE".to_owned());
        assert!(plan.validate(["M"], false).is_ok());
    }
}
