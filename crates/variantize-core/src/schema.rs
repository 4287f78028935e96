//! Family-variant schema normalization.
//!
//! A family variant arrives from the catalog as a flat list of variant
//! attribute sets (`{level, axes, attributes}`). [`FamilyVariantSchema`]
//! orders those into one or two levels and answers the ownership
//! questions the partitioner and validators ask. Descriptors without a
//! level-1 set are not convertible and are rejected up front.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while normalizing a family-variant descriptor.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The descriptor carries no variant attribute sets at all.
    #[error("family variant has no variant attribute sets")]
    Empty,

    /// No set is declared at level 1, so there is nothing to hang
    /// variants off.
    #[error("family variant has no level-1 variant attribute set")]
    MissingLevelOne,

    /// More than two sets; the catalog's hierarchy is at most two deep.
    #[error("family variant declares {0} levels; at most 2 are supported")]
    TooManyLevels(usize),
}

/// One raw variant attribute set as found in a family-variant descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantAttributeSet {
    pub level: u8,
    pub axes: Vec<String>,
    pub attributes: Vec<String>,
}

/// A single hierarchy level of a normalized schema.
#[derive(Debug, Clone)]
pub struct Level {
    /// 1 for the sub-model level, 2 for the leaf level of a two-level
    /// schema. In a one-level schema the single level has depth 1 and
    /// owns the leaves.
    pub depth: u8,
    /// Axis attribute codes in descriptor order. Group keys and axis
    /// tuples depend on this order staying fixed.
    pub axes: Vec<String>,
    attributes: BTreeSet<String>,
}

impl Level {
    /// Whether this level owns the attribute `code`.
    #[must_use]
    pub fn owns(&self, code: &str) -> bool {
        self.attributes.contains(code)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }
}

/// Normalized shape of a family variant: one or two ordered levels.
///
/// Immutable once built; every downstream computation in a session reads
/// the same schema instance.
#[derive(Debug, Clone)]
pub struct FamilyVariantSchema {
    levels: Vec<Level>,
}

impl FamilyVariantSchema {
    /// Normalizes raw variant attribute sets into an ordered schema.
    ///
    /// Axes are unioned into the level's attribute set, so `axes ⊆
    /// attributes` holds even for descriptors that list an axis only in
    /// `axes`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Empty`] for a descriptor with no sets,
    /// [`SchemaError::TooManyLevels`] for more than two, and
    /// [`SchemaError::MissingLevelOne`] when no set is declared at
    /// level 1.
    pub fn from_sets(sets: &[VariantAttributeSet]) -> Result<Self, SchemaError> {
        if sets.is_empty() {
            return Err(SchemaError::Empty);
        }
        if sets.len() > 2 {
            return Err(SchemaError::TooManyLevels(sets.len()));
        }

        let level1 = sets
            .iter()
            .find(|s| s.level == 1)
            .ok_or(SchemaError::MissingLevelOne)?;
        let level2 = sets.iter().find(|s| s.level == 2);

        let mut levels = vec![Self::build_level(1, level1)];
        if let Some(set) = level2 {
            levels.push(Self::build_level(2, set));
        }

        Ok(Self { levels })
    }

    fn build_level(depth: u8, set: &VariantAttributeSet) -> Level {
        let mut attributes: BTreeSet<String> = set.attributes.iter().cloned().collect();
        attributes.extend(set.axes.iter().cloned());
        Level {
            depth,
            axes: set.axes.clone(),
            attributes,
        }
    }

    #[must_use]
    pub fn is_one_level(&self) -> bool {
        self.levels.len() == 1
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The level-1 set; guaranteed present by construction.
    #[must_use]
    pub fn level1(&self) -> &Level {
        &self.levels[0]
    }

    #[must_use]
    pub fn level(&self, depth: u8) -> Option<&Level> {
        self.levels.iter().find(|l| l.depth == depth)
    }

    /// The level owning leaf variants: level 2 when present, else level 1.
    #[must_use]
    pub fn deepest(&self) -> &Level {
        self.levels.last().expect("schema always has a level 1")
    }

    /// Whether any level owns `code`. Codes owned by no level belong to
    /// the root model.
    #[must_use]
    pub fn is_variant_attribute(&self, code: &str) -> bool {
        self.levels.iter().any(|l| l.owns(code))
    }

    /// All axis codes across levels, level-1 axes first, preserving
    /// descriptor order within each level.
    #[must_use]
    pub fn all_axes(&self) -> Vec<String> {
        self.levels
            .iter()
            .flat_map(|l| l.axes.iter().cloned())
            .collect()
    }
}
