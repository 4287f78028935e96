//! Pure domain engine for converting simple catalog products into a
//! variant hierarchy.
//!
//! Everything in this crate is synchronous and side-effect-free: the
//! schema adapter ([`schema`]), the value partitioner ([`partition`]),
//! the group-key derivation ([`group`]), the pre-flight validation
//! checks ([`validation`]), and the model-code plan ([`plan`]). The
//! async write sequence lives in `variantize-convert`; the HTTP client
//! in `variantize-pim`.

pub mod app_config;
pub mod config;
pub mod group;
pub mod partition;
pub mod plan;
pub mod product;
pub mod schema;
pub mod validation;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use plan::{ModelCodePlan, PlanError};
pub use product::{AxisValueTable, Product, ValueCell};
pub use schema::{FamilyVariantSchema, Level, SchemaError, VariantAttributeSet};
pub use validation::Violation;
