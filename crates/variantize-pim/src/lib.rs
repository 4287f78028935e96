//! Typed async client for the PIM catalog REST API.
//!
//! Wraps `reqwest` with bearer-token auth, catalog-specific error
//! handling, and serde wire types. Point the client at a mock server
//! with [`PimClient::with_base_url`] in tests.

mod client;
mod error;
mod types;

pub use client::PimClient;
pub use error::PimError;
pub use types::{
    AttributeMeta, AttributeOption, FamilyVariant, ListResponse, ProductModelPayload, ProductPatch,
};
