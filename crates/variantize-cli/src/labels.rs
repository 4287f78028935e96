//! Human labels for axis attributes and their options.
//!
//! Cosmetic only: label fetching never gates the conversion, and a
//! failure degrades to rendering raw codes.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};

use variantize_pim::{AttributeMeta, AttributeOption, PimClient, PimError};

/// Locale used for display, matching the catalog UI's default.
const DISPLAY_LOCALE: &str = "en_US";

/// Attribute metadata and select options for the session's axes.
#[derive(Debug, Default)]
pub struct AxisLabels {
    attributes: BTreeMap<String, AttributeMeta>,
    options: BTreeMap<String, Vec<AttributeOption>>,
}

impl AxisLabels {
    /// Fetches metadata for every axis concurrently, then options for
    /// the select-type ones.
    ///
    /// # Errors
    ///
    /// Returns the first [`PimError`] encountered; callers treat this
    /// as non-fatal and fall back to [`AxisLabels::default`].
    pub async fn fetch(
        client: &PimClient,
        axes: &[String],
        option_limit: usize,
        max_concurrent: usize,
    ) -> Result<Self, PimError> {
        let metas: Vec<Result<AttributeMeta, PimError>> = stream::iter(axes)
            .map(|axis| client.get_attribute(axis))
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        let mut attributes = BTreeMap::new();
        for meta in metas {
            let meta = meta?;
            attributes.insert(meta.code.clone(), meta);
        }

        let mut options = BTreeMap::new();
        for meta in attributes.values().filter(|m| m.is_select()) {
            let items = client.list_attribute_options(&meta.code, option_limit).await?;
            options.insert(meta.code.clone(), items);
        }

        Ok(Self { attributes, options })
    }

    /// Display label for an axis attribute; falls back to the code.
    #[must_use]
    pub fn axis_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.attributes
            .get(code)
            .and_then(|meta| meta.labels.get(DISPLAY_LOCALE))
            .map_or(code, String::as_str)
    }

    /// Display label for an option of a select axis; falls back to the
    /// option code.
    #[must_use]
    pub fn option_label<'a>(&'a self, axis: &str, option_code: &'a str) -> &'a str {
        self.options
            .get(axis)
            .and_then(|opts| opts.iter().find(|o| o.code == option_code))
            .and_then(|o| o.labels.get(DISPLAY_LOCALE))
            .map_or(option_code, String::as_str)
    }
}
