//! HTTP client for the PIM catalog REST API.
//!
//! Wraps `reqwest` with bearer-token auth and typed response
//! deserialization. Non-2xx responses are surfaced as
//! [`PimError::Api`] carrying the catalog's own error message verbatim,
//! so write failures can be reported to the user unchanged.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use uuid::Uuid;

use variantize_core::{AppConfig, Product};

use crate::error::PimError;
use crate::types::{
    AttributeMeta, AttributeOption, FamilyVariant, ListResponse, ProductModelPayload, ProductPatch,
};

const API_PREFIX: &str = "api/rest/v1";

/// Client for the PIM catalog REST API.
///
/// Holds the HTTP client, the API token, and the normalized base URL.
/// Use [`PimClient::with_base_url`] to point at a wiremock server in
/// tests.
pub struct PimClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl PimClient {
    /// Creates a new client for the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PimError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PimError::InvalidBaseUrl`] if the
    /// configured URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, PimError> {
        Self::with_base_url(
            &config.pim_api_url,
            &config.pim_api_token,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a new client with an explicit base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`PimClient::new`].
    pub fn with_base_url(
        base_url: &str,
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PimError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join appends to
        // the path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PimError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.to_owned(),
        })
    }

    /// Fetches one product by uuid.
    ///
    /// # Errors
    ///
    /// - [`PimError::Api`] on a non-2xx response.
    /// - [`PimError::Http`] on network failure.
    /// - [`PimError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn get_product(&self, uuid: Uuid) -> Result<Product, PimError> {
        let url = self.endpoint(&format!("products-uuid/{uuid}"))?;
        self.get_json(url, &format!("get_product({uuid})")).await
    }

    /// Lists the family-variant descriptors of a family.
    ///
    /// # Errors
    ///
    /// Same as [`PimClient::get_product`].
    pub async fn list_family_variants(&self, family: &str) -> Result<Vec<FamilyVariant>, PimError> {
        let url = self.endpoint(&format!("families/{family}/variants"))?;
        let list: ListResponse<FamilyVariant> = self
            .get_json(url, &format!("list_family_variants({family})"))
            .await?;
        Ok(list.items)
    }

    /// Fetches attribute metadata (type and labels).
    ///
    /// # Errors
    ///
    /// Same as [`PimClient::get_product`].
    pub async fn get_attribute(&self, code: &str) -> Result<AttributeMeta, PimError> {
        let url = self.endpoint(&format!("attributes/{code}"))?;
        self.get_json(url, &format!("get_attribute({code})")).await
    }

    /// Lists the options of a select attribute, up to `limit`.
    ///
    /// # Errors
    ///
    /// Same as [`PimClient::get_product`].
    pub async fn list_attribute_options(
        &self,
        attribute: &str,
        limit: usize,
    ) -> Result<Vec<AttributeOption>, PimError> {
        let mut url = self.endpoint(&format!("attributes/{attribute}/options"))?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        let list: ListResponse<AttributeOption> = self
            .get_json(url, &format!("list_attribute_options({attribute})"))
            .await?;
        Ok(list.items)
    }

    /// Creates a product model (root or sub-model). The catalog rejects
    /// duplicate codes with a non-2xx status, surfaced as
    /// [`PimError::Api`].
    ///
    /// # Errors
    ///
    /// - [`PimError::Api`] on a non-2xx response.
    /// - [`PimError::Http`] on network failure.
    pub async fn create_product_model(&self, payload: &ProductModelPayload) -> Result<(), PimError> {
        let url = self.endpoint("product-models")?;
        tracing::debug!(code = %payload.code, parent = ?payload.parent, "creating product model");
        let response = self.client.post(url).bearer_auth(&self.token).json(payload).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Re-parents a product and sets its variant-level values.
    ///
    /// # Errors
    ///
    /// - [`PimError::Api`] on a non-2xx response.
    /// - [`PimError::Http`] on network failure.
    pub async fn patch_product(&self, uuid: Uuid, patch: &ProductPatch) -> Result<(), PimError> {
        let url = self.endpoint(&format!("products-uuid/{uuid}"))?;
        tracing::debug!(%uuid, parent = %patch.parent, "patching product");
        let response = self.client.patch(url).bearer_auth(&self.token).json(patch).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Resolves an API path against the normalized base URL.
    fn endpoint(&self, path: &str) -> Result<Url, PimError> {
        self.base_url
            .join(&format!("{API_PREFIX}/{path}"))
            .map_err(|e| PimError::InvalidBaseUrl {
                url: format!("{}{API_PREFIX}/{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Sends a GET request, checks the status, and parses the body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, PimError> {
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PimError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Maps a non-2xx response to [`PimError::Api`], pulling the
    /// catalog's `message` field out of the body when present.
    async fn check_status(response: Response) -> Result<Response, PimError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                } else {
                    body.trim().to_owned()
                }
            });
        Err(PimError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PimClient {
        PimClient::with_base_url(base_url, "test-token", 30, "variantize-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_joins_api_prefix() {
        let client = test_client("https://pim.example.com");
        let url = client.endpoint("product-models").expect("valid endpoint");
        assert_eq!(url.as_str(), "https://pim.example.com/api/rest/v1/product-models");
    }

    #[test]
    fn endpoint_strips_extra_trailing_slashes() {
        let client = test_client("https://pim.example.com//");
        let url = client
            .endpoint("families/shirts/variants")
            .expect("valid endpoint");
        assert_eq!(
            url.as_str(),
            "https://pim.example.com/api/rest/v1/families/shirts/variants"
        );
    }

    #[test]
    fn endpoint_preserves_base_path() {
        let client = test_client("https://pim.example.com/tenant-a");
        let url = client.endpoint("product-models").expect("valid endpoint");
        assert_eq!(
            url.as_str(),
            "https://pim.example.com/tenant-a/api/rest/v1/product-models"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = PimClient::with_base_url("not a url", "t", 30, "ua");
        assert!(matches!(result, Err(PimError::InvalidBaseUrl { .. })));
    }
}
