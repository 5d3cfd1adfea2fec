//! HTTP access to the pricing feed and the storefront cart.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use packcart_pricing::PricingCatalog;

use crate::cart::{CartAddRequest, SectionsUpdateRequest};
use crate::config::StorefrontConfig;
use crate::error::ClientError;

/// Source of the pricing table.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<PricingCatalog, ClientError>;
}

/// Storefront cart endpoints.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// `POST /cart/add.js`; returns the storefront's JSON response.
    async fn add(&self, request: &CartAddRequest) -> Result<Value, ClientError>;

    /// `POST /cart/update.js` asking for re-rendered sections.
    async fn update_sections(&self, request: &SectionsUpdateRequest) -> Result<Value, ClientError>;
}

/// Fetches the pricing feed with `GET <pricing_url>`.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), Some(url.into()))
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.pricing_url.clone())
    }

    pub fn with_client(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<PricingCatalog, ClientError> {
        let url = self
            .url
            .as_deref()
            .ok_or(ClientError::NotConfigured("pricing url"))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        PricingCatalog::from_json(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Talks to `<store_url>/cart/*.js`.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: reqwest::Client,
    add_url: String,
    update_url: String,
}

impl HttpCartApi {
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &StorefrontConfig) -> Self {
        Self {
            client,
            add_url: config.store_endpoint("/cart/add.js"),
            update_url: config.store_endpoint("/cart/update.js"),
        }
    }

    async fn post_json<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<Value, ClientError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn add(&self, request: &CartAddRequest) -> Result<Value, ClientError> {
        self.post_json(&self.add_url, request).await
    }

    async fn update_sections(&self, request: &SectionsUpdateRequest) -> Result<Value, ClientError> {
        self.post_json(&self.update_url, request).await
    }
}
