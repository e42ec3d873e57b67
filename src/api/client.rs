//! HTTP client for the product API.

use crate::api::error::FetchError;
use crate::api::models::{Product, ProductsPayload};
use crate::api::regions::Region;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Source of product listings - enables mocking for tests.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetches the product list for a region.
    async fn fetch_products(&self, region: Region) -> Result<Vec<Product>, FetchError>;
}

/// Product API client. Makes exactly one request per call, no retries.
pub struct ApiClient {
    client: Client,
    base_url: String,
    keywords: Option<String>,
    item_count: Option<u32>,
}

impl ApiClient {
    /// Creates a client for the API configured in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().gzip(true);

        // No timeout unless asked for: a hung request keeps the view loading.
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            keywords: config.keywords.clone(),
            item_count: config.item_count,
        })
    }

    /// Builds the request URL for a region.
    fn products_url(&self, region: Region) -> String {
        let mut url = format!("{}/api/products?region={}", self.base_url, region.code());

        if let Some(keywords) = &self.keywords {
            url.push_str(&format!("&keywords={}", urlencoding::encode(keywords)));
        }
        if let Some(count) = self.item_count {
            url.push_str(&format!("&item_count={}", count));
        }

        url
    }
}

#[async_trait]
impl ProductApi for ApiClient {
    async fn fetch_products(&self, region: Region) -> Result<Vec<Product>, FetchError> {
        let url = self.products_url(region);

        info!("Fetching products for {}", region);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let (products, api_errors) = serde_json::from_str::<ProductsPayload>(&body)?.into_parts();

        if !api_errors.is_empty() {
            warn!("Product API reported upstream errors for {}: {}", region, api_errors.join("; "));
        }

        debug!("Received {} products for {}", products.len(), region);
        Ok(products)
    }
}
