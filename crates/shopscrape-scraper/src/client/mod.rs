//! HTTP client for Shopify's public `products.json` endpoint and storefront pages.

mod catalog;

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::ScraperError;
use crate::types::{ShopifyProduct, ShopifyProductsResponse};

pub use catalog::CatalogFetch;

/// Page size requested from `products.json`. Shopify caps the public
/// endpoint at 250.
pub const PAGE_LIMIT: u32 = 250;

/// HTTP client shared by the catalog probe, the paginator and rating
/// enrichment.
///
/// Every request carries the same timeout. Nothing is retried: a failed
/// request is surfaced to the caller, which decides whether it is fatal
/// (probe), ends pagination (catalog) or just drops a rating (enrichment).
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    client: Client,
}

impl ShopifyClient {
    /// Creates a `ShopifyClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Checks whether `base_url` exposes a public Shopify product catalog.
    ///
    /// Issues a single `GET {base_url}/products.json`. The store qualifies when
    /// the response is HTTP 200 and its JSON body has a `products` key.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::NotACatalog`] for every failure mode: invalid
    /// base URL, network error or timeout, non-200 status, non-JSON body, or
    /// a body without `products`.
    pub async fn probe_catalog(&self, base_url: &str) -> Result<(), ScraperError> {
        let not_a_catalog = |reason: String| ScraperError::NotACatalog {
            base_url: base_url.to_owned(),
            reason,
        };

        let url = Self::probe_url(base_url).map_err(|e| not_a_catalog(e.to_string()))?;

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| not_a_catalog(format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(not_a_catalog(format!("HTTP status {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| not_a_catalog(format!("could not read response body: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| not_a_catalog(format!("response is not JSON: {e}")))?;

        if value.get("products").is_none() {
            return Err(not_a_catalog("response has no `products` key".to_owned()));
        }

        tracing::debug!(base_url, "product catalog endpoint detected");
        Ok(())
    }

    /// Fetches one page of products (`?limit={limit}&page={page}`).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidStoreUrl`]: `base_url` cannot be used as a URL base.
    /// - [`ScraperError::UnexpectedStatus`]: any status other than 200.
    /// - [`ScraperError::Http`]: network or TLS failure, including timeouts.
    /// - [`ScraperError::Deserialize`]: the body does not match the expected shape.
    pub async fn fetch_products_page(
        &self,
        base_url: &str,
        limit: u32,
        page: u32,
    ) -> Result<Vec<ShopifyProduct>, ScraperError> {
        let url = Self::products_url(base_url, limit, page)?;

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ShopifyProductsResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("products page {page} from {base_url}"),
                source: e,
            }
        })?;

        Ok(parsed.products)
    }

    /// Fetches the HTML of a storefront page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure, including timeouts.
    pub async fn fetch_storefront_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Builds the probe URL `{base_url}/products.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidStoreUrl`] if the result is not a valid URL.
    fn probe_url(base_url: &str) -> Result<String, ScraperError> {
        let url = Self::catalog_endpoint(base_url)?;
        Ok(url.to_string())
    }

    /// Builds `{base_url}/products.json?limit={limit}&page={page}`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidStoreUrl`] if the result is not a valid URL.
    fn products_url(base_url: &str, limit: u32, page: u32) -> Result<String, ScraperError> {
        let mut url = Self::catalog_endpoint(base_url)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("page", &page.to_string());
        Ok(url.to_string())
    }

    fn catalog_endpoint(base_url: &str) -> Result<reqwest::Url, ScraperError> {
        let invalid = |reason: String| ScraperError::InvalidStoreUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let base = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base.host_str().is_none_or(str::is_empty) {
            return Err(invalid("URL has no host".to_owned()));
        }

        let endpoint = format!("{}/products.json", base_url.trim_end_matches('/'));
        reqwest::Url::parse(&endpoint)
            .map_err(|e| invalid(format!("\"{endpoint}\" is not a valid URL: {e}")))
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
