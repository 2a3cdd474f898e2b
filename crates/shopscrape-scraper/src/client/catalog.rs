//! Page-numbered catalog pagination for `ShopifyClient`.

use crate::error::ScraperError;
use crate::types::ShopifyProduct;

use super::{ShopifyClient, PAGE_LIMIT};

/// Products collected by [`ShopifyClient::fetch_catalog`].
#[derive(Debug)]
pub struct CatalogFetch {
    /// Every product from the pages that succeeded, in page order.
    pub products: Vec<ShopifyProduct>,
    /// Number of pages that returned at least one product.
    pub pages_fetched: u32,
    /// The request error that cut pagination short, if any.
    pub interruption: Option<ScraperError>,
}

impl CatalogFetch {
    /// `true` when pagination stopped on a request error rather than
    /// running out of pages.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.interruption.is_some()
    }
}

impl ShopifyClient {
    /// Fetches the whole catalog, one `?limit=250&page={n}` request at a time,
    /// starting at page 1.
    ///
    /// Pagination stops cleanly on the first non-200 response or the first
    /// page with an empty `products` array. A request error (network failure,
    /// timeout, undecodable body) also stops it, but the products collected so
    /// far are kept and the error is returned in
    /// [`CatalogFetch::interruption`]. This never fails as a whole.
    ///
    /// There is no page cap and no delay between requests.
    pub async fn fetch_catalog(&self, base_url: &str) -> CatalogFetch {
        let mut products: Vec<ShopifyProduct> = Vec::new();
        let mut page: u32 = 1;

        loop {
            match self.fetch_products_page(base_url, PAGE_LIMIT, page).await {
                Ok(batch) if batch.is_empty() => {
                    tracing::debug!(base_url, page, "empty products page; catalog exhausted");
                    break;
                }
                Ok(batch) => {
                    tracing::debug!(base_url, page, count = batch.len(), "fetched products page");
                    products.extend(batch);
                    page = page.saturating_add(1);
                }
                Err(ScraperError::UnexpectedStatus { status, .. }) => {
                    tracing::debug!(base_url, page, status, "non-200 products page; stopping");
                    break;
                }
                Err(e) => {
                    tracing::error!(
                        base_url,
                        page,
                        kept = products.len(),
                        error = %e,
                        "products page failed; keeping partial catalog"
                    );
                    return CatalogFetch {
                        products,
                        pages_fetched: page - 1,
                        interruption: Some(e),
                    };
                }
            }
        }

        CatalogFetch {
            products,
            pages_fetched: page - 1,
            interruption: None,
        }
    }
}
