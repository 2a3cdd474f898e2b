//! End-to-end scrape of one store: probe, paginate, enrich and flatten.
//!
//! The pipeline takes its toggles as an explicit [`ScrapeRequest`] and reports
//! progress through a [`ProgressObserver`], so it has no knowledge of how (or
//! whether) progress is displayed.

use futures::stream::{self, StreamExt};
use shopscrape_core::ResultTable;

use crate::client::ShopifyClient;
use crate::domain::{normalize_domain, product_url};
use crate::error::ScraperError;
use crate::flatten::{flatten_product, FlattenOptions};
use crate::rating::{fetch_rating, RatingInfo};

/// Feature toggles for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub include_ratings: bool,
    pub include_descriptions: bool,
    /// Number of storefront pages fetched at once during rating enrichment.
    /// Values below 1 are treated as 1.
    pub rating_concurrency: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            include_ratings: true,
            include_descriptions: true,
            rating_concurrency: 1,
        }
    }
}

impl ScrapeOptions {
    fn flatten_options(self) -> FlattenOptions {
        FlattenOptions {
            include_descriptions: self.include_descriptions,
            include_ratings: self.include_ratings,
        }
    }
}

/// A store to scrape plus the toggles to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    /// Normalized `https://{host}` base URL.
    pub base_url: String,
    pub options: ScrapeOptions,
}

impl ScrapeRequest {
    /// Builds a request from user input, normalizing the domain.
    #[must_use]
    pub fn for_domain(input: &str, options: ScrapeOptions) -> Self {
        Self {
            base_url: normalize_domain(input),
            options,
        }
    }
}

/// Progress after one product has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate<'a> {
    /// Products processed so far, including this one.
    pub done: usize,
    pub total: usize,
    /// Title of the product just processed.
    pub title: &'a str,
}

impl ProgressUpdate<'_> {
    /// Fraction complete in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.done as f64 / self.total as f64
    }

    /// Whole percent complete, truncated.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.done * 100 / self.total
    }

    /// e.g. `Scraping: Wool Runner (42%)`
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("Scraping: {} ({}%)", self.title, self.percent())
    }
}

/// Receives progress from [`run_scrape`].
pub trait ProgressObserver {
    /// Called once pagination has finished, before any product is processed.
    fn on_catalog_fetched(&mut self, _product_count: usize, _pages_fetched: u32) {}

    /// Called after each product has been enriched and flattened.
    fn on_product(&mut self, update: &ProgressUpdate<'_>);

    /// Called once all products are processed, with the final row count.
    fn on_complete(&mut self, _row_count: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_product(&mut self, _update: &ProgressUpdate<'_>) {}
}

/// Outcome of a successful scrape.
#[derive(Debug)]
pub struct ScrapeReport {
    pub base_url: String,
    /// Products returned by the catalog, including ones without variants.
    pub product_count: usize,
    pub pages_fetched: u32,
    /// Set when pagination ended on a request error and the catalog is partial.
    pub interruption: Option<ScraperError>,
    pub table: ResultTable,
}

impl ScrapeReport {
    /// Number of variant rows in the table.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.table.len()
    }
}

/// Runs the whole pipeline for one store.
///
/// Products are processed strictly in catalog order. With
/// `rating_concurrency > 1` up to that many storefront pages are in flight at
/// once, but results are still consumed in catalog order.
///
/// # Errors
///
/// - [`ScraperError::NotACatalog`]: the probe failed; nothing else was fetched.
/// - [`ScraperError::EmptyCatalog`]: pagination produced no products.
/// - [`ScraperError::NoVariants`]: products were found but none has a variant.
///
/// A pagination interruption is not an error; it is reported through
/// [`ScrapeReport::interruption`].
pub async fn run_scrape(
    client: &ShopifyClient,
    request: &ScrapeRequest,
    observer: &mut dyn ProgressObserver,
) -> Result<ScrapeReport, ScraperError> {
    let base_url = request.base_url.as_str();
    let options = request.options;

    client.probe_catalog(base_url).await?;

    let catalog = client.fetch_catalog(base_url).await;
    if catalog.products.is_empty() {
        if let Some(e) = &catalog.interruption {
            tracing::warn!(base_url, error = %e, "catalog fetch failed before any product");
        }
        return Err(ScraperError::EmptyCatalog {
            base_url: base_url.to_owned(),
        });
    }

    let total = catalog.products.len();
    tracing::info!(
        base_url,
        products = total,
        pages = catalog.pages_fetched,
        partial = catalog.is_partial(),
        "catalog fetched"
    );
    observer.on_catalog_fetched(total, catalog.pages_fetched);

    let flatten_options = options.flatten_options();
    let concurrency = options.rating_concurrency.max(1);

    let enriched = stream::iter(catalog.products.iter())
        .map(|product| {
            let url = product_url(base_url, &product.handle);
            async move {
                let rating: Option<RatingInfo> = if options.include_ratings {
                    fetch_rating(client, &url).await
                } else {
                    None
                };
                (product, rating)
            }
        })
        .buffered(concurrency);
    let mut enriched = std::pin::pin!(enriched);

    let mut rows = Vec::new();
    let mut done = 0usize;
    while let Some((product, rating)) = enriched.next().await {
        rows.extend(flatten_product(product, base_url, rating, flatten_options));
        done += 1;
        observer.on_product(&ProgressUpdate {
            done,
            total,
            title: &product.title,
        });
    }

    if rows.is_empty() {
        return Err(ScraperError::NoVariants {
            base_url: base_url.to_owned(),
            product_count: total,
        });
    }

    observer.on_complete(rows.len());
    tracing::info!(base_url, rows = rows.len(), "scrape complete");

    Ok(ScrapeReport {
        base_url: base_url.to_owned(),
        product_count: total,
        pages_fetched: catalog.pages_fetched,
        interruption: catalog.interruption,
        table: ResultTable::from_rows(rows),
    })
}
