pub mod client;
pub mod domain;
pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod rating;
pub mod types;

pub use client::{CatalogFetch, ShopifyClient, PAGE_LIMIT};
pub use domain::normalize_domain;
pub use error::ScraperError;
pub use flatten::{flatten_product, flatten_products, FlattenOptions};
pub use pipeline::{
    run_scrape, NoopProgress, ProgressObserver, ProgressUpdate, ScrapeOptions, ScrapeReport,
    ScrapeRequest,
};
pub use rating::{extract_rating, fetch_rating, RatingInfo};
pub use types::{ShopifyImage, ShopifyOption, ShopifyProduct, ShopifyProductsResponse, ShopifyVariant};
