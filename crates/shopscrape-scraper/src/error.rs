use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid store URL \"{base_url}\": {reason}")]
    InvalidStoreUrl { base_url: String, reason: String },

    #[error("{base_url} is not a valid or accessible Shopify store: {reason}")]
    NotACatalog { base_url: String, reason: String },

    #[error("no products found at {base_url}")]
    EmptyCatalog { base_url: String },

    #[error("{product_count} products fetched from {base_url} but none has variants")]
    NoVariants {
        base_url: String,
        product_count: usize,
    },
}
