//! Product rating enrichment from schema.org JSON-LD on storefront pages.
//!
//! Review apps (Judge.me, Yotpo, Okendo, ...) publish an `aggregateRating`
//! on the page's `Product` node. The first `Product` node in document order
//! wins; pages without one, or whose node carries no usable rating, yield no
//! rating at all.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use shopscrape_core::round2;

use crate::client::ShopifyClient;

static JSONLD_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script>"#)
        .expect("valid json-ld script regex")
});

/// Aggregate rating published for a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingInfo {
    /// Rating value rounded to two decimals (typically 0 to 5).
    pub rating: f64,
    pub review_count: u64,
}

/// Fetches a product's storefront page and extracts its rating.
///
/// Every failure (network error, timeout, non-2xx status, missing or broken
/// markup) degrades to `None`; enrichment never fails the scrape.
pub async fn fetch_rating(client: &ShopifyClient, product_url: &str) -> Option<RatingInfo> {
    match client.fetch_storefront_html(product_url).await {
        Ok(html) => {
            let rating = extract_rating(&html);
            if rating.is_none() {
                tracing::debug!(product_url, "no structured rating on storefront page");
            }
            rating
        }
        Err(e) => {
            tracing::debug!(product_url, error = %e, "rating enrichment failed");
            None
        }
    }
}

/// Extracts the rating of the first `Product` node found in the page's
/// `<script type="application/ld+json">` blocks.
///
/// Blocks that are not valid JSON are skipped. Each block may hold a single
/// object, an array of objects, or an `@graph` container.
#[must_use]
pub fn extract_rating(html: &str) -> Option<RatingInfo> {
    for cap in JSONLD_SCRIPT_RE.captures_iter(html) {
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        if raw.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            continue;
        };

        if let Some(product) = first_product_node(&value) {
            return rating_from_product(product);
        }
    }
    None
}

fn first_product_node(value: &Value) -> Option<&Value> {
    let candidates: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for candidate in candidates {
        if is_product_node(candidate) {
            return Some(candidate);
        }
        if let Some(graph) = candidate.get("@graph").and_then(Value::as_array) {
            if let Some(node) = graph.iter().find(|n| is_product_node(n)) {
                return Some(node);
            }
        }
    }
    None
}

/// `@type` may be a plain string or an array of strings.
fn is_product_node(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == "Product",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
        _ => false,
    }
}

fn rating_from_product(product: &Value) -> Option<RatingInfo> {
    let aggregate = product.get("aggregateRating")?;
    let rating = number_like(aggregate.get("ratingValue")?)?;

    let review_count = match aggregate
        .get("reviewCount")
        .or_else(|| aggregate.get("ratingCount"))
    {
        None | Some(Value::Null) => 0,
        Some(count) => count_like(count)?,
    };

    Some(RatingInfo {
        rating: round2(rating),
        review_count,
    })
}

fn number_like(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_like(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
