//! Expansion of Shopify products into one [`ResultRow`] per variant.

use std::collections::HashMap;

use shopscrape_core::{round2, ResultRow, FIXED_COLUMNS};

use crate::domain::{product_url, variant_url};
use crate::rating::RatingInfo;
use crate::types::{ShopifyProduct, ShopifyVariant};

const DEFAULT_CURRENCY: &str = "USD";

/// Per-run feature toggles applied while flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    pub include_descriptions: bool,
    pub include_ratings: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            include_descriptions: true,
            include_ratings: true,
        }
    }
}

/// Flattens every product, pairing `products[i]` with `ratings[i]`.
///
/// A shorter `ratings` slice means the trailing products have no rating.
/// Rows keep product order, then variant order.
#[must_use]
pub fn flatten_products(
    products: &[ShopifyProduct],
    ratings: &[Option<RatingInfo>],
    base_url: &str,
    options: FlattenOptions,
) -> Vec<ResultRow> {
    products
        .iter()
        .enumerate()
        .flat_map(|(idx, product)| {
            let rating = ratings.get(idx).copied().flatten();
            flatten_product(product, base_url, rating, options)
        })
        .collect()
}

/// Flattens one product into a row per variant.
///
/// `rating` is ignored when [`FlattenOptions::include_ratings`] is off, so the
/// rating columns are null whether or not enrichment ran.
///
/// Option columns are keyed by the option's lowercased name. An option whose
/// name matches a fixed column, such as Shopify's default `Title` option, is
/// stored under `option{n}` instead (its 1-based position) so it never
/// overwrites that column.
#[must_use]
pub fn flatten_product(
    product: &ShopifyProduct,
    base_url: &str,
    rating: Option<RatingInfo>,
    options: FlattenOptions,
) -> Vec<ResultRow> {
    let product_url = product_url(base_url, &product.handle);

    let images: HashMap<i64, &str> = product
        .images
        .iter()
        .filter_map(|img| Some((img.id?, img.src.as_deref()?)))
        .collect();
    let option_keys = option_keys(product);

    let tags = (!product.tags.is_empty()).then(|| product.tags.join(", "));
    let description = if options.include_descriptions {
        product.body_html.clone()
    } else {
        None
    };
    let rating = rating.filter(|_| options.include_ratings);

    product
        .variants
        .iter()
        .map(|variant| {
            let price = parse_price(variant.price.as_deref());
            let compare_at = parse_price(variant.compare_at_price.as_deref()).unwrap_or(0.0);

            let mut row = ResultRow {
                product_url: product_url.clone(),
                variant_url: variant_url(&product_url, variant.id),
                title: product.title.clone(),
                vendor: product.vendor.clone(),
                product_type: product.product_type.clone(),
                tags: tags.clone(),
                variant_id: variant.id,
                sku: variant.sku.clone(),
                price,
                offer_price: (compare_at > 0.0).then_some(compare_at),
                discount_pct: discount_pct(price, compare_at),
                currency: currency(variant),
                availability: variant.available,
                description: description.clone(),
                image: variant
                    .image_id
                    .and_then(|id| images.get(&id))
                    .map(|src| (*src).to_owned()),
                rating: rating.map(|r| r.rating),
                review_count: rating.map(|r| r.review_count),
                options: Vec::new(),
            };

            for (key, value) in option_keys.iter().zip(variant.option_values()) {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    row.set_option(key.clone(), value.to_owned());
                }
            }

            row
        })
        .collect()
}

/// Markdown percentage, rounded to two decimals.
///
/// Only defined when the compare-at price is strictly greater than the price;
/// otherwise there is no real markdown and the result is `None`.
#[must_use]
pub fn discount_pct(price: Option<f64>, compare_at: f64) -> Option<f64> {
    let price = price?;
    if compare_at > 0.0 && compare_at > price {
        Some(round2((compare_at - price) / compare_at * 100.0))
    } else {
        None
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn currency(variant: &ShopifyVariant) -> String {
    variant
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_owned()
}

/// Row keys for option positions 1..=3.
///
/// Declared option names are lowercased; unnamed positions fall back to
/// `option{n}`. A name that would shadow a fixed column (e.g. an option
/// called `Title`) also falls back to `option{n}`.
fn option_keys(product: &ShopifyProduct) -> [String; 3] {
    let mut keys = [1, 2, 3].map(|n| format!("option{n}"));

    for option in &product.options {
        let (Some(position), Some(name)) = (option.position, option.name.as_deref()) else {
            continue;
        };
        let name = name.trim().to_lowercase();
        if !(1..=3).contains(&position) || name.is_empty() {
            continue;
        }
        if FIXED_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        keys[position - 1] = name;
    }

    keys
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod tests;
