//! Shopify response types for the public `products.json` endpoint.
//!
//! ## Observed shape
//!
//! ### Tags
//! `products.json` returns tags as a JSON array of strings, while older themes
//! and the Liquid API expose a comma-separated string. Both are accepted and
//! normalized to `Vec<String>`.
//!
//! ### `price` / `compare_at_price`
//! Decimal strings such as `"98.00"`. `compare_at_price` is explicitly `null`
//! when the variant is not on sale. A few proxies re-encode these as JSON
//! numbers, so both forms are accepted and kept as strings; numeric coercion
//! happens during flattening.
//!
//! ### `available`
//! Boolean; may be absent or `null` on older stores. Either means not available.
//!
//! ### `currency`
//! Not part of the standard payload; some storefront apps inject it per
//! variant. Absent values fall back to `"USD"` during flattening.

use serde::{Deserialize, Deserializer};

/// Top-level response from `GET /products.json`.
///
/// A body without a `products` key decodes to an empty list, which ends
/// pagination.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<ShopifyProduct>,
}

/// A single product from the Shopify storefront.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    /// Shopify numeric product ID.
    pub id: i64,

    /// Display name of the product (e.g., `"Wool Runner"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// URL slug for the product page (e.g., `"mens-wool-runners"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub product_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// Vendor / brand name as configured in Shopify.
    #[serde(default)]
    pub vendor: Option<String>,

    /// Named option axes (e.g. `Color`, `Size`) keyed by 1-based position.
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<ShopifyOption>,

    /// Full image gallery for the product.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ShopifyImage>,

    /// All purchasable variants for this product.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<ShopifyVariant>,
}

/// A named option axis declared on a [`ShopifyProduct`].
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOption {
    #[serde(default)]
    pub name: Option<String>,
    /// 1-based position matching the variant's `option1`..`option3` fields.
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

/// A single purchasable variant of a [`ShopifyProduct`].
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyVariant {
    /// Shopify numeric variant ID.
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Stock-keeping unit. Present but may be an empty string on some stores.
    #[serde(default)]
    pub sku: Option<String>,

    /// Current price as a decimal string (e.g., `"30.00"`).
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub price: Option<String>,

    /// Pre-sale / comparison price, or `null` when the variant is not on sale.
    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub compare_at_price: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,

    #[serde(default)]
    pub currency: Option<String>,

    /// ID of the product image shown for this variant.
    #[serde(default)]
    pub image_id: Option<i64>,

    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,

    /// 1-based position; `1` is the storefront-default variant.
    #[serde(default)]
    pub position: Option<i32>,
}

impl ShopifyVariant {
    /// Option values in position order (`option1`, `option2`, `option3`).
    #[must_use]
    pub fn option_values(&self) -> [Option<&str>; 3] {
        [
            self.option1.as_deref(),
            self.option2.as_deref(),
            self.option3.as_deref(),
        ]
    }
}

/// A product image from Shopify `products.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyImage {
    #[serde(default)]
    pub id: Option<i64>,
    /// Canonical CDN URL.
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    /// Variant IDs associated with this image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variant_ids: Vec<i64>,
}

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTags>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(RawTags::List(tags)) => tags,
        Some(RawTags::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDecimal>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawDecimal::Text(s) => s,
        RawDecimal::Number(n) => n.to_string(),
    }))
}
