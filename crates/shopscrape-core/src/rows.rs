//! Flattened per-variant result table.
//!
//! One [`ResultRow`] exists per storefront variant. The table's column set is
//! the fixed columns in [`FIXED_COLUMNS`] order followed by every option
//! column (e.g. `"color"`, `"size"`) in order of first appearance. Exporters
//! and the insights aggregator read cells through [`ResultTable::records`] so
//! every consumer sees the same columns in the same order.

use std::fmt;

use serde::Serialize;

pub const COL_PRODUCT_URL: &str = "product url";
pub const COL_VARIANT_URL: &str = "variant url";
pub const COL_TITLE: &str = "title";
pub const COL_VENDOR: &str = "vendor";
pub const COL_PRODUCT_TYPE: &str = "product type";
pub const COL_TAGS: &str = "tags";
pub const COL_VARIANT_ID: &str = "variant id";
pub const COL_SKU: &str = "sku";
pub const COL_PRICE: &str = "price";
pub const COL_OFFER_PRICE: &str = "offer price";
pub const COL_DISCOUNT: &str = "discount (%)";
pub const COL_CURRENCY: &str = "currency";
pub const COL_AVAILABILITY: &str = "availability";
pub const COL_DESCRIPTION: &str = "product description";
pub const COL_IMAGE: &str = "image";
pub const COL_RATING: &str = "rating";
pub const COL_REVIEW_COUNT: &str = "review count";

/// Columns present on every row, in export order.
pub const FIXED_COLUMNS: [&str; 17] = [
    COL_PRODUCT_URL,
    COL_VARIANT_URL,
    COL_TITLE,
    COL_VENDOR,
    COL_PRODUCT_TYPE,
    COL_TAGS,
    COL_VARIANT_ID,
    COL_SKU,
    COL_PRICE,
    COL_OFFER_PRICE,
    COL_DISCOUNT,
    COL_CURRENCY,
    COL_AVAILABILITY,
    COL_DESCRIPTION,
    COL_IMAGE,
    COL_RATING,
    COL_REVIEW_COUNT,
];

/// A single table cell. Serializes to the matching JSON scalar (`Null` → `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl Cell {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Null, Cell::Text)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::Float)
    }
}

/// Renders the cell as delimited text. `Null` renders as an empty string.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// One storefront variant flattened together with its parent product's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// `{base_url}/products/{handle}`.
    pub product_url: String,
    /// `{product_url}?variant={variant_id}`.
    pub variant_url: String,
    pub title: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    /// Product tags joined with `", "`.
    pub tags: Option<String>,
    pub variant_id: i64,
    pub sku: Option<String>,
    pub price: Option<f64>,
    /// Compare-at price when it is greater than zero.
    pub offer_price: Option<f64>,
    /// Markdown percentage, only set when compare-at price exceeds price.
    pub discount_pct: Option<f64>,
    pub currency: String,
    pub availability: bool,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    /// Resolved option label → value, in option-position order.
    pub options: Vec<(String, String)>,
}

impl ResultRow {
    /// Returns the value stored under an option column, if set on this row.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an option column, replacing any earlier value under the same key.
    pub fn set_option(&mut self, key: String, value: String) {
        if let Some(slot) = self.options.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.options.push((key, value));
        }
    }

    /// Returns the cell for `column`. Unknown columns (including option
    /// columns this row does not carry) are `Null`.
    #[must_use]
    pub fn cell(&self, column: &str) -> Cell {
        match column {
            COL_PRODUCT_URL => Cell::Text(self.product_url.clone()),
            COL_VARIANT_URL => Cell::Text(self.variant_url.clone()),
            COL_TITLE => Cell::Text(self.title.clone()),
            COL_VENDOR => self.vendor.clone().into(),
            COL_PRODUCT_TYPE => self.product_type.clone().into(),
            COL_TAGS => self.tags.clone().into(),
            COL_VARIANT_ID => Cell::Int(self.variant_id),
            COL_SKU => self.sku.clone().into(),
            COL_PRICE => self.price.into(),
            COL_OFFER_PRICE => self.offer_price.into(),
            COL_DISCOUNT => self.discount_pct.into(),
            COL_CURRENCY => Cell::Text(self.currency.clone()),
            COL_AVAILABILITY => Cell::Bool(self.availability),
            COL_DESCRIPTION => self.description.clone().into(),
            COL_IMAGE => self.image.clone().into(),
            COL_RATING => self.rating.into(),
            COL_REVIEW_COUNT => self
                .review_count
                .map_or(Cell::Null, |n| Cell::Int(i64::try_from(n).unwrap_or(i64::MAX))),
            other => self
                .option(other)
                .map_or(Cell::Null, |v| Cell::Text(v.to_owned())),
        }
    }
}

/// Ordered rows plus the column set derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Builds a table, deriving option columns from the rows in first-seen order.
    #[must_use]
    pub fn from_rows(rows: Vec<ResultRow>) -> Self {
        let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        for row in &rows {
            for (key, _) in &row.options {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates rows as cell vectors aligned with [`Self::columns`].
    pub fn records(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| row.cell(c)).collect())
    }
}
