//! Summary statistics over a [`ResultTable`].

use shopscrape_core::{round2, ResultTable};

/// Number of equal-width bins in the price histogram.
pub const HISTOGRAM_BINS: usize = 30;
/// Number of vendors kept in the top-vendors ranking.
pub const TOP_VENDORS: usize = 10;

/// Variant (row) count for one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorCount {
    pub vendor: String,
    pub count: usize,
}

/// One histogram bin covering `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Aggregates shown after a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    /// Up to [`TOP_VENDORS`] vendors by row count, highest first.
    pub top_vendors: Vec<VendorCount>,
    /// [`HISTOGRAM_BINS`] bins over the price range, or `None` when no row has
    /// a price.
    pub price_histogram: Option<Vec<HistogramBin>>,
    /// Mean of the non-null ratings, rounded to two decimals.
    pub average_rating: Option<f64>,
    pub variant_count: usize,
    /// Distinct products (by product URL) present in the table. Products
    /// without variants have no rows, so they are not counted here.
    pub products_with_variants: usize,
}

/// Computes every insight in one pass over the table's rows.
///
/// Returns `None` for an empty table; there is nothing to summarize.
#[must_use]
pub fn compute_insights(table: &ResultTable) -> Option<Insights> {
    if table.is_empty() {
        return None;
    }

    let rows = table.rows();
    let prices: Vec<f64> = rows.iter().filter_map(|r| r.price).collect();
    let ratings: Vec<f64> = rows.iter().filter_map(|r| r.rating).collect();

    let mut product_urls: Vec<&str> = rows.iter().map(|r| r.product_url.as_str()).collect();
    product_urls.sort_unstable();
    product_urls.dedup();

    Some(Insights {
        top_vendors: top_vendors(rows.iter().filter_map(|r| r.vendor.as_deref()), TOP_VENDORS),
        price_histogram: histogram(&prices, HISTOGRAM_BINS),
        average_rating: mean(&ratings).map(round2),
        variant_count: rows.len(),
        products_with_variants: product_urls.len(),
    })
}

/// Counts occurrences and keeps the `limit` most frequent.
///
/// Ties keep the order in which each vendor first appeared.
fn top_vendors<'a>(vendors: impl Iterator<Item = &'a str>, limit: usize) -> Vec<VendorCount> {
    let mut counts: Vec<VendorCount> = Vec::new();
    for vendor in vendors {
        match counts.iter_mut().find(|c| c.vendor == vendor) {
            Some(entry) => entry.count += 1,
            None => counts.push(VendorCount {
                vendor: vendor.to_owned(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn histogram(values: &[f64], bins: usize) -> Option<Vec<HistogramBin>> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &value in values {
        let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Some(out)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopscrape_core::ResultRow;

    fn row(handle: &str, vendor: Option<&str>, price: Option<f64>, rating: Option<f64>) -> ResultRow {
        ResultRow {
            product_url: format!("https://allbirds.com/products/{handle}"),
            variant_url: format!("https://allbirds.com/products/{handle}?variant=1"),
            title: handle.to_owned(),
            vendor: vendor.map(str::to_owned),
            product_type: None,
            tags: None,
            variant_id: 1,
            sku: None,
            price,
            offer_price: None,
            discount_pct: None,
            currency: "USD".to_owned(),
            availability: true,
            description: None,
            image: None,
            rating,
            review_count: rating.map(|_| 1),
            options: Vec::new(),
        }
    }

    #[test]
    fn empty_table_has_no_insights() {
        assert_eq!(compute_insights(&ResultTable::from_rows(Vec::new())), None);
    }

    #[test]
    fn vendors_rank_by_count_then_first_appearance() {
        let table = ResultTable::from_rows(vec![
            row("a", Some("Zeta"), None, None),
            row("b", Some("Alpha"), None, None),
            row("c", Some("Alpha"), None, None),
            row("d", Some("Zeta"), None, None),
            row("e", Some("Mid"), None, None),
            row("f", None, None, None),
        ]);
        let insights = compute_insights(&table).expect("non-empty");
        let ranked: Vec<(&str, usize)> = insights
            .top_vendors
            .iter()
            .map(|v| (v.vendor.as_str(), v.count))
            .collect();
        assert_eq!(ranked, [("Zeta", 2), ("Alpha", 2), ("Mid", 1)]);
    }

    #[test]
    fn vendors_are_capped_at_ten() {
        let rows = (0..15)
            .map(|i| row(&format!("p{i}"), Some(format!("V{i}").as_str()), None, None))
            .collect();
        let insights = compute_insights(&ResultTable::from_rows(rows)).expect("non-empty");
        assert_eq!(insights.top_vendors.len(), TOP_VENDORS);
        assert_eq!(insights.top_vendors[0].vendor, "V0");
    }

    #[test]
    fn histogram_spans_min_to_max_with_closed_last_bin() {
        let table = ResultTable::from_rows(vec![
            row("a", None, Some(0.0), None),
            row("b", None, Some(15.0), None),
            row("c", None, Some(30.0), None),
            row("d", None, None, None),
        ]);
        let bins = compute_insights(&table)
            .expect("non-empty")
            .price_histogram
            .expect("prices present");

        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert!((bins[0].lower - 0.0).abs() < 1e-9);
        assert!((bins[HISTOGRAM_BINS - 1].upper - 30.0).abs() < 1e-9);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[15].count, 1);
        assert_eq!(bins[HISTOGRAM_BINS - 1].count, 1, "max lands in the last bin");
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn histogram_of_single_price_is_centered() {
        let table = ResultTable::from_rows(vec![
            row("a", None, Some(20.0), None),
            row("b", None, Some(20.0), None),
        ]);
        let bins = compute_insights(&table)
            .expect("non-empty")
            .price_histogram
            .expect("prices present");
        assert!((bins[0].lower - 19.5).abs() < 1e-9);
        assert!((bins[HISTOGRAM_BINS - 1].upper - 20.5).abs() < 1e-9);
        let filled: Vec<usize> = bins.iter().map(|b| b.count).filter(|&c| c > 0).collect();
        assert_eq!(filled, [2], "identical prices share one bin");
    }

    #[test]
    fn histogram_is_omitted_without_prices() {
        let table = ResultTable::from_rows(vec![row("a", Some("V"), None, None)]);
        assert_eq!(compute_insights(&table).expect("non-empty").price_histogram, None);
    }

    #[test]
    fn average_rating_ignores_nulls_and_rounds() {
        let table = ResultTable::from_rows(vec![
            row("a", None, None, Some(4.0)),
            row("b", None, None, Some(4.5)),
            row("c", None, None, Some(5.0)),
            row("d", None, None, None),
        ]);
        let insights = compute_insights(&table).expect("non-empty");
        assert_eq!(insights.average_rating, Some(4.5));

        let table = ResultTable::from_rows(vec![
            row("a", None, None, Some(4.0)),
            row("b", None, None, Some(4.0)),
            row("c", None, None, Some(5.0)),
        ]);
        assert_eq!(compute_insights(&table).expect("non-empty").average_rating, Some(4.33));
    }

    #[test]
    fn average_rating_is_omitted_without_ratings() {
        let table = ResultTable::from_rows(vec![row("a", None, Some(1.0), None)]);
        assert_eq!(compute_insights(&table).expect("non-empty").average_rating, None);
    }

    #[test]
    fn counts_variants_and_distinct_products() {
        let table = ResultTable::from_rows(vec![
            row("a", None, None, None),
            row("a", None, None, None),
            row("b", None, None, None),
        ]);
        let insights = compute_insights(&table).expect("non-empty");
        assert_eq!(insights.variant_count, 3);
        assert_eq!(insights.products_with_variants, 2);
    }
}
