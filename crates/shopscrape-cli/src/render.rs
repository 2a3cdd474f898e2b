//! Terminal rendering of scrape insights: summary metrics and bar charts.

use shopscrape_report::{HistogramBin, Insights, VendorCount};

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '#';

/// `product_count` is the catalog's product count, including products that
/// have no variants and therefore no rows.
pub(crate) fn print_insights(insights: &Insights, product_count: usize) {
    println!();
    for line in summary_lines(insights, product_count) {
        println!("{line}");
    }

    if !insights.top_vendors.is_empty() {
        println!();
        println!("Top vendors");
        for line in vendor_chart(&insights.top_vendors, BAR_WIDTH) {
            println!("{line}");
        }
    }

    if let Some(bins) = &insights.price_histogram {
        println!();
        println!("Price distribution");
        for line in histogram_chart(bins, BAR_WIDTH) {
            println!("{line}");
        }
    }
    println!();
}

pub(crate) fn summary_lines(insights: &Insights, product_count: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Variants: {}", insights.variant_count),
        format!("Products: {product_count}"),
    ];
    if insights.products_with_variants != product_count {
        lines.push(format!(
            "Products with variants: {}",
            insights.products_with_variants
        ));
    }
    if let Some(avg) = insights.average_rating {
        lines.push(format!("Average rating: {avg:.2}"));
    }
    lines
}

/// One line per vendor: padded name, bar scaled to the largest count, count.
pub(crate) fn vendor_chart(vendors: &[VendorCount], width: usize) -> Vec<String> {
    let label_width = vendors
        .iter()
        .map(|v| v.vendor.chars().count())
        .max()
        .unwrap_or(0);
    let max = vendors.iter().map(|v| v.count).max().unwrap_or(0);

    vendors
        .iter()
        .map(|v| {
            format!(
                "{:<label_width$}  {:<width$}  {}",
                v.vendor,
                bar(v.count, max, width),
                v.count
            )
        })
        .collect()
}

/// One line per bin: `[lower, upper)` price range, bar, count.
pub(crate) fn histogram_chart(bins: &[HistogramBin], width: usize) -> Vec<String> {
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let labels: Vec<String> = bins
        .iter()
        .map(|b| format!("{:.2} - {:.2}", b.lower, b.upper))
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    bins.iter()
        .zip(labels)
        .map(|(b, label)| {
            format!(
                "{label:>label_width$}  {:<width$}  {}",
                bar(b.count, max, width),
                b.count
            )
        })
        .collect()
}

/// Bar of `count / max * width` characters; any non-zero count gets at least one.
fn bar(count: usize, max: usize, width: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let len = (count * width / max).max(1);
    BAR_CHAR.to_string().repeat(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(name: &str, count: usize) -> VendorCount {
        VendorCount {
            vendor: name.to_string(),
            count,
        }
    }

    #[test]
    fn largest_vendor_gets_full_width_bar() {
        let lines = vendor_chart(&[vendor("Allbirds", 10), vendor("Bombas", 5)], 20);
        assert_eq!(lines[0], format!("Allbirds  {}  10", "#".repeat(20)));
        assert_eq!(lines[1], format!("Bombas    {}  5", format!("{:<20}", "#".repeat(10))));
    }

    fn insights(products_with_variants: usize, average_rating: Option<f64>) -> Insights {
        Insights {
            top_vendors: Vec::new(),
            price_histogram: None,
            average_rating,
            variant_count: 7,
            products_with_variants,
        }
    }

    #[test]
    fn products_metric_counts_the_whole_catalog() {
        let lines = summary_lines(&insights(3, Some(4.5)), 4);
        assert_eq!(
            lines,
            [
                "Variants: 7",
                "Products: 4",
                "Products with variants: 3",
                "Average rating: 4.50",
            ]
        );
    }

    #[test]
    fn summary_omits_redundant_and_missing_metrics() {
        let lines = summary_lines(&insights(4, None), 4);
        assert_eq!(lines, ["Variants: 7", "Products: 4"]);
    }

    #[test]
    fn small_nonzero_counts_still_show_a_bar() {
        assert_eq!(bar(1, 1000, 40), "#");
        assert_eq!(bar(0, 1000, 40), "");
    }

    #[test]
    fn histogram_lines_label_each_bin() {
        let bins = [
            HistogramBin {
                lower: 0.0,
                upper: 5.0,
                count: 2,
            },
            HistogramBin {
                lower: 5.0,
                upper: 10.0,
                count: 0,
            },
        ];
        let lines = histogram_chart(&bins, 4);
        assert_eq!(lines[0], " 0.00 - 5.00  ####  2");
        assert_eq!(lines[1], "5.00 - 10.00        0");
    }
}
