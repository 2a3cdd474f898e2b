//! `shopscrape scrape`: the full pipeline plus terminal insights and exports.

use anyhow::Context;
use shopscrape_core::AppConfig;
use shopscrape_report::{compute_insights, write_exports, ExportFormat};
use shopscrape_scraper::{
    run_scrape, ProgressObserver, ProgressUpdate, ScrapeOptions, ScrapeRequest, ScraperError,
    ShopifyClient,
};

use crate::render;
use crate::ScrapeArgs;

/// Prints one status line per processed product.
#[derive(Debug, Default)]
struct TerminalProgress;

impl ProgressObserver for TerminalProgress {
    fn on_catalog_fetched(&mut self, product_count: usize, pages_fetched: u32) {
        println!("Found {product_count} products across {pages_fetched} page(s).");
    }

    fn on_product(&mut self, update: &ProgressUpdate<'_>) {
        println!("{}", update.status_line());
    }

    fn on_complete(&mut self, row_count: usize) {
        println!("Scraping complete: {row_count} variants.");
    }
}

/// Applies command-line overrides on top of the environment config.
pub(crate) fn effective_config(config: &AppConfig, args: &ScrapeArgs) -> AppConfig {
    let mut config = config.clone();
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(n) = args.rating_concurrency {
        config.rating_concurrency = n;
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }
    config
}

pub(crate) fn scrape_options(config: &AppConfig, args: &ScrapeArgs) -> ScrapeOptions {
    ScrapeOptions {
        include_ratings: !args.no_ratings,
        include_descriptions: !args.no_descriptions,
        rating_concurrency: config.rating_concurrency,
    }
}

/// Formats requested on the command line, or all of them.
pub(crate) fn export_formats(args: &ScrapeArgs) -> Vec<ExportFormat> {
    if args.formats.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        args.formats.clone()
    }
}

/// Runs a scrape and reports the outcome on the terminal.
///
/// A blank domain, an empty catalog and a catalog without variants are
/// warnings, not failures.
///
/// # Errors
///
/// Returns an error if the domain is not a Shopify store with a public
/// catalog, the HTTP client cannot be built, or an export cannot be written.
pub(crate) async fn run_scrape_command(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    let domain = args.domain.trim();
    if domain.is_empty() {
        tracing::warn!("no domain given; nothing to scrape");
        println!("warning: please enter a valid Shopify domain.");
        return Ok(());
    }

    let config = effective_config(config, args);
    let client = ShopifyClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build HTTP client")?;
    let request = ScrapeRequest::for_domain(domain, scrape_options(&config, args));

    println!("Scraping {} ...", request.base_url);
    let mut progress = TerminalProgress;
    let report = match run_scrape(&client, &request, &mut progress).await {
        Ok(report) => report,
        Err(ScraperError::EmptyCatalog { base_url }) => {
            println!("warning: no products found at {base_url}.");
            return Ok(());
        }
        Err(ScraperError::NoVariants {
            base_url,
            product_count,
        }) => {
            println!("warning: {product_count} products found at {base_url}, but none has variants.");
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("could not scrape {}", request.base_url));
        }
    };

    if let Some(e) = &report.interruption {
        println!(
            "warning: catalog is partial; pagination stopped after page {} ({e}).",
            report.pages_fetched
        );
    }

    if let Some(insights) = compute_insights(&report.table) {
        render::print_insights(&insights, report.product_count);
    }

    if args.no_export {
        return Ok(());
    }

    let at = chrono::Local::now().naive_local();
    let paths = write_exports(&report.table, &config.output_dir, &export_formats(args), at)
        .context("failed to write exports")?;
    for path in paths {
        println!("Saved {}", path.display());
    }

    Ok(())
}
