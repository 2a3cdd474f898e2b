mod probe;
mod render;
mod scrape;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shopscrape_report::ExportFormat;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopscrape")]
#[command(about = "Export the public product catalog of a Shopify store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a store: every variant, optional ratings, insights and exports.
    Scrape(ScrapeArgs),
    /// Only check whether a domain exposes a public Shopify catalog.
    Probe {
        /// Store domain, e.g. `allbirds.com`.
        domain: String,
    },
}

#[derive(Debug, Clone, Args)]
struct ScrapeArgs {
    /// Store domain, e.g. `allbirds.com` or `https://allbirds.com/collections/all`.
    domain: String,

    /// Skip fetching storefront pages for ratings.
    #[arg(long)]
    no_ratings: bool,

    /// Leave the product description column empty.
    #[arg(long)]
    no_descriptions: bool,

    /// Export formats; repeat or comma-separate. Defaults to all three.
    #[arg(long = "format", value_name = "FORMAT", value_delimiter = ',', value_parser = parse_format)]
    formats: Vec<ExportFormat>,

    /// Directory for export files (overrides `SHOPSCRAPE_OUTPUT_DIR`).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Storefront pages fetched at once for ratings (overrides `SHOPSCRAPE_RATING_CONCURRENCY`).
    #[arg(long, value_parser = parse_positive_usize)]
    rating_concurrency: Option<usize>,

    /// Per-request timeout in seconds (overrides `SHOPSCRAPE_REQUEST_TIMEOUT_SECS`).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Print insights only; write no files.
    #[arg(long)]
    no_export: bool,
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse::<ExportFormat>().map_err(|e| e.to_string())
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loads `.env` before reading the environment.
    let config = shopscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape_command(&config, &args).await,
        Commands::Probe { domain } => probe::run_probe_command(&config, &domain).await,
    }
}
