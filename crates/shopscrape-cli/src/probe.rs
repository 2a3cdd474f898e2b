use anyhow::Context;
use shopscrape_core::AppConfig;
use shopscrape_scraper::{normalize_domain, ShopifyClient};

/// `shopscrape probe`: normalize the domain and check its catalog endpoint.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the store does not
/// expose a public catalog.
pub(crate) async fn run_probe_command(config: &AppConfig, domain: &str) -> anyhow::Result<()> {
    let domain = domain.trim();
    if domain.is_empty() {
        tracing::warn!("no domain given; nothing to probe");
        println!("warning: please enter a valid Shopify domain.");
        return Ok(());
    }

    let base_url = normalize_domain(domain);
    let client = ShopifyClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build HTTP client")?;

    client
        .probe_catalog(&base_url)
        .await
        .with_context(|| format!("{base_url} does not expose a public Shopify catalog"))?;

    println!("{base_url} exposes a public Shopify product catalog.");
    Ok(())
}
