//! Store URL normalization and storefront URL construction.

/// Normalizes free-form user input into a canonical `https://{host}` base URL.
///
/// Input without an `http://`/`https://` scheme gets `https://` prepended.
/// Path, query, fragment and credentials are dropped; the scheme is always
/// forced to `https`. A non-default port is preserved.
///
/// Input that cannot be parsed, or that has no host, yields the degenerate
/// `"https://"`. No I/O happens here, so such a base URL is only rejected
/// later by the catalog probe.
#[must_use]
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = match reqwest::Url::parse(&candidate) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(input, error = %e, "could not parse store domain");
            return "https://".to_owned();
        }
    };

    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("https://{host}:{port}"),
        (Some(host), None) => format!("https://{host}"),
        (None, _) => "https://".to_owned(),
    }
}

/// Storefront page for a product: `{base_url}/products/{handle}`.
#[must_use]
pub fn product_url(base_url: &str, handle: &str) -> String {
    format!("{}/products/{handle}", base_url.trim_end_matches('/'))
}

/// Deep link to a single variant: `{product_url}?variant={variant_id}`.
#[must_use]
pub fn variant_url(product_url: &str, variant_id: i64) -> String {
    format!("{product_url}?variant={variant_id}")
}

#[cfg(test)]
#[path = "domain_test.rs"]
mod tests;
