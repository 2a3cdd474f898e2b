//! End-to-end tests for `run_scrape` against a `wiremock` store.

use std::time::Duration;

use serde_json::json;
use shopscrape_core::Cell;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopscrape_scraper::{
    run_scrape, NoopProgress, ProgressObserver, ProgressUpdate, ScrapeOptions, ScrapeRequest,
    ScraperError, ShopifyClient,
};

fn test_client() -> ShopifyClient {
    ShopifyClient::new(5, "shopscrape-test/0.1").expect("failed to build test ShopifyClient")
}

fn request(server: &MockServer, options: ScrapeOptions) -> ScrapeRequest {
    ScrapeRequest {
        base_url: server.uri(),
        options,
    }
}

fn catalog_json() -> serde_json::Value {
    json!({
        "products": [
            {
                "id": 1,
                "title": "Wool Runner",
                "handle": "wool-runner",
                "vendor": "Allbirds",
                "body_html": "<p>Soft.</p>",
                "tags": "mens, wool",
                "options": [{"name": "Color", "position": 1}, {"name": "Size", "position": 2}],
                "images": [{"id": 11, "src": "https://cdn.example.com/red.jpg"}],
                "variants": [
                    {"id": 101, "price": "80.00", "compare_at_price": "100.00", "available": true,
                     "option1": "Red", "option2": "9", "image_id": 11},
                    {"id": 102, "price": "80.00", "available": false,
                     "option1": "Blue", "option2": "10"}
                ]
            },
            {
                "id": 2,
                "title": "Tree Dasher",
                "handle": "tree-dasher",
                "vendor": "Allbirds",
                "options": [{"name": "Material", "position": 1}],
                "variants": [
                    {"id": 201, "price": "125.00", "available": true, "option1": "Eucalyptus"}
                ]
            }
        ]
    })
}

fn rating_page(value: &str, count: u64) -> String {
    format!(
        r#"<script type="application/ld+json">{{"@type":"Product","aggregateRating":{{"ratingValue":"{value}","reviewCount":{count}}}}}</script>"#
    )
}

async fn mount_store(server: &MockServer, catalog: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(server)
        .await;
}

async fn mount_rating(server: &MockServer, handle: &str, body: String, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("/products/{handle}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[derive(Default)]
struct RecordingProgress {
    catalog: Option<(usize, u32)>,
    lines: Vec<String>,
    fractions: Vec<f64>,
    completed: Option<usize>,
}

impl ProgressObserver for RecordingProgress {
    fn on_catalog_fetched(&mut self, product_count: usize, pages_fetched: u32) {
        self.catalog = Some((product_count, pages_fetched));
    }

    fn on_product(&mut self, update: &ProgressUpdate<'_>) {
        self.lines.push(update.status_line());
        self.fractions.push(update.fraction());
    }

    fn on_complete(&mut self, row_count: usize) {
        self.completed = Some(row_count);
    }
}

#[tokio::test]
async fn scrape_flattens_every_variant_with_ratings() {
    let server = MockServer::start().await;
    mount_store(&server, catalog_json()).await;
    mount_rating(&server, "wool-runner", rating_page("4.5", 12), Duration::ZERO).await;
    mount_rating(&server, "tree-dasher", "<html></html>".to_owned(), Duration::ZERO).await;

    let mut progress = RecordingProgress::default();
    let report = run_scrape(
        &test_client(),
        &request(&server, ScrapeOptions::default()),
        &mut progress,
    )
    .await
    .expect("scrape should succeed");

    assert_eq!(report.product_count, 2);
    assert_eq!(report.variant_count(), 3);
    assert_eq!(report.pages_fetched, 1);
    assert!(report.interruption.is_none());

    let rows = report.table.rows();
    let ids: Vec<i64> = rows.iter().map(|r| r.variant_id).collect();
    assert_eq!(ids, [101, 102, 201]);

    assert_eq!(rows[0].rating, Some(4.5));
    assert_eq!(rows[0].review_count, Some(12));
    assert_eq!(rows[1].rating, Some(4.5));
    assert_eq!(rows[2].rating, None, "page without JSON-LD has no rating");

    assert_eq!(rows[0].discount_pct, Some(20.0));
    assert_eq!(rows[0].image.as_deref(), Some("https://cdn.example.com/red.jpg"));
    assert_eq!(rows[0].tags.as_deref(), Some("mens, wool"));
    assert_eq!(rows[0].option("color"), Some("Red"));
    assert_eq!(rows[2].option("material"), Some("Eucalyptus"));
    assert_eq!(
        rows[0].product_url,
        format!("{}/products/wool-runner", server.uri())
    );

    let columns = report.table.columns();
    assert_eq!(&columns[columns.len() - 3..], ["color", "size", "material"]);

    assert_eq!(progress.catalog, Some((2, 1)));
    assert_eq!(
        progress.lines,
        ["Scraping: Wool Runner (50%)", "Scraping: Tree Dasher (100%)"]
    );
    assert_eq!(progress.fractions, [0.5, 1.0]);
    assert_eq!(progress.completed, Some(3));
}

#[tokio::test]
async fn scrape_without_ratings_skips_storefront_pages() {
    let server = MockServer::start().await;
    mount_store(&server, catalog_json()).await;

    Mock::given(method("GET"))
        .and(path("/products/wool-runner"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rating_page("5", 1)))
        .expect(0)
        .mount(&server)
        .await;

    let options = ScrapeOptions {
        include_ratings: false,
        include_descriptions: false,
        ..ScrapeOptions::default()
    };
    let report = run_scrape(&test_client(), &request(&server, options), &mut NoopProgress)
        .await
        .expect("scrape should succeed");

    for row in report.table.rows() {
        assert_eq!(row.cell("rating"), Cell::Null);
        assert_eq!(row.cell("review count"), Cell::Null);
        assert_eq!(row.cell("product description"), Cell::Null);
    }
}

#[tokio::test]
async fn scrape_with_concurrency_keeps_catalog_order() {
    let server = MockServer::start().await;
    mount_store(&server, catalog_json()).await;
    // The first product's page answers last.
    mount_rating(
        &server,
        "wool-runner",
        rating_page("3.0", 2),
        Duration::from_millis(300),
    )
    .await;
    mount_rating(&server, "tree-dasher", rating_page("4.0", 8), Duration::ZERO).await;

    let options = ScrapeOptions {
        rating_concurrency: 4,
        ..ScrapeOptions::default()
    };
    let mut progress = RecordingProgress::default();
    let report = run_scrape(&test_client(), &request(&server, options), &mut progress)
        .await
        .expect("scrape should succeed");

    let rows = report.table.rows();
    let ids: Vec<i64> = rows.iter().map(|r| r.variant_id).collect();
    assert_eq!(ids, [101, 102, 201]);
    assert_eq!(rows[0].rating, Some(3.0));
    assert_eq!(rows[2].rating, Some(4.0));
    assert_eq!(progress.lines[0], "Scraping: Wool Runner (50%)");
}

#[tokio::test]
async fn scrape_of_empty_catalog_reports_no_products() {
    let server = MockServer::start().await;
    mount_store(&server, json!({"products": []})).await;

    let mut progress = RecordingProgress::default();
    let result = run_scrape(
        &test_client(),
        &request(&server, ScrapeOptions::default()),
        &mut progress,
    )
    .await;

    assert!(
        matches!(result, Err(ScraperError::EmptyCatalog { .. })),
        "expected EmptyCatalog, got: {result:?}"
    );
    assert!(progress.lines.is_empty(), "nothing should be flattened");
    assert!(progress.completed.is_none());
}

#[tokio::test]
async fn scrape_of_products_without_variants_reports_no_variants() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        json!({"products": [{"id": 1, "title": "Gift Card", "handle": "gift-card", "variants": []}]}),
    )
    .await;

    let options = ScrapeOptions {
        include_ratings: false,
        ..ScrapeOptions::default()
    };
    let result = run_scrape(&test_client(), &request(&server, options), &mut NoopProgress).await;

    match result {
        Err(ScraperError::NoVariants { product_count, .. }) => assert_eq!(product_count, 1),
        other => panic!("expected NoVariants, got: {other:?}"),
    }
}

#[tokio::test]
async fn scrape_of_non_shopify_site_fails_at_probe() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = run_scrape(
        &test_client(),
        &request(&server, ScrapeOptions::default()),
        &mut NoopProgress,
    )
    .await;

    assert!(
        matches!(result, Err(ScraperError::NotACatalog { .. })),
        "expected NotACatalog, got: {result:?}"
    );
}

#[tokio::test]
async fn scrape_keeps_partial_catalog_after_page_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let options = ScrapeOptions {
        include_ratings: false,
        ..ScrapeOptions::default()
    };
    let report = run_scrape(&test_client(), &request(&server, options), &mut NoopProgress)
        .await
        .expect("partial catalog is still a successful scrape");

    assert_eq!(report.variant_count(), 3);
    assert!(report.interruption.is_some());
}
