//! End-to-end behaviour of the product list view: fetch cycles, rendering
//! rules and stale-response handling.

use async_trait::async_trait;
use bluey_shop::api::{ApiClient, FetchError, Product, ProductApi, Region};
use bluey_shop::commands::{BrowseCommand, ShowCommand};
use bluey_shop::config::{Config, OutputFormat};
use bluey_shop::format::Formatter;
use bluey_shop::view::{Body, ProductListView, Settlement, StalePolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_pending;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API whose request never completes.
struct PendingApi;

#[async_trait]
impl ProductApi for PendingApi {
    async fn fetch_products(&self, _region: Region) -> Result<Vec<Product>, FetchError> {
        std::future::pending::<Result<Vec<Product>, FetchError>>().await
    }
}

/// API that fails every request the same way.
struct FailingApi(FetchError);

#[async_trait]
impl ProductApi for FailingApi {
    async fn fetch_products(&self, _region: Region) -> Result<Vec<Product>, FetchError> {
        Err(self.0.clone())
    }
}

/// API returning a fixed list.
struct FixedApi(Vec<Product>);

#[async_trait]
impl ProductApi for FixedApi {
    async fn fetch_products(&self, _region: Region) -> Result<Vec<Product>, FetchError> {
        Ok(self.0.clone())
    }
}

fn bluey_and_bingo() -> Vec<Product> {
    vec![
        Product {
            asin: "B01".to_string(),
            title: "Bluey Plush Toy".to_string(),
            url: "http://amazon.com/bluey-plush".to_string(),
            image_url: Some("http://example.com/bluey.jpg".to_string()),
            price: Some("$19.99".to_string()),
            rating: Some(4.8),
            reviews_count: Some(1500),
        },
        Product {
            asin: "B02".to_string(),
            title: "Bingo Plush Toy".to_string(),
            url: "http://amazon.com/bingo-plush".to_string(),
            image_url: Some("http://example.com/bingo.jpg".to_string()),
            price: Some("$18.99".to_string()),
            rating: None,
            reviews_count: None,
        },
    ]
}

const BLUEY_AND_BINGO_JSON: &str = r#"[
    {"asin": "B01", "title": "Bluey Plush Toy", "url": "http://amazon.com/bluey-plush",
     "image_url": "http://example.com/bluey.jpg", "price": "$19.99",
     "rating": 4.8, "reviews_count": 1500},
    {"asin": "B02", "title": "Bingo Plush Toy", "url": "http://amazon.com/bingo-plush",
     "image_url": "http://example.com/bingo.jpg", "price": "$18.99"}
]"#;

fn config_for(region: Region, format: OutputFormat) -> Config {
    Config { region, format, ..Config::default() }
}

#[test]
fn test_selecting_any_region_shows_loading_immediately() {
    let formatter = Formatter::new(OutputFormat::Text);
    let (mut view, _) = ProductListView::mount(Region::Us, StalePolicy::Discard);

    for region in Region::all() {
        view.select_region(region.code()).unwrap();
        assert_eq!(formatter.render(&view.body()), format!("Loading products for {}...", region));
    }
}

#[test]
fn test_never_settling_fetch_keeps_loading() {
    let cmd = ShowCommand::new(Config::default());
    let mut status = Vec::new();

    {
        let mut task = tokio_test::task::spawn(cmd.execute_with_client(&PendingApi, &mut status));
        assert_pending!(task.poll());
        assert_pending!(task.poll());
    }

    let status = String::from_utf8(status).unwrap();
    assert_eq!(status, "Loading products for US...\n");
    assert!(!status.contains("Failed"));
    assert!(!status.contains("No products found"));
}

#[tokio::test]
async fn test_network_error_shows_exact_message() {
    let cmd = ShowCommand::new(config_for(Region::Us, OutputFormat::Text));
    let api = FailingApi(FetchError::Transport("Network Error".to_string()));

    let output = cmd.execute_with_client(&api, &mut Vec::new()).await.unwrap();
    assert_eq!(output, "Failed to fetch products for US: Network Error");
}

#[tokio::test]
async fn test_empty_list_shows_exact_message() {
    let cmd = ShowCommand::new(config_for(Region::Us, OutputFormat::Text));

    let output = cmd.execute_with_client(&FixedApi(Vec::new()), &mut Vec::new()).await.unwrap();
    assert_eq!(output, "No products found for US.");
}

#[tokio::test]
async fn test_two_products_render_cards() {
    let cmd = ShowCommand::new(config_for(Region::Us, OutputFormat::Markdown));

    let output =
        cmd.execute_with_client(&FixedApi(bluey_and_bingo()), &mut Vec::new()).await.unwrap();

    // Titles as links, images with the title as alt text
    assert!(output.contains("[Bluey Plush Toy](http://amazon.com/bluey-plush)"));
    assert!(output.contains("[Bingo Plush Toy](http://amazon.com/bingo-plush)"));
    assert!(output.contains("![Bluey Plush Toy](http://example.com/bluey.jpg)"));
    assert!(output.contains("![Bingo Plush Toy](http://example.com/bingo.jpg)"));
    assert!(output.contains("$19.99"));
    assert!(output.contains("$18.99"));
    assert_eq!(output.matches("Rating:").count(), 1);
    assert!(output.contains("Rating: 4.8 / 5 (1500 reviews)"));
    assert_eq!(output.matches("[View on Amazon]").count(), 2);
    assert!(!output.contains("Loading products for US..."));
    assert!(!output.contains("Failed to fetch products for US"));
}

#[tokio::test]
async fn test_reselecting_region_is_idempotent() {
    let formatter = Formatter::new(OutputFormat::Text);
    let api = FixedApi(bluey_and_bingo());
    let (mut view, ticket) = ProductListView::mount(Region::Us, StalePolicy::Discard);

    view.settle(ticket, api.fetch_products(ticket.region).await);
    let first = formatter.render(&view.body());

    let ticket = view.select_region("US").unwrap();
    assert_eq!(formatter.render(&view.body()), "Loading products for US...");

    view.settle(ticket, api.fetch_products(ticket.region).await);
    assert_eq!(formatter.render(&view.body()), first);
}

#[test]
fn test_display_modes_are_exclusive() {
    let formatter = Formatter::new(OutputFormat::Text);
    let products = bluey_and_bingo();
    let (mut view, ticket) = ProductListView::mount(Region::Us, StalePolicy::Discard);

    let mut frames = vec![formatter.render(&view.body())];

    view.settle(ticket, Err(FetchError::Status(500)));
    frames.push(formatter.render(&view.body()));

    let ticket = view.begin_cycle();
    frames.push(formatter.render(&view.body()));

    view.settle(ticket, Ok(Vec::new()));
    frames.push(formatter.render(&view.body()));

    let ticket = view.begin_cycle();
    view.settle(ticket, Ok(products));
    frames.push(formatter.render(&view.body()));

    for frame in &frames {
        let modes = [
            frame.contains("Loading products for"),
            frame.contains("Failed to fetch products for"),
            frame.contains("No products found for"),
            frame.contains("Available Products"),
        ];
        assert_eq!(modes.iter().filter(|m| **m).count(), 1, "frame mixes modes: {}", frame);
    }
}

#[test]
fn test_out_of_order_settlements() {
    let (mut view, us) = ProductListView::mount(Region::Us, StalePolicy::Discard);
    let uk = view.select_region("UK").unwrap();
    let au = view.select_region("AU").unwrap();

    assert_eq!(view.settle(uk, Ok(bluey_and_bingo())), Settlement::Stale);
    assert_eq!(view.body(), Body::Loading(Region::Au));

    assert_eq!(view.settle(au, Ok(Vec::new())), Settlement::Applied);
    assert_eq!(view.settle(us, Err(FetchError::Status(500))), Settlement::Stale);
    assert_eq!(view.body(), Body::Empty(Region::Au));
}

#[test]
fn test_last_settled_wins_preserves_race() {
    let (mut view, us) = ProductListView::mount(Region::Us, StalePolicy::LastSettledWins);
    let uk = view.select_region("UK").unwrap();

    view.settle(uk, Ok(Vec::new()));
    view.settle(us, Ok(bluey_and_bingo()));

    // The late US response overwrites the UK result
    match view.body() {
        Body::Products(_, products) => assert_eq!(products[0].asin, "B01"),
        other => panic!("unexpected body: {:?}", other),
    }
}

#[tokio::test]
async fn test_show_against_http_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("region", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BLUEY_AND_BINGO_JSON))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(Region::Us, OutputFormat::Text);
    config.api_url = mock_server.uri();

    let client = ApiClient::new(&config).unwrap();
    let output = ShowCommand::new(config)
        .execute_with_client(&client, &mut Vec::new())
        .await
        .unwrap();

    assert!(output.contains("Bluey Plush Toy"));
    assert!(output.contains("Bingo Plush Toy"));
    assert_eq!(output.matches("Rating: 4.8 / 5 (1500 reviews)").count(), 1);
    assert_eq!(output.matches("View on Amazon").count(), 2);
}

#[tokio::test]
async fn test_show_against_failing_http_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut config = config_for(Region::Nz, OutputFormat::Text);
    config.api_url = mock_server.uri();

    let client = ApiClient::new(&config).unwrap();
    let output = ShowCommand::new(config)
        .execute_with_client(&client, &mut Vec::new())
        .await
        .unwrap();

    assert_eq!(output, "Failed to fetch products for NZ: HTTP error! status: 500");
}

#[tokio::test]
async fn test_browse_discards_slow_superseded_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("region", "US"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(BLUEY_AND_BINGO_JSON)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("region", "UK"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let mut config = config_for(Region::Us, OutputFormat::Text);
    config.api_url = mock_server.uri();
    let client = Arc::new(ApiClient::new(&config).unwrap());

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send("uk".to_string()).unwrap();
    drop(tx);

    let mut out = Vec::new();
    BrowseCommand::new(config).execute_with_client(client, rx, &mut out).await.unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Loading products for US..."));
    assert!(output.contains("Loading products for UK..."));
    assert!(output.trim_end().ends_with("No products found for UK."));
    assert!(!output.contains("Bluey Plush Toy"));
}
