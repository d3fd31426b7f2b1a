//! Integration tests for the scraper
//!
//! These tests use wiremock to serve search result and profile pages and
//! run the full walk, extraction, enrichment and write cycle end-to-end.

use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wlw_scraper::config::{Config, HttpConfig};
use wlw_scraper::crawler::{Coordinator, DetailFetcher, Fetcher, Termination};
use wlw_scraper::{CompanyRecord, Language, Mode, Record, ScrapeError};

const SEARCH_PATH: &str = "/de/firmen/";

const EXAMPLE_LISTING: &str = r#"<html><body>
  <article data-test="company-result-card">
    <h2 data-test="company-name">Muster Metallbau GmbH</h2>
    <a data-test="company-link" href="/de/firma/muster-metallbau-gmbh-123456">Profil</a>
    <div data-test="company-address">Industriestraße 5, 12345 Berlin, Deutschland</div>
    <p data-test="company-description">Stahlbau und Schlosserei</p>
    <a href="mailto:info@muster-metallbau.de">E-Mail</a>
    <a href="tel:+49301234567">Anrufen</a>
    <a href="https://www.muster-metallbau.de">Website</a>
  </article>
</body></html>"#;

const PROFILE: &str = r#"<html><body>
  <h1>Muster Metallbau GmbH</h1>
  <dl><dt>Gründungsjahr</dt><dd>1987</dd></dl>
  <p>USt-IdNr.: DE123456789</p>
  <div data-test="contact-person">
    <h4>Anna Schmidt</h4>
    <span class="role">Vertrieb</span>
  </div>
  <section>
    <h3>Zertifizierungen</h3>
    <ul><li>ISO 9001</li></ul>
  </section>
</body></html>"#;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.search.query = Some("Metallbau".to_string());
    config.search.max_pages = 1;
    config.search.include_company_details = false;
    config.http.timeout_secs = 5;
    config.http.retries = 2;
    config.http.backoff_ms = 1;
    config.http.request_delay_ms = 0;
    config.output.output_dir = output_dir.to_path_buf();
    config
}

/// Builds a result page with one minimal card per (id, name)
fn listing_page(companies: &[(&str, &str)]) -> String {
    let cards: String = companies
        .iter()
        .map(|(id, name)| {
            format!(
                r#"<article data-test="company-result-card">
                     <h2 data-test="company-name">{}</h2>
                     <a data-test="company-link" href="/de/firma/firma-{}">Profil</a>
                   </article>"#,
                name, id
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn company(record: &Record) -> &CompanyRecord {
    match record {
        Record::Company(company) => company,
        Record::Product(_) => panic!("expected a company record"),
    }
}

#[tokio::test]
async fn test_page_limit_bounds_fetches() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", listing_page(&[("1", "Erste GmbH")])).await;
    mount_page(&mock_server, "2", listing_page(&[("2", "Zweite GmbH")])).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", "3"))
        .respond_with(html(listing_page(&[("3", "Dritte GmbH")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.max_pages = 2;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let (records, summary) = coordinator.collect().await.expect("Scrape failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(records.len(), 2);
    assert!(matches!(
        summary.termination,
        Some(Termination::PageLimit { max: 2 })
    ));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_search_request_carries_query_and_region() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/en/firmen/"))
        .and(query_param("q", "Metallbau"))
        .and(query_param("page", "1"))
        .and(query_param("country", "AT"))
        .respond_with(html(listing_page(&[("1", "Wiener Stahl")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.region = wlw_scraper::Region::At;
    config.search.language = Language::En;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, _) = coordinator.collect().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(company(&records[0]).region.as_deref(), Some("AT"));
}

#[tokio::test]
async fn test_empty_page_stops_walk() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", listing_page(&[("1", "Erste GmbH")])).await;
    mount_page(
        &mock_server,
        "2",
        "<html><body><p>Keine Ergebnisse</p></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", "3"))
        .respond_with(html(listing_page(&[("3", "Dritte GmbH")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.max_pages = 0;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(summary.pages_fetched, 2);
    assert!(matches!(
        summary.termination,
        Some(Termination::EmptyPage { page: 2 })
    ));
    assert!(!summary.is_partial());
}

#[tokio::test]
async fn test_empty_body_counts_as_empty_page() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", String::new()).await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.max_pages = 0;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert!(records.is_empty());
    assert!(matches!(
        summary.termination,
        Some(Termination::EmptyPage { page: 1 })
    ));
}

#[tokio::test]
async fn test_duplicates_across_pages_are_dropped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "1",
        listing_page(&[("1", "Erste GmbH"), ("2", "Zweite GmbH")]),
    )
    .await;
    mount_page(
        &mock_server,
        "2",
        listing_page(&[("2", "Zweite GmbH (Kopie)"), ("3", "Dritte GmbH")]),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.max_pages = 2;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    let ids: Vec<&str> = records.iter().map(Record::identifier).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(company(&records[1]).name.as_deref(), Some("Zweite GmbH"));
    assert_eq!(summary.duplicates_dropped, 1);
    assert_eq!(summary.listings_seen, 4);
    assert_eq!(summary.records_collected, 3);
}

#[tokio::test]
async fn test_example_listing_without_details() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", EXAMPLE_LISTING.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/de/firma/muster-metallbau-gmbh-123456"))
        .respond_with(html(PROFILE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let output_path = config.output.output_path();

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Scrape failed");
    assert_eq!(summary.records_collected, 1);
    assert_eq!(summary.detail_fetches, 0);
    assert_eq!(summary.output_path.as_deref(), Some(output_path.as_path()));

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 1);

    let record = &array[0]["company"];
    assert_eq!(record["company_id"], "123456");
    assert_eq!(record["name"], "Muster Metallbau GmbH");
    assert_eq!(record["email"], "info@muster-metallbau.de");
    assert_eq!(record["phone_number"], "+49301234567");
    assert_eq!(record["homepage"], "https://www.muster-metallbau.de");
    assert_eq!(record["address"]["street"], "Industriestraße 5");
    assert_eq!(record["address"]["postal_code"], "12345");
    assert_eq!(record["address"]["city"], "Berlin");
    assert_eq!(record["address"]["country_code"], "DE");
    assert_eq!(record["description"], "Stahlbau und Schlosserei");
    assert_eq!(record["region"], "DE");
    assert!(record["vat_id"].is_null());
    assert!(record["founding_year"].is_null());
    assert_eq!(record["contacts"], serde_json::json!([]));
}

#[tokio::test]
async fn test_details_are_merged() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", EXAMPLE_LISTING.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/de/firma/muster-metallbau-gmbh-123456"))
        .respond_with(html(PROFILE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.include_company_details = true;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert_eq!(summary.detail_fetches, 1);
    assert_eq!(summary.detail_failures, 0);

    let record = company(&records[0]);
    assert_eq!(record.email.as_deref(), Some("info@muster-metallbau.de"));
    assert_eq!(record.founding_year, Some(1987));
    assert_eq!(record.vat_id.as_deref(), Some("DE123456789"));
    assert_eq!(record.contacts.len(), 1);
    assert_eq!(record.contacts[0].last_name.as_deref(), Some("Schmidt"));
    assert!(record.certificates.contains("ISO 9001"));
}

#[tokio::test]
async fn test_failing_detail_keeps_base_record() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "1",
        listing_page(&[("1", "Erste GmbH"), ("2", "Zweite GmbH")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/de/firma/firma-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/de/firma/firma-2"))
        .respond_with(html(PROFILE))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.include_company_details = true;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(summary.detail_fetches, 2);
    assert_eq!(summary.detail_failures, 1);

    let failed = company(&records[0]);
    assert_eq!(failed.company_id, "1");
    assert_eq!(failed.name.as_deref(), Some("Erste GmbH"));
    assert!(failed.vat_id.is_none());
    assert!(failed.contacts.is_empty());

    let enriched = company(&records[1]);
    assert_eq!(enriched.vat_id.as_deref(), Some("DE123456789"));
}

#[tokio::test]
async fn test_detail_merge_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/de/firma/muster-metallbau-gmbh-123456"))
        .respond_with(html(PROFILE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let base = Url::parse(&mock_server.uri()).unwrap();
    let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
    let details = DetailFetcher::new(&fetcher, &base, Language::De);

    let mut record = CompanyRecord::new("123456");
    record.name = Some("Muster Metallbau".to_string());
    record.profile_url = Some(format!(
        "{}/de/firma/muster-metallbau-gmbh-123456",
        mock_server.uri()
    ));

    assert!(details.enrich(&mut record).await);
    let once = record.clone();
    assert!(details.enrich(&mut record).await);

    assert_eq!(once, record);
    assert_eq!(record.name.as_deref(), Some("Muster Metallbau"));
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "1", listing_page(&[("1", "Erste GmbH")])).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(summary.pages_fetched, 1);
    assert!(!summary.is_partial());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_not_found_is_not_retried_and_output_is_partial() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", listing_page(&[("1", "Erste GmbH")])).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.max_pages = 0;
    let output_path = config.output.output_path();

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert!(summary.is_partial());
    assert_eq!(summary.pages_fetched, 1);
    assert!(matches!(
        summary.termination,
        Some(Termination::FetchFailed { page: 2, .. })
    ));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_retry_budget_exhausted_ends_walk() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert!(records.is_empty());
    assert_eq!(summary.pages_fetched, 0);
    assert!(matches!(
        summary.termination,
        Some(Termination::FetchFailed { page: 1, .. })
    ));
}

#[tokio::test]
async fn test_write_failure_leaves_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "1", listing_page(&[("1", "Erste GmbH")])).await;

    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let config = create_test_config(&mock_server.uri(), &blocker);
    let output_path = config.output.output_path();

    let coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(ScrapeError::Write { .. })));
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_product_mode() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/de/produkte/"))
        .and(query_param("page", "1"))
        .respond_with(html(
            r#"<html><body>
                 <div data-test="product-result-card">
                   <h3 data-test="product-name">Edelstahl Treppe</h3>
                   <a data-test="product-link" href="/de/produkte/edelstahl-treppe-5001">Details</a>
                   <a data-test="company-link" href="/de/firma/muster-metallbau-gmbh-123456">Anbieter</a>
                 </div>
               </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.search.mode = Mode::Product;
    config.search.include_company_details = true;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, summary) = coordinator.collect().await.unwrap();

    assert_eq!(summary.detail_fetches, 0);
    assert_eq!(records.len(), 1);
    match &records[0] {
        Record::Product(product) => {
            assert_eq!(product.product_id, "5001");
            assert_eq!(product.company_id.as_deref(), Some("123456"));
        }
        Record::Company(_) => panic!("expected a product record"),
    }
}
