//! Integration tests for the crawler
//!
//! These tests use wiremock to serve index and country pages and run the
//! full crawl cycle end-to-end, artifacts included.

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use unlocode_crawler::config::Config;
use unlocode_crawler::crawler::{run_crawl, Coordinator};
use unlocode_crawler::model::Country;
use unlocode_crawler::search::Dataset;
use unlocode_crawler::{CountryIndexEntry, CrawlError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock index
fn create_test_config(base_url: &str, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.index_url = format!("{}/unlocode/index", base_url);
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config.output.data_dir = data_dir.to_path_buf();
    config
}

/// Index page with one row per `(code, name cell html)`
fn index_page(rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(code, cell)| format!("<tr><td>{}</td><td>{}</td></tr>", code, cell))
        .collect();
    format!(
        r#"<html><body><table>
        <tr><th>ISO 3166-1</th><th>Country or Area</th></tr>{}
        </table></body></html>"#,
        body
    )
}

/// Country page with one row per `(locode cell, name, coordinates)`
fn country_page(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(locode, name, coords)| {
            format!(
                "<tr><td></td><td>{}</td><td>{}</td><td>{}</td><td></td><td>1-------</td>\
                 <td>AI</td><td>0001</td><td></td><td>{}</td><td></td></tr>",
                locode, name, name, coords
            )
        })
        .collect();
    format!(
        r#"<html><body><table>
        <tr><th>Ch</th><th>LOCODE</th><th>Name</th><th>NameWoDiacritics</th><th>SubDiv</th>
            <th>Function</th><th>Status</th><th>Date</th><th>IATA</th><th>Coordinates</th><th>Remarks</th></tr>
        {}</table></body></html>"#,
        body
    )
}

async fn mount_html(server: &MockServer, route: &str, html: String, delay: Option<Duration>) {
    let mut response = ResponseTemplate::new(200)
        .set_body_string(html)
        .insert_header("content-type", "text/html");
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn read_countries(path: &Path) -> Vec<Country> {
    let text = std::fs::read_to_string(path).expect("countries artifact missing");
    serde_json::from_str(&text).expect("countries artifact is not valid JSON")
}

/// Serves Singapore (two segment pages) and Algeria (one page)
async fn mount_two_countries(server: &MockServer) {
    mount_html(
        server,
        "/unlocode/index",
        index_page(&[
            (
                "SG",
                r#"Singapore <a href="sg1.htm">[A to E]</a> <a href="/unlocode/sg2.htm">[F to Z]</a>"#
                    .to_string(),
            ),
            ("DZ", r#"<a href="dz.htm">Algeria</a>"#.to_string()),
        ]),
        None,
    )
    .await;

    mount_html(
        server,
        "/unlocode/sg1.htm",
        country_page(&[
            ("SG&nbsp;&nbsp;JUR", "Jurong Island", "0116N 10342E"),
            ("SG SIN", "Singapore", "0117N 10350E"),
        ]),
        None,
    )
    .await;

    mount_html(
        server,
        "/unlocode/sg2.htm",
        country_page(&[
            ("SG SIN", "Singapore City", ""),
            ("SG KEP", "Keppel", ""),
        ]),
        None,
    )
    .await;

    mount_html(
        server,
        "/unlocode/dz.htm",
        country_page(&[
            ("DZ  AZR", "Arzew", "3550N 00019W"),
            ("DZ AZR", "Arzew Duplicate", "3551N 00020W"),
            ("DZ", "No location code", ""),
        ]),
        None,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_writes_both_artifacts() {
    let mock_server = MockServer::start().await;
    mount_two_countries(&mock_server).await;

    let data_dir = TempDir::new().unwrap();
    let out_dir = data_dir.path().join("data");
    let config = create_test_config(&mock_server.uri(), &out_dir);

    let outcome = run_crawl(config.clone()).await.expect("crawl failed");

    // index artifact
    let index_text = std::fs::read_to_string(config.output.index_path()).unwrap();
    let index: Vec<CountryIndexEntry> = serde_json::from_str(&index_text).unwrap();
    assert_eq!(index, outcome.index);
    assert_eq!(index[0].display_name, "Singapore");
    assert_eq!(
        index[0].detail_links,
        vec![
            format!("{}/unlocode/sg1.htm", mock_server.uri()),
            format!("{}/unlocode/sg2.htm", mock_server.uri()),
        ]
    );

    // countries artifact
    let countries = read_countries(&config.output.countries_path());
    assert_eq!(countries, outcome.countries);

    let codes: Vec<&str> = countries.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["SG", "DZ"]);

    let sg: Vec<(&str, &str)> = countries[0]
        .ports
        .iter()
        .map(|p| (p.locode.as_str(), p.name.as_str()))
        .collect();
    assert_eq!(
        sg,
        vec![
            ("SGJUR", "Jurong Island"),
            ("SGSIN", "Singapore"),
            ("SGKEP", "Keppel"),
        ]
    );

    let dz = &countries[1];
    assert_eq!(dz.name, "Algeria");
    assert_eq!(dz.ports.len(), 2);
    assert_eq!(dz.ports[0].locode, "DZAZR");
    assert_eq!(dz.ports[0].name, "Arzew");
    let coords = dz.ports[0].coordinates.unwrap();
    assert_eq!((coords.longitude, coords.latitude), (-0.32, 35.83));
    // a LOCODE cell without a location part keeps its raw text
    assert_eq!(dz.ports[1].locode, "DZ");

    assert_eq!(outcome.statistics.links_attempted, 3);
    assert_eq!(outcome.statistics.links_failed, 0);
    assert_eq!(outcome.statistics.records_extracted, 7);
    assert_eq!(outcome.statistics.ports, 5);
}

#[tokio::test]
async fn test_failed_links_keep_country_with_empty_ports() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/unlocode/index",
        index_page(&[
            ("DZ", r#"<a href="dz.htm">Algeria</a>"#.to_string()),
            // nothing listens on port 9
            ("XA", r#"<a href="http://127.0.0.1:9/xa.htm">Unreachable</a>"#.to_string()),
            ("FR", r#"<a href="fr.htm">France</a>"#.to_string()),
        ]),
        None,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/unlocode/dz.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/unlocode/fr.htm",
        country_page(&[("FR PAR", "Paris", "4852N 00220E")]),
        None,
    )
    .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let outcome = run_crawl(config.clone()).await.expect("crawl failed");

    let countries = read_countries(&config.output.countries_path());
    let summary: Vec<(&str, usize)> = countries
        .iter()
        .map(|c| (c.code.as_str(), c.ports.len()))
        .collect();
    assert_eq!(summary, vec![("DZ", 0), ("XA", 0), ("FR", 1)]);

    assert!(config.output.index_path().exists());
    assert_eq!(outcome.statistics.links_failed, 2);
    assert_eq!(outcome.statistics.countries_without_ports, 2);
}

#[tokio::test]
async fn test_output_order_follows_index_not_completion() {
    let mock_server = MockServer::start().await;
    let codes = ["AA", "BB", "CC", "DD", "EE", "FF"];

    let rows: Vec<(&str, String)> = codes
        .iter()
        .map(|code| (*code, format!(r#"<a href="{}.htm">Country {}</a>"#, code, code)))
        .collect();
    mount_html(&mock_server, "/unlocode/index", index_page(&rows), None).await;

    // earlier countries answer slower
    for (i, code) in codes.iter().enumerate() {
        let delay = Duration::from_millis(50 * (codes.len() - i) as u64);
        let locode = format!("{} {}1", code, code);
        mount_html(
            &mock_server,
            &format!("/unlocode/{}.htm", code),
            country_page(&[(locode.as_str(), "Harbour", "")]),
            Some(delay),
        )
        .await;
    }

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let outcome = run_crawl(config).await.expect("crawl failed");

    let emitted: Vec<&str> = outcome.countries.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(emitted, codes.to_vec());
    for country in &outcome.countries {
        assert_eq!(country.ports.len(), 1);
        assert_eq!(country.ports[0].locode, format!("{}{}1", country.code, country.code));
    }
}

#[tokio::test]
async fn test_fetches_are_capped_at_three_in_flight() {
    let mock_server = MockServer::start().await;
    let codes = ["AA", "BB"];
    let segments = ["a", "b", "c"];

    let rows: Vec<(&str, String)> = codes
        .iter()
        .map(|code| {
            let links: String = segments
                .iter()
                .map(|seg| format!(r#" <a href="{}{}.htm">[{}]</a>"#, code, seg, seg))
                .collect();
            (*code, format!("Country {}{}", code, links))
        })
        .collect();
    mount_html(&mock_server, "/unlocode/index", index_page(&rows), None).await;

    for code in &codes {
        for (i, seg) in segments.iter().enumerate() {
            let locode = format!("{} {}{}", code, code, i);
            mount_html(
                &mock_server,
                &format!("/unlocode/{}{}.htm", code, seg),
                country_page(&[(locode.as_str(), "Harbour", "")]),
                Some(Duration::from_millis(300)),
            )
            .await;
        }
    }

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let started = std::time::Instant::now();
    let outcome = run_crawl(config).await.expect("crawl failed");
    let elapsed = started.elapsed();

    // six slow links through three slots take two waves, not one
    assert!(
        elapsed >= Duration::from_millis(600),
        "six links finished in {:?}",
        elapsed
    );
    assert!(
        elapsed < Duration::from_millis(1800),
        "links were fetched one at a time ({:?})",
        elapsed
    );

    assert_eq!(outcome.statistics.links_attempted, 6);
    assert_eq!(outcome.statistics.links_failed, 0);
    for country in &outcome.countries {
        let locodes: Vec<&str> = country.ports.iter().map(|p| p.locode.as_str()).collect();
        let expected: Vec<String> = (0..3)
            .map(|i| format!("{}{}{}", country.code, country.code, i))
            .collect();
        assert_eq!(locodes, expected);
    }
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let mock_server = MockServer::start().await;
    mount_two_countries(&mock_server).await;

    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = create_test_config(&mock_server.uri(), first_dir.path());
    let second = create_test_config(&mock_server.uri(), second_dir.path());

    run_crawl(first.clone()).await.expect("first crawl failed");
    run_crawl(second.clone()).await.expect("second crawl failed");

    assert_eq!(
        std::fs::read(first.output.countries_path()).unwrap(),
        std::fs::read(second.output.countries_path()).unwrap()
    );
    assert_eq!(
        std::fs::read(first.output.index_path()).unwrap(),
        std::fs::read(second.output.index_path()).unwrap()
    );
}

#[tokio::test]
async fn test_index_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/unlocode/index"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let result = run_crawl(config.clone()).await;

    assert!(matches!(result, Err(CrawlError::Status { status: 404, .. })));
    assert!(!config.output.index_path().exists());
    assert!(!config.output.countries_path().exists());
}

#[tokio::test]
async fn test_index_without_countries_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/unlocode/index",
        "<html><body><p>Page moved</p></body></html>".to_string(),
        None,
    )
    .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let result = run_crawl(config).await;
    assert!(matches!(result, Err(CrawlError::EmptyIndex { .. })));
}

#[tokio::test]
async fn test_index_only_fetch() {
    let mock_server = MockServer::start().await;
    mount_two_countries(&mock_server).await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let coordinator = Coordinator::new(config).unwrap();
    let entries = coordinator.fetch_index().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].country_code, "DZ");
    assert_eq!(entries[1].detail_links.len(), 1);
}

#[tokio::test]
async fn test_crawled_dataset_is_searchable() {
    let mock_server = MockServer::start().await;
    mount_two_countries(&mock_server).await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());
    run_crawl(config.clone()).await.expect("crawl failed");

    let dataset = Dataset::load(&config.output.countries_path()).unwrap();

    let results = dataset.search("ARZ");
    assert_eq!(results.ports.len(), 1);
    assert_eq!(results.ports[0].country_code, "DZ");

    let detail = dataset.country_detail("sg").unwrap();
    let names: Vec<&str> = detail.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Jurong Island", "Keppel", "Singapore"]);
}
