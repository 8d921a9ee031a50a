//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the partner portal and run
//! the worker pool, and the full load-crawl-write pipeline, end-to-end.

use calamine::{open_workbook, Reader, Xlsx};
use partner_crawl::config::{Config, CrawlerConfig, OutputConfig};
use partner_crawl::crawler::{crawl, Coordinator};
use partner_crawl::output::HEADERS;
use partner_crawl::record::Record;
use partner_crawl::state::{RecordState, RunState};
use partner_crawl::{CrawlError, LoadError, ParseError, RecordError};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHEET: &str = "partners";

/// Creates a test configuration pointing at the mock portal
fn create_test_config(server: &MockServer, worker_count: usize, results_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            worker_count,
            url_template: format!("{}/partner/{{id}}.html", server.uri()),
            user_agent: "TestBot/1.0".to_string(),
        },
        output: OutputConfig {
            results_path: results_path.display().to_string(),
            sheet_name: SHEET.to_string(),
        },
    }
}

fn profile_page(website: &str, details: &[&str]) -> String {
    let paragraphs: String = details.iter().map(|d| format!("<p>{}</p>", d)).collect();
    format!(
        r#"<html><head><title>Partner</title></head><body>
        <div class="partner-contact"><a class="url" href="{}">Website</a></div>
        <div class="tab-content" id="overview">
          <div><div class="tab-inner">{}</div></div>
        </div>
        </body></html>"#,
        website, paragraphs
    )
}

async fn mount_page(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/partner/{}.html", id)))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open results");
    let range = workbook
        .worksheet_range(SHEET)
        .expect("Failed to read sheet");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn write_input(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let input = dir.path().join("partners.json");
    std::fs::write(&input, json).expect("Failed to write input");
    input
}

#[tokio::test]
async fn test_not_found_leaves_record_unchanged() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "1",
        ResponseTemplate::new(200).set_body_string(profile_page(
            "https://one.example",
            &["Gold", "APAC", "Tokyo", "Public", "1000+"],
        )),
    )
    .await;
    mount_page(&mock_server, "2", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server, 2, &dir.path().join("out.xlsx"));
    let mut coordinator = Coordinator::new(&config.crawler).expect("Failed to create coordinator");

    let input = vec![Record::new("1", "One", "Addr 1"), Record::new("2", "Two", "Addr 2")];
    let report = coordinator.run(input, CancellationToken::new()).await;

    assert_eq!(report.outcomes[0].state, RecordState::Done);
    assert_eq!(report.outcomes[1].state, RecordState::Skipped);
    assert!(report.outcomes[1].error.is_none());

    let missing = &report.records[1];
    assert_eq!(missing.name.as_deref(), Some("Two"));
    assert!(!missing.has_crawl_fields());

    let found = &report.records[0];
    assert_eq!(found.website.as_deref(), Some("https://one.example"));
    assert_eq!(found.emp_num.as_deref(), Some("1000+"));
}

#[tokio::test]
async fn test_more_workers_than_records_terminates() {
    let mock_server = MockServer::start().await;
    for id in ["a", "b", "c"] {
        mount_page(
            &mock_server,
            id,
            ResponseTemplate::new(200)
                .set_body_string(profile_page(&format!("https://{}.example", id), &["Silver"])),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server, 10, &dir.path().join("out.xlsx"));
    let mut coordinator = Coordinator::new(&config.crawler).unwrap();

    let input = vec![
        Record::new("a", "A", "x"),
        Record::new("b", "B", "y"),
        Record::new("c", "C", "z"),
    ];
    let report = tokio::time::timeout(
        Duration::from_secs(30),
        coordinator.run(input, CancellationToken::new()),
    )
    .await
    .expect("Coordinator did not terminate");

    assert_eq!(coordinator.state(), RunState::Terminated);
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.count(RecordState::Done), 3);

    // Output order is input order regardless of completion order
    let ids: Vec<_> = report.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(report.records[1].website.as_deref(), Some("https://b.example"));

    // Each page requested exactly once
    mock_server.verify().await;
}

#[tokio::test]
async fn test_parse_failure_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "broken",
        ResponseTemplate::new(200).set_body_string("<html><body><p>Moved</p></body></html>"),
    )
    .await;
    mount_page(&mock_server, "error", ResponseTemplate::new(500)).await;
    mount_page(
        &mock_server,
        "ok",
        ResponseTemplate::new(200).set_body_string(profile_page("https://ok.example", &["Gold"])),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server, 3, &dir.path().join("out.xlsx"));
    let mut coordinator = Coordinator::new(&config.crawler).unwrap();

    let input = vec![
        Record::new("broken", "Broken", "x"),
        Record::new("error", "Error", "y"),
        Record::new("ok", "Ok", "z"),
    ];
    let report = coordinator.run(input, CancellationToken::new()).await;

    assert_eq!(report.outcomes[0].state, RecordState::Failed);
    assert!(matches!(
        report.outcomes[0].error,
        Some(RecordError::Parse(ParseError::MissingElement("contact block")))
    ));
    assert!(!report.records[0].has_crawl_fields());

    assert_eq!(report.outcomes[1].state, RecordState::Failed);
    assert!(matches!(
        report.outcomes[1].error,
        Some(RecordError::Transport(_))
    ));

    assert_eq!(report.outcomes[2].state, RecordState::Done);
    assert_eq!(report.records[2].level.as_deref(), Some("Gold"));
}

#[tokio::test]
async fn test_full_pipeline_writes_spreadsheet() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "100",
        ResponseTemplate::new(200).set_body_string(profile_page(
            "https://acme.example",
            &["Gold Partner", "Asia Pacific", "Singapore", "Private", "51-200"],
        )),
    )
    .await;
    mount_page(&mock_server, "200", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        r#"[
            {"id": "100", "name": "Acme", "add": "1 Main St"},
            {"id": 200, "name": "Gone Ltd", "add": "2 Side St"}
        ]"#,
    );
    let output = dir.path().join("results.xlsx");
    let config = create_test_config(&mock_server, 10, &output);

    let report = crawl(&config, &input, CancellationToken::new())
        .await
        .expect("Crawl failed");
    assert_eq!(report.records.len(), 2);

    let rows = read_sheet(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], HEADERS.map(String::from).to_vec());
    assert_eq!(
        rows[1],
        [
            "Acme",
            "1 Main St",
            "https://acme.example",
            "Gold Partner",
            "Asia Pacific",
            "Singapore",
            "Private",
            "51-200"
        ]
        .map(String::from)
        .to_vec()
    );
    assert_eq!(rows[2][0], "Gone Ltd");
    assert_eq!(rows[2][1], "2 Side St");
    assert!(rows[2][2..].iter().all(|cell| cell.is_empty()));
}

#[tokio::test]
async fn test_load_failure_aborts_before_requests() {
    let mock_server = MockServer::start().await;
    // Any request at all would violate this expectation
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.xlsx");
    let config = create_test_config(&mock_server, 2, &output);

    let empty = write_input(&dir, "[]");
    let result = crawl(&config, &empty, CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Load(LoadError::Empty(_)))));

    let missing = dir.path().join("nope.json");
    let result = crawl(&config, &missing, CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Load(LoadError::NotFound(_)))));

    assert!(!output.exists());
}

#[tokio::test]
async fn test_write_failure_is_reported_distinctly() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "1", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, r#"[{"id": "1", "name": "One", "add": "A"}]"#);
    let output = dir.path().join("no-such-dir").join("results.xlsx");
    let config = create_test_config(&mock_server, 1, &output);

    let result = crawl(&config, &input, CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Write(_))));
}

#[tokio::test]
async fn test_cancellation_keeps_completed_records() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "fast",
        ResponseTemplate::new(200).set_body_string(profile_page(
            "https://fast.example",
            &["Gold", "EMEA", "Berlin", "Public", "10"],
        )),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/partner/slow.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(profile_page("https://slow.example", &["Gold"]))
                .set_delay(Duration::from_secs(60)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/partner/never.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        r#"[
            {"id": "fast", "name": "Fast", "add": "A"},
            {"id": "slow", "name": "Slow", "add": "B"},
            {"id": "never", "name": "Never", "add": "C"}
        ]"#,
    );
    let output = dir.path().join("results.xlsx");
    // One worker: fast, then slow (in flight when cancelled), never is not reached
    let config = create_test_config(&mock_server, 1, &output);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let report = crawl(&config, &input, cancel).await.expect("Crawl failed");
    assert!(
        started.elapsed() < Duration::from_secs(30),
        "In-flight fetch was awaited instead of abandoned"
    );

    assert!(report.cancelled);
    let states: Vec<_> = report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        [RecordState::Done, RecordState::Abandoned, RecordState::Pending]
    );
    assert!(!report.records[1].has_crawl_fields());
    assert!(!report.records[2].has_crawl_fields());

    let rows = read_sheet(&output);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1][2], "https://fast.example");
    assert_eq!(rows[1][7], "10");
    for row in &rows[2..] {
        assert!(!row[0].is_empty());
        assert!(row[2..].iter().all(|cell| cell.is_empty()));
    }
}
