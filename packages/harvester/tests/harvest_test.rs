//! End-to-end tests for the harvest pipeline against a mock Congress API.

use std::fs;
use std::path::Path;

use congress_harvester::enumerate::{BillIdTable, BillRange};
use congress_harvester::{run_harvest, Chamber, HarvestConfig, HarvestReport, HarvesterError};
use indicatif::ProgressBar;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn senate_bill() -> Value {
    json!({
        "status": "OK",
        "results": [{
            "bill_id": "s1-116",
            "congress": 116,
            "bill_type": "s",
            "short_title": "T",
            "title": "Full T",
            "house_passage": null,
            "senate_passage": "2019-01-01",
            "introduced_date": "2019-01-05",
            "primary_subject": "Health",
            "actions": [{
                "id": 1,
                "datetime": "2019-01-05",
                "action_type": "intro",
                "description": "Introduced"
            }]
        }]
    })
}

fn config(server: &MockServer, dir: &TempDir, end: u32) -> HarvestConfig {
    let mut table = BillIdTable::new();
    table.register(BillRange::new(Chamber::Senate, 116).with_range(1, end));

    HarvestConfig::new(Chamber::Senate, 116, API_KEY)
        .with_base_url(server.uri())
        .with_output_dir(dir.path().join("data"))
        .with_log_dir(dir.path().join("logs"))
        .with_stamp("2019-10-09")
        .with_loud(false)
        .with_id_table(table)
}

async fn mount(server: &MockServer, number: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/116/bills/s{number}.json")))
        .and(header("X-API-KEY", API_KEY))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// The client is blocking, so the run happens off the async runtime.
async fn harvest(config: HarvestConfig) -> congress_harvester::Result<HarvestReport> {
    tokio::task::spawn_blocking(move || run_harvest(&config, &ProgressBar::hidden()))
        .await
        .expect("harvest task panicked")
}

fn read_log(dir: &Path) -> String {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .expect("log dir exists")
        .map(|e| e.expect("dir entry").path())
        .collect();
    assert_eq!(entries.len(), 1, "expected a single log file");
    fs::read_to_string(entries.remove(0)).expect("readable log")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_bill_end_to_end() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount(&server, 1, ResponseTemplate::new(200).set_body_json(senate_bill())).await;

    let report = harvest(config(&server, &dir, 1)).await.unwrap();

    assert_eq!(report.requested, 1);
    assert_eq!(report.fetched, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.actions, 1);

    assert_eq!(
        report.general_path,
        dir.path().join("data").join("2019-10-09_s116_general_1-1.csv")
    );
    assert_eq!(
        fs::read_to_string(&report.general_path).unwrap(),
        "_type,_id,_session,_short_title,_official_title,_passed_house,_passed_senate,_introduced,_top_subject\n\
         s,s1-116,116,T,Full T,false,true,2019-01-05,Health\n"
    );

    assert_eq!(
        report.actions_path,
        dir.path().join("data").join("2019-10-09_s116_actions_1-1.csv")
    );
    assert_eq!(
        fs::read_to_string(&report.actions_path).unwrap(),
        "_bill,_id,_date,_time,_type,_action_text\n\
         s1-116,1,2019-01-05,,intro,Introduced\n"
    );

    assert_eq!(
        read_log(&dir.path().join("logs")),
        "1 total bills; last bill is s1\n\
         --> parsing s1\n\
         --> converting to tables\n\
         --> saving datasets\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_bills_are_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(&server, 1, ResponseTemplate::new(200).set_body_json(senate_bill())).await;
    mount(
        &server,
        2,
        ResponseTemplate::new(200)
            .set_body_json(json!({"status": "ERROR", "errors": [{"error": "Record not found"}]})),
    )
    .await;
    mount(&server, 3, ResponseTemplate::new(500)).await;
    mount(
        &server,
        4,
        ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "results": []})),
    )
    .await;
    mount(
        &server,
        5,
        ResponseTemplate::new(200).set_body_string("<html>Service Unavailable</html>"),
    )
    .await;

    let report = harvest(config(&server, &dir, 5)).await.unwrap();

    assert_eq!(report.requested, 5);
    assert_eq!(report.fetched, 1);
    assert_eq!(report.skipped, 4);
    assert_eq!(report.actions, 1);

    // File names use the enumerated bounds, not the bills that succeeded
    assert!(report
        .general_path
        .ends_with("2019-10-09_s116_general_1-5.csv"));

    let log = read_log(&dir.path().join("logs"));
    assert_eq!(log.matches("--> error, got status: ERROR").count(), 1);
    assert_eq!(
        log.matches("--> error, request failed: Failed to fetch s3: unexpected HTTP status 500")
            .count(),
        1
    );
    assert_eq!(log.matches("--> error, expecting 1 result, got 0").count(), 1);
    assert!(log.contains("--> parsing s4"));
    assert_eq!(
        log.matches("--> error, request failed: Failed to fetch s5: could not decode response body")
            .count(),
        1
    );

    let general = fs::read_to_string(&report.general_path).unwrap();
    assert_eq!(general.lines().count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_api_skips_every_bill() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Reserve a port, then free it so connections are refused
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = closed.local_addr().unwrap().port();
    drop(closed);

    let config = config(&server, &dir, 2).with_base_url(format!("http://127.0.0.1:{port}"));
    let report = harvest(config).await.unwrap();

    assert_eq!(report.requested, 2);
    assert_eq!(report.fetched, 0);
    assert_eq!(report.skipped, 2);

    let log = read_log(&dir.path().join("logs"));
    assert_eq!(
        log.matches("--> error, request failed: Failed to fetch s")
            .count(),
        2
    );
    assert_eq!(log.matches("transport error").count(), 2);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());

    // Both tables are still written, empty
    assert_eq!(fs::read_to_string(&report.general_path).unwrap(), "");
    assert_eq!(fs::read_to_string(&report.actions_path).unwrap(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_actions_are_stored_oldest_first() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut body = senate_bill();
    body["results"][0]["actions"] = json!([
        {"id": 3, "datetime": "2019-03-01T12:30:00-05:00", "action_type": "vote", "description": "Passed"},
        {"id": 2, "datetime": "2019-02-01", "action_type": "committee", "description": "Reported"},
        {"id": 1, "datetime": "2019-01-05", "action_type": "intro", "description": "Introduced"}
    ]);
    mount(&server, 1, ResponseTemplate::new(200).set_body_json(body)).await;

    let report = harvest(config(&server, &dir, 1)).await.unwrap();

    assert_eq!(
        fs::read_to_string(&report.actions_path).unwrap(),
        "_bill,_id,_date,_time,_type,_action_text\n\
         s1-116,1,2019-01-05,,intro,Introduced\n\
         s1-116,2,2019-02-01,,committee,Reported\n\
         s1-116,3,2019-03-01,12:30:00,vote,Passed\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_bill_aborts_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut body = senate_bill();
    body["results"][0]
        .as_object_mut()
        .unwrap()
        .remove("introduced_date");
    mount(&server, 1, ResponseTemplate::new(200).set_body_json(body)).await;

    let err = harvest(config(&server, &dir, 1)).await.unwrap_err();

    assert!(matches!(
        err,
        HarvesterError::MissingField { ref field, .. } if field == "introduced_date"
    ));
    assert!(!dir.path().join("data").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_session_fails_before_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut config = config(&server, &dir, 1);
    config.session = 115;

    let err = harvest(config).await.unwrap_err();

    assert!(matches!(
        err,
        HarvesterError::UnknownBillRange { session: 115, .. }
    ));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
