//! End-to-end pipeline tests against a local mock HTTP server: adapters,
//! per-channel fault isolation, filtering, ranking, and the publish calls.

use std::time::Duration;

use mockito::Matcher;
use reqwest::blocking::Client;

use search_jobs::errors::PublishError;
use search_jobs::sheets::SheetsClient;
use search_jobs::sources::{remotive, wwr};
use search_jobs::{filter, sorter};

fn client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

const REMOTIVE_BODY: &str = r#"{"jobs": [
    {
        "title": "SQL Analyst",
        "company_name": "Acme",
        "candidate_required_location": "Europe",
        "url": "https://remotive.com/jobs/1",
        "publication_date": "2025-08-18T09:30:00",
        "tags": ["sql", "reporting"]
    },
    {
        "title": "Gardener",
        "company_name": "Green Ltd",
        "candidate_required_location": "USA",
        "url": "https://remotive.com/jobs/2",
        "publication_date": "2025-08-19T12:00:00",
        "tags": ["outdoors"]
    }
]}"#;

const WWR_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <item>
    <title>Initech: Power BI Consultant</title>
    <link>https://weworkremotely.com/jobs/9</link>
    <description><![CDATA[<strong>Initech</strong>: power bi dashboards]]></description>
    <pubDate>Thu, 21 Aug 2025 10:30:12 +0000</pubDate>
  </item>
</channel></rss>"#;

#[test]
fn matching_job_is_kept_with_its_keywords() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/remote-jobs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REMOTIVE_BODY)
        .create();

    let url = format!("{}/api/remote-jobs", server.url());
    let jobs = remotive::fetch(&client(), &url).unwrap();
    mock.assert();
    assert_eq!(jobs.len(), 2);

    let keywords = vec!["sql".to_string()];
    let kept = filter::filter_jobs(jobs, &keywords);

    // The gardener has no keyword hit and is dropped entirely.
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "SQL Analyst");
    assert_eq!(kept[0].matched_keywords, vec!["sql"]);
}

#[test]
fn remotive_http_error_is_source_unavailable() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/remote-jobs")
        .with_status(503)
        .create();

    let url = format!("{}/api/remote-jobs", server.url());
    assert!(remotive::fetch(&client(), &url).is_err());
}

#[test]
fn bad_wwr_channel_does_not_drop_other_channels() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/feeds/programming.rss")
        .with_status(200)
        .with_body(WWR_BODY)
        .create();
    server.mock("GET", "/feeds/data.rss").with_status(500).create();

    let good = format!("{}/feeds/programming.rss", server.url());
    let bad = format!("{}/feeds/data.rss", server.url());
    let feeds = [good.as_str(), bad.as_str()];

    let jobs = wwr::fetch(&client(), &feeds).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].company, "Initech");
}

#[test]
fn wwr_fails_only_when_every_channel_fails() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/feeds/a.rss").with_status(500).create();
    server.mock("GET", "/feeds/b.rss").with_status(404).create();

    let a = format!("{}/feeds/a.rss", server.url());
    let b = format!("{}/feeds/b.rss", server.url());
    assert!(wwr::fetch(&client(), &[a.as_str(), b.as_str()]).is_err());
}

#[test]
fn failed_source_leaves_the_other_source_intact() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/remote-jobs")
        .with_status(200)
        .with_body(REMOTIVE_BODY)
        .create();
    // Every WWR channel is down.
    server.mock("GET", "/feeds/down.rss").with_status(500).create();

    let remotive_url = format!("{}/api/remote-jobs", server.url());
    let down = format!("{}/feeds/down.rss", server.url());

    // Mirror the orchestrator's per-source tolerance.
    let mut merged = Vec::new();
    if let Ok(mut jobs) = remotive::fetch(&client(), &remotive_url) {
        merged.append(&mut jobs);
    }
    if let Ok(mut jobs) = wwr::fetch(&client(), &[down.as_str()]) {
        merged.append(&mut jobs);
    }

    let keywords = vec!["sql".to_string(), "power bi".to_string()];
    let ranked = sorter::rank(filter::filter_jobs(merged, &keywords), 20);

    // Only Remotive data, run still completes.
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].source, "Remotive");
}

#[test]
fn publish_clears_then_writes_header_and_rows() {
    let mut server = mockito::Server::new();
    let meta = server
        .mock("GET", "/v4/spreadsheets/sheet-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sheets": [{"properties": {"title": "Weekly_Role_Search"}}]}"#)
        .create();
    let clear = server
        .mock("POST", "/v4/spreadsheets/sheet-1/values/Weekly_Role_Search:clear")
        .with_status(200)
        .with_body("{}")
        .create();
    let update = server
        .mock("PUT", "/v4/spreadsheets/sheet-1/values/Weekly_Role_Search!A1")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJsonString(
            r#"{"range": "Weekly_Role_Search!A1", "majorDimension": "ROWS"}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create();

    let publisher = SheetsClient::with_base(
        client(),
        server.url(),
        "test-token".to_string(),
        "sheet-1".to_string(),
    );
    let week_of = chrono::NaiveDate::from_ymd_opt(2025, 8, 18).unwrap();

    let job = search_jobs::Job {
        source: "Remotive".to_string(),
        title: "SQL Analyst".to_string(),
        company: "Acme".to_string(),
        location: "Europe".to_string(),
        remote_policy: "Worldwide".to_string(),
        posted: "2025-08-18".to_string(),
        link: "https://remotive.com/jobs/1".to_string(),
        notes: "sql reporting".to_string(),
        matched_keywords: vec!["sql".to_string()],
    };

    publisher
        .publish("Weekly_Role_Search", week_of, &[job])
        .unwrap();

    meta.assert();
    clear.assert();
    update.assert();
}

#[test]
fn publish_fails_when_worksheet_is_missing() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v4/spreadsheets/sheet-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sheets": [{"properties": {"title": "Other_Tab"}}]}"#)
        .create();

    let publisher = SheetsClient::with_base(
        client(),
        server.url(),
        "test-token".to_string(),
        "sheet-1".to_string(),
    );
    let week_of = chrono::NaiveDate::from_ymd_opt(2025, 8, 18).unwrap();

    let err = publisher
        .publish("Weekly_Role_Search", week_of, &[])
        .unwrap_err();
    assert!(matches!(err, PublishError::WorksheetNotFound(_)));
}

#[test]
fn publish_surfaces_api_errors() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v4/spreadsheets/bad-sheet")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error": {"message": "Requested entity was not found."}}"#)
        .create();

    let publisher = SheetsClient::with_base(
        client(),
        server.url(),
        "test-token".to_string(),
        "bad-sheet".to_string(),
    );
    let week_of = chrono::NaiveDate::from_ymd_opt(2025, 8, 18).unwrap();

    let err = publisher.publish("Weekly_Role_Search", week_of, &[]).unwrap_err();
    assert!(matches!(err, PublishError::Api { .. }));
}
