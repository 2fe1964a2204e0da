// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{csv_files, write_url_file};
use domain_scraper::application::use_cases::static_scrape_use_case::{
    StaticScrapeConfig, StaticScrapeUseCase,
};
use domain_scraper::engines::identity::RandomUserAgentProvider;
use domain_scraper::engines::reqwest_engine::ReqwestEngine;
use domain_scraper::infrastructure::storage::{read_url_list, CsvStorage, FailureLog};
use domain_scraper::utils::rate_limiter::RecordingSleeper;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn use_case(
    sleeper: &RecordingSleeper,
    output_dir: &std::path::Path,
    failure_log: &std::path::Path,
) -> StaticScrapeUseCase<ReqwestEngine, RandomUserAgentProvider> {
    StaticScrapeUseCase::new(
        Arc::new(ReqwestEngine),
        Arc::new(RandomUserAgentProvider::default()),
        Arc::new(sleeper.clone()),
        CsvStorage::new(output_dir),
        FailureLog::new(failure_log),
        StaticScrapeConfig {
            timeout: Duration::from_secs(5),
            ..StaticScrapeConfig::default()
        },
    )
}

#[tokio::test]
async fn test_table_rows_with_domains_are_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><table>
                <tr><td>expired1.com</td><td>100</td></tr>
                <tr><td>notadomain</td><td>5</td></tr>
            </table></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/domains", server.uri());
    let input = write_url_file(dir.path(), &[url.as_str()]);
    let urls = read_url_list(&input).await.unwrap();
    let output_dir = dir.path().join("output_domains");
    let sleeper = RecordingSleeper::default();

    let summary = use_case(&sleeper, &output_dir, &dir.path().join("failed_sites.log"))
        .run(&urls)
        .await;

    assert_eq!(summary.saved, 1);
    assert_eq!(summary.records, 1);
    assert!(sleeper.calls().is_empty());

    let files = csv_files(&output_dir);
    assert_eq!(files.len(), 1);
    // host and port, with '.' and ':' replaced
    assert!(files[0].starts_with("127_0_0_1_"));
    let content = std::fs::read_to_string(output_dir.join(&files[0])).unwrap();
    assert_eq!(content, "expired1.com,100\n");
}

#[tokio::test]
async fn test_persistent_server_errors_go_to_failure_log() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(25)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let urls: Vec<String> = (1..=5)
        .map(|i| format!("{}/list/{}", server.uri(), i))
        .collect();
    let output_dir = dir.path().join("output_domains");
    let log_path = dir.path().join("failed_sites.log");
    let sleeper = RecordingSleeper::default();

    let summary = use_case(&sleeper, &output_dir, &log_path).run(&urls).await;

    assert_eq!(summary.failed, 5);
    assert_eq!(summary.saved, 0);
    assert!(csv_files(&output_dir).is_empty());

    let log = std::fs::read_to_string(&log_path).unwrap();
    let expected: Vec<String> = urls
        .iter()
        .map(|u| format!("{} failed after 5 attempts", u))
        .collect();
    assert_eq!(log.lines().map(str::to_string).collect::<Vec<_>>(), expected);

    // four waits per site, none after the final attempt
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(5); 20]);
}

#[tokio::test]
async fn test_block_fallback_and_mixed_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><ul><li>fresh-drop.net</li><li>Ends in 2h</li></ul></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let urls = vec![
        format!("{}/blocks", server.uri()),
        format!("{}/missing", server.uri()),
    ];
    let output_dir = dir.path().join("out");
    let log_path = dir.path().join("failed_sites.log");
    let sleeper = RecordingSleeper::default();

    let summary = use_case(&sleeper, &output_dir, &log_path).run(&urls).await;

    assert_eq!(summary.sites, 2);
    assert_eq!(summary.saved, 1);
    assert_eq!(summary.failed, 1);

    let files = csv_files(&output_dir);
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(output_dir.join(&files[0])).unwrap();
    assert_eq!(content, "fresh-drop.net,fresh-drop.net\n");

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log, format!("{} failed after 5 attempts\n", urls[1]));
}
