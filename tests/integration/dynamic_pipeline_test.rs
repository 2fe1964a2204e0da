// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{csv_files, FakeSite};
use domain_scraper::application::dto::run_summary::SiteOutcome;
use domain_scraper::application::use_cases::dynamic_scrape_use_case::{
    DynamicScrapeConfig, DynamicScrapeUseCase,
};
use domain_scraper::engines::identity::FixedIdentityProvider;
use domain_scraper::infrastructure::storage::{CsvStorage, FailureLog};
use domain_scraper::utils::rate_limiter::RecordingSleeper;
use std::sync::Arc;
use tempfile::tempdir;

fn use_case(
    site: &FakeSite,
    sleeper: &RecordingSleeper,
    dir: &std::path::Path,
    max_pages_per_site: usize,
) -> DynamicScrapeUseCase<FakeSite, FixedIdentityProvider> {
    DynamicScrapeUseCase::new(
        Arc::new(site.clone()),
        Arc::new(FixedIdentityProvider("test-agent/1.0".into())),
        Arc::new(sleeper.clone()),
        CsvStorage::new(dir),
        FailureLog::new(dir.join("failed_sites.log")),
        DynamicScrapeConfig {
            max_pages_per_site,
            ..DynamicScrapeConfig::default()
        },
    )
}

#[tokio::test]
async fn test_next_link_pages_are_aggregated_into_one_file() {
    let site = FakeSite::new(&[
        (
            "https://auctions.test/list",
            r#"<html><body>
                <h1>Expiring domain list</h1>
                <div>alpha.io</div>
                <a href="/list?p=2&amp;dir=next">More</a>
            </body></html>"#,
        ),
        (
            "https://auctions.test/list?p=2&dir=next",
            r#"<html><body>
                <div>beta.net</div>
                <a href="/list">Back</a>
            </body></html>"#,
        ),
    ]);
    let dir = tempdir().unwrap();
    let sleeper = RecordingSleeper::default();

    let summary = use_case(&site, &sleeper, dir.path(), 200)
        .run(&["https://auctions.test/list".to_string()])
        .await;

    assert_eq!(summary.saved, 1);
    assert_eq!(summary.records, 2);
    assert_eq!(
        site.visits(),
        vec![
            "https://auctions.test/list",
            "https://auctions.test/list?p=2&dir=next"
        ]
    );
    assert_eq!(site.sessions_closed(), 1);

    assert_eq!(csv_files(dir.path()), vec!["auctions_test.csv"]);
    let content = std::fs::read_to_string(dir.path().join("auctions_test.csv")).unwrap();
    assert_eq!(content, "Domain\nalpha.io\nbeta.net\n");
}

#[tokio::test]
async fn test_endless_pagination_stops_at_page_limit() {
    let pages: Vec<(String, String)> = (1..=50)
        .map(|i| {
            (
                format!("https://loop.test/page/{}", i),
                format!(
                    "<div>lot{}.com</div><a href=\"/page/{}\">next</a>",
                    i,
                    i + 1
                ),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = pages
        .iter()
        .map(|(u, h)| (u.as_str(), h.as_str()))
        .collect();
    let site = FakeSite::new(&borrowed);
    let dir = tempdir().unwrap();
    let sleeper = RecordingSleeper::default();

    let outcome = use_case(&site, &sleeper, dir.path(), 10)
        .process_site("https://loop.test/page/1")
        .await;

    assert_eq!(outcome, SiteOutcome::Saved(10));
    assert_eq!(site.visits().len(), 10);
    let content = std::fs::read_to_string(dir.path().join("loop_test.csv")).unwrap();
    assert_eq!(content.lines().count(), 11);
}

#[tokio::test]
async fn test_unreachable_site_writes_nothing() {
    let site = FakeSite::new(&[]);
    let dir = tempdir().unwrap();
    let sleeper = RecordingSleeper::default();

    let summary = use_case(&site, &sleeper, dir.path(), 200)
        .run(&["www.gone.test".to_string()])
        .await;

    assert_eq!(summary.empty, 1);
    assert_eq!(site.visits(), vec!["https://www.gone.test/"]);
    assert!(csv_files(dir.path()).is_empty());
    assert!(!dir.path().join("failed_sites.log").exists());
}
