// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::domain_record::DomainRecord;
use crate::domain::services::domain_matcher::PatternMatcher;
use crate::domain::services::extraction_service::ExtractionService;

#[test]
fn test_table_rows_without_domain_are_dropped() {
    let html = r#"
        <html><body>
            <table>
                <tr><td>expired1.com</td><td>100</td></tr>
                <tr><td>notadomain</td><td>5</td></tr>
            </table>
        </body></html>
    "#;

    let records = ExtractionService::new().extract(html);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cells, vec!["expired1.com", "100"]);
    assert_eq!(records[0].domain, "expired1.com");
}

#[test]
fn test_domain_in_any_cell_keeps_whole_row() {
    let html = r#"
        <table>
            <tr><th>Rank</th><th>Name</th><th>Bids</th></tr>
            <tr><td>1</td><td> Auction-Site.NET </td><td></td></tr>
        </table>
    "#;

    let records = ExtractionService::new().extract(html);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cells, vec!["1", "Auction-Site.NET", ""]);
    assert_eq!(records[0].domain, "auction-site.net");
}

#[test]
fn test_cell_text_is_stripped_and_joined() {
    let html = r#"
        <table><tr>
            <td>
                exp.io
            </td>
            <td><a href="/d/1">view</a> <b>now</b></td>
        </tr></table>
    "#;

    let records = ExtractionService::new().extract(html);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cells, vec!["exp.io", "viewnow"]);
}

#[test]
fn test_tables_present_disable_block_fallback() {
    let html = r#"
        <table><tr><td>no domains here</td></tr></table>
        <div>beta.com</div>
    "#;

    assert!(ExtractionService::new().extract(html).is_empty());
}

#[test]
fn test_block_fallback_without_tables() {
    let html = r#"
        <html><body>
            <ul>
                <li>coolname.net</li>
                <li>Contact us</li>
            </ul>
            <p>Price: 100</p>
        </body></html>
    "#;

    let records = ExtractionService::new().extract(html);

    assert_eq!(records, vec![DomainRecord::from_text("coolname.net", "coolname.net")]);
}

#[test]
fn test_block_fallback_preserves_nested_duplicates() {
    let html = "<div><span>Alpha.org</span></div>";

    let records = ExtractionService::new().extract(html);

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.domain == "alpha.org"));
    assert!(records.iter().all(|r| r.context.as_deref() == Some("Alpha.org")));
}

#[test]
fn test_empty_document_yields_no_records() {
    let service = ExtractionService::new();
    assert!(service.extract("").is_empty());
    assert!(service.extract("<html><body></body></html>").is_empty());
}

#[test]
fn test_extract_is_idempotent() {
    let html = r#"
        <table>
            <tr><td>one.com</td><td>1</td></tr>
            <tr><td>two.org</td><td>2</td></tr>
            <tr><td>one.com</td><td>3</td></tr>
        </table>
    "#;
    let service = ExtractionService::new();

    let first = service.extract(html);
    let second = service.extract(html);

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_custom_matcher_changes_acceptance() {
    let html = "<p>build 1.25</p>";

    assert!(ExtractionService::new().extract(html).is_empty());

    let loose = ExtractionService::with_matcher(PatternMatcher).extract(html);
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].domain, "build 1.25");
}
