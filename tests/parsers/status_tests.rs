//! Tests for the IEN connection status log parser

#[path = "../common/mod.rs"]
mod common;

use common::example_files::*;
use common::read_example_file;
use common::synthetic::status_log;
use ienreader::parsers::types::Parseable;
use ienreader::parsers::{ErrorKind, OrgTable, StatusLog};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

// ============================================
// Example File Tests
// ============================================

#[test]
fn test_parse_connection_status_example() {
    let records = StatusLog::default()
        .parse(&read_example_file(CONNECTION_STATUS))
        .expect("Should parse status log");

    let lines: Vec<String> = records.iter().map(|r| r.to_line()).collect();
    assert_eq!(
        lines,
        vec![
            "2024-03-15,08:00:00,Arcadia,0.412,1.875,200,48",
            "2024-03-15,08:05:00,LACO,0.398,2.0,200,1254",
            "2024-03-15,08:10:00,Arcadia,5.0,0.0,504,0",
        ]
    );
}

#[test]
fn test_status_record_fields() {
    let records = StatusLog::default()
        .parse(&read_example_file(CONNECTION_STATUS))
        .expect("Should parse status log");

    let first = &records[0];
    assert_eq!(first.date, "2024-03-15");
    assert_eq!(first.time, "08:00:00");
    assert_eq!(first.status, 200);
    assert_eq!(first.detector_count, 48);
    assert!((first.request_time - 0.412).abs() < 1e-9);
    assert!((first.process_time - 1.875).abs() < 1e-9);
}

// ============================================
// Organization Mapping Tests
// ============================================

#[test]
fn test_org_mapping_is_exact() {
    let contents = status_log(&[
        "d,t,r,1,p,1,Arcadia 5:1,200,1",
        "d,t,r,1,p,1,Arcadia 5:2,200,1",
        "d,t,r,1,p,1,Arcadia 5:1 ,200,1",
        "d,t,r,1,p,1,,200,1",
    ]);
    let orgs: Vec<String> = StatusLog::default()
        .parse(&contents)
        .unwrap()
        .into_iter()
        .map(|r| r.organization)
        .collect();
    assert_eq!(orgs, vec!["Arcadia", "LACO", "LACO", "LACO"]);
}

#[test]
fn test_org_mapping_from_table() {
    let orgs = OrgTable {
        aliases: BTreeMap::from([
            ("Arcadia 5:1".to_string(), "Arcadia".to_string()),
            ("Glendale 3:1".to_string(), "Glendale".to_string()),
        ]),
        fallback: "LACO".to_string(),
    };
    let contents = status_log(&["d,t,r,1,p,1,Glendale 3:1,200,1"]);
    let records = StatusLog::new(orgs).parse(&contents).unwrap();
    assert_eq!(records[0].organization, "Glendale");
}

// ============================================
// Error Handling Tests
// ============================================

#[test]
fn test_non_numeric_process_time_fails() {
    let contents = status_log(&["d,t,r,1,p,slow,X,200,1"]);
    let err = StatusLog::default().parse(&contents).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NumberFormat);
    assert_eq!(
        err.to_string(),
        "status log line 3: Field 5 is not a valid number: \"slow\""
    );
}

#[test]
fn test_fractional_status_code_fails() {
    let contents = status_log(&["d,t,r,1,p,1,X,200.5,1"]);
    let err = StatusLog::default().parse(&contents).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NumberFormat);
}

#[test]
fn test_short_line_fails() {
    let contents = status_log(&["d,t,r,1,p,1,X,200"]);
    let err = StatusLog::default().parse(&contents).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
}

#[test]
fn test_blank_lines_skipped() {
    let contents = status_log(&["d,t,r,1,p,1,X,200,1", "", "d,t,r,2,p,2,X,200,2"]);
    let records = StatusLog::default().parse(&contents).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_padded_numbers_accepted() {
    let contents = status_log(&["d,t,r, 1.5 ,p, 2 ,X, 200 , 7"]);
    let records = StatusLog::default().parse(&contents).unwrap();
    assert_eq!(records[0].to_line(), "d,t,LACO,1.5,2.0,200,7");
}
