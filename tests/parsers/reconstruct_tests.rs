//! Tests for the description field reconstructor
//!
//! Tests cover:
//! - Width detection for 0, 1 and 2 extra description fields
//! - Separator folding per record kind
//! - Tail field normalization

use ienreader::parsers::reconstruct::{reconstruct, MISSING_VALUE};
use ienreader::parsers::{RecordError, RecordKind};
use pretty_assertions::assert_eq;

/// Device inventory line with a description split into `pieces` fields
fn device_inventory_line(pieces: &[&str]) -> String {
    format!(
        "LADOT, 1001, 2024-01-01 12:00:00, {}, 34.05, -118.24, 3, 4, Loop, Active, NB",
        pieces.join(", ")
    )
}

// ============================================
// Width Detection Tests
// ============================================

#[test]
fn test_device_inventory_accepts_eleven_to_thirteen_fields() {
    let cases: [(&[&str], &str); 3] = [
        (&["Main St"], "/Main/St"),
        (&["Main St", "1st Ave"], "/Main/St&/1st/Ave"),
        (&["Main St", "1st Ave", "NE Corner"], "/Main/St&/1st/Ave&/NE/Corner"),
    ];

    for (pieces, description) in cases {
        let line = device_inventory_line(pieces);
        let out = reconstruct(&line, 11, RecordKind::DeviceInventory)
            .unwrap_or_else(|e| panic!("{} should reconstruct: {}", line, e));
        let fields: Vec<&str> = out.split(',').collect();

        assert_eq!(fields.len(), 13, "{}", out);
        assert_eq!(fields[3], "2024-01-01");
        assert_eq!(fields[4], "12:00:00");
        assert_eq!(fields[5], description);
        assert_eq!(&fields[6..], &["34.05", "-118.24", "3", "4", "Loop", "Active", "NB"]);
    }
}

#[test]
fn test_description_with_three_commas_rejected() {
    let line = device_inventory_line(&["A", "B", "C", "D"]);
    assert_eq!(
        reconstruct(&line, 11, RecordKind::DeviceInventory),
        Err(RecordError::UnexpectedFieldCount {
            found: 14,
            min: 11,
            max: 13
        })
    );
}

#[test]
fn test_short_line_rejected() {
    assert!(matches!(
        reconstruct("LADOT, 1", 10, RecordKind::Plain),
        Err(RecordError::UnexpectedFieldCount { found: 2, .. })
    ));
}

#[test]
fn test_default_width_at_description_start_rejected() {
    // Every extra field would push the description past the end of the line
    for extra in 0..=2 {
        let line = format!("a,b, 2024-01-01 12:00:00{}", ",x".repeat(extra));
        assert!(matches!(
            reconstruct(&line, 3, RecordKind::DeviceInventory),
            Err(RecordError::TooFewFields { required: 4, .. })
        ));
    }
}

#[test]
fn test_trailing_empty_fields_are_not_counted() {
    let line = format!("{},,", device_inventory_line(&["Main St"]));
    let out = reconstruct(&line, 11, RecordKind::DeviceInventory).unwrap();
    assert_eq!(out.split(',').count(), 13);
}

// ============================================
// Separator Folding Tests
// ============================================

#[test]
fn test_device_inventory_folds_slash_and_at() {
    let line = device_inventory_line(&["Main St / 1st Ave @ Plaza/Mall"]);
    let out = reconstruct(&line, 11, RecordKind::DeviceInventory).unwrap();
    assert_eq!(out.split(',').nth(5), Some("/Main/St&1st/Ave&Plaza&Mall"));
}

#[test]
fn test_signal_inventory_folds_and_removes_spaces() {
    let line = "LADOT, 2001, 2024-01-01 12:00:00, West Bound, Main St / 1st Ave@Plaza, 34.05, -118.24, 8, Active";
    let out = reconstruct(line, 9, RecordKind::SignalInventory).unwrap();
    let fields: Vec<&str> = out.split(',').collect();
    assert_eq!(fields[5], "/West/Bound");
    assert_eq!(fields[6], "MainSt&1stAve&Plaza");
    assert_eq!(fields.len(), 11);
}

#[test]
fn test_plain_keeps_separators() {
    let line = "LADOT, 2001, 2024-01-01 12:00:00, Main St / 1st @ Ave, 3, 90, 12, Free, OK, 0";
    let out = reconstruct(line, 10, RecordKind::Plain).unwrap();
    assert_eq!(out.split(',').nth(5), Some("MainSt/1st@Ave"));
}

// ============================================
// Tail Field Tests
// ============================================

#[test]
fn test_single_blank_tail_field_is_na() {
    let line = "LADOT, 2001, 2024-01-01 12:00:00, Main, , 90, , Free, OK, 0";
    let out = reconstruct(line, 10, RecordKind::Plain).unwrap();
    let fields: Vec<&str> = out.split(',').collect();
    assert_eq!(fields[6], MISSING_VALUE);
    assert_eq!(fields[8], MISSING_VALUE);
    assert_eq!(fields[7], "90");
}

#[test]
fn test_empty_interior_tail_field_stays_empty() {
    let line = "LADOT, 2001, 2024-01-01 12:00:00, Main,, 90, 1, Free, OK, 0";
    let out = reconstruct(line, 10, RecordKind::Plain).unwrap();
    assert_eq!(out.split(',').nth(6), Some(""));
}
