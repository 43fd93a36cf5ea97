use super::{ClearReport, EmptyInput, IngestError, IntegrityViolation, SummaryError, UploadReport};

use anyhow::Result;
use csv::StringRecord;
use std::str::FromStr;

use crate::types::QueryDate;

#[test]
fn test_schema_mismatch_lists_expected_and_found_columns() {
    let error = IngestError::schema_mismatch(&StringRecord::from(vec!["wrong", "headers", "here"]));
    let message = error.to_string();

    assert!(message.starts_with("Invalid columns."));
    assert!(message.contains("\"transaction_amount\""));
    assert!(message.contains("\"wrong\""));
}

#[test]
fn test_both_empty_reasons_read_the_same() {
    let no_content = IngestError::EmptyInput(EmptyInput::NoContent);
    let no_rows = IngestError::EmptyInput(EmptyInput::NoRows);

    assert_eq!(no_content.to_string(), no_rows.to_string());
    assert_eq!(no_content.to_string(), "CSV file is empty");
}

#[test]
fn test_only_read_and_storage_failures_are_server_errors() {
    let client_errors = vec![
        IngestError::EmptyInput(EmptyInput::NoRows),
        IngestError::MalformedInput("bad".to_string()),
        IngestError::schema_mismatch(&StringRecord::new()),
        IntegrityViolation::NullValue { line: 2, column: "user_id" }.into(),
        IntegrityViolation::DuplicateTransaction { transaction_id: "T1".to_string() }.into(),
    ];

    for error in client_errors {
        assert!(error.is_client_error(), "{error}");
    }

    assert!(!IngestError::Read(std::io::Error::other("disconnected")).is_client_error());
    assert!(!IngestError::Storage(rusqlite::Error::InvalidQuery).is_client_error());
}

#[test]
fn test_integrity_messages_name_the_rule_broken() {
    let null = IntegrityViolation::NullValue { line: 3, column: "transaction_amount" };
    let amount = IntegrityViolation::NonPositiveAmount { line: 4, transaction_id: "T9".to_string() };
    let id = IntegrityViolation::NonPositiveId { line: 5, column: "user_id", transaction_id: "T9".to_string() };

    assert!(null.to_string().contains("null"));
    assert!(null.to_string().contains("line [3]"));
    assert!(amount.to_string().contains("positive"));
    assert!(id.to_string().contains("[user_id]"));
}

#[test]
fn test_malformed_input_carries_the_line() {
    let error = IngestError::malformed(7, "expected 5 fields, found 6");

    assert_eq!(error.to_string(), "Invalid CSV format: line [7]: expected 5 fields, found 6");
}

#[test]
fn test_not_found_names_user_and_range() -> Result<()> {
    let error = SummaryError::not_found(42, QueryDate::from_str("2024-01-01")?, QueryDate::from_str("2024-01-31")?);

    assert_eq!(error.to_string(), "No transactions found for user_id 42 between 2024-01-01 and 2024-01-31");

    Ok(())
}

#[test]
fn test_reports_carry_fixed_messages() {
    let upload = UploadReport::new(3, 0.01);
    let clear = ClearReport::new(0);

    assert!(upload.success);
    assert_eq!(upload.message, "Transactions uploaded successfully");
    assert!(clear.success);
    assert_eq!(clear.message, "0 Transactions deleted");
}
