use super::Database;
use crate::models::{IngestError, IntegrityViolation, TransactionRecord};
use crate::types::{QueryDate, Timestamp};
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;

fn create_database() -> Result<(TempDir, Database)> {
    let directory = tempfile::tempdir()?;
    let database = Database::new(directory.path().join("transactions.db"));
    database.initialize()?;

    Ok((directory, database))
}

fn create_record(transaction_id: &str, user_id: i64, timestamp: &str, amount: &str) -> Result<TransactionRecord> {
    Ok(TransactionRecord {
        transaction_id: transaction_id.to_string(),
        user_id,
        product_id: 100,
        timestamp: Timestamp::from_str(timestamp)?,
        transaction_amount: Decimal::from_str(amount)?
    })
}

#[test]
fn test_initialize_is_idempotent_and_starts_empty() -> Result<()> {
    let (_directory, database) = create_database()?;
    database.initialize()?;

    assert_eq!(Database::count(&database.connect()?)?, 0);

    Ok(())
}

#[test]
fn test_committed_upload_reports_rows_gained() -> Result<()> {
    let (_directory, database) = create_database()?;
    let mut connection = database.connect()?;

    let mut upload = Database::begin_upload(&mut connection)?;
    upload.append(&[create_record("T001", 42, "2024-01-15", "99.99")?])?;
    upload.append(&[create_record("T002", 42, "2024-02-20", "150.50")?])?;

    assert_eq!(upload.commit()?, 2);
    assert_eq!(Database::count(&database.connect()?)?, 2);

    Ok(())
}

#[test]
fn test_dropped_upload_leaves_no_rows_behind() -> Result<()> {
    let (_directory, database) = create_database()?;

    {
        let mut connection = database.connect()?;
        let mut upload = Database::begin_upload(&mut connection)?;
        upload.append(&[create_record("T001", 42, "2024-01-15", "99.99")?])?;
    }

    assert_eq!(Database::count(&database.connect()?)?, 0);

    let mut connection = database.connect()?;
    let mut upload = Database::begin_upload(&mut connection)?;
    upload.append(&[create_record("T001", 42, "2024-01-15", "99.99")?])?;
    upload.rollback()?;

    assert_eq!(Database::count(&connection)?, 0);

    Ok(())
}

#[test]
fn test_duplicate_transaction_id_is_an_integrity_violation() -> Result<()> {
    let (_directory, database) = create_database()?;
    let mut connection = database.connect()?;

    let mut upload = Database::begin_upload(&mut connection)?;
    let result = upload.append(&[
        create_record("T001", 42, "2024-01-15", "99.99")?,
        create_record("T001", 43, "2024-01-16", "10.00")?
    ]);

    assert!(matches!(
        result,
        Err(IngestError::IntegrityViolation(IntegrityViolation::DuplicateTransaction { ref transaction_id })) if transaction_id == "T001"
    ));

    Ok(())
}

#[test]
fn test_aggregate_filters_by_user_and_inclusive_day_range() -> Result<()> {
    let (_directory, database) = create_database()?;
    let mut connection = database.connect()?;

    let mut upload = Database::begin_upload(&mut connection)?;
    upload.append(&[
        create_record("T001", 42, "2024-01-01 00:00:00", "10.00")?,
        create_record("T002", 42, "2024-01-31 23:59:59", "30.00")?,
        create_record("T003", 42, "2024-02-01 00:00:00", "500.00")?,
        create_record("T004", 43, "2024-01-15", "700.00")?
    ])?;
    upload.commit()?;

    let aggregate = Database::aggregate(&connection, 42, QueryDate::from_str("2024-01-01")?, QueryDate::from_str("2024-01-31")?)?;

    assert_eq!(aggregate.count, 2);
    assert_eq!(aggregate.max, Some(30.0));
    assert_eq!(aggregate.min, Some(10.0));
    assert_eq!(aggregate.mean, Some(20.0));

    let empty = Database::aggregate(&connection, 44, QueryDate::from_str("2024-01-01")?, QueryDate::from_str("2024-12-31")?)?;

    assert_eq!(empty.count, 0);
    assert!(empty.max.is_none() && empty.min.is_none() && empty.mean.is_none());

    Ok(())
}

#[test]
fn test_clear_removes_everything_and_is_idempotent() -> Result<()> {
    let (_directory, database) = create_database()?;
    let mut connection = database.connect()?;

    let mut upload = Database::begin_upload(&mut connection)?;
    upload.append(&[
        create_record("T001", 42, "2024-01-15", "99.99")?,
        create_record("T002", 43, "2024-01-16", "10.00")?
    ])?;
    upload.commit()?;

    assert_eq!(Database::clear(&connection)?, 2);
    assert_eq!(Database::clear(&connection)?, 0);
    assert_eq!(Database::count(&connection)?, 0);

    Ok(())
}
