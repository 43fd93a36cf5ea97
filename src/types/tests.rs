use super::{QueryDate, Timestamp};
use anyhow::Result;
use std::str::FromStr;

#[test]
fn test_timestamp_normalizes_accepted_formats() -> Result<()> {
    let test_cases = vec![
        ("2024-01-15", "2024-01-15 00:00:00"),
        ("2024-01-01 10:00:00", "2024-01-01 10:00:00"),
        ("2024-01-01T10:00:00", "2024-01-01 10:00:00"),
        ("  2024-02-20 11:30  ", "2024-02-20 11:30:00"),
        ("2024-03-25 08:15:30.250", "2024-03-25 08:15:30.250"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(Timestamp::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_timestamp_fails_to_parse_invalid_strings() {
    assert!(Timestamp::from_str("").is_err());
    assert!(Timestamp::from_str("yesterday").is_err());
    assert!(Timestamp::from_str("2024-13-01").is_err());
    assert!(Timestamp::from_str("15/01/2024").is_err());
}

#[test]
fn test_timestamp_text_order_matches_chronological_order() -> Result<()> {
    let earlier = Timestamp::from_str("2024-01-01 09:59:59")?;
    let later = Timestamp::from_str("2024-01-01 10:00:00.5")?;

    assert!(earlier < later);
    assert!(earlier.to_string() < later.to_string());

    Ok(())
}

#[test]
fn test_query_date_requires_padded_iso_dates() -> Result<()> {
    assert_eq!(QueryDate::from_str("2024-12-31")?.to_string(), "2024-12-31");

    assert!(QueryDate::from_str("2024-1-5").is_err());
    assert!(QueryDate::from_str("2024-02-30").is_err());
    assert!(QueryDate::from_str("2024/01/05").is_err());
    assert!(QueryDate::from_str("2024-01-05 10:00:00").is_err());

    Ok(())
}

#[test]
fn test_query_date_bounds_cover_the_whole_day() -> Result<()> {
    let date = QueryDate::from_str("2024-12-31")?;
    let first = Timestamp::from_str("2024-12-31")?.to_string();
    let last = Timestamp::from_str("2024-12-31 23:59:59.999")?.to_string();
    let next_day = Timestamp::from_str("2025-01-01")?.to_string();

    assert!(first >= date.start_bound());
    assert!(last <= date.end_bound());
    assert!(next_day > date.end_bound());

    Ok(())
}
