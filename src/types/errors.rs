use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("Timestamp error: value is an empty string")]
    Empty,
    #[error("Timestamp error: '{0}' is not an ISO-8601 date or date-time")]
    InvalidFormat(String),
    #[error("Date error: '{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String)
}
