use crate::models::EXPECTED_COLUMNS;
use crate::types::{QueryDate, TransactionId, UserId};
use csv::StringRecord;
use thiserror::Error;

/// Why an upload counted as empty. Both reasons reach the caller as the same failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EmptyInput {
    /// The stream held no bytes, not even a header.
    NoContent,
    /// A header was present but no data rows followed it.
    NoRows
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file is empty")]
    EmptyInput(EmptyInput),
    #[error("Invalid CSV format: {0}")]
    MalformedInput(String),
    #[error("Invalid columns. Expected: {expected:?}, Got: {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>
    },
    #[error(transparent)]
    IntegrityViolation(#[from] IntegrityViolation),
    #[error("Failed to read upload: {0}")]
    Read(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error)
}

#[derive(Debug, Error)]
pub enum IntegrityViolation {
    #[error("CSV contains null/empty values: column [{column}] on line [{line}]")]
    NullValue {
        line: u64,
        column: &'static str
    },
    #[error("Transaction amounts must be positive: transaction [{transaction_id}] on line [{line}]")]
    NonPositiveAmount {
        line: u64,
        transaction_id: TransactionId
    },
    #[error("User ID and Product ID must be positive: [{column}] of transaction [{transaction_id}] on line [{line}]")]
    NonPositiveId {
        line: u64,
        column: &'static str,
        transaction_id: TransactionId
    },
    #[error("Duplicate transaction [{transaction_id}]")]
    DuplicateTransaction {
        transaction_id: TransactionId
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("No transactions found for user_id {user_id} between {start_date} and {end_date}")]
    NotFound {
        user_id: UserId,
        start_date: QueryDate,
        end_date: QueryDate
    },
    #[error("Stored amount [{0}] cannot be represented as a decimal")]
    InvalidAmount(f64),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error)
}

impl IngestError {
    pub fn malformed(line: u64, reason: impl std::fmt::Display) -> Self {
        Self::MalformedInput(format!("line [{line}]: {reason}"))
    }

    pub fn schema_mismatch(headers: &StringRecord) -> Self {
        Self::SchemaMismatch {
            expected: EXPECTED_COLUMNS.iter().map(|column| column.to_string()).collect(),
            found: headers.iter().map(str::to_string).collect()
        }
    }

    /// Whether the failure lies with the uploaded content rather than the system.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Read(_) | Self::Storage(_))
    }
}

impl From<csv::Error> for IngestError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|position| position.line()).unwrap_or_default();

        match error.into_kind() {
            csv::ErrorKind::Io(error) => Self::Read(error),
            csv::ErrorKind::Utf8 { err, .. } => Self::malformed(line, err),
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                Self::malformed(line, format!("expected {expected_len} fields, found {len}"))
            }
            kind => Self::malformed(line, format!("{kind:?}"))
        }
    }
}

impl SummaryError {
    pub fn not_found(user_id: UserId, start_date: QueryDate, end_date: QueryDate) -> Self {
        Self::NotFound { user_id, start_date, end_date }
    }
}
