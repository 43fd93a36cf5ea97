use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{QueryDate, UserId};

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    pub success: bool,
    pub message: String,
    /// Rows newly persisted by this upload.
    pub rows_processed: u64,
    /// Wall-clock time of the whole upload, rounded to two decimal places.
    pub processing_time_seconds: f64
}

impl UploadReport {
    pub fn new(rows_processed: u64, processing_time_seconds: f64) -> Self {
        Self {
            success: true,
            message: "Transactions uploaded successfully".to_string(),
            rows_processed,
            processing_time_seconds
        }
    }
}

/// Aggregate statistics for one user over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub user_id: UserId,
    pub transaction_count: u64,
    pub max_amount: Decimal,
    pub min_amount: Decimal,
    /// Arithmetic mean rounded to two decimal places.
    pub mean_amount: Decimal,
    pub start_date: QueryDate,
    pub end_date: QueryDate
}

/// Outcome of a reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearReport {
    pub success: bool,
    pub message: String,
    pub rows_deleted: u64
}

impl ClearReport {
    pub fn new(rows_deleted: u64) -> Self {
        Self {
            success: true,
            message: format!("{rows_deleted} Transactions deleted"),
            rows_deleted
        }
    }
}
