use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{ProductId, Timestamp, TransactionId, UserId};

/// Column names an upload must carry, in this exact order.
pub const EXPECTED_COLUMNS: [&str; 5] = ["transaction_id", "user_id", "product_id", "timestamp", "transaction_amount"];

/// Represents a single validated row of an uploaded CSV file.
///
/// Records are only built after the row passed the null, amount and id checks,
/// so every field is present and the numeric fields are strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// Globally unique identifier, the table's primary key.
    pub transaction_id: TransactionId,
    /// The purchasing user.
    pub user_id: UserId,
    /// The purchased product.
    pub product_id: ProductId,
    /// When the transaction happened.
    pub timestamp: Timestamp,
    /// The amount paid.
    pub transaction_amount: Decimal
}
