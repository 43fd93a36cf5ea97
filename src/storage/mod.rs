mod database;
#[cfg(test)]
mod tests;
mod upload_transaction;

pub use database::{AggregateRow, Database};
pub use upload_transaction::UploadTransaction;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
