mod errors;
mod reports;
#[cfg(test)]
mod tests;
mod transaction;

pub use errors::{EmptyInput, IngestError, IntegrityViolation, SummaryError};
pub use reports::{ClearReport, Summary, UploadReport};
pub use transaction::{TransactionRecord, EXPECTED_COLUMNS};
