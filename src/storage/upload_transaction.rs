use crate::models::{IngestError, IntegrityViolation, TransactionRecord};
use crate::storage::Database;
use rusqlite::{params, ErrorCode, Transaction};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

const INSERT_TRANSACTION: &str = "
    INSERT INTO transactions (transaction_id, user_id, product_id, timestamp, transaction_amount)
    VALUES (?1, ?2, ?3, ?4, ?5)";

/// The one write transaction an upload runs in.
///
/// It is opened before the first chunk and spans all of them. Nothing it wrote
/// becomes visible until [`UploadTransaction::commit`]; dropping it on any
/// other path rolls every appended chunk back.
pub struct UploadTransaction<'c> {
    transaction: Transaction<'c>,
    rows_before: u64,
    chunks: usize
}

impl<'c> UploadTransaction<'c> {
    pub(super) fn new(transaction: Transaction<'c>) -> rusqlite::Result<Self> {
        let rows_before = Database::count(&transaction)?;

        Ok(Self {
            transaction,
            rows_before,
            chunks: 0
        })
    }

    /// Inserts one validated chunk.
    pub fn append(&mut self, chunk: &[TransactionRecord]) -> Result<(), IngestError> {
        let mut statement = self.transaction.prepare_cached(INSERT_TRANSACTION)?;

        for record in chunk {
            let amount = record.transaction_amount.to_f64().ok_or_else(|| {
                IngestError::MalformedInput(format!("amount of transaction [{}] is out of range", record.transaction_id))
            })?;

            let inserted = statement.execute(params![
                record.transaction_id,
                record.user_id,
                record.product_id,
                record.timestamp.to_string(),
                amount
            ]);

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(error, _)) if error.code == ErrorCode::ConstraintViolation => {
                    return Err(IntegrityViolation::DuplicateTransaction {
                        transaction_id: record.transaction_id.clone()
                    }.into());
                }
                Err(error) => return Err(error.into())
            }
        }

        self.chunks += 1;
        debug!("Appended chunk [{}] of {} rows", self.chunks, chunk.len());

        Ok(())
    }

    /// Commits every appended chunk and returns how many rows the table gained.
    pub fn commit(self) -> rusqlite::Result<u64> {
        let rows_after = Database::count(&self.transaction)?;
        self.transaction.commit()?;

        Ok(rows_after.saturating_sub(self.rows_before))
    }

    /// Discards every appended chunk.
    pub fn rollback(self) -> rusqlite::Result<()> {
        warn!("Rolling back upload after [{}] appended chunks", self.chunks);
        self.transaction.rollback()
    }
}
