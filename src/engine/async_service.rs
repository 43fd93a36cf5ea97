use crate::engine::{clear, IngestionPipeline, SummaryQuery, DEFAULT_CHUNK_SIZE};
use crate::models::{ClearReport, IngestError, Summary, SummaryError, UploadReport};
use crate::storage::Database;
use crate::types::{QueryDate, UserId};
use std::io::Read;
use std::panic::resume_unwind;
use tokio::task::{spawn_blocking, JoinError};

/// Async entry point for concurrent callers.
///
/// Each call runs on the blocking pool with a connection of its own, so two
/// uploads never share a transaction and a slow upload never stalls the runtime.
#[derive(Debug, Clone)]
pub struct TransactionService {
    database: Database,
    chunk_size: usize
}

impl TransactionService {
    /// Creates a service over the provided database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            chunk_size: DEFAULT_CHUNK_SIZE
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Creates the table if absent and returns how many rows it already holds.
    pub async fn initialize(&self) -> rusqlite::Result<u64> {
        let database = self.database.clone();

        join(spawn_blocking(move || {
            database.initialize()?;
            Database::count(&database.connect()?)
        }).await)
    }

    pub async fn upload<R>(&self, input: R) -> Result<UploadReport, IngestError>
    where
        R: Read + Send + 'static
    {
        let pipeline = IngestionPipeline::new(self.database.clone()).with_chunk_size(self.chunk_size);

        join(spawn_blocking(move || pipeline.ingest(input)).await)
    }

    pub async fn summary(&self, user_id: UserId, start_date: QueryDate, end_date: QueryDate) -> Result<Summary, SummaryError> {
        let query = SummaryQuery::new(self.database.clone());

        join(spawn_blocking(move || query.run(user_id, start_date, end_date)).await)
    }

    pub async fn clear(&self) -> rusqlite::Result<ClearReport> {
        let database = self.database.clone();

        join(spawn_blocking(move || clear(&database)).await)
    }
}

//NOTE: Blocking tasks are never aborted, so a join error can only carry a panic from the task
fn join<T>(result: Result<T, JoinError>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => resume_unwind(error.into_panic())
    }
}
