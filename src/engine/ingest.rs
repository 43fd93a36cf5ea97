use crate::engine::{ChunkReader, DEFAULT_CHUNK_SIZE};
use crate::models::{IngestError, UploadReport};
use crate::storage::{Database, UploadTransaction};
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Validates an uploaded CSV stream and appends it to storage all or nothing.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    database: Database,
    chunk_size: usize
}

impl IngestionPipeline {
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

    /// Runs one upload end to end.
    ///
    /// The connection and the write transaction are opened before the first
    /// chunk is read. Chunks are appended as they pass validation; the
    /// transaction commits after the last one. Any failure rolls back every
    /// chunk appended by this call before the error is returned.
    ///
    /// # Errors
    /// - `EmptyInput` when the stream holds no header or no data rows.
    /// - `MalformedInput` when a row cannot be read as the expected CSV types.
    /// - `SchemaMismatch` when the header is not exactly the five expected columns.
    /// - `IntegrityViolation` for null cells, non-positive amounts or ids and duplicate ids.
    /// - `Read` / `Storage` for failures of the stream or the database itself.
    pub fn ingest<R: Read>(&self, input: R) -> Result<UploadReport, IngestError> {
        let timer = Instant::now();
        let mut connection = self.database.connect()?;
        let mut upload = Database::begin_upload(&mut connection)?;

        if let Err(error) = self.append_chunks(&mut upload, input) {
            warn!("Upload rejected: {error}");

            if let Err(rollback_error) = upload.rollback() {
                error!("Rollback failed, the connection will discard the transaction on close: {rollback_error}");
            }

            return Err(error);
        }

        let rows_processed = upload.commit()?;
        let processing_time_seconds = round_seconds(timer.elapsed());

        info!("Uploaded {rows_processed} transactions in {processing_time_seconds}s");

        Ok(UploadReport::new(rows_processed, processing_time_seconds))
    }

    fn append_chunks<R: Read>(&self, upload: &mut UploadTransaction<'_>, input: R) -> Result<(), IngestError> {
        for chunk in ChunkReader::open(input, self.chunk_size)? {
            upload.append(&chunk?)?;
        }

        Ok(())
    }
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
