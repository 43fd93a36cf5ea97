mod async_service;
mod chunks;
mod ingest;
mod reset;
mod summary;

pub use async_service::TransactionService;
pub use chunks::ChunkReader;
pub use ingest::IngestionPipeline;
pub use reset::clear;
pub use summary::SummaryQuery;

/// Rows validated and inserted as one unit.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
