use crate::storage::UploadTransaction;
use crate::types::{QueryDate, UserId};
use rusqlite::{params, Connection, OpenFlags, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS transactions (
        transaction_id TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        timestamp TEXT NOT NULL,
        transaction_amount REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS transactions_user_timestamp ON transactions (user_id, timestamp);";

const SELECT_AGGREGATE: &str = "
    SELECT COUNT(*), MAX(transaction_amount), MIN(transaction_amount), AVG(transaction_amount)
    FROM transactions
    WHERE user_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3";

/// Raw aggregate over the rows matching a summary filter.
///
/// The extrema and mean are `None` exactly when `count` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub count: u64,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>
}

/// Handle to the SQLite file holding the `transactions` table.
///
/// The handle only carries where and how to connect. Every operation opens its
/// own connection, which is closed when dropped on whichever path it exits by.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(super::DEFAULT_BUSY_TIMEOUT_MS)
        }
    }

    /// How long a connection waits on a locked database before failing.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the database and creates the table if it is absent.
    pub fn initialize(&self) -> rusqlite::Result<()> {
        let connection = self.connect()?;
        connection.execute_batch(CREATE_SCHEMA)?;

        info!("Database initialised at {}", self.path().display());

        Ok(())
    }

    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(&self.path, flags)?;
        connection.busy_timeout(self.busy_timeout)?;

        Ok(connection)
    }

    /// Begins the single write transaction an upload runs in.
    ///
    /// `IMMEDIATE` takes the write lock up front so the before and after row
    /// counts of one upload cannot interleave with another writer.
    pub fn begin_upload(connection: &mut Connection) -> rusqlite::Result<UploadTransaction<'_>> {
        let transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
        UploadTransaction::new(transaction)
    }

    pub fn count(connection: &Connection) -> rusqlite::Result<u64> {
        let count: i64 = connection.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn aggregate(connection: &Connection, user_id: UserId, start_date: QueryDate, end_date: QueryDate) -> rusqlite::Result<AggregateRow> {
        let mut statement = connection.prepare_cached(SELECT_AGGREGATE)?;

        statement.query_row(params![user_id, start_date.start_bound(), end_date.end_bound()], |row| {
            Ok(AggregateRow {
                count: row.get::<_, i64>(0)? as u64,
                max: row.get(1)?,
                min: row.get(2)?,
                mean: row.get(3)?
            })
        })
    }

    /// Deletes every stored record and returns how many were removed.
    pub fn clear(connection: &Connection) -> rusqlite::Result<u64> {
        let deleted = connection.execute("DELETE FROM transactions", [])?;
        Ok(deleted as u64)
    }
}
