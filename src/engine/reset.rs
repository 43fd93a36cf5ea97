use crate::models::ClearReport;
use crate::storage::Database;
use tracing::info;

/// Deletes every stored transaction. Clearing an empty table succeeds with zero rows.
pub fn clear(database: &Database) -> rusqlite::Result<ClearReport> {
    let connection = database.connect()?;
    let rows_deleted = Database::clear(&connection)?;

    info!("Cleared {rows_deleted} transactions");

    Ok(ClearReport::new(rows_deleted))
}
