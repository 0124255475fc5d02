use rusqlite::Connection;

use crate::error::Result;

/// Initialise the datasets table and its indexes.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS datasets (
            seq           INTEGER PRIMARY KEY AUTOINCREMENT,   -- insertion order
            id            TEXT NOT NULL UNIQUE,
            title         TEXT NOT NULL,
            owner         TEXT NOT NULL,
            content_hash  TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'draft',
            created_at    TEXT NOT NULL,   -- fixed-width RFC 3339, sorts lexically
            updated_at    TEXT NOT NULL
        );
        -- Bulk approval: WHERE status = 'draft' [AND owner = ?]
        CREATE INDEX IF NOT EXISTS idx_datasets_status_owner
            ON datasets(status, owner);
        -- Duplicate scan walks this in order
        CREATE INDEX IF NOT EXISTS idx_datasets_created
            ON datasets(created_at, seq);
        CREATE INDEX IF NOT EXISTS idx_datasets_hash
            ON datasets(content_hash);",
    )?;
    Ok(())
}
