use std::path::Path;

use anyhow::Context;
use rusqlite::Connection;

/// Open the database file, creating its directory if needed, and run every
/// subsystem's schema setup (idempotent).
pub fn open_database(path: &str) -> anyhow::Result<Connection> {
    ensure_parent_dir(path);
    let conn = Connection::open(path).with_context(|| format!("opening database {path}"))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
    neurodata_datasets::db::init_db(&conn)?;
    neurodata_scheduler::db::init_db(&conn)?;
    Ok(conn)
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
