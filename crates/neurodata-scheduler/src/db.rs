use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, SchedulerError};

/// Initialise the scheduler schema in `conn`.
///
/// One row per job name; rows are created lazily on first fire.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS job_runs (
            name        TEXT    NOT NULL PRIMARY KEY,
            task        TEXT    NOT NULL,
            last_run    TEXT    NOT NULL,   -- RFC 3339 UTC
            run_count   INTEGER NOT NULL DEFAULT 0,
            updated_at  TEXT    NOT NULL
        ) STRICT;
        ",
    )?;
    Ok(())
}

pub(crate) fn format_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulerError::InvalidTimestamp(format!("{s}: {e}")))
}

/// Last recorded run and run count for `name`, if it has ever fired.
pub(crate) fn load_run(conn: &Connection, name: &str) -> Result<Option<(DateTime<Utc>, u32)>> {
    let row: Option<(String, u32)> = conn
        .query_row(
            "SELECT last_run, run_count FROM job_runs WHERE name = ?1",
            [name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    match row {
        Some((ts, count)) => Ok(Some((parse_ts(&ts)?, count))),
        None => Ok(None),
    }
}

/// Record a fire at `at` and return the new run count.
pub(crate) fn record_run(conn: &Connection, name: &str, task: &str, at: DateTime<Utc>) -> Result<u32> {
    let ts = format_ts(at);
    let count = conn.query_row(
        "INSERT INTO job_runs (name, task, last_run, run_count, updated_at)
         VALUES (?1, ?2, ?3, 1, ?3)
         ON CONFLICT(name) DO UPDATE SET
             task = excluded.task,
             last_run = excluded.last_run,
             run_count = job_runs.run_count + 1,
             updated_at = excluded.updated_at
         RETURNING run_count",
        rusqlite::params![name, task, ts],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Forget the run state of `name`. Returns whether a row existed.
pub(crate) fn clear_run(conn: &Connection, name: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM job_runs WHERE name = ?1", [name])?;
    Ok(n > 0)
}
