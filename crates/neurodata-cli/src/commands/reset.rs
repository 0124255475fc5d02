use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::db::open_database;

/// The database file and its WAL siblings.
fn targets(path: &str) -> Vec<PathBuf> {
    ["", "-wal", "-shm"]
        .iter()
        .map(|suffix| PathBuf::from(format!("{path}{suffix}")))
        .collect()
}

pub fn run(path: &str, yes: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let existing: Vec<PathBuf> = targets(path).into_iter().filter(|p| p.exists()).collect();

    if !yes {
        if existing.is_empty() {
            writeln!(out, "Nothing to delete at {path}")?;
        } else {
            writeln!(out, "Would delete:")?;
            for p in &existing {
                writeln!(out, "  {}", p.display())?;
            }
            writeln!(out, "Re-run with --yes to reset the database.")?;
        }
        return Ok(());
    }

    for p in &existing {
        std::fs::remove_file(p)?;
        warn!(file = %p.display(), "database file deleted");
    }
    // recreate an empty schema so the next command starts clean
    drop(open_database(path)?);
    info!(path, "database reset");
    writeln!(out, "Deleted {} file(s); empty schema created at {path}", existing.len())?;
    Ok(())
}
