use std::io::Write;

use neurodata_datasets::{CleanupMode, DatasetStore};

use crate::cli::CleanupArgs;

pub fn run(store: &DatasetStore, args: &CleanupArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mode = if args.confirm {
        CleanupMode::Commit
    } else {
        CleanupMode::Report
    };
    let report = store.cleanup_duplicates(mode)?;

    if report.is_empty() {
        writeln!(out, "No duplicate datasets found ({} scanned)", report.scanned)?;
        return Ok(());
    }

    writeln!(out, "Found {} duplicate dataset(s):", report.duplicates.len())?;
    for dup in &report.duplicates {
        let d = &dup.dataset;
        writeln!(
            out,
            "  {}  {:<32}  owner={}  hash={}  duplicate of {}",
            d.id, d.title, d.owner, d.content_hash, dup.canonical_id
        )?;
    }

    if args.confirm {
        writeln!(out, "Deleted {} duplicate dataset(s)", report.deleted)?;
    } else {
        writeln!(out, "Dry run: nothing deleted. Re-run with --confirm to delete them.")?;
    }
    Ok(())
}
