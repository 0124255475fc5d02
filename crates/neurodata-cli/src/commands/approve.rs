use std::io::Write;

use neurodata_datasets::DatasetStore;
use tracing::info;

use crate::cli::ApproveArgs;

pub fn run(store: &DatasetStore, args: &ApproveArgs, out: &mut impl Write) -> anyhow::Result<()> {
    if !args.all && args.user.is_none() {
        writeln!(out, "Specify --all to approve every draft or --user <name> for one owner.")?;
        return Ok(());
    }

    let owner = args.user.as_deref();
    let summary = store.approve_drafts(owner)?;
    info!(owner = ?owner, found = summary.found, approved = summary.approved, "approve finished");

    if summary.found == 0 {
        match owner {
            Some(name) => writeln!(out, "No draft datasets found for user '{name}'")?,
            None => writeln!(out, "No draft datasets found")?,
        }
        return Ok(());
    }

    writeln!(out, "Found {} draft dataset(s)", summary.found)?;
    writeln!(out, "Approved {} dataset(s)", summary.approved)?;
    Ok(())
}
