use std::io::Write;
use std::path::Path;

use anyhow::Context;
use neurodata_datasets::{hash::hash_file, DatasetStatus, DatasetStore, NewDataset, PaginationPreset};

/// Hash `file` and register it as a draft owned by `owner`.
pub fn add(
    store: &DatasetStore,
    file: &Path,
    owner: &str,
    title: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let hash = hash_file(file).with_context(|| format!("hashing {}", file.display()))?;
    let title = match title {
        Some(t) => t.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string()),
    };
    let dataset = store.insert(&NewDataset::new(title, owner, hash))?;
    writeln!(
        out,
        "Registered {} ({}) hash={} status={}",
        dataset.id, dataset.title, dataset.content_hash, dataset.status
    )?;
    Ok(())
}

pub fn list(
    store: &DatasetStore,
    preset: PaginationPreset,
    page: u32,
    page_size: Option<u32>,
    status: Option<DatasetStatus>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let request = preset.request(page, page_size);
    let page = store.list(status, request)?;

    if page.items.is_empty() {
        writeln!(out, "No datasets")?;
        return Ok(());
    }
    writeln!(out, "{:<36}  {:<9}  {:<16}  {:<27}  TITLE", "ID", "STATUS", "OWNER", "CREATED")?;
    for d in &page.items {
        writeln!(
            out,
            "{:<36}  {:<9}  {:<16}  {:<27}  {}",
            d.id,
            d.status.to_string(),
            d.owner,
            d.created_at,
            d.title
        )?;
    }
    writeln!(
        out,
        "Page {} of {} ({} total){}",
        page.page,
        page.total_pages,
        page.total,
        if page.has_next { ", more with --page" } else { "" }
    )?;
    Ok(())
}
