use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use neurodata_core::NeuroConfig;
use neurodata_scheduler::{periodic_jobs, FiredJob, SchedulerEngine, SchedulerHandle};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::db::open_database;

pub fn list(handle: &SchedulerHandle, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(
        out,
        "{:<28}  {:>8}  {:>5}  {:<27}  {:<27}  TASK",
        "NAME", "EVERY", "RUNS", "LAST RUN", "NEXT DUE"
    )?;
    for job in handle.list_jobs(Utc::now())? {
        writeln!(
            out,
            "{:<28}  {:>8}  {:>5}  {:<27}  {:<27}  {}",
            job.name,
            format_interval(job.interval_secs),
            job.run_count,
            job.last_run.as_deref().unwrap_or("never"),
            job.next_due,
            job.task
        )?;
    }
    Ok(())
}

pub fn reset(handle: &SchedulerHandle, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    handle.reset_job(name)?;
    writeln!(out, "Cleared run history of {name}; it fires on the next tick")?;
    Ok(())
}

/// Run the engine until Ctrl-C. Each fired job is written to stdout as one
/// JSON line for the worker pool to pick up.
pub async fn run(config: &NeuroConfig) -> anyhow::Result<()> {
    let (fired_tx, mut fired_rx) = mpsc::channel::<FiredJob>(config.scheduler.channel_capacity);
    let engine = SchedulerEngine::new(
        open_database(&config.database.path)?,
        periodic_jobs().to_vec(),
        Some(fired_tx),
    )?
    .with_tick(Duration::from_secs(config.scheduler.tick_secs));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine_task = tokio::spawn(async move { engine.run(shutdown_rx).await });

    // The engine owns the only sender, so this ends once the engine stops.
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(job) = fired_rx.recv().await {
            match serde_json::to_string(&job) {
                Ok(line) => {
                    if writeln!(stdout, "{line}").and_then(|_| stdout.flush()).is_err() {
                        warn!("stdout closed, stopping dispatch output");
                        break;
                    }
                }
                Err(e) => warn!(job = %job.name, "could not serialise fired job: {e}"),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, stopping scheduler");
    let _ = shutdown_tx.send(true);
    engine_task.await?;
    printer.await?;
    Ok(())
}

fn format_interval(secs: u64) -> String {
    match secs {
        s if s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn intervals_render_compactly() {
        assert_eq!(format_interval(30), "30s");
        assert_eq!(format_interval(60), "1m");
        assert_eq!(format_interval(1800), "30m");
        assert_eq!(format_interval(3600), "1h");
        assert_eq!(format_interval(86_400), "1d");
    }

    #[test]
    fn list_shows_every_table_entry() {
        let handle =
            SchedulerHandle::new(Connection::open_in_memory().unwrap(), periodic_jobs().to_vec()).unwrap();
        let mut buf = Vec::new();
        list(&handle, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1 + periodic_jobs().len());
        assert!(text.contains("monitor-blockchain-events"));
        assert!(text.contains("never"));
    }

    #[test]
    fn reset_unknown_job_fails() {
        let handle =
            SchedulerHandle::new(Connection::open_in_memory().unwrap(), periodic_jobs().to_vec()).unwrap();
        let mut buf = Vec::new();
        assert!(reset(&handle, "no-such-job", &mut buf).is_err());
    }
}
