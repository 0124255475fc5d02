use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{
    db::{self, init_db},
    error::{Result, SchedulerError},
    schedule::{is_due, next_due},
    table,
    types::{FiredJob, JobRunState, ScheduledJob},
};

/// Read/reset access to run state while the engine loop runs elsewhere.
///
/// Uses its own `Connection` so the CLI can inspect jobs without
/// conflicting with the engine's tick queries.
pub struct SchedulerHandle {
    conn: Arc<Mutex<Connection>>,
    jobs: Vec<ScheduledJob>,
}

impl SchedulerHandle {
    pub fn new(conn: Connection, jobs: Vec<ScheduledJob>) -> Result<Self> {
        table::validate(&jobs)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            jobs,
        })
    }

    /// Run state of every table entry, in table order.
    pub fn list_jobs(&self, now: DateTime<Utc>) -> Result<Vec<JobRunState>> {
        let conn = self.conn.lock().unwrap();
        self.jobs
            .iter()
            .map(|job| -> Result<JobRunState> {
                let run = db::load_run(&conn, job.name)?;
                let last = run.map(|(at, _)| at);
                Ok(JobRunState {
                    name: job.name.to_string(),
                    task: job.task.to_string(),
                    interval_secs: job.interval_secs(),
                    last_run: last.map(db::format_ts),
                    run_count: run.map(|(_, n)| n).unwrap_or(0),
                    next_due: db::format_ts(next_due(job, last, now)),
                })
            })
            .collect()
    }

    /// Forget a job's run history so it fires on the engine's next tick.
    pub fn reset_job(&self, name: &str) -> Result<()> {
        if table::find(&self.jobs, name).is_none() {
            return Err(SchedulerError::JobNotFound {
                name: name.to_string(),
            });
        }
        let conn = self.conn.lock().unwrap();
        if db::clear_run(&conn, name)? {
            info!(job = %name, "job run state cleared via handle");
        }
        Ok(())
    }
}

/// Core scheduler: walks the periodic table on every tick and fires due jobs.
pub struct SchedulerEngine {
    conn: Connection,
    jobs: Vec<ScheduledJob>,
    tick: Duration,
    /// Fired jobs are sent here for the worker pool.
    fired_tx: Option<mpsc::Sender<FiredJob>>,
}

impl SchedulerEngine {
    /// Create a new engine over `jobs`, initialising the DB schema if needed.
    ///
    /// Pass `Some(tx)` to receive every [`FiredJob`]. The sender is
    /// non-blocking (`try_send`) so the tick loop is never stalled.
    pub fn new(
        conn: Connection,
        jobs: Vec<ScheduledJob>,
        fired_tx: Option<mpsc::Sender<FiredJob>>,
    ) -> Result<Self> {
        table::validate(&jobs)?;
        init_db(&conn)?;
        Ok(Self {
            conn,
            jobs,
            tick: Duration::from_secs(1),
            fired_tx,
        })
    }

    /// Override the polling period (default 1 s).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Main event loop. Ticks until `shutdown` broadcasts `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(jobs = self.jobs.len(), tick_ms = self.tick.as_millis() as u64, "scheduler engine started");

        let mut interval = tokio::time::interval(self.tick);
        // Under load, skip ticks rather than bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick_at(Utc::now()) {
                        error!("scheduler tick error: {e}");
                    }
                }
                changed = shutdown.changed() => {
                    // a dropped sender counts as shutdown
                    if changed.is_err() || *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Fire every job due at `now`. Returns the jobs fired on this tick.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<Vec<FiredJob>> {
        let mut fired = Vec::new();

        for job in &self.jobs {
            let last = db::load_run(&self.conn, job.name)?.map(|(at, _)| at);
            if !is_due(job, last, now) {
                continue;
            }

            // Record before dispatch: a dropped fire still counts as a run so
            // the job is not retried before its next interval.
            let run_count = db::record_run(&self.conn, job.name, job.task, now)?;
            let fire = FiredJob {
                name: job.name.to_string(),
                task: job.task.to_string(),
                fired_at: db::format_ts(now),
                run_count,
            };
            debug!(job = %job.name, task = %job.task, run = run_count, "job due");

            if let Some(ref tx) = self.fired_tx {
                if tx.try_send(fire.clone()).is_err() {
                    warn!(job = %job.name, "dispatch channel full or closed — fire dropped");
                }
            }
            fired.push(fire);
        }

        if !fired.is_empty() {
            info!(count = fired.len(), "jobs dispatched");
        }
        Ok(fired)
    }
}
