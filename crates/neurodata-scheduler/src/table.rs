use std::collections::HashSet;

use crate::error::{Result, SchedulerError};
use crate::types::ScheduledJob;

static PERIODIC_JOBS: [ScheduledJob; 6] = [
    ScheduledJob::every_secs(
        "monitor-blockchain-events",
        "blockchain.tasks.monitor_blockchain_events",
        30,
    ),
    ScheduledJob::every_secs(
        "cleanup-expired-sessions",
        "authentication.tasks.cleanup_expired_sessions",
        60 * 60,
    ),
    ScheduledJob::every_secs(
        "update-dataset-statistics",
        "datasets.tasks.update_dataset_statistics",
        30 * 60,
    ),
    ScheduledJob::every_secs(
        "process-training-queue",
        "training.tasks.process_training_queue",
        60,
    ),
    ScheduledJob::every_secs(
        "cleanup-old-training-files",
        "training.tasks.cleanup_old_training_files",
        24 * 60 * 60,
    ),
    ScheduledJob::every_secs(
        "update-training-statistics",
        "training.tasks.update_training_statistics",
        60 * 60,
    ),
];

/// The platform's recurring background work. Read-only for the process lifetime.
pub fn periodic_jobs() -> &'static [ScheduledJob] {
    &PERIODIC_JOBS
}

/// Look up a job by name in `jobs`.
pub fn find<'a>(jobs: &'a [ScheduledJob], name: &str) -> Option<&'a ScheduledJob> {
    jobs.iter().find(|j| j.name == name)
}

/// Reject tables with repeated names or zero intervals.
pub fn validate(jobs: &[ScheduledJob]) -> Result<()> {
    let mut seen = HashSet::new();
    for job in jobs {
        if !seen.insert(job.name) {
            return Err(SchedulerError::DuplicateJob {
                name: job.name.to_string(),
            });
        }
        if job.interval.is_zero() {
            return Err(SchedulerError::InvalidSchedule(format!(
                "{}: interval must be positive",
                job.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        validate(periodic_jobs()).unwrap();
        assert_eq!(periodic_jobs().len(), 6);
    }

    #[test]
    fn builtin_intervals() {
        let expect = [
            ("monitor-blockchain-events", 30),
            ("cleanup-expired-sessions", 3600),
            ("update-dataset-statistics", 1800),
            ("process-training-queue", 60),
            ("cleanup-old-training-files", 86400),
            ("update-training-statistics", 3600),
        ];
        for (name, secs) in expect {
            let job = find(periodic_jobs(), name).unwrap_or_else(|| panic!("missing {name}"));
            assert_eq!(job.interval_secs(), secs, "{name}");
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let jobs = [
            ScheduledJob::every_secs("a", "x.a", 10),
            ScheduledJob::every_secs("a", "x.b", 20),
        ];
        assert!(matches!(
            validate(&jobs),
            Err(SchedulerError::DuplicateJob { name }) if name == "a"
        ));
    }

    #[test]
    fn zero_interval_rejected() {
        let jobs = [ScheduledJob::every_secs("a", "x.a", 0)];
        assert!(matches!(validate(&jobs), Err(SchedulerError::InvalidSchedule(_))));
    }
}
