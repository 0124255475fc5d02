use clap::Parser;
use neurodata_core::NeuroConfig;
use neurodata_datasets::DatasetStore;
use neurodata_scheduler::{periodic_jobs, SchedulerHandle};
use tracing::{info, warn};

mod cli;
mod commands;
mod db;

use cli::{Cli, Command, DatasetsCommand, ScheduleCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // load config: --config > NEURODATA_CONFIG env > ~/.neurodata/neurodata.toml
    let explicit = cli.config.clone().or_else(|| std::env::var("NEURODATA_CONFIG").ok());
    // a file the operator named must load; the default location may be absent
    let (config, load_err) = NeuroConfig::load_or_default(explicit.as_deref())?;

    // logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = load_err {
        warn!(code = e.code(), "{e}, using defaults");
    }
    info!(environment = %config.environment, db = %config.database.path, "neurodata starting");

    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Approve(args) => {
            let store = DatasetStore::new(db::open_database(&config.database.path)?);
            commands::approve::run(&store, &args, &mut out)?;
        }
        Command::CleanupDuplicates(args) => {
            let store = DatasetStore::new(db::open_database(&config.database.path)?);
            commands::cleanup::run(&store, &args, &mut out)?;
        }
        Command::Datasets(DatasetsCommand::Add { file, owner, title }) => {
            let store = DatasetStore::new(db::open_database(&config.database.path)?);
            commands::datasets::add(&store, &file, &owner, title.as_deref(), &mut out)?;
        }
        Command::Datasets(DatasetsCommand::List {
            page,
            page_size,
            preset,
            status,
        }) => {
            let store = DatasetStore::new(db::open_database(&config.database.path)?);
            commands::datasets::list(
                &store,
                preset.into(),
                page,
                page_size,
                status.map(Into::into),
                &mut out,
            )?;
        }
        Command::Schedule(ScheduleCommand::List) => {
            let handle = SchedulerHandle::new(
                db::open_database(&config.database.path)?,
                periodic_jobs().to_vec(),
            )?;
            commands::schedule::list(&handle, &mut out)?;
        }
        Command::Schedule(ScheduleCommand::Reset { name }) => {
            let handle = SchedulerHandle::new(
                db::open_database(&config.database.path)?,
                periodic_jobs().to_vec(),
            )?;
            commands::schedule::reset(&handle, &name, &mut out)?;
        }
        Command::Schedule(ScheduleCommand::Run) => {
            // the dispatch printer writes to stdout itself
            drop(out);
            commands::schedule::run(&config).await?;
        }
        Command::ResetDb(args) => {
            if config.environment.is_production() && args.yes {
                warn!("resetting a production database");
            }
            commands::reset::run(&config.database.path, args.yes, &mut out)?;
        }
    }
    Ok(())
}
