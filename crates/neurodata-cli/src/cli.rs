use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use neurodata_datasets::{DatasetStatus, PaginationPreset};

/// Operator tooling for the NeuroData platform.
#[derive(Parser, Debug)]
#[command(name = "neurodata", version, about)]
pub struct Cli {
    /// Path to neurodata.toml (defaults to NEURODATA_CONFIG, then ~/.neurodata/neurodata.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Approve draft datasets (testing helper).
    Approve(ApproveArgs),

    /// Find datasets whose content repeats an older upload.
    CleanupDuplicates(CleanupArgs),

    /// Register and browse datasets.
    #[command(subcommand)]
    Datasets(DatasetsCommand),

    /// Inspect or run the periodic job table.
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// Delete the database file and recreate an empty schema.
    ResetDb(ResetArgs),
}

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Approve every draft dataset.
    #[arg(long, conflicts_with = "user")]
    pub all: bool,

    /// Approve only drafts owned by this username.
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,
}

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Delete the duplicates. Without this flag the command is a dry run.
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand, Debug)]
pub enum DatasetsCommand {
    /// Hash a file and register it as a draft dataset.
    Add {
        file: PathBuf,
        #[arg(long)]
        owner: String,
        /// Defaults to the file name.
        #[arg(long)]
        title: Option<String>,
    },
    /// List datasets, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Capped by the preset's maximum.
        #[arg(long)]
        page_size: Option<u32>,
        /// Default and maximum page size.
        #[arg(long, value_enum, default_value_t = PresetArg::Standard)]
        preset: PresetArg,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Show every periodic job with its last run and next due time.
    List,
    /// Run the scheduler until Ctrl-C, printing fired jobs as JSON lines.
    Run,
    /// Clear a job's run history so it fires on the next tick.
    Reset { name: String },
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Actually delete. Without this flag only the target files are printed.
    #[arg(long)]
    pub yes: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Draft,
    Approved,
}

impl From<StatusArg> for DatasetStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Draft => DatasetStatus::Draft,
            StatusArg::Approved => DatasetStatus::Approved,
        }
    }
}

/// Page-size presets: standard 20 (max 100), large 50 (max 1000), small 10 (max 50).
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetArg {
    Standard,
    Large,
    Small,
}

impl From<PresetArg> for PaginationPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Standard => PaginationPreset::STANDARD,
            PresetArg::Large => PaginationPreset::LARGE,
            PresetArg::Small => PaginationPreset::SMALL,
        }
    }
}
