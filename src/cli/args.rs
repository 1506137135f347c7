//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    fields::FieldsArgs,
    history::HistoryArgs,
    import::ImportArgs,
    init::InitArgs,
    map::MapArgs,
    task::TaskCommands,
};

#[derive(Parser)]
#[command(name = "trt")]
#[command(author, version, about = "Transit Reconciliation Toolkit")]
#[command(
    long_about = "A Unix-style toolkit for reconciling CSV exports from operational tools into a plain-text task register with a field-level audit trail."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .trt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new TRT project
    Init(InitArgs),

    /// Infer a header mapping for a CSV file without importing it
    Map(MapArgs),

    /// Import a CSV file into the task register
    Import(ImportArgs),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show a task's history ledger
    History(HistoryArgs),

    /// List the field catalog
    Fields(FieldsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
