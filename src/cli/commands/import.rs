//! `trt import` command - reconcile a CSV file into the task register

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::catalog::CATALOG;
use crate::cli::helpers::truncate_str;
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::store::{TaskStore, YamlStore};
use crate::core::Config;
use crate::ingest::{
    infer_mapping, materialize, validate_required, CommandSuggester, CsvTable, ImportSource,
    Suggest,
};
use crate::reconcile::{reconcile, Actor};

use super::map::{load_mapping_file, print_mapping};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Use a reviewed mapping file instead of running inference
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Tag recorded on every import history entry
    #[arg(long, value_enum, default_value_t = ImportSource::CsvUpload)]
    pub source: ImportSource,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    }
    .into_diagnostic()?;
    let config = Config::load();

    let table = CsvTable::read(&args.file).into_diagnostic()?;

    let mappings = match &args.mapping {
        Some(path) => load_mapping_file(path)?,
        None => {
            let suggester = config
                .suggest_command()
                .and_then(|command| CommandSuggester::from_command(&command));
            let outcome = infer_mapping(
                &table.headers,
                CATALOG,
                suggester.as_ref().map(|s| s as &dyn Suggest),
            );
            for warning in &outcome.warnings {
                eprintln!("{} {}", style("!").yellow(), warning);
            }
            if global.verbose {
                print_mapping(&outcome.mappings);
            }
            outcome.mappings
        }
    };

    // fail closed before any store mutation
    validate_required(&mappings, CATALOG).into_diagnostic()?;

    let candidates = materialize(&table, &mappings, args.source);
    let mut store = YamlStore::open(&project);

    if args.dry_run {
        for candidate in &candidates {
            let matched = match candidate.reference() {
                Some(reference) => store
                    .find_by_reference(reference)
                    .into_diagnostic()?
                    .into_iter()
                    .next(),
                None => None,
            };
            match matched {
                Some(task) => println!(
                    "{} Row {}: Would update {} - {}",
                    style("○").dim(),
                    candidate.row + 1,
                    style(&task.id).cyan(),
                    truncate_str(candidate.reference().unwrap_or(""), 40)
                ),
                None => println!(
                    "{} Row {}: Would create task - {}",
                    style("○").dim(),
                    candidate.row + 1,
                    truncate_str(&candidate.token, 40)
                ),
            }
        }
        println!(
            "{} Dry run: {} row(s), nothing written",
            style("→").blue(),
            candidates.len()
        );
        return Ok(());
    }

    let author = config.author();
    let actor = Actor {
        user_id: author.clone(),
        user_name: author,
    };
    let summary = reconcile(&mut store, &candidates, &actor, args.source).into_diagnostic()?;

    for warning in &summary.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
    if !global.quiet {
        println!(
            "{} Imported {} row(s): {} created, {} updated, {} skipped",
            style("✓").green(),
            summary.processed,
            summary.created,
            summary.updated,
            summary.skipped
        );
    }

    Ok(())
}
