//! `trt map` command - infer a header mapping without importing

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

use crate::catalog::CATALOG;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::ingest::{infer_mapping, CommandSuggester, CsvTable, HeaderMapping, Suggest};

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// CSV file to analyze
    pub file: PathBuf,

    /// Write the mapping to this YAML file for review and adjustment
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: MapArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let table = CsvTable::read(&args.file).into_diagnostic()?;

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

    if !global.quiet {
        print_mapping(&outcome.mappings);
    }

    if let Some(output) = &args.output {
        save_mapping_file(output, &outcome.mappings)?;
        println!(
            "{} Wrote mapping to {} (edit it, then run: trt import {} --mapping {})",
            style("✓").green(),
            output.display(),
            args.file.display(),
            output.display()
        );
    }

    Ok(())
}

/// Print a mapping as a table of header, field, and confidence
pub fn print_mapping(mappings: &[HeaderMapping]) {
    let mut builder = Builder::default();
    builder.push_record(["CSV Header", "Field", "Confidence"]);
    for mapping in mappings {
        builder.push_record([
            mapping.csv_header.clone(),
            mapping
                .field
                .map(|f| f.to_string())
                .unwrap_or_else(|| "(unmapped)".to_string()),
            format!("{:.2}", mapping.confidence),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    let mapped = mappings.iter().filter(|m| m.field.is_some()).count();
    println!("{} of {} column(s) mapped", mapped, mappings.len());
}

/// Write a mapping file for human adjustment
pub fn save_mapping_file(path: &Path, mappings: &[HeaderMapping]) -> Result<()> {
    let yaml = serde_yml::to_string(&mappings).into_diagnostic()?;
    std::fs::write(path, yaml).into_diagnostic()
}

/// Load a previously saved (and possibly hand-edited) mapping file
pub fn load_mapping_file(path: &Path) -> Result<Vec<HeaderMapping>> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_yml::from_str(&content).into_diagnostic()
}
