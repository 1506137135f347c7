//! `trt history` command - show a task's history ledger

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::resolve_task;
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::store::YamlStore;
use crate::reconcile::IMPORT_FIELD;

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Task id, id prefix, or business reference
    pub id: String,
}

pub fn run(args: HistoryArgs, global: &GlobalOpts) -> Result<()> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    }
    .into_diagnostic()?;
    let store = YamlStore::open(&project);

    let task = resolve_task(&store, &args.id)?;
    if task.history.is_empty() {
        println!("No history recorded for {}", task.id);
        return Ok(());
    }

    println!("History for {}", style(&task.id).cyan());
    for entry in &task.history {
        println!(
            "{} {}  {}",
            style("●").cyan(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            entry.user_name
        );
        for change in &entry.changes {
            if change.field == IMPORT_FIELD {
                println!("    import via {}", change.field_label);
            } else {
                println!(
                    "    {}: {} → {}",
                    change.field, change.old_value, change.new_value
                );
            }
        }
    }
    println!("{} entr(ies)", task.history.len());
    Ok(())
}
