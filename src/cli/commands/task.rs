//! `trt task` commands - list, show, and edit tasks

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::catalog::Field;
use crate::cli::helpers::{resolve_task, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::store::{TaskStore, YamlStore};
use crate::core::Config;
use crate::entities::{ChangeDetail, TaskStatus};
use crate::reconcile::{update_task, Actor};

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks in the register
    List(ListArgs),

    /// Show one task as YAML
    Show(ShowArgs),

    /// Set field values on one task, recording the change in its history
    Set(SetArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only tasks with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Only tasks whose assignee contains this text
    #[arg(long)]
    pub assignee: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Task id, id prefix, or business reference
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Task id, id prefix, or business reference
    pub id: String,

    /// Field assignments, e.g. status=done assignee="Alice"
    #[arg(required = true)]
    pub assignments: Vec<String>,
}

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    }
    .into_diagnostic()?;
    let mut store = YamlStore::open(&project);

    match cmd {
        TaskCommands::List(args) => list(&store, args),
        TaskCommands::Show(args) => show(&store, args),
        TaskCommands::Set(args) => set(&mut store, args),
    }
}

fn list(store: &dyn TaskStore, args: ListArgs) -> Result<()> {
    let status_filter: Option<TaskStatus> = match &args.status {
        Some(s) => Some(
            s.parse()
                .map_err(|e: String| miette::miette!("{}", e))?,
        ),
        None => None,
    };

    let tasks: Vec<_> = store
        .get_all()
        .into_diagnostic()?
        .into_iter()
        .filter(|t| status_filter.map_or(true, |s| t.status == s))
        .filter(|t| {
            args.assignee
                .as_deref()
                .map_or(true, |a| t.assignee.to_lowercase().contains(&a.to_lowercase()))
        })
        .collect();

    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Reference", "Status", "Assignee", "Delay", "Net"]);
    for task in &tasks {
        builder.push_record([
            task.id.to_string(),
            task.task_reference.clone().unwrap_or_default(),
            task.status.to_string(),
            truncate_str(&task.assignee, 20),
            task.delay_days.map(|v| v.to_string()).unwrap_or_default(),
            task.net_amount.map(|v| v.to_string()).unwrap_or_default(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));
    println!("{} task(s) found", tasks.len());
    Ok(())
}

fn show(store: &dyn TaskStore, args: ShowArgs) -> Result<()> {
    let task = resolve_task(store, &args.id)?;
    print!("{}", serde_yml::to_string(&task).into_diagnostic()?);
    Ok(())
}

fn set(store: &mut YamlStore, args: SetArgs) -> Result<()> {
    let task = resolve_task(store, &args.id)?;

    let mut changes = Vec::new();
    for assignment in &args.assignments {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            miette::miette!("invalid assignment '{}' (expected field=value)", assignment)
        })?;
        let field: Field = name.parse().map_err(|e| miette::miette!("{}", e))?;

        let old = field.get(&task);
        let new = field.kind().coerce(raw);
        if old == new {
            continue;
        }
        changes.push(ChangeDetail {
            field: field.as_str().to_string(),
            field_label: field.label().to_string(),
            old_value: old.to_json(),
            new_value: new.to_json(),
        });
    }

    if changes.is_empty() {
        println!("No changes to {}", task.id);
        return Ok(());
    }

    let config = Config::load();
    let author = config.author();
    let actor = Actor {
        user_id: author.clone(),
        user_name: author,
    };
    let change_count = changes.len();
    let updated = update_task(store, &task.id, changes, &actor).into_diagnostic()?;

    println!(
        "{} Updated {} ({} change(s))",
        style("✓").green(),
        style(&updated.id).cyan(),
        change_count
    );
    Ok(())
}
