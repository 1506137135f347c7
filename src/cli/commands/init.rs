//! `trt init` command - create a new project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Re-initialize even if a project already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let project = if args.force {
        Project::init_force(&args.path).into_diagnostic()?
    } else {
        match Project::init(&args.path) {
            Ok(project) => project,
            Err(ProjectError::AlreadyExists(root)) => {
                println!(
                    "TRT project already exists at {} (use --force to re-initialize)",
                    root.display()
                );
                return Ok(());
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    };

    println!(
        "{} Initialized TRT project at {}",
        style("✓").green(),
        project.root().display()
    );
    println!("  .trt/config.yaml   project configuration");
    println!("  tasks/             task register");
    Ok(())
}
