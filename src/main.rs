use clap::Parser;
use miette::Result;
use trt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => trt::cli::commands::init::run(args),
        Commands::Map(args) => trt::cli::commands::map::run(args, &global),
        Commands::Import(args) => trt::cli::commands::import::run(args, &global),
        Commands::Task(cmd) => trt::cli::commands::task::run(cmd, &global),
        Commands::History(args) => trt::cli::commands::history::run(args, &global),
        Commands::Fields(args) => trt::cli::commands::fields::run(args),
        Commands::Completions(args) => trt::cli::commands::completions::run(args),
    }
}
