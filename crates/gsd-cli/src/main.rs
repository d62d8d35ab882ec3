mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gsd",
    about = "Project lifecycle state and prerequisite gating for .planning/ workflows",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .planning/ or .git/)
    #[arg(long, global = true, env = "GSD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved lifecycle state
    State,

    /// Show the recommended next command
    Next,

    /// Print a plain-text state summary for prompt embedding
    Context,

    /// Check a command's prerequisites (reads PreToolUse hook JSON from stdin
    /// when --command is omitted)
    Prereqs {
        /// Command to check, e.g. gsd:plan-phase
        #[arg(long)]
        command: Option<String>,
        /// Argument string; a leading integer is the phase number
        #[arg(long)]
        args: Option<String>,
    },

    /// Mark a discuss or research step as deliberately skipped
    Skip {
        /// discuss-project, research-project, discuss-phase or research-phase
        command: String,
        /// Phase number for phase-scoped commands
        phase: Option<u32>,
    },

    /// Review and remove the current project's artifacts
    EndProject {
        /// Remove .planning/project/ without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Inspect and modify .planning/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// `RUST_LOG` when set and valid, otherwise warnings only.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Next => cmd::next::run(&root, cli.json),
        Commands::Context => cmd::context::run(&root),
        Commands::Prereqs { command, args } => {
            let code = cmd::prereqs::run(&root, command.as_deref(), args.as_deref(), cli.json);
            std::process::exit(code);
        }
        Commands::Skip { command, phase } => cmd::skip::run(&root, &command, phase, cli.json),
        Commands::EndProject { yes } => cmd::end_project::run(&root, yes, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
