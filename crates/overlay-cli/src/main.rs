//! Overlay CLI
//!
//! Merges prioritized layer directories into one output, once for a build or
//! continuously while serving.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::Project;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing already initialized", "warning".yellow());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let project = Project::new(root, &cli.config);

    match cli.command {
        Some(cmd) => execute_command(&project, cmd),
        None => {
            println!("{} layered directory merger", "overlay".green().bold());
            println!();
            println!("Run {} for available commands.", "overlay --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(project: &Project, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { layers, force } => commands::run_init(project, &layers, force),
        Commands::Build { json } => commands::run_build(project, json),
        Commands::Serve => commands::run_serve(project),
        Commands::Check { mode, json } => commands::run_check(project, mode.into(), json),
        Commands::Layers { json } => commands::run_layers(project, json),
    }
}
