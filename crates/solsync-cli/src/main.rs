//! solsync CLI
//!
//! The command-line interface for synchronizing a project's Lua scripts with
//! a solution's library and event handler resources.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Solution script sync", "solsync".green().bold());
            println!();
            println!("Run {} for available commands.", "solsync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Status { resource, json } => commands::run_status(&cwd, resource, json),
        Commands::Syncup {
            resource,
            delete,
            dry_run,
        } => commands::run_syncup(&cwd, resource, delete, dry_run),
        Commands::Syncdown { resource, dry_run } => {
            commands::run_syncdown(&cwd, resource, dry_run)
        }
        Commands::List { resource } => commands::run_list(&cwd, resource),
        Commands::Fetch { resource, alias } => commands::run_fetch(&cwd, resource, &alias),
        Commands::Remove { resource, alias } => commands::run_remove(&cwd, resource, &alias),
        Commands::Config { key } => commands::run_config(&cwd, &key),
    }
}
