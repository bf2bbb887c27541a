//! Component Registry CLI
//!
//! Administrative interface for the component version store and the
//! declarative file sync engine.

mod cli;
mod commands;
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
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.root),
        None => {
            // No command provided - show help hint
            println!("{} Component Registry CLI", "registry".green().bold());
            println!();
            println!("Run {} for available commands.", "registry --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, root: &std::path::Path) -> Result<()> {
    match cmd {
        Commands::Create {
            file,
            component_type,
            activate,
            by,
            description,
        } => commands::run_create(root, &file, &component_type, activate, &by, description),

        Commands::List {
            component_id,
            include_deprecated,
            json,
        } => commands::run_list(root, &component_id, include_deprecated, json),

        Commands::Show {
            component_id,
            version,
        } => commands::run_show(root, &component_id, version),

        Commands::Activate {
            component_id,
            version,
            by,
            reason,
        } => commands::run_activate(root, &component_id, version, &by, reason),

        Commands::Deprecate {
            component_id,
            version,
            by,
            reason,
        } => commands::run_deprecate(root, &component_id, version, &by, reason),

        Commands::Clone {
            component_id,
            source,
            target,
            by,
            description,
        } => commands::run_clone(root, &component_id, source, target, &by, description),

        Commands::UpdateConfig {
            component_id,
            version,
            file,
            by,
            reason,
        } => commands::run_update_config(root, &component_id, version, &file, &by, reason),

        Commands::History {
            component_id,
            version,
            json,
        } => commands::run_history(root, &component_id, version, json),

        Commands::Resolve {
            component_id,
            version,
        } => commands::run_resolve(root, &component_id, version),

        Commands::Sync {
            component_id,
            dry_run,
            json,
        } => commands::run_sync(root, component_id.as_deref(), dry_run, json),
    }
}
