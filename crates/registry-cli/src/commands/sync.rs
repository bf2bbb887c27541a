//! Sync command implementation

use std::path::Path;

use colored::Colorize;

use registry_core::{SyncEngine, SyncOptions, SyncReport, SyncStatus};
use registry_meta::DocumentScanner;

use super::open_service;
use crate::error::Result;

/// Run the sync command over the whole content root or one component
pub fn run_sync(
    root: &Path,
    component_id: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let service = open_service(root)?;
    let engine = SyncEngine::new(DocumentScanner::new(root), service);
    let options = SyncOptions {
        dry_run,
        deadline: None,
    };

    let report = match component_id {
        Some(id) => engine.sync_component(id, &options)?,
        None => engine.sync_all(&options)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{} {}Synchronized {} component(s)",
        "=>".blue().bold(),
        prefix,
        report.results.len()
    );

    for result in &report.results {
        let status = match result.status {
            SyncStatus::NoChange => result.status.to_string().dimmed().to_string(),
            SyncStatus::Error => result.status.to_string().red().bold().to_string(),
            SyncStatus::Skipped => result.status.to_string().yellow().to_string(),
            _ => result.status.to_string().green().to_string(),
        };
        println!(
            "   {} {} ({}){}",
            status,
            result.component_id.cyan(),
            result.component_type,
            result
                .message
                .as_deref()
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );
    }

    for skipped in &report.skipped_files {
        println!(
            "   {} {}: {}",
            "skipped-file".yellow(),
            skipped.path.cyan(),
            skipped.reason
        );
    }

    if report.has_errors() {
        println!();
        println!("{} Some components failed to sync.", "!".red().bold());
    }
}
