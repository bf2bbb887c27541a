//! Lifecycle command implementations
//!
//! These commands administer component versions through the VersionService.

use std::path::Path;

use colored::Colorize;

use registry_core::{ComponentVersion, NewVersion, SyncSource};
use registry_meta::{ComponentDocument, ComponentType};

use super::open_service;
use crate::error::{CliError, Result};

/// Run the create command
pub fn run_create(
    root: &Path,
    file: &Path,
    component_type: &str,
    activate: bool,
    by: &str,
    description: Option<String>,
) -> Result<()> {
    let component_type: ComponentType = component_type
        .parse()
        .map_err(|e: registry_meta::Error| CliError::user(e.to_string()))?;
    let doc = ComponentDocument::load(file, component_type)?;

    let service = open_service(root)?;
    let created = service.create_version(NewVersion {
        component_id: doc.component_id.clone(),
        component_type,
        version: doc.version,
        config: doc.config,
        created_by: by.to_string(),
        description,
        is_active: activate,
        sync_source: SyncSource::Api,
    })?;

    println!(
        "{} Created {} version {}{}",
        "OK".green().bold(),
        created.component_id.cyan(),
        created.version,
        if created.is_active { " (active)" } else { "" }
    );
    Ok(())
}

/// Run the list command
pub fn run_list(
    root: &Path,
    component_id: &str,
    include_deprecated: bool,
    json: bool,
) -> Result<()> {
    let service = open_service(root)?;
    let versions = service.list_versions(component_id, include_deprecated)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }

    if versions.is_empty() {
        println!("No versions found for {}", component_id.cyan());
        return Ok(());
    }

    println!("{} {}", "Versions of".bold(), component_id.cyan().bold());
    for version in &versions {
        println!("   {}", describe(version));
    }
    Ok(())
}

/// Run the show command
pub fn run_show(root: &Path, component_id: &str, version: u32) -> Result<()> {
    let service = open_service(root)?;
    let found = service.get_version(component_id, version)?;
    println!("{}", serde_json::to_string_pretty(&found.config)?);
    Ok(())
}

/// Run the activate command
pub fn run_activate(
    root: &Path,
    component_id: &str,
    version: u32,
    by: &str,
    reason: Option<String>,
) -> Result<()> {
    let service = open_service(root)?;
    service.activate_version(component_id, version, by, reason.as_deref(), SyncSource::Api)?;

    println!(
        "{} {} version {} is now active",
        "OK".green().bold(),
        component_id.cyan(),
        version
    );
    Ok(())
}

/// Run the deprecate command
pub fn run_deprecate(
    root: &Path,
    component_id: &str,
    version: u32,
    by: &str,
    reason: Option<String>,
) -> Result<()> {
    let service = open_service(root)?;
    service.deprecate_version(component_id, version, by, reason.as_deref())?;

    println!(
        "{} {} version {} deprecated",
        "OK".green().bold(),
        component_id.cyan(),
        version
    );
    Ok(())
}

/// Run the clone command
pub fn run_clone(
    root: &Path,
    component_id: &str,
    source: u32,
    target: u32,
    by: &str,
    description: Option<String>,
) -> Result<()> {
    let service = open_service(root)?;
    service.clone_version(component_id, source, target, by, description.as_deref())?;

    println!(
        "{} Cloned {} version {} to {}",
        "OK".green().bold(),
        component_id.cyan(),
        source,
        target
    );
    Ok(())
}

/// Run the update-config command
pub fn run_update_config(
    root: &Path,
    component_id: &str,
    version: u32,
    file: &Path,
    by: &str,
    reason: Option<String>,
) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let config: serde_json::Value = serde_yaml::from_str(&content)
        .map_err(|e| CliError::user(format!("failed to parse {}: {}", file.display(), e)))?;

    let service = open_service(root)?;
    service.update_config(
        component_id,
        version,
        config,
        by,
        reason.as_deref(),
        SyncSource::Api,
    )?;

    println!(
        "{} Replaced config of {} version {}",
        "OK".green().bold(),
        component_id.cyan(),
        version
    );
    Ok(())
}

/// Run the history command
pub fn run_history(
    root: &Path,
    component_id: &str,
    version: Option<u32>,
    json: bool,
) -> Result<()> {
    let service = open_service(root)?;
    let history = service.get_history(component_id, version)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No history for {}", component_id.cyan());
        return Ok(());
    }

    println!("{} {}", "History of".bold(), component_id.cyan().bold());
    for record in &history {
        println!(
            "   {} v{} {} by {} ({}){}",
            record.changed_at.format("%Y-%m-%d %H:%M:%S"),
            record.version,
            record.action.to_string().yellow(),
            record.changed_by,
            record.sync_source,
            record
                .reason
                .as_deref()
                .map(|r| format!(" - {}", r))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn describe(version: &ComponentVersion) -> String {
    let mut flags = Vec::new();
    if version.is_active {
        flags.push("active".green().to_string());
    }
    if version.is_deprecated {
        flags.push("deprecated".yellow().to_string());
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    format!(
        "v{}{} created {} by {}",
        version.version,
        flags,
        version.created_at.format("%Y-%m-%d"),
        version.created_by
    )
}
