//! Single-item commands against the remote: list, fetch, remove

use std::path::Path;

use colored::Colorize;
use solsync_core::ResourceKind;

use super::with_engine;
use crate::context::Project;
use crate::error::Result;

/// Print alias and key of every remote item of `resource`
pub fn run_list(cwd: &Path, resource: ResourceKind) -> Result<()> {
    let project = Project::detect(cwd)?;
    let ctx = project.sync_context()?;
    let remote = project.connect(&ctx)?;

    let items = with_engine!(resource, ctx.clone(), remote, |engine| engine.list()?);
    if items.is_empty() {
        println!("{}", "No items".dimmed());
        return Ok(());
    }
    for item in &items {
        let updated = item
            .fields
            .get("updated_at")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");
        println!(
            "{:<40} {:<30} {}",
            item.alias_in(ctx.solution_id()).cyan(),
            item.key,
            updated.dimmed()
        );
    }
    Ok(())
}

/// Print the framed content of one remote item
pub fn run_fetch(cwd: &Path, resource: ResourceKind, alias: &str) -> Result<()> {
    let project = Project::detect(cwd)?;
    let ctx = project.sync_context()?;
    let remote = project.connect(&ctx)?;

    let content = with_engine!(resource, ctx, remote, |engine| engine.fetch(alias)?);
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Delete one remote item
pub fn run_remove(cwd: &Path, resource: ResourceKind, alias: &str) -> Result<()> {
    let project = Project::detect(cwd)?;
    let ctx = project.sync_context()?;
    let remote = project.connect(&ctx)?;

    with_engine!(resource, ctx, remote, |engine| engine.remove(alias)?);
    println!("{} Removed {} {}", "OK".green().bold(), resource, alias.cyan());
    Ok(())
}
