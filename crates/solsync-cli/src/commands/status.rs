//! Status command implementation

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use solsync_core::{ResourceKind, SyncPlan};

use super::{display_path, kinds, with_engine};
use crate::context::Project;
use crate::error::{CliError, Result};

/// Differences for one resource type
#[derive(Debug, Serialize)]
struct Summary {
    resource: String,
    to_add: Vec<String>,
    to_delete: Vec<String>,
    modified: Vec<String>,
    unchanged: usize,
    skipped: Vec<String>,
}

impl Summary {
    fn from_plan(kind: ResourceKind, plan: &SyncPlan, root: &Path, solution_id: &str) -> Self {
        Self {
            resource: kind.to_string(),
            to_add: plan.to_add.iter().map(|l| display_path(root, &l.path)).collect(),
            to_delete: plan.to_delete.iter().map(|r| r.alias_in(solution_id)).collect(),
            modified: plan
                .modified
                .iter()
                .map(|p| display_path(root, &p.local.path))
                .collect(),
            unchanged: plan.unchanged.len(),
            skipped: plan.skipped.iter().map(|p| display_path(root, p)).collect(),
        }
    }

    fn print(&self) {
        println!("{}:", self.resource.bold());
        if self.to_add.is_empty() && self.to_delete.is_empty() && self.modified.is_empty() {
            println!("  {} in sync ({} unchanged)", "OK".green(), self.unchanged);
        }
        for path in &self.to_add {
            println!("  {} {} {}", "+".green(), path, "(local only)".dimmed());
        }
        for path in &self.modified {
            println!("  {} {}", "M".yellow(), path);
        }
        for alias in &self.to_delete {
            println!("  {} {} {}", "-".red(), alias, "(remote only)".dimmed());
        }
        for path in &self.skipped {
            println!("  {} {} {}", "?".dimmed(), path, "(skipped)".dimmed());
        }
    }
}

/// Run the status command
pub fn run_status(cwd: &Path, resource: Option<ResourceKind>, json: bool) -> Result<()> {
    let project = Project::detect(cwd)?;
    let ctx = project.sync_context()?;
    let remote = project.connect(&ctx)?;

    let mut summaries = Vec::new();
    for kind in kinds(resource) {
        let summary = with_engine!(kind, ctx.clone(), remote.clone(), |engine| {
            let plan = engine.diff(&engine.location()?)?;
            Summary::from_plan(kind, &plan, &project.root, ctx.solution_id())
        });
        summaries.push(summary);
    }

    if json {
        let output = serde_json::to_string_pretty(&summaries)
            .map_err(|e| CliError::user(format!("Failed to serialize status: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    println!("{}", "Solution Status".bold());
    println!("{}:   {}", "Solution".dimmed(), ctx.solution_id().cyan());
    println!("{}:   {}", "Path".dimmed(), project.root.display());
    println!();
    for summary in &summaries {
        summary.print();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};
    use solsync_core::{ItemKey, LocalItem, RemoteItem};

    #[test]
    fn summary_lists_paths_relative_to_root() {
        let plan = SyncPlan {
            to_add: vec![LocalItem::new("/p/modules/util.lua", ItemKey::name("util"))],
            to_delete: vec![RemoteItem::from_fields(ItemKey::name("old"), Map::new())],
            ..SyncPlan::default()
        };

        let summary = Summary::from_plan(ResourceKind::Library, &plan, Path::new("/p"), "sol");
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["resource"], json!("library"));
        assert_eq!(value["to_delete"], json!(["sol_old"]));
        assert_eq!(value["unchanged"], json!(0));
        assert_eq!(summary.to_add.len(), 1);
        assert!(summary.to_add[0].ends_with("util.lua"));
        assert!(!summary.to_add[0].starts_with('/'));
    }
}
