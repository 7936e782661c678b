//! Syncup and syncdown command implementations

use std::path::Path;

use colored::Colorize;
use solsync_core::{ResourceKind, SyncOptions, SyncReport};

use super::{kinds, with_engine};
use crate::context::Project;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Run the syncup command
///
/// Uploads new and modified local files for each selected resource type.
pub fn run_syncup(
    cwd: &Path,
    resource: Option<ResourceKind>,
    delete: bool,
    dry_run: bool,
) -> Result<()> {
    let options = SyncOptions { dry_run, delete };
    run(cwd, resource, Direction::Up, &options)
}

/// Run the syncdown command
///
/// Writes remote items that have no local file yet.
pub fn run_syncdown(cwd: &Path, resource: Option<ResourceKind>, dry_run: bool) -> Result<()> {
    let options = SyncOptions {
        dry_run,
        delete: false,
    };
    run(cwd, resource, Direction::Down, &options)
}

fn run(
    cwd: &Path,
    resource: Option<ResourceKind>,
    direction: Direction,
    options: &SyncOptions,
) -> Result<()> {
    let project = Project::detect(cwd)?;
    let ctx = project.sync_context()?;
    let remote = project.connect(&ctx)?;

    let mut failed = false;
    for kind in kinds(resource) {
        println!("{} Synchronizing {}...", "=>".blue().bold(), kind);
        let report = with_engine!(kind, ctx.clone(), remote.clone(), |engine| {
            let dir = engine.location()?;
            match direction {
                Direction::Up => engine.sync_up(&dir, options)?,
                Direction::Down => engine.sync_down(&dir, options)?,
            }
        });
        failed |= !print_report(&report);
    }

    if failed {
        return Err(CliError::user("Synchronization failed"));
    }
    Ok(())
}

/// Print a report; returns whether it was successful.
fn print_report(report: &SyncReport) -> bool {
    for path in &report.skipped {
        println!("   {} {} {}", "?".dimmed(), path, "(skipped)".dimmed());
    }

    if report.success {
        if report.actions.is_empty() {
            println!("{} Already synchronized. No changes needed.", "OK".green().bold());
        } else {
            println!("{} Synchronization complete:", "OK".green().bold());
            for action in &report.actions {
                println!("   {} {}", "+".green(), action);
            }
        }
    } else {
        for action in &report.actions {
            println!("   {} {}", "+".green(), action);
        }
        println!("{} Some items failed:", "ERROR".red().bold());
        for error in &report.errors {
            println!("   {} {}", "!".red(), error);
        }
    }
    report.success
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn syncup_outside_project_fails() {
        let temp = TempDir::new().unwrap();
        let result = run_syncup(temp.path(), None, false, true);
        assert!(matches!(
            result,
            Err(CliError::Core(solsync_core::Error::ProjectNotFound { .. }))
        ));
    }

    #[test]
    fn print_report_reflects_success() {
        let mut report = SyncReport::success();
        report.action("Created modules/util.lua");
        assert!(print_report(&report));

        report.error("modules/bad.lua: rejected");
        assert!(!print_report(&report));
    }
}
