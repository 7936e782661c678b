//! Directory-level passes: pairing, sync up and sync down

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use solsync_fs::io;

use super::engine::{SyncEngine, UploadOutcome};
use super::report::{Pair, SyncOptions, SyncPlan, SyncReport};
use crate::item::{LocalItem, RemoteItem};
use crate::resource::{ResourceAdapter, SCRIPT_EXTENSION};
use crate::{Error, Result};

impl<A: ResourceAdapter> SyncEngine<A> {
    /// Local directory for this resource type, from the context.
    pub fn location(&self) -> Result<PathBuf> {
        self.context().location(self.adapter().location_key())
    }

    /// Enumerate script files in `dir` (non-recursive, sorted by name).
    ///
    /// Files the adapter cannot key, or that cannot be read, are returned as
    /// skipped. A missing directory has no items.
    pub fn local_items(&self, dir: &Path) -> Result<(Vec<LocalItem>, Vec<PathBuf>)> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "Local directory does not exist");
                return Ok((Vec::new(), Vec::new()));
            }
            Err(e) => return Err(solsync_fs::Error::io(dir, e).into()),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION))
            .collect();
        paths.sort();

        let mut items = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            match self.adapter().to_remote_key(&path) {
                Ok(Some(key)) => items.push(LocalItem::new(path, key)),
                Ok(None) => skipped.push(path),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    skipped.push(path);
                }
            }
        }
        Ok((items, skipped))
    }

    /// Pair the files in `dir` with the remote collection by synckey.
    pub fn diff(&self, dir: &Path) -> Result<SyncPlan> {
        let (locals, skipped) = self.local_items(dir)?;
        let remotes = self.list()?;

        let mut remote_by_key: HashMap<String, RemoteItem> = HashMap::new();
        let mut remote_order = Vec::with_capacity(remotes.len());
        for remote in remotes {
            let synckey = self.adapter().synckey(&remote.key);
            remote_order.push(synckey.clone());
            remote_by_key.insert(synckey, remote);
        }

        let mut plan = SyncPlan {
            skipped,
            ..SyncPlan::default()
        };
        let mut seen = HashSet::new();
        for mut local in locals {
            let synckey = self.adapter().synckey(&local.key);
            if !seen.insert(synckey.clone()) {
                tracing::warn!(path = %local.path.display(), %synckey, "Duplicate local item, ignoring");
                plan.skipped.push(local.path);
                continue;
            }
            let Some(mut remote) = remote_by_key.remove(&synckey) else {
                plan.to_add.push(local);
                continue;
            };

            let changed = match self.compare_timestamps(&mut local, &mut remote) {
                Ok(changed) => changed,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(%synckey, error = %e, "Cannot compare timestamps, treating as modified");
                    true
                }
            };
            let pair = Pair { local, remote };
            if changed {
                plan.modified.push(pair);
            } else {
                plan.unchanged.push(pair);
            }
        }

        plan.to_delete = remote_order
            .into_iter()
            .filter_map(|k| remote_by_key.remove(&k))
            .collect();
        Ok(plan)
    }

    /// Push new and modified local files; optionally remove remote-only items.
    ///
    /// Per-item failures are recorded and the pass continues. Only a failure
    /// to reach the server aborts it.
    pub fn sync_up(&self, dir: &Path, options: &SyncOptions) -> Result<SyncReport> {
        let plan = self.diff(dir)?;
        let mut report = SyncReport::success();
        report.skipped = plan.skipped.iter().map(|p| p.display().to_string()).collect();

        let uploads = plan
            .to_add
            .iter()
            .chain(plan.modified.iter().map(|pair| &pair.local));
        for local in uploads {
            let shown = local.path.display();
            if options.dry_run {
                report.action(format!("[dry-run] Would upload {}", shown));
                continue;
            }
            match self.upload(&local.path, &local.key) {
                Ok(UploadOutcome::Updated) => report.action(format!("Updated {}", shown)),
                Ok(UploadOutcome::Created) => report.action(format!("Created {}", shown)),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => report.error(format!("{}: {}", shown, e)),
            }
        }

        if options.delete {
            for remote in &plan.to_delete {
                let alias = remote.alias_in(self.context().solution_id());
                if options.dry_run {
                    report.action(format!("[dry-run] Would remove {}", alias));
                    continue;
                }
                match self.remove(&alias) {
                    Ok(()) => report.action(format!("Removed {}", alias)),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => report.error(format!("{}: {}", alias, e)),
                }
            }
        }

        Ok(report)
    }

    /// Download remote items that have no local file yet.
    ///
    /// Local files are authoritative, so existing files are never
    /// overwritten. Each written file is recorded in the change cache at the
    /// server's timestamp so it compares as unchanged afterwards.
    pub fn sync_down(&self, dir: &Path, options: &SyncOptions) -> Result<SyncReport> {
        let plan = self.diff(dir)?;
        let mut report = SyncReport::success();
        report.skipped = plan.skipped.iter().map(|p| p.display().to_string()).collect();

        for remote in &plan.to_delete {
            let target = dir.join(self.adapter().local_name(&remote.key));
            if target.exists() {
                report.error(format!(
                    "{}: file exists but does not hold {}",
                    target.display(),
                    remote.key
                ));
                continue;
            }
            if options.dry_run {
                report.action(format!("[dry-run] Would download {}", target.display()));
                continue;
            }
            match self.download(remote, &target) {
                Ok(()) => report.action(format!("Downloaded {}", target.display())),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => report.error(format!("{}: {}", target.display(), e)),
            }
        }

        Ok(report)
    }

    fn download(&self, remote: &RemoteItem, target: &Path) -> Result<()> {
        let alias = remote.alias_in(self.context().solution_id());
        let content = self.fetch(&alias)?;
        io::write_text(target, &content)?;

        let synced_at = match &remote.updated_at {
            Some(at) => match at.to_instant() {
                Ok(at) => Some(at),
                Err(Error::InvalidTimestamp { value }) => {
                    tracing::warn!(%alias, %value, "Unparseable server timestamp, recording now");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        self.cache().record_sync(target, synced_at)?;
        tracing::info!(%alias, path = %target.display(), "Downloaded");
        Ok(())
    }
}
