//! Plan and report types for directory-level sync passes

use std::path::PathBuf;

use serde::Serialize;

use crate::item::{LocalItem, RemoteItem};

/// Options for sync passes
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, report what would happen without touching anything.
    /// Actions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
    /// Remove remote items that have no local counterpart (sync up only)
    pub delete: bool,
}

/// A local file and the remote item it pairs with
#[derive(Debug, Clone)]
pub struct Pair {
    pub local: LocalItem,
    pub remote: RemoteItem,
}

/// Outcome of pairing a local directory with the remote collection
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Local files with no remote counterpart
    pub to_add: Vec<LocalItem>,
    /// Remote items with no local counterpart, in server order
    pub to_delete: Vec<RemoteItem>,
    /// Paired items whose timestamps differ
    pub modified: Vec<Pair>,
    /// Paired items in sync
    pub unchanged: Vec<Pair>,
    /// Local files that are not valid artifacts of this resource type
    pub skipped: Vec<PathBuf>,
}

impl SyncPlan {
    /// True if nothing needs to be pushed or pulled.
    pub fn is_in_sync(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty() && self.modified.is_empty()
    }
}

/// Report from a sync pass
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Whether every item was processed without error
    pub success: bool,
    /// Actions taken (or, in dry-run, that would be taken)
    pub actions: Vec<String>,
    /// Per-item failures; the pass continued past each of them
    pub errors: Vec<String>,
    /// Files that were skipped as invalid
    pub skipped: Vec<String>,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::success()
    }
}

impl SyncReport {
    /// Create a successful, empty sync report
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn action(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
    }

    /// Record a per-item failure; marks the report unsuccessful.
    pub fn error(&mut self, error: impl Into<String>) {
        self.success = false;
        self.errors.push(error.into());
    }
}
