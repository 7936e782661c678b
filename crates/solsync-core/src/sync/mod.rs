//! SyncEngine for keeping local script files and remote items in step
//!
//! This module provides:
//! - **engine**: per-item list, fetch, upload, remove and timestamp comparison
//! - **batch**: directory-level diff, sync up and sync down
//! - **report**: plans and reports produced by the batch passes

mod batch;
mod engine;
mod report;

pub use engine::{SyncEngine, UploadOutcome};
pub use report::{Pair, SyncOptions, SyncPlan, SyncReport};
