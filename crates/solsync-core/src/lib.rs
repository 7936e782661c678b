//! Change detection and synchronization core for solsync
//!
//! This crate keeps a project's local Lua scripts and a solution's remote
//! script resources in step, implementing:
//!
//! - **Resource adapters**: how each resource type (libraries, event
//!   handlers) is keyed, named on disk and framed when fetched
//! - **Remote client**: authenticated JSON calls against the solution API
//! - **Change cache**: checksum-validated record of when each file was last
//!   synchronized
//! - **SyncEngine**: list, fetch, upload, remove, and directory-level
//!   diff / sync up / sync down
//! - **Configuration**: layered TOML settings resolved into an explicit
//!   [`SyncContext`]
//!
//! # Architecture
//!
//! ```text
//!                  CLI
//!                   |
//!              solsync-core
//!        +------+---+----+--------+
//!        |      |        |        |
//!     config  resource  remote  cache
//!                                 |
//!                            solsync-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use solsync_core::{Library, SyncContext, SyncEngine, SyncOptions};
//!
//! let engine = SyncEngine::new(Library, remote, ctx);
//! let dir = engine.location()?;
//! let report = engine.sync_up(&dir, &SyncOptions::default())?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod item;
pub mod remote;
pub mod resource;
pub mod sync;

pub use cache::{CacheEntry, ChangeCache};
pub use config::{Settings, SettingsResolver, SyncContext, find_project_root};
pub use error::{Error, Result};
pub use item::{ItemKey, LocalItem, RemoteItem, Timestamped, UpdatedAt, parse_timestamp};
pub use remote::{
    Authenticator, HttpRemote, Method, PasswordLogin, RemoteClient, RemoteError, RemoteOptions,
    RemoteResult, StaticToken,
};
pub use resource::{EventHandler, Library, ResourceAdapter, ResourceKind, SkipList};
pub use sync::{Pair, SyncEngine, SyncOptions, SyncPlan, SyncReport, UploadOutcome};
