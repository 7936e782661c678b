//! Command implementations for solsync-cli

pub mod config;
pub mod remote;
pub mod status;
pub mod sync;

pub use config::run_config;
pub use remote::{run_fetch, run_list, run_remove};
pub use status::run_status;
pub use sync::{run_syncdown, run_syncup};

use std::path::Path;

use solsync_core::ResourceKind;

/// Build the engine for `$kind` and evaluate `$body` with it bound to `$engine`.
macro_rules! with_engine {
    ($kind:expr, $ctx:expr, $remote:expr, |$engine:ident| $body:expr) => {
        match $kind {
            solsync_core::ResourceKind::Library => {
                let $engine = solsync_core::SyncEngine::new(solsync_core::Library, $remote, $ctx);
                $body
            }
            solsync_core::ResourceKind::EventHandler => {
                let ctx = $ctx;
                let adapter = solsync_core::EventHandler::new(ctx.skiplist().clone());
                let $engine = solsync_core::SyncEngine::new(adapter, $remote, ctx);
                $body
            }
        }
    };
}
pub(crate) use with_engine;

/// The selected resource type, or all of them.
pub(crate) fn kinds(resource: Option<ResourceKind>) -> Vec<ResourceKind> {
    match resource {
        Some(kind) => vec![kind],
        None => ResourceKind::ALL.to_vec(),
    }
}

/// `path` relative to `root` for display, or as-is if outside it.
pub(crate) fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
