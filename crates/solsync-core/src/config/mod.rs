//! Settings resolution and the explicit sync context
//!
//! Settings are loaded from several TOML layers and merged, later layers
//! overriding earlier ones:
//!
//! 1. **Built-in defaults** (resource locations, request timeout)
//! 2. **Global** - `<config_dir>/solsync/config.toml`
//! 3. **Project** - `.solsync/config.toml`
//! 4. **Project-local** - `.solsync/config.local.toml`
//! 5. **Explicit file** - the path in `SOLSYNC_CONFIG`, when set
//!
//! The resolved [`Settings`] are turned into a [`SyncContext`], which is the
//! only configuration the sync engine and resource adapters ever see.
//!
//! # Example
//!
//! ```ignore
//! use solsync_core::config::{SettingsResolver, SyncContext, find_project_root};
//!
//! let root = find_project_root(&std::env::current_dir()?)?;
//! let settings = SettingsResolver::new(root.clone()).resolve()?;
//! let ctx = SyncContext::from_settings(&settings, root)?;
//! println!("cache lives at {}", ctx.file_at("cache.Library.yaml").display());
//! ```

mod context;
mod settings;

pub use context::SyncContext;
pub use settings::{STATE_DIR, Settings, SettingsResolver, find_project_root};
