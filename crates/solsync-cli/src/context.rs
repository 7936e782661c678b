//! Project context detection
//!
//! Finds the project root from any directory below it (git-like), resolves
//! settings, and builds the authenticated remote client commands run against.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use solsync_core::{
    Authenticator, HttpRemote, PasswordLogin, RemoteClient, RemoteOptions, Settings,
    SettingsResolver, StaticToken, SyncContext, find_project_root,
};

use crate::error::{CliError, Result};

/// Environment variable holding a ready-made API token
pub const TOKEN_ENV: &str = "SOLSYNC_TOKEN";

/// Environment variable holding the account password for `user.name`
pub const PASSWORD_ENV: &str = "SOLSYNC_PASSWORD";

/// A detected project with resolved settings
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Project {
    /// Detect the project containing `cwd` and resolve its settings.
    pub fn detect(cwd: &Path) -> Result<Self> {
        let root = find_project_root(cwd)?;
        tracing::debug!(root = %root.display(), "Detected project");
        let settings = SettingsResolver::new(root.clone()).resolve()?;
        Ok(Self { root, settings })
    }

    /// Settings for `cwd`, whether or not it is inside a project.
    ///
    /// Outside a project only the global and explicit layers apply.
    pub fn settings_for(cwd: &Path) -> Result<Settings> {
        let root = find_project_root(cwd).unwrap_or_else(|_| cwd.to_path_buf());
        Ok(SettingsResolver::new(root).resolve()?)
    }

    pub fn sync_context(&self) -> Result<SyncContext> {
        Ok(SyncContext::from_settings(&self.settings, self.root.clone())?)
    }

    /// Build the remote client for this project's solution.
    ///
    /// Credentials come from `SOLSYNC_TOKEN`, or from `user.name` plus
    /// `SOLSYNC_PASSWORD`.
    pub fn connect(&self, ctx: &SyncContext) -> Result<Arc<dyn RemoteClient>> {
        let host = self.settings.require("net.host")?;
        let timeout = ctx.timeout()?;
        let auth = self.authenticator(&host, timeout)?;
        let options = RemoteOptions::new(host, ctx.solution_id()).with_timeout(timeout);
        tracing::debug!(base = %options.base_url(), "Connecting");
        Ok(Arc::new(HttpRemote::new(&options, auth)?))
    }

    fn authenticator(
        &self,
        host: &str,
        timeout: std::time::Duration,
    ) -> Result<Arc<dyn Authenticator>> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Ok(Arc::new(StaticToken::new(token)));
        }
        match (self.settings.get_str("user.name"), env::var(PASSWORD_ENV)) {
            (Some(user), Ok(password)) => {
                Ok(Arc::new(PasswordLogin::new(host, user, password, timeout)?))
            }
            _ => Err(CliError::user(format!(
                "No credentials: set {} or user.name plus {}",
                TOKEN_ENV, PASSWORD_ENV
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detect_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".solsync")).unwrap();
        fs::write(
            temp.path().join(".solsync/config.toml"),
            "[solution]\nid = \"abc\"\n",
        )
        .unwrap();
        let nested = temp.path().join("modules");
        fs::create_dir_all(&nested).unwrap();

        let project = Project::detect(&nested).unwrap();
        assert_eq!(project.root, temp.path());
        assert_eq!(project.sync_context().unwrap().solution_id(), "abc");
    }

    #[test]
    fn detect_outside_project_fails() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Project::detect(temp.path()),
            Err(CliError::Core(solsync_core::Error::ProjectNotFound { .. }))
        ));
    }

    #[test]
    fn connect_requires_host() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".solsync")).unwrap();
        fs::write(
            temp.path().join(".solsync/config.toml"),
            "[solution]\nid = \"abc\"\n",
        )
        .unwrap();
        let project = Project {
            root: temp.path().to_path_buf(),
            settings: Settings::parse("[solution]\nid = \"abc\"\n").unwrap(),
        };
        let ctx = project.sync_context().unwrap();

        assert!(matches!(
            project.connect(&ctx),
            Err(CliError::Core(solsync_core::Error::MissingSetting { .. }))
        ));
    }
}
