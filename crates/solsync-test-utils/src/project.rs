//! [`TestProject`] builder for sync scenarios on disk.

use std::fs;
use std::path::{Path, PathBuf};

use solsync_core::{SettingsResolver, SyncContext};
use tempfile::TempDir;

/// A temporary project directory with a `.solsync/config.toml` naming a
/// solution, plus helpers for writing scripts and asserting on files.
///
/// # Example
///
/// ```rust,no_run
/// use solsync_test_utils::TestProject;
///
/// let project = TestProject::new("sol");
/// project.write_module("util.lua", "return 1");
/// project.assert_file_exists("modules/util.lua");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    /// Create a project for `solution_id` with default locations.
    pub fn new(solution_id: &str) -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(project.root().join(".solsync")).unwrap();
        project.write_config(&format!("[solution]\nid = \"{solution_id}\"\n"));
        project
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root().join("modules")
    }

    pub fn eventhandlers_dir(&self) -> PathBuf {
        self.root().join("eventhandlers")
    }

    /// Overwrite `.solsync/config.toml`.
    pub fn write_config(&self, content: &str) {
        fs::write(self.root().join(".solsync/config.toml"), content).unwrap();
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_module(&self, file_name: &str, content: &str) -> PathBuf {
        self.write(&format!("modules/{file_name}"), content)
    }

    pub fn write_event_handler(&self, file_name: &str, content: &str) -> PathBuf {
        self.write(&format!("eventhandlers/{file_name}"), content)
    }

    /// Read a file relative to the project root.
    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    /// Resolve settings for this project, ignoring the user's global config
    /// and `SOLSYNC_CONFIG`.
    pub fn context(&self) -> SyncContext {
        let settings = SettingsResolver::new(self.root())
            .with_global_config_dir(self.root().join("no-global-config"))
            .with_explicit_file(None)
            .resolve()
            .unwrap();
        SyncContext::from_settings(&settings, self.root()).unwrap()
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
