//! Configuration display command

use std::path::Path;

use crate::context::Project;
use crate::error::{CliError, Result};

/// Print the resolved value of a dotted setting key
pub fn run_config(cwd: &Path, key: &str) -> Result<()> {
    let settings = Project::settings_for(cwd)?;
    let value = settings
        .get(key)
        .ok_or_else(|| CliError::user(format!("{} is not set", key)))?;
    println!("{}", render(value));
    Ok(())
}

fn render(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
