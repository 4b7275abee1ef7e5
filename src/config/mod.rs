//! Configuration module for index-search-rs
//!
//! Handles loading and validating settings from YAML files and environment variables.
//! Settings are loaded once at startup and passed explicitly; nothing here is global.

mod settings;

pub use settings::*;

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "INDEX_SEARCH_SETTINGS_PATH";

/// Default locations searched for settings.yml, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/index-search/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("index-search/settings.yml"));
    }
    paths
}

/// Load settings from `path`, or from the first default location that exists
///
/// Environment overrides are applied and the result is validated.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from));

    let mut settings = match explicit {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => match default_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading settings from: {}", path.display());
                Settings::from_file(&path)?
            }
            None => {
                info!("No settings file found, using defaults");
                Settings::default()
            }
        },
    };

    settings.merge_env()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load(Some(Path::new("/nonexistent/index-search/settings.yml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_paths() {
        let paths = default_paths();
        assert_eq!(paths[0], PathBuf::from("settings.yml"));
        assert!(paths.len() >= 3);
    }
}
