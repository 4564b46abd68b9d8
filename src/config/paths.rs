//! Path management for SaveWarden
//!
//! Resolves the private per-user directory holding settings and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `SAVEWARDEN_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories`:
//!    - Linux: `$XDG_DATA_HOME/savewarden` or `~/.local/share/savewarden`
//!    - macOS: `~/Library/Application Support/savewarden`
//!    - Windows: `%APPDATA%\savewarden\data`

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{SaveError, SaveResult};

/// Environment variable overriding the application data directory
pub const DATA_DIR_ENV: &str = "SAVEWARDEN_DATA_DIR";

/// Manages the paths SaveWarden owns
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Base directory for all SaveWarden data
    base_dir: PathBuf,
}

impl AppPaths {
    /// Create a new AppPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> SaveResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backup directory (`<base>/backups/`)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> SaveResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SaveError::storage_unavailable(&self.base_dir, e))?;

        let backup_dir = self.backup_dir();
        std::fs::create_dir_all(&backup_dir)
            .map_err(|e| SaveError::storage_unavailable(&backup_dir, e))?;

        Ok(())
    }
}

fn resolve_default_path() -> SaveResult<PathBuf> {
    ProjectDirs::from("", "", "savewarden")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SaveError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = AppPaths::new().unwrap();
        env::remove_var(DATA_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().join("app"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_ensure_directories_fails_under_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let paths = AppPaths::with_base_dir(blocker.join("app"));
        assert!(matches!(
            paths.ensure_directories(),
            Err(SaveError::StorageUnavailable { .. })
        ));
    }
}
