//! Resolves where backups are stored and where the live saves live

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::paths::AppPaths;
use crate::config::platform::{self, FixedLocator, LiveSaveLocator};
use crate::error::{SaveError, SaveResult};
use crate::models::Profile;

/// Joins the app's private paths with the game's live save location
#[derive(Debug, Clone)]
pub struct PathResolver {
    paths: AppPaths,
    locator: Arc<dyn LiveSaveLocator>,
}

impl PathResolver {
    /// Create a resolver from an explicit locator
    pub fn new(paths: AppPaths, locator: Arc<dyn LiveSaveLocator>) -> Self {
        Self { paths, locator }
    }

    /// Create a resolver that detects the live save directory for this OS,
    /// unless `live_save_dir` overrides it
    pub fn detect(paths: AppPaths, live_save_dir: Option<PathBuf>) -> SaveResult<Self> {
        let locator = platform::resolve_locator(live_save_dir.as_deref())?;
        Ok(Self::new(paths, Arc::from(locator)))
    }

    /// Create a resolver pinned to a live save directory
    pub fn with_live_save_dir(paths: AppPaths, live_save_dir: impl Into<PathBuf>) -> Self {
        Self::new(paths, Arc::new(FixedLocator::new(live_save_dir)))
    }

    /// App paths this resolver was built from
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Locator in use
    pub fn locator(&self) -> &dyn LiveSaveLocator {
        self.locator.as_ref()
    }

    /// Backup directory, created if absent
    pub fn resolve_backup_storage_dir(&self) -> SaveResult<PathBuf> {
        let dir = self.paths.backup_dir();
        fs::create_dir_all(&dir).map_err(|e| SaveError::storage_unavailable(&dir, e))?;
        Ok(dir)
    }

    /// Directory the game writes its live saves to
    pub fn resolve_live_save_dir(&self) -> SaveResult<PathBuf> {
        self.locator.live_save_dir()
    }

    /// Path of the live save for a profile
    pub fn live_save_path(&self, profile: Profile) -> SaveResult<PathBuf> {
        Ok(self
            .resolve_live_save_dir()?
            .join(profile.live_save_file_name()))
    }
}
