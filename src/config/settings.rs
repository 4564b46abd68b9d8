//! User settings for SaveWarden
//!
//! Manages the selected profile, backup retention age, the backup file
//! extension and an optional live save directory override.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::SaveResult;
use crate::models::Profile;
use crate::storage::file_io;

/// User settings for SaveWarden
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Profile used when a command doesn't name one.
    /// Stored raw and validated on use.
    #[serde(default = "default_selected_profile")]
    pub selected_profile: u8,

    /// Backups older than this many days are pruned
    #[serde(default = "default_retention_days")]
    pub retention_max_age_days: u32,

    /// Extension used for new backup files
    #[serde(default = "default_backup_extension")]
    pub backup_extension: String,

    /// Live save directory, overriding platform detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_save_dir: Option<PathBuf>,

    /// Run retention right after every backup
    #[serde(default)]
    pub prune_after_backup: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_selected_profile() -> u8 {
    1
}

fn default_retention_days() -> u32 {
    30
}

fn default_backup_extension() -> String {
    "userdata".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            selected_profile: default_selected_profile(),
            retention_max_age_days: default_retention_days(),
            backup_extension: default_backup_extension(),
            live_save_dir: None,
            prune_after_backup: false,
        }
    }
}

impl Settings {
    /// The selected profile, re-validated
    pub fn profile(&self) -> SaveResult<Profile> {
        Profile::new(self.selected_profile)
    }

    /// Retention age as a duration
    pub fn retention_max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.retention_max_age_days))
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> SaveResult<Self> {
        // Don't save defaults - let caller decide when to persist
        file_io::read_json(paths.settings_file())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> SaveResult<()> {
        paths.ensure_directories()?;
        file_io::write_json_atomic(paths.settings_file(), self)
    }
}
