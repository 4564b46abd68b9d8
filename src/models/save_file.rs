//! Metadata about a single backup snapshot on disk

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Profile;

/// One backup file in the backup storage directory
///
/// `profile` and `timestamp` are always decoded from the filename, never
/// from file metadata, so the two cannot disagree with the name on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFileInfo {
    /// Full path to the backup
    pub path: PathBuf,
    /// Profile the backup belongs to
    pub profile: Profile,
    /// When the snapshot was taken (local time, second precision)
    pub timestamp: NaiveDateTime,
    /// Size in bytes
    pub file_size: u64,
}

impl SaveFileInfo {
    /// Backup filename without the directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Path to the backup
    pub fn path(&self) -> &Path {
        &self.path
    }
}
