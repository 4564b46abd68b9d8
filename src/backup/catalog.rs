//! Backup listing
//!
//! Scans the backup directory on every call and decodes each filename.
//! There is no index: the directory is the only source of truth.

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::naming;
use crate::error::{SaveError, SaveResult};
use crate::models::{Profile, SaveFileInfo};

/// Read-only view over a backup directory
#[derive(Debug, Clone)]
pub struct BackupCatalog {
    dir: PathBuf,
}

impl BackupCatalog {
    /// Create a catalog over a directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being scanned
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backups for one profile, newest first
    ///
    /// Files whose names don't decode are skipped. Backups taken in the same
    /// second are ordered by filename.
    pub fn list_backups(&self, profile: Profile) -> SaveResult<Vec<SaveFileInfo>> {
        let mut backups = self.scan()?;
        backups.retain(|b| b.profile == profile);
        Ok(backups)
    }

    /// Backups for every profile, newest first
    pub fn list_all(&self) -> SaveResult<Vec<SaveFileInfo>> {
        self.scan()
    }

    /// Most recent backup for a profile
    pub fn latest(&self, profile: Profile) -> SaveResult<Option<SaveFileInfo>> {
        Ok(self.list_backups(profile)?.into_iter().next())
    }

    fn scan(&self) -> SaveResult<Vec<SaveFileInfo>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SaveError::storage_unavailable(&self.dir, e)),
        };

        let mut backups = Vec::new();

        for entry in entries {
            // Entries can vanish mid-scan when another pass deletes them
            let Ok(entry) = entry else { continue };
            let path = entry.path();

            let Some(info) = describe(&path) else {
                continue;
            };
            backups.push(info);
        }

        backups.sort_by(newest_first);
        Ok(backups)
    }
}

/// Build the info for one directory entry, or `None` to skip it
fn describe(path: &Path) -> Option<SaveFileInfo> {
    let file_name = path.file_name()?.to_str()?;

    let decoded = match naming::decode(file_name) {
        Ok(decoded) => decoded,
        Err(reason) => {
            trace!(file = file_name, %reason, "skipping non-backup file");
            return None;
        }
    };

    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(SaveFileInfo {
        path: path.to_path_buf(),
        profile: decoded.profile,
        timestamp: decoded.timestamp,
        file_size: metadata.len(),
    })
}

fn newest_first(a: &SaveFileInfo, b: &SaveFileInfo) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn profile(n: u8) -> Profile {
        Profile::new(n).unwrap()
    }

    fn write(dir: &Path, name: &str, len: usize) {
        fs::write(dir.join(name), vec![0u8; len]).unwrap();
    }

    #[test]
    fn test_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = BackupCatalog::new(temp_dir.path());
        assert!(catalog.list_backups(profile(1)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = BackupCatalog::new(temp_dir.path().join("never-created"));
        assert!(catalog.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "profile2_20250520_120000.userdata", 10);
        write(temp_dir.path(), "profile2_20250521_090000.userdata", 20);

        let backups = BackupCatalog::new(temp_dir.path())
            .list_backups(profile(2))
            .unwrap();

        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].file_name(), "profile2_20250521_090000.userdata");
        assert_eq!(backups[0].file_size, 20);
        assert_eq!(
            backups[0].timestamp,
            NaiveDate::from_ymd_opt(2025, 5, 21)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(backups[1].file_name(), "profile2_20250520_120000.userdata");
        assert_eq!(backups[1].file_size, 10);
    }

    #[test]
    fn test_mixed_dir_skips_undecodable() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "profile1_20250101_000000.userdata", 1);
        write(temp_dir.path(), "profile1_20250102_000000.userdata", 1);
        write(temp_dir.path(), "profile1_20250103_000000.userdata", 1);
        write(temp_dir.path(), "profile1_garbage.userdata", 1);
        write(temp_dir.path(), "notes.txt", 1);

        let backups = BackupCatalog::new(temp_dir.path())
            .list_backups(profile(1))
            .unwrap();

        let names: Vec<String> = backups.iter().map(|b| b.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "profile1_20250103_000000.userdata",
                "profile1_20250102_000000.userdata",
                "profile1_20250101_000000.userdata",
            ]
        );
    }

    #[test]
    fn test_filters_by_profile() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "profile1_20250101_000000.userdata", 1);
        write(temp_dir.path(), "profile3_20250101_000000.userdata", 1);

        let catalog = BackupCatalog::new(temp_dir.path());
        assert_eq!(catalog.list_backups(profile(1)).unwrap().len(), 1);
        assert_eq!(catalog.list_backups(profile(3)).unwrap().len(), 1);
        assert!(catalog.list_backups(profile(4)).unwrap().is_empty());
        assert_eq!(catalog.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_skips_directories_and_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("profile1_20250101_000000.userdata")).unwrap();
        write(temp_dir.path(), ".profile1_20250102_000000.userdata.tmp", 1);

        let catalog = BackupCatalog::new(temp_dir.path());
        assert!(catalog.list_backups(profile(1)).unwrap().is_empty());
    }

    #[test]
    fn test_same_second_ties_are_ordered_by_name() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "profile1_20250101_000000.userdata", 1);
        write(temp_dir.path(), "profile1_20250101_000000.bak", 1);

        let backups = BackupCatalog::new(temp_dir.path())
            .list_backups(profile(1))
            .unwrap();
        assert_eq!(backups[0].file_name(), "profile1_20250101_000000.bak");
        assert_eq!(backups[1].file_name(), "profile1_20250101_000000.userdata");
    }

    #[test]
    fn test_latest() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = BackupCatalog::new(temp_dir.path());
        assert!(catalog.latest(profile(2)).unwrap().is_none());

        write(temp_dir.path(), "profile2_20250520_120000.userdata", 1);
        write(temp_dir.path(), "profile2_20250521_090000.userdata", 1);
        let latest = catalog.latest(profile(2)).unwrap().unwrap();
        assert_eq!(latest.file_name(), "profile2_20250521_090000.userdata");
    }
}
