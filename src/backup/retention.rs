//! Age-based backup retention
//!
//! Deletes backups whose timestamp is strictly older than `now - max_age`.
//! A failed deletion is recorded and the pass moves on to the next file.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use tracing::{info, warn};

use super::manager::BackupManager;
use super::naming;
use crate::error::{SaveError, SaveResult};
use crate::models::{Profile, SaveFileInfo};

/// A backup the pass tried and failed to delete
#[derive(Debug)]
pub struct FailedDeletion {
    pub backup: SaveFileInfo,
    pub error: SaveError,
}

/// Outcome of a retention pass
#[derive(Debug)]
pub struct PruneReport {
    /// Backups older than this were eligible
    pub cutoff: NaiveDateTime,
    /// Backups removed
    pub deleted: Vec<SaveFileInfo>,
    /// Backups that could not be removed
    pub failed: Vec<FailedDeletion>,
    /// Backups young enough to keep
    pub kept: usize,
}

impl PruneReport {
    fn new(cutoff: NaiveDateTime) -> Self {
        Self {
            cutoff,
            deleted: Vec::new(),
            failed: Vec::new(),
            kept: 0,
        }
    }

    /// Whether every eligible backup was removed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn merge(&mut self, other: PruneReport) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
        self.kept += other.kept;
    }
}

/// Applies an age limit to a manager's backups
pub struct RetentionPolicy<'a> {
    manager: &'a BackupManager,
}

impl<'a> RetentionPolicy<'a> {
    pub fn new(manager: &'a BackupManager) -> Self {
        Self { manager }
    }

    /// `now - max_age`, at second precision
    ///
    /// Negative ages count as zero. An age reaching past the earliest
    /// representable time makes nothing stale.
    pub fn cutoff(&self, max_age: Duration) -> NaiveDateTime {
        let now = naming::truncate_to_second(self.manager.clock().now());
        now.checked_sub_signed(max_age.max(Duration::zero()))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Backups a prune would delete, without deleting them
    pub fn stale_backups(&self, profile: Profile, max_age: Duration) -> SaveResult<Vec<SaveFileInfo>> {
        let cutoff = self.cutoff(max_age);
        let mut backups = self.manager.list_backups(profile)?;
        backups.retain(|b| b.timestamp < cutoff);
        Ok(backups)
    }

    /// Delete every backup of `profile` strictly older than `now - max_age`
    pub fn prune_older_than(&self, profile: Profile, max_age: Duration) -> SaveResult<PruneReport> {
        let cutoff = self.cutoff(max_age);
        let report = self.prune_with_cutoff(profile, cutoff)?;

        info!(
            %profile,
            %cutoff,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            kept = report.kept,
            "retention pass finished"
        );

        Ok(report)
    }

    /// Run [`prune_older_than`](Self::prune_older_than) for every profile
    ///
    /// All profiles share a single cutoff.
    pub fn prune_all(&self, max_age: Duration) -> SaveResult<PruneReport> {
        let cutoff = self.cutoff(max_age);
        let mut report = PruneReport::new(cutoff);

        for profile in Profile::all() {
            report.merge(self.prune_with_cutoff(profile, cutoff)?);
        }

        info!(
            %cutoff,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            kept = report.kept,
            "retention pass finished for all profiles"
        );

        Ok(report)
    }

    fn prune_with_cutoff(&self, profile: Profile, cutoff: NaiveDateTime) -> SaveResult<PruneReport> {
        let backups = self.manager.list_backups(profile)?;
        Ok(sweep(backups, cutoff, |path| self.manager.delete_backup(path)))
    }
}

/// Delete every backup older than `cutoff`, recording failures
fn sweep<F>(backups: Vec<SaveFileInfo>, cutoff: NaiveDateTime, mut delete: F) -> PruneReport
where
    F: FnMut(&Path) -> SaveResult<()>,
{
    let mut report = PruneReport::new(cutoff);

    for backup in backups {
        if backup.timestamp >= cutoff {
            report.kept += 1;
            continue;
        }

        match delete(&backup.path) {
            Ok(()) => report.deleted.push(backup),
            Err(error) => {
                warn!(
                    path = %backup.path.display(),
                    %error,
                    "failed to delete expired backup"
                );
                report.failed.push(FailedDeletion { backup, error });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::clock::FixedClock;
    use crate::backup::resolver::PathResolver;
    use crate::config::paths::AppPaths;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn profile(n: u8) -> Profile {
        Profile::new(n).unwrap()
    }

    fn setup() -> (BackupManager, PathBuf, TempDir) {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp.path().to_path_buf());
        let backup_dir = paths.backup_dir();
        fs::create_dir_all(&backup_dir).unwrap();
        let resolver = PathResolver::with_live_save_dir(paths, temp.path().join("live"));
        let manager = BackupManager::new(resolver, "userdata")
            .unwrap()
            .with_clock(FixedClock::new(noon()));
        (manager, backup_dir, temp)
    }

    fn place(dir: &Path, p: u8, at: NaiveDateTime) -> PathBuf {
        let path = dir.join(naming::encode(profile(p), at, "userdata"));
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_boundary_is_kept_one_second_older_is_deleted() {
        let (manager, dir, _temp) = setup();
        let max_age = Duration::days(7);
        let at_cutoff = place(&dir, 1, noon() - max_age);
        let just_older = place(&dir, 1, noon() - max_age - Duration::seconds(1));

        let report = RetentionPolicy::new(&manager)
            .prune_older_than(profile(1), max_age)
            .unwrap();

        assert_eq!(report.cutoff, noon() - max_age);
        assert!(at_cutoff.exists());
        assert!(!just_older.exists());
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.kept, 1);
        assert!(report.is_complete());
    }

    #[test]
    fn test_huge_max_age_keeps_everything() {
        let (manager, dir, _temp) = setup();
        let ancient = place(&dir, 1, noon() - Duration::days(365 * 100));
        let settings = crate::config::settings::Settings {
            retention_max_age_days: u32::MAX,
            ..Default::default()
        };

        let policy = RetentionPolicy::new(&manager);
        assert_eq!(policy.cutoff(settings.retention_max_age()), NaiveDateTime::MIN);

        let report = policy
            .prune_older_than(profile(1), settings.retention_max_age())
            .unwrap();
        assert!(report.deleted.is_empty());
        assert_eq!(report.kept, 1);
        assert!(ancient.exists());
    }

    #[test]
    fn test_subsecond_clock_does_not_shift_boundary() {
        let (manager, dir, _temp) = setup();
        let clock = FixedClock::new(noon() + Duration::milliseconds(750));
        let manager = manager.with_clock(clock);
        let at_cutoff = place(&dir, 1, noon() - Duration::hours(1));

        RetentionPolicy::new(&manager)
            .prune_older_than(profile(1), Duration::hours(1))
            .unwrap();
        assert!(at_cutoff.exists());
    }

    #[test]
    fn test_only_target_profile_is_pruned() {
        let (manager, dir, _temp) = setup();
        let old = noon() - Duration::days(40);
        let p1 = place(&dir, 1, old);
        let p2 = place(&dir, 2, old);

        RetentionPolicy::new(&manager)
            .prune_older_than(profile(1), Duration::days(30))
            .unwrap();

        assert!(!p1.exists());
        assert!(p2.exists());
    }

    #[test]
    fn test_prune_all_profiles() {
        let (manager, dir, _temp) = setup();
        let old = noon() - Duration::days(40);
        place(&dir, 1, old);
        place(&dir, 4, old);
        let fresh = place(&dir, 2, noon());

        let report = RetentionPolicy::new(&manager)
            .prune_all(Duration::days(30))
            .unwrap();

        assert_eq!(report.deleted.len(), 2);
        assert_eq!(report.kept, 1);
        assert!(fresh.exists());
    }

    #[test]
    fn test_failed_deletion_does_not_stop_pass() {
        let (manager, dir, _temp) = setup();
        let old = noon() - Duration::days(40);
        let first = place(&dir, 1, old);
        let stuck = place(&dir, 1, old - Duration::days(1));
        let last = place(&dir, 1, old - Duration::days(2));

        let policy = RetentionPolicy::new(&manager);
        let backups = manager.list_backups(profile(1)).unwrap();
        let report = sweep(backups, policy.cutoff(Duration::days(30)), |path| {
            if path == stuck {
                Err(SaveError::write_failed(
                    path,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "in use"),
                ))
            } else {
                manager.delete_backup(path)
            }
        });

        assert_eq!(report.deleted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].backup.path, stuck);
        assert!(matches!(report.failed[0].error, SaveError::WriteFailed { .. }));
        assert!(!first.exists());
        assert!(!last.exists());
        assert!(stuck.exists());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_already_deleted_backup_counts_as_failure() {
        let (manager, dir, _temp) = setup();
        let vanished = place(&dir, 1, noon() - Duration::days(40));

        let policy = RetentionPolicy::new(&manager);
        let backups = manager.list_backups(profile(1)).unwrap();
        fs::remove_file(&vanished).unwrap();

        let report = sweep(backups, policy.cutoff(Duration::days(30)), |path| {
            manager.delete_backup(path)
        });
        assert!(report.deleted.is_empty());
        assert!(matches!(report.failed[0].error, SaveError::BackupNotFound(_)));
    }

    #[test]
    fn test_stale_backups_is_dry_run() {
        let (manager, dir, _temp) = setup();
        let old = place(&dir, 3, noon() - Duration::days(31));
        place(&dir, 3, noon() - Duration::days(1));

        let stale = RetentionPolicy::new(&manager)
            .stale_backups(profile(3), Duration::days(30))
            .unwrap();

        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].path, old);
        assert!(old.exists());
    }

    #[test]
    fn test_empty_dir_prunes_nothing() {
        let (manager, _dir, _temp) = setup();
        let report = RetentionPolicy::new(&manager)
            .prune_older_than(profile(1), Duration::days(1))
            .unwrap();
        assert!(report.deleted.is_empty());
        assert_eq!(report.kept, 0);
    }
}
