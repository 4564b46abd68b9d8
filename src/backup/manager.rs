//! Backup manager for SaveWarden
//!
//! Creates backups of a profile's live save, restores a backup over the
//! live save, and deletes individual backups. Holds no state of its own
//! beyond configuration; everything durable lives in the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::catalog::BackupCatalog;
use super::clock::{Clock, SystemClock};
use super::disk::{SpaceProbe, SystemSpaceProbe};
use super::naming;
use super::resolver::PathResolver;
use crate::error::{SaveError, SaveResult};
use crate::models::{Profile, SaveFileInfo};
use crate::storage::file_io;

/// Default extension for new backup files
pub const DEFAULT_EXTENSION: &str = "userdata";

/// How far past a taken second we look for a free backup name
const MAX_NAME_ATTEMPTS: i64 = 60;

/// Manages backup creation, restore and deletion
pub struct BackupManager {
    resolver: PathResolver,
    extension: String,
    space: Box<dyn SpaceProbe>,
    clock: Box<dyn Clock>,
}

impl BackupManager {
    /// Create a new BackupManager using the system clock and real disk space
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Config`] if `extension` is empty, contains a
    /// path separator, or otherwise yields names that don't decode.
    pub fn new(resolver: PathResolver, extension: impl Into<String>) -> SaveResult<Self> {
        let extension = extension.into();
        naming::validate_extension(&extension)?;

        Ok(Self {
            resolver,
            extension,
            space: Box::new(SystemSpaceProbe),
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the free space source
    pub fn with_space_probe(mut self, probe: impl SpaceProbe + 'static) -> Self {
        self.space = Box::new(probe);
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Catalog over the backup directory
    pub fn catalog(&self) -> BackupCatalog {
        BackupCatalog::new(self.resolver.paths().backup_dir())
    }

    /// Backups for a profile, newest first
    pub fn list_backups(&self, profile: Profile) -> SaveResult<Vec<SaveFileInfo>> {
        self.catalog().list_backups(profile)
    }

    /// Most recent backup for a profile
    pub fn latest_backup(&self, profile: Profile) -> SaveResult<Option<SaveFileInfo>> {
        self.catalog().latest(profile)
    }

    /// Snapshot the live save of a profile into the backup directory
    pub fn create_backup(&self, profile: Profile) -> SaveResult<SaveFileInfo> {
        let live_path = self.resolver.live_save_path(profile)?;
        if !live_path.is_file() {
            return Err(SaveError::LiveSaveNotFound(live_path));
        }

        let bytes = file_io::read_bytes(&live_path)?;
        let required = bytes.len() as u64;

        let backup_dir = self.resolver.resolve_backup_storage_dir()?;
        self.check_free_space(&backup_dir, required)?;

        let (path, timestamp) = self.publish_backup(&backup_dir, profile, &bytes)?;

        info!(
            %profile,
            path = %path.display(),
            bytes = required,
            "backup created"
        );

        Ok(SaveFileInfo {
            path,
            profile,
            timestamp,
            file_size: required,
        })
    }

    /// Overwrite a profile's live save with a backup
    ///
    /// Destructive: the current live save is replaced without a safety
    /// backup. Callers confirm with the user first.
    pub fn restore_backup(&self, profile: Profile, backup_path: &Path) -> SaveResult<SaveFileInfo> {
        let live_path = self.resolver.live_save_path(profile)?;

        if !backup_path.is_file() {
            return Err(SaveError::BackupNotFound(backup_path.to_path_buf()));
        }

        let decoded = backup_path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| naming::decode(n).ok())
            .ok_or_else(|| SaveError::BackupNotFound(backup_path.to_path_buf()))?;

        if decoded.profile != profile {
            return Err(SaveError::ProfileMismatch {
                expected: profile,
                found: decoded.profile,
            });
        }

        let bytes = file_io::read_bytes(backup_path)?;
        file_io::write_bytes_atomic(&live_path, &bytes)?;

        info!(
            %profile,
            backup = %backup_path.display(),
            live_save = %live_path.display(),
            "backup restored"
        );

        Ok(SaveFileInfo {
            path: backup_path.to_path_buf(),
            profile,
            timestamp: decoded.timestamp,
            file_size: bytes.len() as u64,
        })
    }

    /// Delete one backup
    ///
    /// Only files named like a backup are removed; anything else reports
    /// [`SaveError::BackupNotFound`] and is left alone. Deleting a path that
    /// no longer exists is an error, not a no-op.
    pub fn delete_backup(&self, path: &Path) -> SaveResult<()> {
        let is_backup = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| naming::decode(n).is_ok());
        if !is_backup {
            return Err(SaveError::BackupNotFound(path.to_path_buf()));
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "backup deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SaveError::BackupNotFound(path.to_path_buf()))
            }
            Err(e) => Err(SaveError::write_failed(path, e)),
        }
    }

    fn check_free_space(&self, dir: &Path, required: u64) -> SaveResult<()> {
        let available = self
            .space
            .available_space(dir)
            .map_err(|e| SaveError::storage_unavailable(dir, e))?;

        match available {
            Some(available) if required > available => {
                Err(SaveError::InsufficientDiskSpace {
                    required,
                    available,
                })
            }
            Some(_) => Ok(()),
            None => {
                debug!(dir = %dir.display(), "free space unknown; skipping check");
                Ok(())
            }
        }
    }

    /// Write a new backup under a name derived from the current time
    ///
    /// If a backup already exists for this second, the timestamp moves
    /// forward a second at a time so the name keeps its exact format. Names
    /// are claimed without overwriting, so concurrent creates never share one.
    fn publish_backup(
        &self,
        dir: &Path,
        profile: Profile,
        bytes: &[u8],
    ) -> SaveResult<(PathBuf, NaiveDateTime)> {
        let now = naming::truncate_to_second(self.clock.now());
        let candidates: Vec<(NaiveDateTime, PathBuf)> = (0..MAX_NAME_ATTEMPTS)
            .map(|offset| {
                let timestamp = now + chrono::Duration::seconds(offset);
                (timestamp, dir.join(naming::encode(profile, timestamp, &self.extension)))
            })
            .collect();

        let written = file_io::write_bytes_new(candidates.iter().map(|(_, p)| p.clone()), bytes)?;

        match written.and_then(|path| candidates.into_iter().find(|(_, p)| *p == path)) {
            Some((timestamp, path)) => {
                if timestamp != now {
                    debug!(%profile, %timestamp, "backup name taken; advanced timestamp");
                }
                Ok((path, timestamp))
            }
            None => {
                let path = dir.join(naming::encode(profile, now, &self.extension));
                Err(SaveError::write_failed(
                    path,
                    std::io::Error::new(ErrorKind::AlreadyExists, "no free backup name"),
                ))
            }
        }
    }
}
