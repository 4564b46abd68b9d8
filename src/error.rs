//! Custom error types for SaveWarden
//!
//! Every backup, restore, prune and path operation returns one of these
//! classified failures. Decode failures while listing backups are not part
//! of this hierarchy; see [`crate::backup::naming::DecodeError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Profile;

/// The main error type for SaveWarden operations
#[derive(Error, Debug)]
pub enum SaveError {
    /// Profile number outside 1..=4
    #[error("Invalid profile {0}: expected {min}..={max}", min = Profile::MIN, max = Profile::MAX)]
    InvalidProfile(i64),

    /// The current OS has no known live save location
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The backup storage directory cannot be created or read
    #[error("Backup storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No live save exists for the requested profile
    #[error("Live save not found: {}", .0.display())]
    LiveSaveNotFound(PathBuf),

    /// Restore or delete target does not exist
    #[error("Backup not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    /// A backup belongs to a different profile than requested
    #[error("Backup belongs to profile {found}, not profile {expected}")]
    ProfileMismatch { expected: Profile, found: Profile },

    /// Advisory free-space check failed
    #[error("Insufficient disk space: need {required} bytes, {available} available")]
    InsufficientDiskSpace { required: u64, available: u64 },

    /// Writing, renaming or deleting a file failed
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a file failed
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl SaveError {
    /// Create a write failure for a path
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a read failure for a path
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a storage failure for a path
    pub fn storage_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a "not found" error of any kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BackupNotFound(_) | Self::LiveSaveNotFound(_))
    }

    /// Check if this is a profile validation error
    pub fn is_invalid_profile(&self) -> bool {
        matches!(self, Self::InvalidProfile(_))
    }
}

/// Result type alias for SaveWarden operations
pub type SaveResult<T> = Result<T, SaveError>;
