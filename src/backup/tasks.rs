//! Async wrappers for callers that must not block
//!
//! Every filesystem operation runs on tokio's blocking pool. There is no
//! cancellation: once started, an operation runs to completion.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use super::manager::BackupManager;
use super::retention::{PruneReport, RetentionPolicy};
use crate::error::{SaveError, SaveResult};
use crate::models::{Profile, SaveFileInfo};

/// Shares a [`BackupManager`] with async callers
#[derive(Clone)]
pub struct AsyncBackupManager {
    inner: Arc<BackupManager>,
}

impl AsyncBackupManager {
    pub fn new(manager: BackupManager) -> Self {
        Self {
            inner: Arc::new(manager),
        }
    }

    /// The wrapped manager, for synchronous use
    pub fn manager(&self) -> &BackupManager {
        &self.inner
    }

    pub async fn create_backup(&self, profile: Profile) -> SaveResult<SaveFileInfo> {
        self.run(move |m| m.create_backup(profile)).await
    }

    pub async fn restore_backup(
        &self,
        profile: Profile,
        backup_path: PathBuf,
    ) -> SaveResult<SaveFileInfo> {
        self.run(move |m| m.restore_backup(profile, &backup_path))
            .await
    }

    pub async fn delete_backup(&self, path: PathBuf) -> SaveResult<()> {
        self.run(move |m| m.delete_backup(&path)).await
    }

    pub async fn list_backups(&self, profile: Profile) -> SaveResult<Vec<SaveFileInfo>> {
        self.run(move |m| m.list_backups(profile)).await
    }

    pub async fn prune_older_than(
        &self,
        profile: Profile,
        max_age: Duration,
    ) -> SaveResult<PruneReport> {
        self.run(move |m| RetentionPolicy::new(m).prune_older_than(profile, max_age))
            .await
    }

    async fn run<T, F>(&self, op: F) -> SaveResult<T>
    where
        F: FnOnce(&BackupManager) -> SaveResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let manager = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&manager))
            .await
            .map_err(|e| SaveError::TaskFailed(e.to_string()))?
    }
}
