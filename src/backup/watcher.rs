//! Notifications when the game rewrites a live save
//!
//! Best effort: when the live save directory doesn't exist yet (the game
//! has never run) the watch quietly doesn't start. Callbacks run on the
//! notify backend's thread and should only hand work off.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use super::resolver::PathResolver;
use crate::error::SaveResult;
use crate::models::Profile;

/// The subscription backing an active watch
struct ActiveWatch<W> {
    profile: Profile,
    path: PathBuf,
    // Dropping the watcher ends the OS subscription
    _watcher: W,
}

/// Watches one profile's live save at a time
///
/// Dropping the handle stops the watch. `W` is the notify backend, the
/// platform's native one unless built with [`with_backend`](Self::with_backend).
pub struct LiveFileWatcher<W: Watcher = RecommendedWatcher> {
    resolver: PathResolver,
    active: Option<ActiveWatch<W>>,
}

impl LiveFileWatcher<RecommendedWatcher> {
    pub fn new(resolver: PathResolver) -> Self {
        Self::with_backend(resolver)
    }
}

impl<W: Watcher> LiveFileWatcher<W> {
    pub fn with_backend(resolver: PathResolver) -> Self {
        Self {
            resolver,
            active: None,
        }
    }

    /// Start calling `on_changed` whenever the profile's live save is
    /// modified or recreated
    ///
    /// Any previous watch on this handle is stopped first. Returns
    /// `Ok(false)` without error when the watch could not start.
    pub fn watch<F>(&mut self, profile: Profile, on_changed: F) -> SaveResult<bool>
    where
        F: Fn() + Send + 'static,
    {
        self.stop();

        let live_path = self.resolver.live_save_path(profile)?;
        let Some(dir) = live_path.parent().filter(|d| d.is_dir()) else {
            info!(
                %profile,
                path = %live_path.display(),
                "live save directory missing; not watching"
            );
            return Ok(false);
        };

        let Some(file_name) = live_path.file_name().map(|n| n.to_os_string()) else {
            return Ok(false);
        };

        match start_watcher::<W, F>(dir, file_name, on_changed) {
            Ok(watcher) => {
                debug!(%profile, path = %live_path.display(), "watching live save");
                self.active = Some(ActiveWatch {
                    profile,
                    path: live_path,
                    _watcher: watcher,
                });
                Ok(true)
            }
            Err(error) => {
                warn!(%profile, %error, "failed to start live save watcher");
                Ok(false)
            }
        }
    }

    /// Stop watching; does nothing when no watch is active
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(profile = %active.profile, "stopped watching live save");
        }
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Live save path under watch
    pub fn watched_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Profile under watch
    pub fn watched_profile(&self) -> Option<Profile> {
        self.active.as_ref().map(|a| a.profile)
    }
}

fn start_watcher<W, F>(dir: &Path, file_name: OsString, on_changed: F) -> notify::Result<W>
where
    W: Watcher,
    F: Fn() + Send + 'static,
{
    let handler = move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if is_live_save_change(&event, &file_name) {
                on_changed();
            }
        }
        Err(error) => warn!(%error, "live save watcher error"),
    };
    let mut watcher = W::new(handler, notify::Config::default())?;

    // The game may replace the file by rename, so watch the directory
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Create or content/rename modification of the watched file
fn is_live_save_change(event: &Event, file_name: &OsString) -> bool {
    let relevant_kind = match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    };

    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
