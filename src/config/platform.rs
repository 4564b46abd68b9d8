//! Live save locations per operating system
//!
//! Each supported OS gets its own independent locator; one is selected at
//! startup by [`detect`]. A [`FixedLocator`] replaces detection when the
//! user points SaveWarden at a directory explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{SaveError, SaveResult};

/// Environment variable overriding the live save directory
pub const LIVE_SAVE_DIR_ENV: &str = "SAVEWARDEN_LIVE_SAVE_DIR";

const STUDIO: &str = "Cardforge Studio";
const GAME: &str = "Cardforge";
const MACOS_BUNDLE_ID: &str = "com.cardforge.Cardforge";

/// Finds the directory where the game keeps its live saves
pub trait LiveSaveLocator: fmt::Debug + Send + Sync {
    /// Directory holding `profile{N}.userdata` files
    fn live_save_dir(&self) -> SaveResult<PathBuf>;

    /// Short name for logs and `config` output
    fn platform_name(&self) -> &'static str;
}

/// `<home>\AppData\LocalLow\Cardforge Studio\Cardforge`
#[derive(Debug, Clone)]
pub struct WindowsLocator {
    home: PathBuf,
}

impl WindowsLocator {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

impl LiveSaveLocator for WindowsLocator {
    fn live_save_dir(&self) -> SaveResult<PathBuf> {
        Ok(self
            .home
            .join("AppData")
            .join("LocalLow")
            .join(STUDIO)
            .join(GAME))
    }

    fn platform_name(&self) -> &'static str {
        "windows"
    }
}

/// `<home>/Library/Application Support/com.cardforge.Cardforge`
#[derive(Debug, Clone)]
pub struct MacLocator {
    home: PathBuf,
}

impl MacLocator {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

impl LiveSaveLocator for MacLocator {
    fn live_save_dir(&self) -> SaveResult<PathBuf> {
        Ok(self
            .home
            .join("Library")
            .join("Application Support")
            .join(MACOS_BUNDLE_ID))
    }

    fn platform_name(&self) -> &'static str {
        "macos"
    }
}

/// `<home>/.config/unity3d/Cardforge Studio/Cardforge`
#[derive(Debug, Clone)]
pub struct LinuxLocator {
    home: PathBuf,
}

impl LinuxLocator {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

impl LiveSaveLocator for LinuxLocator {
    fn live_save_dir(&self) -> SaveResult<PathBuf> {
        Ok(self
            .home
            .join(".config")
            .join("unity3d")
            .join(STUDIO)
            .join(GAME))
    }

    fn platform_name(&self) -> &'static str {
        "linux"
    }
}

/// A live save directory chosen explicitly
#[derive(Debug, Clone)]
pub struct FixedLocator {
    dir: PathBuf,
}

impl FixedLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LiveSaveLocator for FixedLocator {
    fn live_save_dir(&self) -> SaveResult<PathBuf> {
        Ok(self.dir.clone())
    }

    fn platform_name(&self) -> &'static str {
        "custom"
    }
}

/// Pick the locator for the running OS
pub fn detect() -> SaveResult<Box<dyn LiveSaveLocator>> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    detect_for(std::env::consts::OS, home)
}

/// Pick the locator for a given OS name (as in `std::env::consts::OS`)
pub fn detect_for(os: &str, home: Option<PathBuf>) -> SaveResult<Box<dyn LiveSaveLocator>> {
    let known = matches!(os, "windows" | "macos" | "linux");
    if !known {
        return Err(SaveError::UnsupportedPlatform(os.to_string()));
    }

    let home =
        home.ok_or_else(|| SaveError::Config("Could not determine home directory".into()))?;

    Ok(match os {
        "windows" => Box::new(WindowsLocator::new(home)),
        "macos" => Box::new(MacLocator::new(home)),
        _ => Box::new(LinuxLocator::new(home)),
    })
}

/// Pick a locator honouring explicit overrides
///
/// Resolution order: the settings override, then `SAVEWARDEN_LIVE_SAVE_DIR`,
/// then platform detection.
pub fn resolve_locator(configured: Option<&Path>) -> SaveResult<Box<dyn LiveSaveLocator>> {
    if let Some(dir) = configured {
        return Ok(Box::new(FixedLocator::new(dir)));
    }
    if let Ok(dir) = std::env::var(LIVE_SAVE_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(Box::new(FixedLocator::new(dir)));
        }
    }
    detect()
}
