//! Free disk space lookup for the advisory pre-backup check

use std::io;
use std::path::Path;

/// Reports how many bytes can still be written under a path
pub trait SpaceProbe: Send + Sync {
    /// `Ok(None)` means the platform can't tell; the caller skips the check.
    fn available_space(&self, path: &Path) -> io::Result<Option<u64>>;
}

/// Asks the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpaceProbe;

impl SpaceProbe for SystemSpaceProbe {
    fn available_space(&self, path: &Path) -> io::Result<Option<u64>> {
        fs4::available_space(path).map(Some)
    }
}

/// Always reports the same amount of free space
#[derive(Debug, Clone, Copy)]
pub struct FixedSpaceProbe(pub u64);

impl SpaceProbe for FixedSpaceProbe {
    fn available_space(&self, _path: &Path) -> io::Result<Option<u64>> {
        Ok(Some(self.0))
    }
}
