//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave partial data behind on
//! failure. Every write goes to a uniquely named hidden temp file in the
//! target directory and is renamed into place once flushed and synced.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{SaveError, SaveResult};

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> SaveResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| SaveError::read_failed(path, e))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| SaveError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> SaveResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| SaveError::Config(format!("Failed to serialize data: {}", e)))?;
    write_bytes_atomic(path, &json)
}

/// Read a whole file into memory
pub fn read_bytes<P: AsRef<Path>>(path: P) -> SaveResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| SaveError::read_failed(path, e))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all. Readers
/// scanning the directory only ever see a hidden temp name or the final
/// name, and a temp name never decodes as a backup.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> SaveResult<()> {
    let path = path.as_ref();
    let temp = write_temp_beside(path, data)?;

    temp.persist(path)
        .map_err(|e| SaveError::write_failed(path, e.error))?;

    Ok(())
}

/// Publish bytes under the first candidate name that doesn't exist yet
///
/// The data is written and synced once. Each candidate is then claimed
/// with a no-clobber rename, so two writers racing for the same name
/// never overwrite each other. All candidates must share a directory.
/// Returns `None` when every candidate is taken.
pub fn write_bytes_new<I>(candidates: I, data: &[u8]) -> SaveResult<Option<PathBuf>>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut candidates = candidates.into_iter().peekable();
    let Some(first) = candidates.peek() else {
        return Ok(None);
    };
    let mut temp = write_temp_beside(first, data)?;

    for path in candidates {
        match temp.persist_noclobber(&path) {
            Ok(_) => return Ok(Some(path)),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
            Err(e) => return Err(SaveError::write_failed(&path, e.error)),
        }
    }

    Ok(None)
}

/// Write and sync `data` to a hidden temp file in the directory of `path`
///
/// Temp file must live in the same directory for the rename to be atomic.
/// It is removed on drop unless persisted.
fn write_temp_beside(path: &Path, data: &[u8]) -> SaveResult<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| SaveError::write_failed(dir, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| SaveError::write_failed(path, e))?;

    write_and_sync(&mut temp, data).map_err(|e| SaveError::write_failed(path, e))?;

    Ok(temp)
}

fn write_and_sync(temp: &mut NamedTempFile, data: &[u8]) -> std::io::Result<()> {
    temp.write_all(data)?;
    temp.flush()?;
    // Sync to disk before rename
    temp.as_file().sync_all()
}
