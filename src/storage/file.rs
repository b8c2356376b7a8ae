//! File-backed storage slot.

use super::StorageSlot;
use crate::error::StoreError;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path of the JSON document file.
    pub path: PathBuf,

    /// Whether to create the parent directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Hold an exclusive advisory lock on `<path>.lock` while open.
    pub lock: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./gift-tracker.json"),
            create_if_missing: true,
            lock: true,
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// A JSON document on disk.
///
/// Writes go to a temp file in the same directory which is synced and then
/// renamed over the target, so readers never see a half-written document.
pub struct FileSlot {
    config: StoreConfig,

    /// Lock file for exclusive access.
    _lock_file: Option<File>,
}

impl FileSlot {
    /// Open the slot, creating its directory if configured to.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let dir = parent_dir(&config.path);
        if !dir.exists() {
            if config.create_if_missing {
                fs::create_dir_all(&dir)?;
            } else {
                return Err(StoreError::NotInitialized(dir.display().to_string()));
            }
        }

        let lock_file = if config.lock {
            Some(Self::acquire_lock(&config.path)?)
        } else {
            None
        };

        Ok(Self {
            config,
            _lock_file: lock_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Where a corrupt document is copied before being replaced.
    pub fn quarantine_path(&self) -> PathBuf {
        sibling(&self.config.path, ".corrupt")
    }

    fn keep_corrupt(&self, bytes: &[u8]) {
        let path = self.quarantine_path();
        match fs::write(&path, bytes) {
            Ok(()) => tracing::warn!(path = %path.display(), "kept a copy of the corrupt document"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not keep corrupt document"),
        }
    }

    fn acquire_lock(path: &Path) -> Result<File, StoreError> {
        let lock_file = File::create(sibling(path, ".lock"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        let bytes = match fs::read(&self.config.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) => {
                let error = e.utf8_error();
                self.keep_corrupt(e.as_bytes());
                Err(StoreError::Corruption(format!("document is not UTF-8: {error}")))
            }
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(parent_dir(&self.config.path))?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.config.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn quarantine(&self, contents: &str) {
        self.keep_corrupt(contents.as_bytes());
    }

    fn describe(&self) -> String {
        self.config.path.display().to_string()
    }
}

/// Directory holding `path`; a bare file name lives in the working directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
