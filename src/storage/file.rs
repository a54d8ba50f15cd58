//! File-backed memo storage
//!
//! Each key maps to `<dir>/<key>.md`. Writes go to a temporary sibling
//! first and are renamed into place.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Storage;
use crate::config::APP_NAME;
use crate::error::{Error, Result};

/// Extension of stored memo files
const FILE_EXTENSION: &str = "md";

/// Extension of the temporary file used during atomic writes
const TEMP_EXTENSION: &str = "md.tmp";

/// Stores memo text as markdown files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory.
    ///
    /// - **Windows**: `%APPDATA%\markdown-memo\`
    /// - **macOS**: `~/Library/Application Support/markdown-memo/`
    /// - **Linux**: `~/.local/share/markdown-memo/`
    pub fn in_data_dir() -> Result<Self> {
        dirs::data_dir()
            .map(|base| Self::new(base.join(APP_NAME)))
            .ok_or(Error::DataDirNotFound)
    }

    /// Directory holding the memo files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key).with_extension(FILE_EXTENSION)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                info!("Loaded memo from {} ({} bytes)", path.display(), text.len());
                Ok(Some(text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored memo at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(Error::StorageLoad { path, source }),
        }
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        if !self.dir.exists() {
            debug!("Creating data directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|source| Error::StorageSave {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path_for(key);
        let temp_path = self.dir.join(key).with_extension(TEMP_EXTENSION);

        fs::write(&temp_path, text).map_err(|source| Error::StorageSave {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| Error::StorageSave {
            path: path.clone(),
            source,
        })?;

        debug!("Saved memo to {} ({} bytes)", path.display(), text.len());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
