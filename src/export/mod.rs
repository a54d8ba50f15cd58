//! Memo export
//!
//! Export hands the whole buffer to the user as a markdown file. The
//! `Exporter` trait is the seam; `DialogExporter` asks for a location with
//! the native save dialog.

mod dialog;

pub use dialog::DialogExporter;

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Turns the buffer into a file the user can keep.
pub trait Exporter {
    /// Export `text`, suggesting `filename` to the user.
    ///
    /// Returns the written path, or `None` if the user cancelled.
    fn export(&mut self, text: &str, filename: &str) -> Result<Option<PathBuf>>;
}

/// Write `text` to `path` as UTF-8.
pub fn write_export(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text.as_bytes()).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported memo to {} ({} bytes)", path.display(), text.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_export() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memo.md");
        write_export(&path, "# Markdown Memo\n\n- 自動保存").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Markdown Memo\n\n- 自動保存"
        );
    }

    #[test]
    fn test_write_export_missing_dir_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("memo.md");
        let result = write_export(&path, "text");
        assert!(matches!(result, Err(Error::Export { path: p, .. }) if p == path));
    }
}
