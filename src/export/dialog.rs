//! Native save dialog exporter using the rfd crate

use log::{debug, warn};
use rfd::FileDialog;
use std::path::PathBuf;

use super::{write_export, Exporter};
use crate::error::Result;

/// File extension filters offered in the save dialog.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Exports through the platform save dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogExporter {
    /// Directory the dialog opens in; updated after each export
    initial_dir: Option<PathBuf>,
    /// Open the written file with the system default application
    open_after_export: bool,
}

impl DialogExporter {
    pub fn new(initial_dir: Option<PathBuf>, open_after_export: bool) -> Self {
        Self {
            initial_dir,
            open_after_export,
        }
    }

    /// Opens a native save dialog.
    ///
    /// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
    fn pick_location(&self, filename: &str) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Save Memo")
            .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
            .add_filter("Text Files", TEXT_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .set_file_name(filename);

        if let Some(dir) = &self.initial_dir {
            dialog = dialog.set_directory(dir);
        }

        dialog.save_file()
    }
}

impl Exporter for DialogExporter {
    fn export(&mut self, text: &str, filename: &str) -> Result<Option<PathBuf>> {
        let Some(path) = self.pick_location(filename) else {
            debug!("Export dialog cancelled");
            return Ok(None);
        };

        write_export(&path, text)?;

        if let Some(parent) = path.parent() {
            self.initial_dir = Some(parent.to_path_buf());
        }

        if self.open_after_export {
            if let Err(e) = open::that(&path) {
                warn!("Failed to open exported file: {}", e);
            }
        }

        Ok(Some(path))
    }
}
