//! The editor engine
//!
//! `Editor` exclusively owns the memo buffer and its selection. Every
//! operation runs one transform to completion, replaces the state, and then
//! hands a read-only copy of the text to the renderer and the storage.
//! Collaborator failures are logged and never undo an edit.
//!
//! ```ignore
//! let mut editor = Editor::load(renderer, storage, exporter);
//! editor.set_selection(Selection::new(0, 4));
//! editor.apply(EditorAction::Inline(InlineStyle::Bold));
//! assert!(editor.text().starts_with("**"));
//! ```

use log::{debug, info, warn};
use std::path::PathBuf;

use super::commands::EditorAction;
use super::continuation::continue_list;
use super::selection::{EditorState, Selection};
use super::transform::{self, InlineStyle, ListMarker};
use crate::config::Settings;
use crate::error::ResultExt;
use crate::export::Exporter;
use crate::preview::{RenderedDocument, Renderer};
use crate::storage::{Storage, STORAGE_KEY};

/// The document shown when nothing has been saved yet.
pub const DEFAULT_DOCUMENT: &str = concat!(
    "# Markdown Memo\n",
    "\n",
    "Markdownで書ける、シンプルなメモ帳です。\n",
    "\n",
    "- 左で編集\n",
    "- 右でプレビュー\n",
    "- 自動保存",
);


/// Owns the buffer, its selection and the collaborators notified on change.
pub struct Editor {
    state: EditorState,
    preview: RenderedDocument,
    renderer: Box<dyn Renderer>,
    storage: Box<dyn Storage>,
    exporter: Box<dyn Exporter>,
    export_filename: String,
}

impl Editor {
    /// Create an editor seeded from storage.
    ///
    /// Falls back to `DEFAULT_DOCUMENT` when nothing is stored or the stored
    /// copy cannot be read. The caret starts at the end of the text.
    pub fn load(
        renderer: Box<dyn Renderer>,
        storage: Box<dyn Storage>,
        exporter: Box<dyn Exporter>,
    ) -> Self {
        let text = storage
            .get(STORAGE_KEY)
            .unwrap_or_warn_default(None, "Failed to load saved memo")
            .unwrap_or_else(|| {
                info!("No saved memo, starting with the default document");
                DEFAULT_DOCUMENT.to_string()
            });

        let caret = text.len();
        let mut editor = Self {
            state: EditorState::with_caret(text, caret),
            preview: RenderedDocument::default(),
            renderer,
            storage,
            exporter,
            export_filename: Settings::DEFAULT_EXPORT_FILENAME.to_string(),
        };
        editor.refresh_preview();
        editor
    }

    /// Use `filename` as the suggested export name.
    pub fn with_export_filename(mut self, filename: impl Into<String>) -> Self {
        self.export_filename = filename.into();
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The current buffer text.
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// The current selection (byte offsets).
    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    /// The latest rendered preview.
    pub fn preview(&self) -> &RenderedDocument {
        &self.preview
    }

    /// Move the selection without editing. The range is clamped to the text.
    pub fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection.clamped(&self.state.text);
    }

    /// Swap the renderer and re-render the current text.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = renderer;
        self.refresh_preview();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the whole buffer, leaving the caret at its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let caret = text.len();
        self.commit(EditorState::with_caret(text, caret));
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        debug!("Clearing memo");
        self.set_text(String::new());
    }

    pub fn wrap_inline(&mut self, style: InlineStyle) {
        let next = transform::wrap_inline(&self.state, style);
        self.commit(next);
    }

    pub fn toggle_list_marker(&mut self, marker: ListMarker) {
        let next = transform::toggle_list_marker(&self.state, marker);
        self.commit(next);
    }

    pub fn toggle_quote(&mut self) {
        let next = transform::toggle_quote(&self.state);
        self.commit(next);
    }

    pub fn insert_code_block(&mut self) {
        let next = transform::insert_code_block(&self.state);
        self.commit(next);
    }

    pub fn indent_lines(&mut self, outdent: bool) {
        let next = transform::indent_lines(&self.state, outdent);
        self.commit(next);
    }

    /// Handle Enter at the current caret.
    ///
    /// Returns `true` when the list was continued or terminated, in which
    /// case the caller must suppress its own newline.
    pub fn handle_enter_key(&mut self) -> bool {
        let continuation = continue_list(&self.state);
        let handled = continuation.handled();
        if let Some(next) = continuation.into_state() {
            self.commit(next);
        }
        handled
    }

    /// Accept text and selection edited directly by the UI widget.
    ///
    /// Persists and re-renders only when the text actually changed.
    pub fn sync_from_widget(&mut self, text: &str, selection: Selection) {
        if text == self.state.text {
            self.set_selection(selection);
            return;
        }
        self.commit(EditorState::new(text, selection));
    }

    /// Run `action`. Returns whether it was handled.
    pub fn apply(&mut self, action: EditorAction) -> bool {
        debug!("Editor action: {}", action.id());
        match action {
            EditorAction::Inline(style) => self.wrap_inline(style),
            EditorAction::List(marker) => self.toggle_list_marker(marker),
            EditorAction::Quote => self.toggle_quote(),
            EditorAction::CodeBlock => self.insert_code_block(),
            EditorAction::Indent => self.indent_lines(false),
            EditorAction::Outdent => self.indent_lines(true),
            EditorAction::ContinueList => return self.handle_enter_key(),
            EditorAction::Save => {
                self.export();
            }
            EditorAction::Clear => self.clear(),
        }
        true
    }

    /// Run the action registered under a toolbar id; unknown ids do nothing.
    pub fn apply_id(&mut self, id: &str) -> bool {
        match EditorAction::from_id(id) {
            Some(action) => self.apply(action),
            None => {
                debug!("Ignoring unknown action id: {:?}", id);
                false
            }
        }
    }

    /// Hand the buffer to the exporter.
    ///
    /// Returns the written path; `None` if cancelled or failed.
    pub fn export(&mut self) -> Option<PathBuf> {
        match self.exporter.export(&self.state.text, &self.export_filename) {
            Ok(path) => path,
            Err(e) => {
                warn!("Export failed: {}", e);
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notification
    // ─────────────────────────────────────────────────────────────────────────

    /// Install `next` as the current state, then re-render and persist.
    fn commit(&mut self, next: EditorState) {
        debug_assert!(
            next.selection.is_valid_for(&next.text),
            "selection {:?} out of bounds for text of length {}",
            next.selection,
            next.text.len()
        );
        self.state = next;
        self.state.selection = self.state.selection.clamped(&self.state.text);

        self.refresh_preview();
        if let Err(e) = self.storage.set(STORAGE_KEY, &self.state.text) {
            warn!("Failed to persist memo: {}", e);
        }
    }

    fn refresh_preview(&mut self) {
        let mut document = self.renderer.render(&self.state.text);
        self.renderer.post_process(&mut document);
        self.preview = document;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::preview::document::{Block, Span, SpanStyle};
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    // ─────────────────────────────────────────────────────────────────────────
    // Recording collaborators
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct Log {
        rendered: Vec<String>,
        post_processed: usize,
        saved: Vec<String>,
        exported: Vec<(String, String)>,
    }

    type SharedLog = Rc<RefCell<Log>>;

    struct FakeRenderer(SharedLog);

    impl Renderer for FakeRenderer {
        fn render(&self, text: &str) -> RenderedDocument {
            self.0.borrow_mut().rendered.push(text.to_string());
            RenderedDocument {
                blocks: vec![Block::Paragraph(vec![vec![Span {
                    text: text.to_string(),
                    style: SpanStyle::default(),
                    link: None,
                }]])],
            }
        }

        fn post_process(&self, _document: &mut RenderedDocument) {
            self.0.borrow_mut().post_processed += 1;
        }
    }

    struct FakeStorage {
        log: SharedLog,
        initial: Option<String>,
        fail: bool,
    }

    impl Storage for FakeStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            assert_eq!(key, STORAGE_KEY);
            if self.fail {
                return Err(Error::Application("unreadable".to_string()));
            }
            Ok(self.initial.clone())
        }

        fn set(&mut self, key: &str, text: &str) -> Result<()> {
            assert_eq!(key, STORAGE_KEY);
            self.log.borrow_mut().saved.push(text.to_string());
            if self.fail {
                return Err(Error::StorageSave {
                    path: PathBuf::from("memo.md"),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            Ok(())
        }
    }

    struct FakeExporter {
        log: SharedLog,
        cancel: bool,
    }

    impl Exporter for FakeExporter {
        fn export(&mut self, text: &str, filename: &str) -> Result<Option<PathBuf>> {
            if self.cancel {
                return Ok(None);
            }
            self.log
                .borrow_mut()
                .exported
                .push((text.to_string(), filename.to_string()));
            Ok(Some(PathBuf::from("/exports").join(filename)))
        }
    }

    fn editor_with(initial: Option<&str>) -> (Editor, SharedLog) {
        let log = SharedLog::default();
        let editor = Editor::load(
            Box::new(FakeRenderer(log.clone())),
            Box::new(FakeStorage {
                log: log.clone(),
                initial: initial.map(str::to_string),
                fail: false,
            }),
            Box::new(FakeExporter {
                log: log.clone(),
                cancel: false,
            }),
        );
        (editor, log)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_uses_default_document() {
        let (editor, log) = editor_with(None);
        assert_eq!(editor.text(), DEFAULT_DOCUMENT);
        assert_eq!(editor.selection(), Selection::caret(DEFAULT_DOCUMENT.len()));
        // Initial render, but nothing persisted until the first edit
        assert_eq!(log.borrow().rendered, vec![DEFAULT_DOCUMENT.to_string()]);
        assert!(log.borrow().saved.is_empty());
    }

    #[test]
    fn test_load_uses_stored_text() {
        let (editor, _) = editor_with(Some("- saved"));
        assert_eq!(editor.text(), "- saved");
    }

    #[test]
    fn test_load_keeps_stored_empty_text() {
        let (editor, _) = editor_with(Some(""));
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_load_failure_falls_back_to_default() {
        let log = SharedLog::default();
        let editor = Editor::load(
            Box::new(FakeRenderer(log.clone())),
            Box::new(FakeStorage {
                log: log.clone(),
                initial: Some("ignored".to_string()),
                fail: true,
            }),
            Box::new(FakeExporter { log, cancel: false }),
        );
        assert_eq!(editor.text(), DEFAULT_DOCUMENT);
    }

    #[test]
    fn test_default_document_shape() {
        let lines: Vec<&str> = DEFAULT_DOCUMENT.split('\n').collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "# Markdown Memo");
        assert_eq!(lines[1], "");
        assert_eq!(lines[3], "");
        assert!(lines[4..].iter().all(|line| line.starts_with("- ")));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notification after mutation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_edit_renders_and_persists() {
        let (mut editor, log) = editor_with(Some("memo"));
        editor.set_selection(Selection::new(0, 4));
        editor.wrap_inline(InlineStyle::Bold);

        assert_eq!(editor.text(), "**memo**");
        assert_eq!(editor.selection(), Selection::new(2, 6));
        let log = log.borrow();
        assert_eq!(log.saved, vec!["**memo**".to_string()]);
        assert_eq!(log.rendered.last().map(String::as_str), Some("**memo**"));
        assert_eq!(log.post_processed, log.rendered.len());
        assert_eq!(editor.preview().blocks[0].plain_text(), "**memo**");
    }

    #[test]
    fn test_storage_failure_keeps_edit() {
        let log = SharedLog::default();
        let mut editor = Editor::load(
            Box::new(FakeRenderer(log.clone())),
            Box::new(FakeStorage {
                log: log.clone(),
                initial: None,
                fail: true,
            }),
            Box::new(FakeExporter {
                log: log.clone(),
                cancel: false,
            }),
        );
        editor.set_text("still here");
        assert_eq!(editor.text(), "still here");
        assert_eq!(log.borrow().saved, vec!["still here".to_string()]);
    }

    #[test]
    fn test_set_selection_is_clamped_and_silent() {
        let (mut editor, log) = editor_with(Some("abc"));
        editor.set_selection(Selection::new(9, 1));
        assert_eq!(editor.selection(), Selection::new(1, 3));
        assert!(log.borrow().saved.is_empty());
    }

    #[test]
    fn test_sync_from_widget_persists_typing() {
        let (mut editor, log) = editor_with(Some("abc"));
        editor.sync_from_widget("abcd", Selection::caret(4));
        assert_eq!(editor.text(), "abcd");
        assert_eq!(editor.selection(), Selection::caret(4));
        assert_eq!(log.borrow().saved, vec!["abcd".to_string()]);

        // Caret movement alone is not an edit
        editor.sync_from_widget("abcd", Selection::caret(1));
        assert_eq!(editor.selection(), Selection::caret(1));
        assert_eq!(log.borrow().saved.len(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_handle_enter_continues_ordered_list() {
        let (mut editor, log) = editor_with(Some("1. abc"));
        assert!(editor.handle_enter_key());
        assert_eq!(editor.text(), "1. abc\n2. ");
        assert_eq!(editor.selection(), Selection::caret(editor.text().len()));
        assert_eq!(log.borrow().saved.len(), 1);
    }

    #[test]
    fn test_handle_enter_terminates_empty_item() {
        let (mut editor, _) = editor_with(Some("- a\n- "));
        assert!(editor.handle_enter_key());
        assert_eq!(editor.text(), "- a\n");
    }

    #[test]
    fn test_handle_enter_unhandled_changes_nothing() {
        let (mut editor, log) = editor_with(Some("plain"));
        assert!(!editor.handle_enter_key());
        assert_eq!(editor.text(), "plain");
        assert!(log.borrow().saved.is_empty());
    }

    #[test]
    fn test_apply_dispatches_toolbar_ids() {
        let (mut editor, _) = editor_with(Some("item"));
        editor.set_selection(Selection::caret(0));

        assert!(editor.apply_id("ulDash"));
        assert_eq!(editor.text(), "- item");
        assert!(editor.apply_id("ulDash"));
        assert_eq!(editor.text(), "item");
        assert!(editor.apply_id("quote"));
        assert_eq!(editor.text(), "> item");
        assert!(editor.apply_id("indent"));
        assert_eq!(editor.text(), "  > item");
        assert!(editor.apply_id("outdent"));
        assert_eq!(editor.text(), "> item");
    }

    #[test]
    fn test_apply_unknown_id_is_ignored() {
        let (mut editor, log) = editor_with(Some("x"));
        assert!(!editor.apply_id("heading"));
        assert_eq!(editor.text(), "x");
        assert!(log.borrow().saved.is_empty());
    }

    #[test]
    fn test_code_block_action() {
        let (mut editor, _) = editor_with(Some(""));
        editor.apply(EditorAction::CodeBlock);
        assert_eq!(editor.text(), "```\ncode\n```");
        assert_eq!(editor.selection(), Selection::new(4, 8));
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let (mut editor, log) = editor_with(None);
        assert!(editor.apply(EditorAction::Clear));
        assert_eq!(editor.text(), "");
        assert_eq!(editor.selection(), Selection::caret(0));
        assert_eq!(log.borrow().saved, vec![String::new()]);
    }

    #[test]
    fn test_clear_by_toolbar_id() {
        let (mut editor, log) = editor_with(Some("- a\n- b"));
        assert!(editor.apply_id("clear"));
        assert_eq!(editor.text(), "");
        assert_eq!(editor.selection(), Selection::caret(0));
        assert_eq!(log.borrow().saved, vec![String::new()]);
    }

    #[test]
    fn test_default_export_filename_matches_settings() {
        let (mut editor, log) = editor_with(Some("x"));
        editor.export();
        assert_eq!(log.borrow().exported[0].1, Settings::DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn test_save_exports_without_editing() {
        let (mut editor, log) = editor_with(Some("# Memo"));
        assert!(editor.apply(EditorAction::Save));
        let log = log.borrow();
        assert_eq!(
            log.exported,
            vec![("# Memo".to_string(), "memo.md".to_string())]
        );
        assert!(log.saved.is_empty());
    }

    #[test]
    fn test_export_uses_configured_filename() {
        let (editor, log) = editor_with(Some("x"));
        let mut editor = editor.with_export_filename("notes.md");
        assert_eq!(editor.export(), Some(PathBuf::from("/exports/notes.md")));
        assert_eq!(log.borrow().exported[0].1, "notes.md");
    }

    #[test]
    fn test_cancelled_export_returns_none() {
        let log = SharedLog::default();
        let mut editor = Editor::load(
            Box::new(FakeRenderer(log.clone())),
            Box::new(MemoryStorage::new()),
            Box::new(FakeExporter {
                log: log.clone(),
                cancel: true,
            }),
        );
        assert_eq!(editor.export(), None);
        assert!(log.borrow().exported.is_empty());
    }

    #[test]
    fn test_set_renderer_rerenders() {
        let (mut editor, _) = editor_with(Some("text"));
        let other = SharedLog::default();
        editor.set_renderer(Box::new(FakeRenderer(other.clone())));
        assert_eq!(other.borrow().rendered, vec!["text".to_string()]);
    }

    #[test]
    fn test_selection_stays_valid_across_operations() {
        let (mut editor, _) = editor_with(Some("# 見出し\n- 項目\n1. 一\n```\nコード\n```"));
        let len = editor.text().len();
        for start in (0..=len).step_by(3) {
            editor.set_selection(Selection::new(start, len));
            for action in EditorAction::TOOLBAR {
                if matches!(action, EditorAction::Save | EditorAction::Clear) {
                    continue;
                }
                editor.apply(action);
                let sel = editor.selection();
                assert!(sel.is_valid_for(editor.text()), "{:?} after {:?}", sel, action);
            }
            editor.handle_enter_key();
            assert!(editor.selection().is_valid_for(editor.text()));
        }
    }
}
