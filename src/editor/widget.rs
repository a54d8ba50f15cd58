//! Memo editor widget
//!
//! Wraps egui's multiline `TextEdit` around an [`Editor`]. Shortcut keys are
//! intercepted before the TextEdit sees them so that formatting, Tab and
//! list continuation go through the editor engine instead of inserting raw
//! characters. Selections cross this boundary as char indices on the egui
//! side and byte offsets on the engine side.
//!
//! # Example
//!
//! ```ignore
//! let output = EditorWidget::new(&mut editor)
//!     .font_size(settings.font_size)
//!     .word_wrap(settings.word_wrap)
//!     .show(ui);
//! if output.requested == Some(EditorAction::Save) {
//!     editor.export();
//! }
//! ```

use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::text_edit::TextEditState;
use eframe::egui::{self, Event, FontId, Key, Modifiers, ScrollArea, TextEdit, Ui};
use log::debug;

use super::commands::{action_for_chord, ChordKey, EditorAction, KeyChord};
use super::engine::Editor;
use super::selection::Selection;
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the buffer was modified this frame.
    pub changed: bool,
    /// A non-editing action triggered by a shortcut, left for the caller.
    pub requested: Option<EditorAction>,
}

/// A text editor widget bound to the memo engine.
pub struct EditorWidget<'a> {
    editor: &'a mut Editor,
    font_size: f32,
    word_wrap: bool,
    id: Option<egui::Id>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(editor: &'a mut Editor) -> Self {
        Self {
            editor,
            font_size: 14.0,
            word_wrap: true,
            id: None,
        }
    }

    /// Set the font size for the editor.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set whether word wrap is enabled.
    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    /// Set a custom ID for the editor.
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("memo_editor"));
        let ctx = ui.ctx().clone();
        let editor = self.editor;
        let mut changed = false;
        let mut requested = None;

        // Shortcuts only apply while the text area has keyboard focus
        if ctx.memory(|m| m.has_focus(id)) {
            if let Some(selection) = load_selection(&ctx, id, editor.text()) {
                editor.set_selection(selection);
            }

            for (key, modifiers, chord) in pressed_chords(&ctx) {
                let Some(action) = action_for_chord(chord) else {
                    continue;
                };

                let handled = if action.is_edit() {
                    let before = editor.text().to_string();
                    let handled = editor.apply(action);
                    changed |= handled && before != editor.text();
                    handled
                } else {
                    requested = Some(action);
                    true
                };

                if handled {
                    debug!("Keyboard shortcut: {:?} -> {}", chord, action.id());
                    consume_chord(&ctx, key, modifiers);
                    store_selection(&ctx, id, editor.text(), editor.selection());
                }
            }
        }

        let mut buffer = editor.text().to_string();
        let font_size = self.font_size;
        let word_wrap = self.word_wrap;

        let text_output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut text_edit = TextEdit::multiline(&mut buffer)
                    .id(id)
                    .frame(false)
                    .lock_focus(true)
                    .font(FontId::monospace(font_size))
                    .desired_width(if word_wrap { ui.available_width() } else { f32::INFINITY })
                    .desired_rows(24);
                if !word_wrap {
                    text_edit = text_edit.clip_text(false);
                }
                text_edit.show(ui)
            })
            .inner;

        let selection = text_output
            .cursor_range
            .map(|range| {
                selection_from_char_range(
                    &buffer,
                    range.primary.ccursor.index,
                    range.secondary.ccursor.index,
                )
            })
            .unwrap_or_else(|| editor.selection());

        if buffer != editor.text() {
            debug!("Editor content changed in widget");
            changed = true;
        }
        editor.sync_from_widget(&buffer, selection);

        EditorOutput { changed, requested }
    }
}

/// Give keyboard focus back to the editor with the engine's selection.
///
/// Used after a toolbar click has moved focus away from the text area.
pub fn focus_editor(ctx: &egui::Context, id: egui::Id, editor: &Editor) {
    store_selection(ctx, id, editor.text(), editor.selection());
    ctx.memory_mut(|m| m.request_focus(id));
}

// ─────────────────────────────────────────────────────────────────────────────
// Key Routing
// ─────────────────────────────────────────────────────────────────────────────

/// Map an egui key press onto an editor chord.
///
/// Ctrl and the platform command key both count as the command modifier.
fn chord_for_key(key: Key, modifiers: Modifiers) -> Option<KeyChord> {
    let chord_key = match key {
        Key::B => ChordKey::B,
        Key::I => ChordKey::I,
        Key::X => ChordKey::X,
        Key::C => ChordKey::C,
        Key::S => ChordKey::S,
        Key::Backtick => ChordKey::Backtick,
        Key::Tab => ChordKey::Tab,
        Key::Enter => ChordKey::Enter,
        _ => return None,
    };
    let command = modifiers.command || modifiers.ctrl;
    Some(KeyChord::new(chord_key, command, modifiers.shift))
}

/// Key presses of this frame that map onto editor chords.
fn pressed_chords(ctx: &egui::Context) -> Vec<(Key, Modifiers, KeyChord)> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => chord_for_key(*key, *modifiers).map(|chord| (*key, *modifiers, chord)),
                _ => None,
            })
            .collect()
    })
}

/// Remove a handled chord from the input queue before the TextEdit runs.
///
/// Ctrl+Shift+X and Ctrl+Shift+C also arrive as cut/copy events, which
/// would otherwise delete or copy the selection.
fn consume_chord(ctx: &egui::Context, key: Key, modifiers: Modifiers) {
    ctx.input_mut(|i| {
        i.events.retain(|event| match event {
            Event::Key {
                key: k,
                modifiers: m,
                ..
            } => !(*k == key && *m == modifiers),
            Event::Cut => !(key == Key::X && modifiers.shift),
            Event::Copy => !(key == Key::C && modifiers.shift),
            _ => true,
        });
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an egui char-index range to a byte-offset selection.
fn selection_from_char_range(text: &str, primary: usize, secondary: usize) -> Selection {
    let a = char_index_to_byte_index(text, primary);
    let b = char_index_to_byte_index(text, secondary);
    Selection::new(a.min(b), a.max(b))
}

/// Convert a byte-offset selection to egui char indices.
fn char_range_from_selection(text: &str, selection: Selection) -> (usize, usize) {
    (
        byte_index_to_char_index(text, selection.start),
        byte_index_to_char_index(text, selection.end),
    )
}

fn load_selection(ctx: &egui::Context, id: egui::Id, text: &str) -> Option<Selection> {
    let state = TextEditState::load(ctx, id)?;
    let range = state.cursor.char_range()?;
    Some(selection_from_char_range(
        text,
        range.primary.index,
        range.secondary.index,
    ))
}

fn store_selection(ctx: &egui::Context, id: egui::Id, text: &str, selection: Selection) {
    let (start, end) = char_range_from_selection(text, selection);
    let mut state = TextEditState::load(ctx, id).unwrap_or_default();
    state
        .cursor
        .set_char_range(Some(CCursorRange::two(CCursor::new(start), CCursor::new(end))));
    state.store(ctx, id);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
