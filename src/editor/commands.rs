//! Command dispatch
//!
//! Maps toolbar action ids and key chords onto editor actions. This is a
//! static lookup with no editing logic of its own; `Editor::apply` performs
//! the actual transform.

use super::transform::{InlineStyle, ListMarker};

// ─────────────────────────────────────────────────────────────────────────────
// Editor Actions
// ─────────────────────────────────────────────────────────────────────────────

/// A user-invokable editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    /// Wrap the selection in inline markup
    Inline(InlineStyle),
    /// Toggle a bullet marker on the selected lines
    List(ListMarker),
    /// Toggle a `> ` quote prefix on the selected lines
    Quote,
    /// Insert a fenced code block around the selection
    CodeBlock,
    /// Indent the selected lines by two spaces
    Indent,
    /// Remove up to two spaces of indentation
    Outdent,
    /// Enter-key list continuation
    ContinueList,
    /// Export the buffer to a file
    Save,
    /// Replace the buffer with an empty document
    Clear,
}

impl EditorAction {
    /// Actions shown on the toolbar, in display order.
    pub const TOOLBAR: [EditorAction; 12] = [
        EditorAction::Inline(InlineStyle::Bold),
        EditorAction::Inline(InlineStyle::Italic),
        EditorAction::Inline(InlineStyle::Strikethrough),
        EditorAction::Inline(InlineStyle::InlineCode),
        EditorAction::CodeBlock,
        EditorAction::List(ListMarker::Dash),
        EditorAction::List(ListMarker::Star),
        EditorAction::Quote,
        EditorAction::Indent,
        EditorAction::Outdent,
        EditorAction::Save,
        EditorAction::Clear,
    ];

    /// Look up an action by its toolbar id.
    ///
    /// Unknown ids return `None` and are ignored by the caller.
    pub fn from_id(id: &str) -> Option<Self> {
        let action = match id {
            "bold" => Self::Inline(InlineStyle::Bold),
            "italic" => Self::Inline(InlineStyle::Italic),
            "strike" => Self::Inline(InlineStyle::Strikethrough),
            "inlineCode" => Self::Inline(InlineStyle::InlineCode),
            "codeBlock" => Self::CodeBlock,
            "ulDash" => Self::List(ListMarker::Dash),
            "ulStar" => Self::List(ListMarker::Star),
            "quote" => Self::Quote,
            "indent" => Self::Indent,
            "outdent" => Self::Outdent,
            "save" => Self::Save,
            "clear" => Self::Clear,
            _ => return None,
        };
        Some(action)
    }

    /// The toolbar id of this action.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Inline(InlineStyle::Bold) => "bold",
            Self::Inline(InlineStyle::Italic) => "italic",
            Self::Inline(InlineStyle::Strikethrough) => "strike",
            Self::Inline(InlineStyle::InlineCode) => "inlineCode",
            Self::CodeBlock => "codeBlock",
            Self::List(ListMarker::Dash) => "ulDash",
            Self::List(ListMarker::Star) => "ulStar",
            Self::Quote => "quote",
            Self::Indent => "indent",
            Self::Outdent => "outdent",
            Self::ContinueList => "continueList",
            Self::Save => "save",
            Self::Clear => "clear",
        }
    }

    /// Get the keyboard shortcut label for this action.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Inline(InlineStyle::Bold) => "Ctrl+B",
            Self::Inline(InlineStyle::Italic) => "Ctrl+I",
            Self::Inline(InlineStyle::Strikethrough) => "Ctrl+Shift+X",
            Self::Inline(InlineStyle::InlineCode) => "Ctrl+`",
            Self::CodeBlock => "Ctrl+Shift+C",
            Self::Indent => "Tab",
            Self::Outdent => "Shift+Tab",
            Self::ContinueList => "Enter",
            Self::Save => "Ctrl+S",
            Self::List(_) | Self::Quote | Self::Clear => "",
        }
    }

    /// Get the toolbar button label for this action.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Inline(InlineStyle::Bold) => "B",
            Self::Inline(InlineStyle::Italic) => "I",
            Self::Inline(InlineStyle::Strikethrough) => "S\u{0336}",
            Self::Inline(InlineStyle::InlineCode) => "</>",
            Self::CodeBlock => "{ }",
            Self::List(ListMarker::Dash) => "- list",
            Self::List(ListMarker::Star) => "* list",
            Self::Quote => "\u{275D}", // ❝
            Self::Indent => "\u{21E5}",  // ⇥
            Self::Outdent => "\u{21E4}", // ⇤
            Self::ContinueList => "\u{21B5}",
            Self::Save => "\u{1F4BE} Save",
            Self::Clear => "Clear",
        }
    }

    /// Get the tooltip text for this action.
    pub fn tooltip(&self) -> String {
        let name = match self {
            Self::Inline(InlineStyle::Bold) => "Bold",
            Self::Inline(InlineStyle::Italic) => "Italic",
            Self::Inline(InlineStyle::Strikethrough) => "Strikethrough",
            Self::Inline(InlineStyle::InlineCode) => "Inline Code",
            Self::CodeBlock => "Code Block",
            Self::List(ListMarker::Dash) => "Bullet List (-)",
            Self::List(ListMarker::Star) => "Bullet List (*)",
            Self::Quote => "Blockquote",
            Self::Indent => "Indent",
            Self::Outdent => "Outdent",
            Self::ContinueList => "Continue List",
            Self::Save => "Save as memo.md",
            Self::Clear => "Clear Memo",
        };
        match self.shortcut_label() {
            "" => name.to_string(),
            shortcut => format!("{} ({})", name, shortcut),
        }
    }

    /// Whether this action edits the buffer.
    pub fn is_edit(&self) -> bool {
        !matches!(self, Self::Save)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Key Chords
// ─────────────────────────────────────────────────────────────────────────────

/// Keys that take part in editor shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordKey {
    B,
    I,
    X,
    C,
    S,
    Backtick,
    Tab,
    Enter,
}

/// A pressed key together with its modifiers.
///
/// `command` is Ctrl on Windows/Linux and Cmd on macOS; either counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: ChordKey,
    pub command: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: ChordKey, command: bool, shift: bool) -> Self {
        Self {
            key,
            command,
            shift,
        }
    }

    /// A bare key press with no modifiers.
    #[cfg(test)]
    pub fn plain(key: ChordKey) -> Self {
        Self::new(key, false, false)
    }

    /// A key pressed with the command modifier.
    #[cfg(test)]
    pub fn command(key: ChordKey) -> Self {
        Self::new(key, true, false)
    }
}

/// Resolve a key chord to an action.
///
/// Chords are tested in a fixed order and the first match wins. Bold,
/// italic and save ignore Shift; Tab and Enter ignore the command modifier.
/// Enter with Shift is left as a plain newline.
pub fn action_for_chord(chord: KeyChord) -> Option<EditorAction> {
    let KeyChord {
        key,
        command,
        shift,
    } = chord;

    match key {
        ChordKey::B if command => Some(EditorAction::Inline(InlineStyle::Bold)),
        ChordKey::I if command => Some(EditorAction::Inline(InlineStyle::Italic)),
        ChordKey::X if command && shift => Some(EditorAction::Inline(InlineStyle::Strikethrough)),
        ChordKey::C if command && shift => Some(EditorAction::CodeBlock),
        ChordKey::Backtick if command => Some(EditorAction::Inline(InlineStyle::InlineCode)),
        ChordKey::S if command => Some(EditorAction::Save),
        ChordKey::Tab if shift => Some(EditorAction::Outdent),
        ChordKey::Tab => Some(EditorAction::Indent),
        // Shift+Enter stays a raw newline so a list item can wrap onto a
        // continuation line without starting a new item.
        ChordKey::Enter if !shift => Some(EditorAction::ContinueList),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trips_toolbar() {
        for action in EditorAction::TOOLBAR {
            assert_eq!(EditorAction::from_id(action.id()), Some(action));
        }
    }

    #[test]
    fn test_from_id_unknown() {
        assert_eq!(EditorAction::from_id("heading"), None);
        assert_eq!(EditorAction::from_id(""), None);
        assert_eq!(EditorAction::from_id("Bold"), None);
    }

    #[test]
    fn test_continue_list_is_not_a_toolbar_id() {
        assert_eq!(EditorAction::from_id("continueList"), None);
        assert!(!EditorAction::TOOLBAR.contains(&EditorAction::ContinueList));
    }

    #[test]
    fn test_command_chords() {
        assert_eq!(
            action_for_chord(KeyChord::command(ChordKey::B)),
            Some(EditorAction::Inline(InlineStyle::Bold))
        );
        assert_eq!(
            action_for_chord(KeyChord::command(ChordKey::I)),
            Some(EditorAction::Inline(InlineStyle::Italic))
        );
        assert_eq!(
            action_for_chord(KeyChord::command(ChordKey::Backtick)),
            Some(EditorAction::Inline(InlineStyle::InlineCode))
        );
        assert_eq!(
            action_for_chord(KeyChord::command(ChordKey::S)),
            Some(EditorAction::Save)
        );
    }

    #[test]
    fn test_shift_chords() {
        assert_eq!(
            action_for_chord(KeyChord::new(ChordKey::X, true, true)),
            Some(EditorAction::Inline(InlineStyle::Strikethrough))
        );
        assert_eq!(
            action_for_chord(KeyChord::new(ChordKey::C, true, true)),
            Some(EditorAction::CodeBlock)
        );
        // Without Shift these are left to the platform (cut/copy)
        assert_eq!(action_for_chord(KeyChord::command(ChordKey::X)), None);
        assert_eq!(action_for_chord(KeyChord::command(ChordKey::C)), None);
    }

    #[test]
    fn test_bold_ignores_shift() {
        assert_eq!(
            action_for_chord(KeyChord::new(ChordKey::B, true, true)),
            Some(EditorAction::Inline(InlineStyle::Bold))
        );
    }

    #[test]
    fn test_letters_without_command_are_ignored() {
        for key in [ChordKey::B, ChordKey::I, ChordKey::S, ChordKey::Backtick] {
            assert_eq!(action_for_chord(KeyChord::plain(key)), None);
        }
    }

    #[test]
    fn test_tab_and_enter() {
        assert_eq!(
            action_for_chord(KeyChord::plain(ChordKey::Tab)),
            Some(EditorAction::Indent)
        );
        assert_eq!(
            action_for_chord(KeyChord::new(ChordKey::Tab, false, true)),
            Some(EditorAction::Outdent)
        );
        assert_eq!(
            action_for_chord(KeyChord::plain(ChordKey::Enter)),
            Some(EditorAction::ContinueList)
        );
        assert_eq!(
            action_for_chord(KeyChord::new(ChordKey::Enter, false, true)),
            None
        );
    }

    #[test]
    fn test_tooltip_includes_shortcut() {
        assert_eq!(
            EditorAction::Inline(InlineStyle::Bold).tooltip(),
            "Bold (Ctrl+B)"
        );
        assert_eq!(EditorAction::Quote.tooltip(), "Blockquote");
    }

    #[test]
    fn test_only_save_is_not_an_edit() {
        for action in EditorAction::TOOLBAR {
            assert_eq!(action.is_edit(), action != EditorAction::Save);
        }
    }
}
