//! Selection-aware text transforms
//!
//! Inline wraps (bold, italic, strikethrough, inline code), per-line toggles
//! (list markers, blockquote), indent/outdent and fenced code block insertion.
//!
//! Each transform is a pure function from one `EditorState` to the next; the
//! returned selection is always valid for the returned text.
//!
//! ```ignore
//! let state = EditorState::new("Hello world", Selection::new(0, 5));
//! let next = wrap_inline(&state, InlineStyle::Bold);
//! assert_eq!(next.text, "**Hello** world");
//! assert_eq!(next.selected_text(), "Hello");
//! ```

use super::selection::{replace_range, EditorState, Selection};

/// Text inserted when an inline wrap is applied to an empty selection.
pub const INLINE_PLACEHOLDER: &str = "text";

/// Content of a new code block when nothing is selected.
pub const CODE_BLOCK_PLACEHOLDER: &str = "code";

/// Fence delimiter for code blocks.
pub const CODE_FENCE: &str = "```";

/// One level of indentation added by `indent_lines`.
pub const INDENT_UNIT: &str = "  ";

// ─────────────────────────────────────────────────────────────────────────────
// Inline Styles
// ─────────────────────────────────────────────────────────────────────────────

/// Inline markup that wraps the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    /// **bold**
    Bold,
    /// *italic*
    Italic,
    /// ~~strikethrough~~
    Strikethrough,
    /// `inline code`
    InlineCode,
}

impl InlineStyle {
    /// Opening and closing delimiters for this style.
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Strikethrough => ("~~", "~~"),
            Self::InlineCode => ("`", "`"),
        }
    }
}

/// List markers that can be toggled on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMarker {
    Dash,
    Star,
}

impl ListMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dash => "-",
            Self::Star => "*",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Wrapping
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the selection in the delimiters of `style`.
pub fn wrap_inline(state: &EditorState, style: InlineStyle) -> EditorState {
    let (prefix, suffix) = style.delimiters();
    wrap_selection(state, prefix, suffix, INLINE_PLACEHOLDER)
}

/// Replace the selection with `prefix + body + suffix`.
///
/// `body` is the selected text, or `placeholder` when nothing is selected.
/// The new selection covers exactly `body`, so a placeholder is ready to be
/// typed over.
pub fn wrap_selection(
    state: &EditorState,
    prefix: &str,
    suffix: &str,
    placeholder: &str,
) -> EditorState {
    let Selection { start, end } = state.selection;
    let selected = state.selected_text();
    let body = if selected.is_empty() {
        placeholder
    } else {
        selected
    };

    let wrapped = format!("{}{}{}", prefix, body, suffix);
    let text = replace_range(&state.text, start, end, &wrapped);
    let body_start = start + prefix.len();
    let body_end = body_start + body.len();

    EditorState::new(text, Selection::new(body_start, body_end))
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Line Transforms
// ─────────────────────────────────────────────────────────────────────────────

/// Apply `transform` to every line touched by the selection.
///
/// A caret collapses to the start of its line afterwards; a real selection
/// spans the whole rewritten chunk so the toggle can be repeated on it.
pub fn transform_lines<F>(state: &EditorState, transform: F) -> EditorState
where
    F: Fn(&str) -> String,
{
    let range = state.line_range();
    let chunk = range.slice(&state.text);
    let next_chunk = chunk
        .split('\n')
        .map(|line| transform(line))
        .collect::<Vec<_>>()
        .join("\n");

    let text = replace_range(&state.text, range.start, range.end, &next_chunk);
    let selection = if state.selection.is_caret() {
        Selection::caret(range.start)
    } else {
        Selection::new(range.start, range.start + next_chunk.len())
    };

    EditorState::new(text, selection)
}

/// Toggle `"<marker> "` at the start of a line.
///
/// Strips exactly the marker and one space when present, prepends them
/// otherwise; applying it twice gives back the original line.
pub fn toggle_line_prefix(line: &str, marker: &str) -> String {
    let prefix = format!("{} ", marker);
    match line.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.to_string(),
        None => format!("{}{}", prefix, line),
    }
}

/// Toggle a bullet list marker on every selected line.
pub fn toggle_list_marker(state: &EditorState, marker: ListMarker) -> EditorState {
    transform_lines(state, |line| toggle_line_prefix(line, marker.as_str()))
}

/// Toggle a blockquote marker on every selected line.
pub fn toggle_quote(state: &EditorState) -> EditorState {
    transform_lines(state, |line| toggle_line_prefix(line, ">"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Indent / Outdent
// ─────────────────────────────────────────────────────────────────────────────

/// How one line's leading whitespace changed.
#[derive(Debug, Clone, Copy)]
struct LineEdit {
    /// Offset of the line start in the old text
    old_start: usize,
    /// Offset of the line start in the new text
    new_start: usize,
    /// Bytes added at the start of the line
    added: usize,
    /// Bytes removed from the start of the line
    removed: usize,
}

impl LineEdit {
    fn map(&self, offset: usize) -> usize {
        let column = offset - self.old_start;
        self.new_start + self.added + column.saturating_sub(self.removed)
    }
}

/// Number of leading bytes outdent strips from `line`.
///
/// Up to two spaces; a lone leading tab counts as one unit.
fn outdent_width(line: &str) -> usize {
    if line.starts_with(INDENT_UNIT) {
        2
    } else if line.starts_with(' ') || line.starts_with('\t') {
        1
    } else {
        0
    }
}

/// Indent (or outdent) every line touched by the selection.
///
/// The selection stays on the same text: each bound moves with the
/// whitespace added or removed in front of it, never past its line start.
pub fn indent_lines(state: &EditorState, outdent: bool) -> EditorState {
    let range = state.line_range();
    let chunk = range.slice(&state.text);

    let mut edits = Vec::new();
    let mut lines = Vec::new();
    let mut old_start = range.start;
    let mut new_start = range.start;

    for line in chunk.split('\n') {
        let (added, removed, next) = if outdent {
            let width = outdent_width(line);
            (0, width, line[width..].to_string())
        } else {
            (INDENT_UNIT.len(), 0, format!("{}{}", INDENT_UNIT, line))
        };

        edits.push(LineEdit {
            old_start,
            new_start,
            added,
            removed,
        });
        old_start += line.len() + 1;
        new_start += next.len() + 1;
        lines.push(next);
    }

    let next_chunk = lines.join("\n");
    let text = replace_range(&state.text, range.start, range.end, &next_chunk);

    let map_offset = |offset: usize| {
        edits
            .iter()
            .rev()
            .find(|edit| edit.old_start <= offset)
            .map(|edit| edit.map(offset))
            .unwrap_or(offset)
    };
    let selection = Selection::new(
        map_offset(state.selection.start),
        map_offset(state.selection.end),
    );

    EditorState::new(text, selection)
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the selection (or a placeholder) in a fenced code block.
///
/// The fences go on their own lines; the new selection covers the content
/// between them.
pub fn insert_code_block(state: &EditorState) -> EditorState {
    let Selection { start, end } = state.selection;
    let selected = state.selected_text();
    let content = if selected.is_empty() {
        CODE_BLOCK_PLACEHOLDER
    } else {
        selected
    };

    let block = format!("{fence}\n{content}\n{fence}", fence = CODE_FENCE);
    let text = replace_range(&state.text, start, end, &block);
    let content_start = start + CODE_FENCE.len() + 1;
    let content_end = content_start + content.len();

    EditorState::new(text, Selection::new(content_start, content_end))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn state(text: &str, start: usize, end: usize) -> EditorState {
        EditorState::new(text, Selection::new(start, end))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline wrap tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_with_selection() {
        let next = wrap_inline(&state("Hello world", 0, 5), InlineStyle::Bold);
        assert_eq!(next.text, "**Hello** world");
        assert_eq!(next.selection, Selection::new(2, 7));
        assert_eq!(next.selected_text(), "Hello");
    }

    #[test]
    fn test_bold_without_selection_inserts_placeholder() {
        let next = wrap_inline(&state("Hi ", 3, 3), InlineStyle::Bold);
        assert_eq!(next.text, "Hi **text**");
        assert_eq!(next.selected_text(), "text");
    }

    #[test]
    fn test_each_inline_style() {
        let cases = [
            (InlineStyle::Italic, "*memo*"),
            (InlineStyle::Strikethrough, "~~memo~~"),
            (InlineStyle::InlineCode, "`memo`"),
        ];
        for (style, expected) in cases {
            let next = wrap_inline(&state("memo", 0, 4), style);
            assert_eq!(next.text, expected);
            assert_eq!(next.selected_text(), "memo");
        }
    }

    #[test]
    fn test_wrap_is_not_a_toggle() {
        // Wrapping already-wrapped text nests another layer
        let next = wrap_inline(&state("**a**", 0, 5), InlineStyle::Bold);
        assert_eq!(next.text, "****a****");
    }

    #[test]
    fn test_wrap_strips_back_to_body() {
        for (prefix, suffix) in [("**", "**"), ("<<", ">>>"), ("", "!")] {
            let next = wrap_selection(&state("x body y", 2, 6), prefix, suffix, "p");
            let wrapped = &next.text[2..2 + prefix.len() + 4 + suffix.len()];
            let body = &wrapped[prefix.len()..wrapped.len() - suffix.len()];
            assert_eq!(body, "body");
        }
    }

    #[test]
    fn test_wrap_multibyte_selection() {
        let text = "メモ帳です";
        let next = wrap_inline(&state(text, 0, 9), InlineStyle::Bold);
        assert_eq!(next.text, "**メモ帳**です");
        assert_eq!(next.selected_text(), "メモ帳");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line toggle tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toggle_line_prefix_adds_and_removes() {
        assert_eq!(toggle_line_prefix("item", "-"), "- item");
        assert_eq!(toggle_line_prefix("- item", "-"), "item");
        assert_eq!(toggle_line_prefix("", ">"), "> ");
    }

    #[test]
    fn test_toggle_line_prefix_requires_space() {
        // "-item" does not carry the marker, so one is added
        assert_eq!(toggle_line_prefix("-item", "-"), "- -item");
        assert_eq!(toggle_line_prefix("  - nested", "-"), "-   - nested");
    }

    #[test]
    fn test_toggle_is_idempotent_under_cancellation() {
        for line in ["plain", "", "  indented", "* star", "1. one", "> quote"] {
            for marker in ["-", "*", ">"] {
                if line.starts_with(&format!("{} ", marker)) {
                    continue;
                }
                let once = toggle_line_prefix(line, marker);
                assert_eq!(toggle_line_prefix(&once, marker), line);
            }
        }
    }

    #[test]
    fn test_toggle_list_caret_collapses_to_line_start() {
        let next = toggle_list_marker(&state("one\ntwo\nthree", 6, 6), ListMarker::Dash);
        assert_eq!(next.text, "one\n- two\nthree");
        assert_eq!(next.selection, Selection::caret(4));
    }

    #[test]
    fn test_toggle_list_selection_spans_chunk() {
        let next = toggle_list_marker(&state("one\ntwo\nthree", 1, 5), ListMarker::Star);
        assert_eq!(next.text, "* one\n* two\nthree");
        assert_eq!(next.selection, Selection::new(0, 11));

        let again = toggle_list_marker(&next, ListMarker::Star);
        assert_eq!(again.text, "one\ntwo\nthree");
        assert_eq!(again.selection, Selection::new(0, 7));
    }

    #[test]
    fn test_toggle_mixed_lines_toggle_independently() {
        let next = toggle_list_marker(&state("- a\nb", 0, 5), ListMarker::Dash);
        assert_eq!(next.text, "a\n- b");
    }

    #[test]
    fn test_toggle_quote() {
        let next = toggle_quote(&state("quote me", 0, 0));
        assert_eq!(next.text, "> quote me");
        let back = toggle_quote(&next);
        assert_eq!(back.text, "quote me");
    }

    #[test]
    fn test_toggle_on_empty_buffer() {
        let next = toggle_quote(&state("", 0, 0));
        assert_eq!(next.text, "> ");
        assert_eq!(next.selection, Selection::caret(0));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Indent tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_indent_single_line_moves_caret() {
        let next = indent_lines(&state("- item", 6, 6), false);
        assert_eq!(next.text, "  - item");
        assert_eq!(next.selection, Selection::caret(8));
    }

    #[test]
    fn test_indent_multiple_lines() {
        let next = indent_lines(&state("a\nb\nc", 0, 3), false);
        assert_eq!(next.text, "  a\n  b\nc");
        assert_eq!(next.selection, Selection::new(2, 7));
    }

    #[test]
    fn test_outdent_removes_up_to_two_spaces() {
        let next = indent_lines(&state("    a\n b\nc", 0, 10), true);
        assert_eq!(next.text, "  a\nb\nc");
    }

    #[test]
    fn test_outdent_never_goes_negative() {
        let next = indent_lines(&state("text", 2, 2), true);
        assert_eq!(next.text, "text");
        assert_eq!(next.selection, Selection::caret(2));
    }

    #[test]
    fn test_outdent_caret_inside_indentation() {
        // Caret between the two spaces stays at the line start
        let next = indent_lines(&state("x\n  y", 3, 3), true);
        assert_eq!(next.text, "x\ny");
        assert_eq!(next.selection, Selection::caret(2));
    }

    #[test]
    fn test_outdent_selection_end_follows_text() {
        let next = indent_lines(&state("  ab\n  cd", 3, 9), true);
        assert_eq!(next.text, "ab\ncd");
        assert_eq!(next.selection, Selection::new(1, 5));
    }

    #[test]
    fn test_outdent_leading_tab() {
        let next = indent_lines(&state("\titem", 5, 5), true);
        assert_eq!(next.text, "item");
        assert_eq!(next.selection, Selection::caret(4));
    }

    #[test]
    fn test_indent_then_outdent_restores_text() {
        let original = state("- a\n  - b\nc", 0, 9);
        let indented = indent_lines(&original, false);
        let restored = indent_lines(&indented, true);
        assert_eq!(restored.text, original.text);
        assert_eq!(restored.selection, original.selection);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Code block tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_code_block_placeholder() {
        let next = insert_code_block(&state("", 0, 0));
        assert_eq!(next.text, "```\ncode\n```");
        assert_eq!(next.selection, Selection::new(4, 8));
        assert_eq!(next.selected_text(), "code");
    }

    #[test]
    fn test_code_block_wraps_selection() {
        let next = insert_code_block(&state("see: let x = 1;", 5, 15));
        assert_eq!(next.text, "see: ```\nlet x = 1;\n```");
        assert_eq!(next.selected_text(), "let x = 1;");
    }
}
