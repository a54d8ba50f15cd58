//! Buffer and selection primitives
//!
//! The editor state is a plain value: the memo text plus one selection range.
//! Every transform takes an `EditorState` and hands back a new one, so the
//! selection is always recomputed against the text it belongs to.
//!
//! All offsets are byte offsets into the UTF-8 text.

use crate::string_utils::{ceil_char_boundary, floor_char_boundary};

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A selection range `(start, end)` with `start <= end`.
///
/// `start == end` is a caret with nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A selection spanning `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Whether this is a caret (nothing selected).
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Clamp this selection so it is valid for `text`.
    ///
    /// Bounds are limited to the text length and snapped to char boundaries
    /// (start floors, end ceils); a reversed pair is swapped.
    pub fn clamped(self, text: &str) -> Self {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let start = floor_char_boundary(text, lo);
        let end = ceil_char_boundary(text, hi).max(start);
        Self { start, end }
    }

    /// Whether the selection is valid for `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor State
// ─────────────────────────────────────────────────────────────────────────────

/// The memo buffer together with its selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    pub text: String,
    pub selection: Selection,
}

impl EditorState {
    /// Create a state, clamping the selection to the text.
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        let text = text.into();
        let selection = selection.clamped(&text);
        Self { text, selection }
    }

    /// A state with the caret at `offset`.
    pub fn with_caret(text: impl Into<String>, offset: usize) -> Self {
        Self::new(text, Selection::caret(offset))
    }

    /// The currently selected text (empty for a caret).
    pub fn selected_text(&self) -> &str {
        &self.text[self.selection.start..self.selection.end]
    }

    /// The lines touched by the current selection.
    pub fn line_range(&self) -> LineRange {
        line_range_around(&self.text, self.selection)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Range
// ─────────────────────────────────────────────────────────────────────────────

/// Offsets bounding the whole lines touched by a selection.
///
/// `start` is just after the previous newline (or 0); `end` is the next
/// newline at or after the selection end (or the text length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// The text covered by this range.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Find the line boundaries around `selection`.
///
/// Guarantees `start <= selection.start <= selection.end <= end` and that
/// the range never splits a line.
pub fn line_range_around(text: &str, selection: Selection) -> LineRange {
    let selection = selection.clamped(text);
    let start = text[..selection.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = text[selection.end..]
        .find('\n')
        .map(|i| selection.end + i)
        .unwrap_or(text.len());
    LineRange { start, end }
}

/// Replace `text[start..end]` with `replacement`.
///
/// Pure: the caller decides where the selection goes afterwards.
pub fn replace_range(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let Selection { start, end } = Selection::new(start, end).clamped(text);
    let mut out = String::with_capacity(text.len() - (end - start) + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
