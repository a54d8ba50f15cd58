//! Smart list continuation on Enter
//!
//! When Enter is pressed with a caret (no selection) the current line is
//! classified. A list item with content continues the list on a new line;
//! an empty list item is terminated by dropping its marker. Anything else,
//! and any line inside an open fenced code block, is left to the default
//! newline behavior.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::selection::{replace_range, EditorState, Selection};
use super::transform::CODE_FENCE;

// ─────────────────────────────────────────────────────────────────────────────
// Line Classification
// ─────────────────────────────────────────────────────────────────────────────

/// A line classified by its list syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLine<'a> {
    /// `- [ ] content`, `* [x] content`, ...
    Task {
        indent: &'a str,
        bullet: char,
        content: &'a str,
    },
    /// `- content`, `* content`, `+ content`
    Unordered {
        indent: &'a str,
        bullet: char,
        content: &'a str,
    },
    /// `1. content`
    Ordered {
        indent: &'a str,
        ordinal: u64,
        content: &'a str,
    },
    /// Not a list item
    Plain,
}

fn task_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\s*)([-*+])\s+\[( |x|X)\]\s+(.*)$").expect("task item pattern is valid")
    })
}

fn unordered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\s*)([-*+])\s+(.*)$").expect("unordered item pattern is valid")
    })
}

fn ordered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\s*)(\d+)\.\s+(.*)$").expect("ordered item pattern is valid")
    })
}

impl<'a> ListLine<'a> {
    /// Classify a single line (without its trailing newline).
    ///
    /// Task items are tried before plain bullets since every task item is
    /// also a valid bullet line.
    pub fn classify(line: &'a str) -> Self {
        if let Some(caps) = task_pattern().captures(line) {
            return ListLine::Task {
                indent: caps.get(1).map_or("", |m| m.as_str()),
                bullet: first_char(caps.get(2).map_or("-", |m| m.as_str())),
                content: caps.get(4).map_or("", |m| m.as_str()),
            };
        }

        if let Some(caps) = unordered_pattern().captures(line) {
            return ListLine::Unordered {
                indent: caps.get(1).map_or("", |m| m.as_str()),
                bullet: first_char(caps.get(2).map_or("-", |m| m.as_str())),
                content: caps.get(3).map_or("", |m| m.as_str()),
            };
        }

        if let Some(caps) = ordered_pattern().captures(line) {
            let ordinal = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
            if let Some(ordinal) = ordinal {
                return ListLine::Ordered {
                    indent: caps.get(1).map_or("", |m| m.as_str()),
                    ordinal,
                    content: caps.get(3).map_or("", |m| m.as_str()),
                };
            }
        }

        ListLine::Plain
    }

    /// Leading whitespace before the marker.
    pub fn indent(&self) -> &'a str {
        match self {
            ListLine::Task { indent, .. }
            | ListLine::Unordered { indent, .. }
            | ListLine::Ordered { indent, .. } => indent,
            ListLine::Plain => "",
        }
    }

    /// Text after the marker, if this is a list item.
    pub fn content(&self) -> Option<&'a str> {
        match self {
            ListLine::Task { content, .. }
            | ListLine::Unordered { content, .. }
            | ListLine::Ordered { content, .. } => Some(content),
            ListLine::Plain => None,
        }
    }

    /// Marker for the item that follows this one, including its trailing space.
    ///
    /// Task items always continue unchecked.
    pub fn next_marker(&self) -> Option<String> {
        match self {
            ListLine::Task { bullet, .. } => Some(format!("{} [ ] ", bullet)),
            ListLine::Unordered { bullet, .. } => Some(format!("{} ", bullet)),
            ListLine::Ordered { ordinal, .. } => Some(format!("{}. ", ordinal.saturating_add(1))),
            ListLine::Plain => None,
        }
    }
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or('-')
}

// ─────────────────────────────────────────────────────────────────────────────
// Fence Parity
// ─────────────────────────────────────────────────────────────────────────────

/// Whether `offset` sits inside an open fenced code block.
///
/// Counts lines starting with a fence from the start of the text up to
/// `offset` (the caret's own line counts up to the caret); an odd count
/// means a fence is still open.
pub fn is_inside_code_fence(text: &str, offset: usize) -> bool {
    let offset = Selection::caret(offset).clamped(text).start;
    let fences = text[..offset]
        .split('\n')
        .filter(|line| line.starts_with(CODE_FENCE))
        .count();
    fences % 2 == 1
}

// ─────────────────────────────────────────────────────────────────────────────
// Continuation
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of pressing Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// A new list item was started after the caret.
    Continued(EditorState),
    /// An empty list item was replaced by its indentation.
    Terminated(EditorState),
    /// Nothing special; the default newline should happen.
    Default,
}

impl Continuation {
    /// Whether the default newline must be suppressed.
    pub fn handled(&self) -> bool {
        !matches!(self, Continuation::Default)
    }

    /// The edited state, if the key was handled.
    pub fn into_state(self) -> Option<EditorState> {
        match self {
            Continuation::Continued(state) | Continuation::Terminated(state) => Some(state),
            Continuation::Default => None,
        }
    }
}

/// Decide what Enter does at the current caret.
pub fn continue_list(state: &EditorState) -> Continuation {
    if !state.selection.is_caret() {
        return Continuation::Default;
    }

    let caret = state.selection.start;
    if is_inside_code_fence(&state.text, caret) {
        debug!("Enter inside code fence at {}, default newline", caret);
        return Continuation::Default;
    }

    let range = state.line_range();
    let line = ListLine::classify(range.slice(&state.text));
    let (Some(content), Some(marker)) = (line.content(), line.next_marker()) else {
        return Continuation::Default;
    };

    let indent = line.indent();
    if content.trim().is_empty() {
        let text = replace_range(&state.text, range.start, range.end, indent);
        let caret = range.start + indent.len();
        debug!("Terminated empty list item at line offset {}", range.start);
        return Continuation::Terminated(EditorState::with_caret(text, caret));
    }

    let insertion = format!("\n{}{}", indent, marker);
    let text = replace_range(&state.text, caret, caret, &insertion);
    debug!("Continued list with {:?}", marker);
    Continuation::Continued(EditorState::with_caret(text, caret + insertion.len()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
