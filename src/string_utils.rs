//! UTF-8 boundary helpers
//!
//! The editing engine works with byte offsets into the memo buffer, while
//! egui reports cursors as character indices. These helpers snap arbitrary
//! byte offsets onto character boundaries and translate between the two
//! index spaces.
//!
//! ```ignore
//! let text = "Hei på deg"; // 'å' is 2 bytes
//! assert_eq!(floor_char_boundary(text, 6), 5);
//! assert_eq!(ceil_char_boundary(text, 6), 7);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Largest char boundary `<= index`, clamped to the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary `>= index`, clamped to the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index (as used by egui cursors) to a byte offset.
///
/// Returns the string length if `char_index` is past the end.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte offset to a character index.
///
/// An offset inside a multi-byte character counts only the characters
/// that end before it.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
