//! Syntax highlighting for fenced code in the preview
//!
//! Loads syntect's bundled syntaxes and themes once and converts highlight
//! ranges into egui colors.
//!
//! ```ignore
//! use crate::preview::syntax::get_highlighter;
//!
//! let lines = get_highlighter().highlight("fn main() {}", "rust", "", true);
//! ```

use eframe::egui::{Color32, FontId, RichText};
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default dark theme name from syntect's built-in themes
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Default light theme name from syntect's built-in themes
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Highlighted Segment
// ─────────────────────────────────────────────────────────────────────────────

/// A segment of highlighted text with its associated color.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedSegment {
    pub text: String,
    pub foreground: Color32,
    pub bold: bool,
    pub italic: bool,
}

impl HighlightedSegment {
    pub fn new(text: impl Into<String>, foreground: Color32) -> Self {
        Self {
            text: text.into(),
            foreground,
            bold: false,
            italic: false,
        }
    }

    /// Convert this segment to monospace egui RichText.
    pub fn to_rich_text(&self, font_size: f32) -> RichText {
        let mut rich_text = RichText::new(self.text.trim_end_matches('\n'))
            .color(self.foreground)
            .font(FontId::monospace(font_size));

        if self.bold {
            rich_text = rich_text.strong();
        }
        if self.italic {
            rich_text = rich_text.italics();
        }

        rich_text
    }
}

/// A line of highlighted segments.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedLine {
    pub segments: Vec<HighlightedSegment>,
}

impl HighlightedLine {
    /// An unhighlighted line with a single segment.
    pub fn plain(text: &str, color: Color32) -> Self {
        Self {
            segments: vec![HighlightedSegment::new(text, color)],
        }
    }

    /// Text of the line without its trailing newline.
    pub fn text(&self) -> String {
        let text: String = self.segments.iter().map(|s| s.text.as_str()).collect();
        text.trim_end_matches('\n').to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Holds the loaded syntect sets, which are expensive to build.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Resolve a theme by name, falling back to the light/dark default.
    ///
    /// An empty or unknown name picks the default for the mode.
    pub fn theme(&self, name: &str, dark_mode: bool) -> Option<&Theme> {
        let fallback = if dark_mode {
            DEFAULT_DARK_THEME
        } else {
            DEFAULT_LIGHT_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(fallback))
    }

    /// Highlight `code` as `language` using the named theme.
    ///
    /// Unknown languages come back as plain lines in the theme's foreground.
    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        theme_name: &str,
        dark_mode: bool,
    ) -> Vec<HighlightedLine> {
        let Some(theme) = self.theme(theme_name, dark_mode) else {
            warn!("No syntect theme available, code left unhighlighted");
            return plain_lines(code, Color32::GRAY);
        };
        let default_color = theme
            .settings
            .foreground
            .map(syntect_to_egui_color)
            .unwrap_or(Color32::GRAY);

        let Some(syntax) = self.find_syntax_for_language(language) else {
            debug!("No syntax found for language: {:?}", language);
            return plain_lines(code, default_color);
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => HighlightedLine {
                    segments: ranges
                        .into_iter()
                        .map(|(style, text)| style_to_segment(style, text))
                        .collect(),
                },
                Err(e) => {
                    warn!("Failed to highlight line: {}", e);
                    HighlightedLine::plain(line, default_color)
                }
            })
            .collect()
    }

    /// Find syntax definition for a fence language identifier.
    ///
    /// Tries common aliases as extensions, then the syntax name.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();
        let extension = match lang_lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "shell" | "bash" | "zsh" => "sh",
            "yml" => "yaml",
            "markdown" => "md",
            "htm" => "html",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lang_lower)
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

fn plain_lines(code: &str, color: Color32) -> Vec<HighlightedLine> {
    code.lines()
        .map(|line| HighlightedLine::plain(line, color))
        .collect()
}

/// Convert syntect Color to egui Color32.
pub fn syntect_to_egui_color(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn style_to_segment(style: Style, text: &str) -> HighlightedSegment {
    HighlightedSegment {
        text: text.to_string(),
        foreground: syntect_to_egui_color(style.foreground),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
