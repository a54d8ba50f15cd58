//! User settings and preferences for Markdown Memo
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Cycle Light -> Dark -> System -> Light.
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 720.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// All fields have defaults via `#[serde(default)]`, so older or partial
/// config files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Font size for the editor and preview (in points)
    pub font_size: f32,

    /// Whether the editor wraps long lines
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size
    pub window_size: WindowSize,

    /// Split ratio for the editor/preview panes (0.0 to 1.0)
    pub split_ratio: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Syntax Highlighting
    // ─────────────────────────────────────────────────────────────────────────
    /// Syntect theme used for fenced code in the preview.
    /// Empty picks a default matching the light/dark theme.
    pub syntax_theme: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Suggested filename for exports
    pub export_filename: String,

    /// Last directory used for export
    pub last_export_directory: Option<PathBuf>,

    /// Whether to open exported files after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14.0,
            word_wrap: true,
            window_size: WindowSize::default(),
            split_ratio: 0.5,
            syntax_theme: String::new(),
            export_filename: Self::DEFAULT_EXPORT_FILENAME.to_string(),
            last_export_directory: None,
            open_after_export: false,
        }
    }
}

impl Settings {
    /// Suggested export filename when none is configured
    pub const DEFAULT_EXPORT_FILENAME: &'static str = "memo.md";
    /// Minimum allowed font size
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Narrowest allowed pane share
    pub const MIN_SPLIT_RATIO: f32 = 0.1;
    /// Widest allowed pane share
    pub const MAX_SPLIT_RATIO: f32 = 0.9;

    /// Clamp out-of-range values so the UI always gets usable numbers.
    pub fn sanitize(&mut self) {
        if !self.font_size.is_finite() {
            self.font_size = Self::default().font_size;
        }
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        if !self.split_ratio.is_finite() {
            self.split_ratio = Self::default().split_ratio;
        }
        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        if self.export_filename.trim().is_empty() {
            self.export_filename = Self::DEFAULT_EXPORT_FILENAME.to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Whether the dark visuals should be used, given the platform preference.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self.theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_prefers_dark,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.word_wrap);
        assert_eq!(settings.split_ratio, 0.5);
        assert_eq!(settings.export_filename, "memo.md");
        assert!(settings.last_export_directory.is_none());
        assert!(!settings.open_after_export);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::System);
        assert_eq!(Theme::System.next(), Theme::Light);
    }

    #[test]
    fn test_is_dark() {
        let mut settings = Settings::default();
        assert!(!settings.is_dark(true));
        settings.theme = Theme::Dark;
        assert!(settings.is_dark(false));
        settings.theme = Theme::System;
        assert!(settings.is_dark(true));
        assert!(!settings.is_dark(false));
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let mut settings = Settings::default();
        settings.theme = Theme::Dark;
        settings.last_export_directory = Some(PathBuf::from("/home/me/notes"));

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let parsed: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(parsed.theme, Theme::Dark);
        assert_eq!(parsed.font_size, 14.0);
        assert_eq!(parsed.export_filename, "memo.md");
    }

    #[test]
    fn test_settings_ignores_unknown_fields() {
        let parsed: Settings =
            serde_json::from_str(r#"{"font_size":16.0,"outline_enabled":true}"#).unwrap();
        assert_eq!(parsed.font_size, 16.0);
    }

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 2.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = 500.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_split_ratio() {
        let mut settings = Settings::default();
        settings.split_ratio = 1.5;
        settings.sanitize();
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);

        settings.split_ratio = f32::NAN;
        settings.sanitize();
        assert_eq!(settings.split_ratio, 0.5);
    }

    #[test]
    fn test_sanitize_window_and_filename() {
        let mut settings = Settings::default();
        settings.window_size.width = 10.0;
        settings.export_filename = "  ".to_string();
        settings.sanitize();
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.export_filename, "memo.md");
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"font_size":1000}"#).unwrap();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert!(Settings::from_json_sanitized("not json").is_err());
    }
}
