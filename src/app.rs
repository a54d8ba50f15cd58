//! Main application module for Markdown Memo
//!
//! This module implements the eframe App trait: a toolbar across the top,
//! the markdown source on the left and the live preview on the right.

use crate::config::{load_config, save_config_silent, Settings, Theme, WindowSize};
use crate::editor::{focus_editor, Editor, EditorAction, EditorWidget};
use crate::export::DialogExporter;
use crate::preview::{show_document, MarkdownRenderer, RenderOptions};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use eframe::egui;
use log::{debug, info, warn};

/// Smallest width either pane may be dragged to.
const MIN_PANE_WIDTH: f32 = 160.0;

/// The main application struct.
pub struct MemoApp {
    /// The editor engine owning the memo buffer
    editor: Editor,
    /// User preferences, saved on exit
    settings: Settings,
    /// Whether settings changed since the last save
    settings_dirty: bool,
    /// Dark preference reported by the platform at startup
    system_prefers_dark: bool,
    /// Last observed inner window size
    last_window_size: Option<egui::Vec2>,
    /// Message shown in the status bar
    status: Option<String>,
}

impl MemoApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing Markdown Memo");

        let settings = load_config();
        let system_prefers_dark = cc.egui_ctx.style().visuals.dark_mode;
        let dark_mode = settings.is_dark(system_prefers_dark);
        apply_visuals(&cc.egui_ctx, dark_mode);

        let storage: Box<dyn Storage> = match FileStorage::in_data_dir() {
            Ok(storage) => {
                info!("Memo stored in {}", storage.dir().display());
                Box::new(storage)
            }
            Err(e) => {
                warn!("Falling back to in-memory storage: {}", e);
                Box::new(MemoryStorage::new())
            }
        };

        let exporter = DialogExporter::new(
            settings.last_export_directory.clone(),
            settings.open_after_export,
        );

        let editor = Editor::load(
            Box::new(renderer_for(&settings, dark_mode)),
            storage,
            Box::new(exporter),
        )
        .with_export_filename(settings.export_filename.clone());

        Self {
            editor,
            settings,
            settings_dirty: false,
            system_prefers_dark,
            last_window_size: None,
            status: None,
        }
    }

    fn is_dark(&self) -> bool {
        self.settings.is_dark(self.system_prefers_dark)
    }

    /// Run the action registered under a toolbar id.
    ///
    /// Save is handled here so the export directory can be remembered;
    /// everything else goes through the editor's dispatch.
    fn run_action_id(&mut self, ctx: &egui::Context, id: &str) {
        if id == EditorAction::Save.id() {
            self.export();
            return;
        }
        if self.editor.apply_id(id) {
            if id == EditorAction::Clear.id() {
                self.status = Some("Memo cleared".to_string());
            }
            focus_editor(ctx, editor_id(), &self.editor);
        }
    }

    fn export(&mut self) {
        match self.editor.export() {
            Some(path) => {
                info!("Memo exported to {}", path.display());
                if let Some(parent) = path.parent() {
                    self.settings.last_export_directory = Some(parent.to_path_buf());
                    self.settings_dirty = true;
                }
                self.status = Some(format!("Saved {}", path.display()));
            }
            None => debug!("Export produced no file"),
        }
    }

    fn cycle_theme(&mut self, ctx: &egui::Context) {
        self.settings.theme = self.settings.theme.next();
        self.settings_dirty = true;
        let dark_mode = self.is_dark();
        info!("Theme changed to {}", self.settings.theme.label());
        apply_visuals(ctx, dark_mode);
        self.editor
            .set_renderer(Box::new(renderer_for(&self.settings, dark_mode)));
    }

    /// Track the window size for the next launch.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(size) = ctx.input(|i| i.viewport().inner_rect.map(|r| r.size())) else {
            return;
        };
        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if changed {
            self.last_window_size = Some(size);
            self.settings.window_size = WindowSize {
                width: size.x,
                height: size.y,
            };
            self.settings_dirty = true;
        }
    }

    fn save_settings_if_dirty(&mut self) {
        if self.settings_dirty {
            self.settings.sanitize();
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────

    /// Draw the toolbar; returns the id of the clicked action.
    fn render_toolbar(&mut self, ctx: &egui::Context) -> Option<&'static str> {
        let mut clicked = None;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for action in EditorAction::TOOLBAR {
                    if matches!(action, EditorAction::Save | EditorAction::Clear) {
                        continue;
                    }
                    if ui.button(action.icon()).on_hover_text(action.tooltip()).clicked() {
                        clicked = Some(action.id());
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(EditorAction::Save.icon())
                        .on_hover_text(EditorAction::Save.tooltip())
                        .clicked()
                    {
                        clicked = Some(EditorAction::Save.id());
                    }
                    if ui
                        .button(EditorAction::Clear.icon())
                        .on_hover_text(EditorAction::Clear.tooltip())
                        .clicked()
                    {
                        clicked = Some(EditorAction::Clear.id());
                    }

                    let theme_label = match self.settings.theme {
                        Theme::Light => "\u{2600}",
                        Theme::Dark => "\u{1F319}",
                        Theme::System => "\u{1F5A5}",
                    };
                    if ui
                        .button(theme_label)
                        .on_hover_text(format!("Theme: {}", self.settings.theme.label()))
                        .clicked()
                    {
                        self.cycle_theme(ctx);
                    }
                });
            });
        });

        clicked
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let text = self.editor.text();
                ui.label(format!(
                    "{} chars, {} lines",
                    text.chars().count(),
                    text.split('\n').count()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.weak(status);
                }
            });
        });
    }

    fn render_panes(&mut self, ctx: &egui::Context) -> Option<EditorAction> {
        let total_width = ctx.screen_rect().width();
        let editor_width = (total_width * self.settings.split_ratio).max(MIN_PANE_WIDTH);
        let mut requested = None;

        let panel = egui::SidePanel::left("editor_pane")
            .resizable(true)
            .default_width(editor_width)
            .width_range(MIN_PANE_WIDTH..=(total_width - MIN_PANE_WIDTH).max(MIN_PANE_WIDTH))
            .show(ctx, |ui| {
                let output = EditorWidget::new(&mut self.editor)
                    .font_size(self.settings.font_size)
                    .word_wrap(self.settings.word_wrap)
                    .id(editor_id())
                    .show(ui);
                if output.changed {
                    self.status = None;
                }
                requested = output.requested;
            });

        if total_width > 0.0 {
            let ratio = panel.response.rect.width() / total_width;
            if (ratio - self.settings.split_ratio).abs() > 0.01 {
                self.settings.split_ratio =
                    ratio.clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO);
                self.settings_dirty = true;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("preview_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    show_document(ui, self.editor.preview(), self.settings.font_size);
                });
        });

        requested
    }
}

impl eframe::App for MemoApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_window_state(ctx);

        let toolbar_action = self.render_toolbar(ctx);
        self.render_status_bar(ctx);
        let shortcut_action = self.render_panes(ctx).map(|action| action.id());

        // Toolbar clicks apply after the editor pane so the selection is current
        for id in [shortcut_action, toolbar_action].into_iter().flatten() {
            debug!("Running action: {}", id);
            self.run_action_id(ctx, id);
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.save_settings_if_dirty();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.save_settings_if_dirty();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

fn apply_visuals(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

fn renderer_for(settings: &Settings, dark_mode: bool) -> MarkdownRenderer {
    MarkdownRenderer::new(RenderOptions {
        syntax_theme: settings.syntax_theme.clone(),
        dark_mode,
        ..Default::default()
    })
}

fn editor_id() -> egui::Id {
    egui::Id::new("memo_editor")
}
