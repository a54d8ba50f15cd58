//! egui drawing of a rendered document

use eframe::egui::{self, FontId, Rect, RichText, Ui, Vec2};

use super::document::{Block, CodeBlock, InlineLine, ListItem, RenderedDocument, Span};

/// Indentation applied to nested lists and quotes
const NEST_INDENT: f32 = 16.0;

/// Draw `document` into `ui`.
pub fn show_document(ui: &mut Ui, document: &RenderedDocument, font_size: f32) {
    if document.is_empty() {
        ui.weak("Nothing to preview");
        return;
    }

    for (index, block) in document.blocks.iter().enumerate() {
        ui.push_id(index, |ui| show_block(ui, block, font_size));
        ui.add_space(font_size * 0.5);
    }
}

fn show_block(ui: &mut Ui, block: &Block, font_size: f32) {
    match block {
        Block::Heading { level, lines } => {
            let scale = match level {
                1 => 2.0,
                2 => 1.6,
                3 => 1.3,
                _ => 1.1,
            };
            show_lines(ui, lines, font_size * scale, true);
            if *level <= 2 {
                ui.separator();
            }
        }
        Block::Paragraph(lines) => show_lines(ui, lines, font_size, false),
        Block::List { start, items } => show_list(ui, *start, items, font_size),
        Block::Quote(blocks) => show_quote(ui, blocks, font_size),
        Block::Code(code) => show_code_block(ui, code, font_size),
        Block::Table { header, rows } => show_table(ui, header, rows, font_size),
        Block::Rule => {
            ui.separator();
        }
        Block::Html(html) => {
            ui.label(RichText::new(html).font(FontId::monospace(font_size * 0.9)).weak());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Content
// ─────────────────────────────────────────────────────────────────────────────

fn show_lines(ui: &mut Ui, lines: &[InlineLine], size: f32, strong: bool) {
    for line in lines {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            if line.is_empty() {
                ui.label(RichText::new(" ").size(size));
            }
            for span in line {
                show_span(ui, span, size, strong);
            }
        });
    }
}

fn show_span(ui: &mut Ui, span: &Span, size: f32, strong: bool) {
    let mut text = RichText::new(&span.text).size(size);
    if span.style.code {
        text = text
            .font(FontId::monospace(size * 0.9))
            .background_color(ui.visuals().code_bg_color);
    }
    if strong || span.style.bold {
        text = text.strong();
    }
    if span.style.italic {
        text = text.italics();
    }
    if span.style.strikethrough {
        text = text.strikethrough();
    }

    match &span.link {
        Some(url) => {
            ui.hyperlink_to(text, url);
        }
        None => {
            ui.label(text);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Content
// ─────────────────────────────────────────────────────────────────────────────

fn show_list(ui: &mut Ui, start: Option<usize>, items: &[ListItem], font_size: f32) {
    for (index, item) in items.iter().enumerate() {
        ui.push_id(index, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(NEST_INDENT * 0.5);
                match (item.task, start) {
                    (Some(checked), _) => {
                        let mut checked = checked;
                        ui.add_enabled(false, egui::Checkbox::without_text(&mut checked));
                    }
                    (None, Some(first)) => {
                        ui.label(RichText::new(format!("{}.", first + index)).size(font_size));
                    }
                    (None, None) => {
                        ui.label(RichText::new("\u{2022}").size(font_size));
                    }
                }
                ui.vertical(|ui| {
                    for (child_index, block) in item.blocks.iter().enumerate() {
                        ui.push_id(child_index, |ui| show_block(ui, block, font_size));
                    }
                });
            });
        });
    }
}

fn show_quote(ui: &mut Ui, blocks: &[Block], font_size: f32) {
    let inner = ui.horizontal(|ui| {
        ui.add_space(NEST_INDENT * 0.75);
        ui.vertical(|ui| {
            for (index, block) in blocks.iter().enumerate() {
                ui.push_id(index, |ui| show_block(ui, block, font_size));
            }
        });
    });

    let rect = inner.response.rect;
    let bar = Rect::from_min_size(rect.min, Vec2::new(4.0, rect.height()));
    ui.painter()
        .rect_filled(bar, 0.0, ui.visuals().weak_text_color());
}

fn show_code_block(ui: &mut Ui, code: &CodeBlock, font_size: f32) {
    let size = font_size * 0.9;
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(8.0)
        .rounding(4.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.spacing_mut().item_spacing.y = 0.0;

            match &code.highlighted {
                Some(lines) => {
                    for line in lines {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 0.0;
                            if line.text().is_empty() {
                                ui.label(RichText::new(" ").font(FontId::monospace(size)));
                            }
                            for segment in &line.segments {
                                ui.label(segment.to_rich_text(size));
                            }
                        });
                    }
                }
                None => {
                    for line in code.code.lines() {
                        ui.label(
                            RichText::new(if line.is_empty() { " " } else { line })
                                .font(FontId::monospace(size))
                                .color(ui.visuals().text_color()),
                        );
                    }
                }
            }
        });
}

fn show_table(
    ui: &mut Ui,
    header: &[Vec<InlineLine>],
    rows: &[Vec<Vec<InlineLine>>],
    font_size: f32,
) {
    egui::Grid::new(ui.id().with("table"))
        .striped(true)
        .spacing(Vec2::new(12.0, 4.0))
        .show(ui, |ui| {
            for cell in header {
                ui.vertical(|ui| show_lines(ui, cell, font_size, true));
            }
            ui.end_row();

            for row in rows {
                for cell in row {
                    ui.vertical(|ui| show_lines(ui, cell, font_size, false));
                }
                ui.end_row();
            }
        });
}
