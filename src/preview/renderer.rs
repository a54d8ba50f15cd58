//! Markdown renderer using comrak
//!
//! Parses the buffer as GitHub-flavored markdown and flattens the AST into a
//! `RenderedDocument`. Syntax highlighting runs as a separate post-processing
//! pass over the code blocks.

use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};
use log::debug;

use super::document::{Block, CodeBlock, InlineLine, ListItem, RenderedDocument, Span, SpanStyle};
use super::syntax::get_highlighter;
use super::Renderer;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Render a single newline inside a paragraph as a line break
    pub hard_breaks: bool,
    /// Syntect theme for code blocks; empty picks the mode default
    pub syntax_theme: String,
    /// Pick dark highlight colors
    pub dark_mode: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            hard_breaks: true,
            syntax_theme: String::new(),
            dark_mode: false,
        }
    }
}

impl RenderOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.render.hardbreaks = self.hard_breaks;
        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Renders markdown to a `RenderedDocument` and highlights its code blocks.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> RenderedDocument {
        let arena = Arena::new();
        let root = parse_document(&arena, text, &self.options.to_comrak_options());
        let blocks = convert_blocks(root, self.options.hard_breaks);
        debug!("Rendered {} top-level blocks", blocks.len());
        RenderedDocument { blocks }
    }

    fn post_process(&self, document: &mut RenderedDocument) {
        let highlighter = get_highlighter();
        let theme = self.options.syntax_theme.as_str();
        let dark_mode = self.options.dark_mode;
        document.for_each_code_block_mut(|block| {
            block.highlighted =
                Some(highlighter.highlight(&block.code, &block.language, theme, dark_mode));
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AST Conversion
// ─────────────────────────────────────────────────────────────────────────────

fn convert_blocks<'a>(node: &'a AstNode<'a>, hard_breaks: bool) -> Vec<Block> {
    node.children()
        .filter_map(|child| convert_block(child, hard_breaks))
        .collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>, hard_breaks: bool) -> Option<Block> {
    let value = node.data.borrow().value.clone();
    let block = match value {
        NodeValue::Heading(heading) => Block::Heading {
            level: heading.level,
            lines: collect_inlines(node, hard_breaks),
        },
        NodeValue::Paragraph => Block::Paragraph(collect_inlines(node, hard_breaks)),
        NodeValue::BlockQuote => Block::Quote(convert_blocks(node, hard_breaks)),
        NodeValue::List(list) => Block::List {
            start: match list.list_type {
                ListType::Ordered => Some(list.start),
                ListType::Bullet => None,
            },
            items: node
                .children()
                .map(|item| convert_item(item, hard_breaks))
                .collect(),
        },
        NodeValue::CodeBlock(code) => Block::Code(CodeBlock {
            language: code
                .info
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
            code: code.literal,
            highlighted: None,
        }),
        NodeValue::ThematicBreak => Block::Rule,
        NodeValue::Table(_) => convert_table(node, hard_breaks),
        NodeValue::HtmlBlock(html) => Block::Html(html.literal),
        _ => return None,
    };
    Some(block)
}

fn convert_item<'a>(node: &'a AstNode<'a>, hard_breaks: bool) -> ListItem {
    let task = match &node.data.borrow().value {
        NodeValue::TaskItem(checked) => Some(checked.map_or(false, |c| c == 'x' || c == 'X')),
        _ => None,
    };
    ListItem {
        task,
        blocks: convert_blocks(node, hard_breaks),
    }
}

fn convert_table<'a>(node: &'a AstNode<'a>, hard_breaks: bool) -> Block {
    let mut header = Vec::new();
    let mut rows = Vec::new();

    for row in node.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<Vec<InlineLine>> = row
            .children()
            .map(|cell| collect_inlines(cell, hard_breaks))
            .collect();
        if is_header {
            header = cells;
        } else {
            rows.push(cells);
        }
    }

    Block::Table { header, rows }
}

/// Flatten the inline children of `node` into styled lines.
fn collect_inlines<'a>(node: &'a AstNode<'a>, hard_breaks: bool) -> Vec<InlineLine> {
    let mut lines = vec![Vec::new()];
    for child in node.children() {
        push_inline(child, SpanStyle::default(), None, hard_breaks, &mut lines);
    }
    lines
}

fn push_inline<'a>(
    node: &'a AstNode<'a>,
    style: SpanStyle,
    link: Option<&str>,
    hard_breaks: bool,
    lines: &mut Vec<InlineLine>,
) {
    let value = node.data.borrow().value.clone();
    let recurse = |style: SpanStyle, link: Option<&str>, lines: &mut Vec<InlineLine>| {
        for child in node.children() {
            push_inline(child, style, link, hard_breaks, lines);
        }
    };

    match value {
        NodeValue::Text(text) => push_span(lines, text, style, link),
        NodeValue::Code(code) => push_span(lines, code.literal, style.with_code(), link),
        NodeValue::HtmlInline(html) => push_span(lines, html, style, link),
        NodeValue::SoftBreak if hard_breaks => lines.push(Vec::new()),
        NodeValue::SoftBreak => push_span(lines, " ".to_string(), style, link),
        NodeValue::LineBreak => lines.push(Vec::new()),
        NodeValue::Strong => recurse(style.with_bold(), link, lines),
        NodeValue::Emph => recurse(style.with_italic(), link, lines),
        NodeValue::Strikethrough => recurse(style.with_strikethrough(), link, lines),
        NodeValue::Link(target) | NodeValue::Image(target) => {
            recurse(style, Some(target.url.as_str()), lines)
        }
        _ => recurse(style, link, lines),
    }
}

fn push_span(lines: &mut Vec<InlineLine>, text: String, style: SpanStyle, link: Option<&str>) {
    if text.is_empty() {
        return;
    }
    if lines.is_empty() {
        lines.push(Vec::new());
    }
    if let Some(line) = lines.last_mut() {
        // Merge with the previous span when nothing about it changes
        if let Some(last) = line.last_mut() {
            if last.style == style && last.link.as_deref() == link {
                last.text.push_str(&text);
                return;
            }
        }
        line.push(Span {
            text,
            style,
            link: link.map(str::to_string),
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
