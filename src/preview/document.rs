//! Rendered document model
//!
//! A flat, display-ready tree produced by the renderer: blocks containing
//! lines of styled spans. The egui preview draws it without touching the
//! markdown source again.

use super::syntax::HighlightedLine;

// ─────────────────────────────────────────────────────────────────────────────
// Inline Spans
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulated inline formatting for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl SpanStyle {
    pub fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn with_italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn with_strikethrough(self) -> Self {
        Self {
            strikethrough: true,
            ..self
        }
    }

    pub fn with_code(self) -> Self {
        Self { code: true, ..self }
    }
}

/// A run of text with uniform style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    /// Target URL when the span is part of a link
    pub link: Option<String>,
}

/// One visual line of inline content.
pub type InlineLine = Vec<Span>;

/// Concatenate the text of a line's spans.
#[cfg(test)]
pub fn line_text(line: &[Span]) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// A fenced or indented code block.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    /// First word of the info string (`rust` in ```` ```rust ````)
    pub language: String,
    pub code: String,
    /// Filled in by the renderer's post-processing hook
    pub highlighted: Option<Vec<HighlightedLine>>,
}

/// An item of a bullet, ordered or task list.
#[derive(Debug, Clone)]
pub struct ListItem {
    /// `Some(checked)` for task items
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

/// A block-level element.
#[derive(Debug, Clone)]
pub enum Block {
    Heading {
        level: u8,
        lines: Vec<InlineLine>,
    },
    Paragraph(Vec<InlineLine>),
    List {
        /// Number of the first item for ordered lists
        start: Option<usize>,
        items: Vec<ListItem>,
    },
    Quote(Vec<Block>),
    Code(CodeBlock),
    Table {
        header: Vec<Vec<InlineLine>>,
        rows: Vec<Vec<Vec<InlineLine>>>,
    },
    Rule,
    /// Raw HTML, shown as-is
    Html(String),
}

impl Block {
    /// Plain text of the block, one line per visual line.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { lines, .. } | Block::Paragraph(lines) => lines
                .iter()
                .map(|line| line_text(line))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::List { items, .. } => items
                .iter()
                .flat_map(|item| item.blocks.iter().map(Block::plain_text))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Quote(blocks) => blocks
                .iter()
                .map(Block::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Code(code) => code.code.clone(),
            Block::Table { header, rows } => std::iter::once(header)
                .chain(rows.iter())
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.iter().map(|l| line_text(l)).collect::<String>())
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Rule => String::new(),
            Block::Html(html) => html.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The renderer's output for a whole buffer.
#[derive(Debug, Clone, Default)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Visit every code block, including those nested in lists and quotes.
    pub fn for_each_code_block_mut(&mut self, mut f: impl FnMut(&mut CodeBlock)) {
        fn walk(blocks: &mut [Block], f: &mut dyn FnMut(&mut CodeBlock)) {
            for block in blocks {
                match block {
                    Block::Code(code) => f(code),
                    Block::Quote(children) => walk(children, f),
                    Block::List { items, .. } => {
                        for item in items {
                            walk(&mut item.blocks, f);
                        }
                    }
                    _ => {}
                }
            }
        }
        walk(&mut self.blocks, &mut f);
    }
}
