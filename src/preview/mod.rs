//! Live preview
//!
//! The buffer is rendered to a display model after every edit and drawn in
//! the right-hand pane.
//!
//! - `renderer.rs` - comrak-based `MarkdownRenderer`
//! - `document.rs` - the rendered block/span model
//! - `syntax.rs` - syntect highlighting for code blocks
//! - `view.rs` - egui drawing of a rendered document

pub mod document;
mod renderer;
pub mod syntax;
mod view;

pub use document::RenderedDocument;
pub use renderer::{MarkdownRenderer, RenderOptions};
pub use view::show_document;

/// Turns buffer text into something the preview can display.
///
/// `render` must be pure. `post_process` runs right after it and may decorate
/// the result, e.g. with syntax highlighting.
pub trait Renderer {
    fn render(&self, text: &str) -> RenderedDocument;

    fn post_process(&self, _document: &mut RenderedDocument) {}
}
