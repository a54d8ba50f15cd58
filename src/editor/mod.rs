//! Editing engine for Markdown Memo
//!
//! Bottom-up layers:
//! - `selection.rs` - buffer/selection primitives and line ranges
//! - `transform.rs` - inline wraps, per-line toggles, indent, code blocks
//! - `continuation.rs` - Enter-key list continuation
//! - `commands.rs` - action ids and key chords
//! - `engine.rs` - `Editor`, which owns the state and notifies collaborators
//! - `widget.rs` - the egui text area bound to an `Editor`

mod commands;
mod continuation;
mod engine;
mod selection;
mod transform;
mod widget;

pub use commands::EditorAction;
pub use engine::Editor;
pub use widget::{focus_editor, EditorWidget};
