//! Configuration module for Markdown Memo
//!
//! User preferences (theme, font size, pane split, export defaults) and
//! their JSON persistence in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
