//! A CommonMark formatter whose list indentation follows `.editorconfig`.
//!
//! Bullet and ordered lists are normally indented by the width of their
//! marker. When an `.editorconfig` section matching the file sets
//! `indent_style`/`indent_size`, continuation lines and nested blocks of list
//! items use that indentation instead.
//!
//! ```no_run
//! use mdfmt_lib::{FormatOptions, FormatSession};
//! use std::path::Path;
//!
//! let mut session = FormatSession::new(FormatOptions::default());
//! session.set_current_file(Some(Path::new("docs/guide.md")));
//! let formatted = session.format("- Item 1\n  - Nested item\n");
//! ```

pub mod config;
pub mod editorconfig;
pub mod lists;
pub mod render;
pub mod session;
pub mod tree;
pub mod validate;

pub use config::{ConfigError, EndOfLine, FormatOptions, OptionOverrides, WrapMode};
pub use editorconfig::EditorConfigResolver;
pub use lists::{IndentDirective, IndentStyle, RENDERERS};
pub use render::{RenderContext, RenderError, RenderFn, Renderers};
pub use session::{FormatError, FormatSession, format_text};
pub use tree::{Node, NodeKind};
