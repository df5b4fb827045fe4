//! Formatter options.
//!
//! This module defines the formatting options, their `.mdformat.toml` file
//! format and upward discovery, and the errors raised while loading them.
//! `.editorconfig` indentation lives in [`crate::editorconfig`].

pub mod types;
pub use types::*;

mod loading;
