//! Formatting sessions: which file is being formatted, and with what.
//!
//! A session owns the "current file" that decides which `.editorconfig`
//! applies. The directive is resolved once per [`FormatSession::format`]
//! call and handed to the renderers through their context, so separate
//! sessions can format concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::FormatOptions;
use crate::editorconfig::EditorConfigResolver;
use crate::lists::IndentDirective;
use crate::render::{Renderers, render_document};
use crate::tree::Node;
use crate::validate;

/// File name resolved in the working directory when no file is set
pub const CWD_PLACEHOLDER_FILE: &str = "stdin.md";

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Formatted output of {path} renders to different HTML than the input")]
    HtmlMismatch { path: String },
}

pub struct FormatSession {
    options: FormatOptions,
    renderers: Renderers,
    resolver: Arc<EditorConfigResolver>,
    current_file: Option<PathBuf>,
}

impl FormatSession {
    /// A session using `.editorconfig` indentation and a private resolver cache.
    pub fn new(options: FormatOptions) -> Self {
        Self::with_resolver(options, Arc::new(EditorConfigResolver::new()))
    }

    /// A session sharing `resolver` (and its cache) with other sessions.
    pub fn with_resolver(options: FormatOptions, resolver: Arc<EditorConfigResolver>) -> Self {
        Self {
            options,
            renderers: Renderers::with_editorconfig(),
            resolver,
            current_file: None,
        }
    }

    /// Replace the renderer table, e.g. with [`Renderers::default`] to ignore `.editorconfig`.
    pub fn with_renderers(mut self, renderers: Renderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Set the file whose configuration later calls use; `None` falls back to
    /// the current working directory.
    pub fn set_current_file(&mut self, path: Option<&Path>) {
        self.current_file = path.map(Path::to_path_buf);
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// The indentation directive for the current file (or working directory).
    pub fn indent_config(&self) -> Option<IndentDirective> {
        let target = match &self.current_file {
            Some(path) => path.clone(),
            None => match std::env::current_dir() {
                Ok(cwd) => cwd.join(CWD_PLACEHOLDER_FILE),
                Err(e) => {
                    log::debug!("[mdfmt-config] Failed to get current directory: {e}");
                    return None;
                }
            },
        };
        self.resolver.indent_directive(&target)
    }

    /// Format `text` as the current file.
    pub fn format(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        let document = Node::parse(&normalized);
        let directive = self.indent_config();
        let output = render_document(&document, &self.renderers, &self.options, directive);
        self.options.end_of_line.apply(output, text)
    }

    /// Format `text` and, if the options ask for it, check the result means the same.
    pub fn format_checked(&self, text: &str) -> Result<String, FormatError> {
        let output = self.format(text);
        if !self.options.validate {
            return Ok(output);
        }
        if !validate::renders_equal(&text.replace("\r\n", "\n"), &output.replace("\r\n", "\n")) {
            let path = self
                .current_file()
                .map_or_else(|| "<stdin>".to_string(), |path| path.display().to_string());
            return Err(FormatError::HtmlMismatch { path });
        }
        Ok(output)
    }
}

/// Format `text` once, resolving `.editorconfig` for `file` (or the working directory).
pub fn format_text(text: &str, options: &FormatOptions, file: Option<&Path>) -> String {
    let mut session = FormatSession::new(*options);
    session.set_current_file(file);
    session.format(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndOfLine;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_current_file_round_trip() {
        let mut session = FormatSession::new(FormatOptions::default());
        assert_eq!(session.current_file(), None);
        session.set_current_file(Some(Path::new("docs/a.md")));
        assert_eq!(session.current_file(), Some(Path::new("docs/a.md")));
        session.set_current_file(None);
        assert_eq!(session.current_file(), None);
    }

    #[test]
    fn test_session_uses_file_directive() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".editorconfig"),
            "root = true\n[*.md]\nindent_style = space\nindent_size = 4\n",
        )
        .unwrap();

        let mut session = FormatSession::new(FormatOptions::default());
        session.set_current_file(Some(&temp_dir.path().join("test.md")));
        assert_eq!(session.indent_config(), Some(IndentDirective::spaces(4)));
        assert_eq!(
            session.format("- a\n  - b\n"),
            "- a\n    - b\n",
        );
    }

    #[test]
    fn test_host_renderers_ignore_directive() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(".editorconfig"),
            "root = true\n[*.md]\nindent_size = 4\n",
        )
        .unwrap();

        let mut session = FormatSession::new(FormatOptions::default()).with_renderers(Renderers::default());
        session.set_current_file(Some(&temp_dir.path().join("test.md")));
        assert_eq!(session.format("- a\n    - b\n"), "- a\n  - b\n");
    }

    #[test]
    fn test_crlf_output() {
        let options = FormatOptions {
            end_of_line: EndOfLine::Keep,
            ..FormatOptions::default()
        };
        let session = FormatSession::new(options);
        assert_eq!(session.format("# a\r\n\r\nb\r\n"), "# a\r\n\r\nb\r\n");
    }

    #[test]
    fn test_format_checked_accepts_normal_documents() {
        let session = FormatSession::new(FormatOptions::default());
        assert_eq!(session.format_checked("* a\n* b\n").unwrap(), "- a\n- b\n");
    }
}
