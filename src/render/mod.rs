//! Render pipeline: a total table of per-node renderers plus the context they share.
//!
//! The host defaults reproduce the formatter's standard output. Plugins
//! replace entries in the table (see [`crate::lists::RENDERERS`]).

mod blocks;
pub mod context;
mod inline;
pub mod wrap;

pub use crate::tree::is_tight_list;
pub use context::{Indented, RenderContext};

use crate::config::FormatOptions;
use crate::lists::IndentDirective;
use crate::tree::{Node, NodeKind};

/// Signature shared by every node renderer.
pub type RenderFn = fn(&Node, &mut RenderContext<'_>) -> String;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown syntax node kind '{0}'")]
    UnknownNodeKind(String),
}

/// One renderer per [`NodeKind`]; lookups can never miss.
#[derive(Debug, Clone)]
pub struct Renderers {
    table: [RenderFn; NodeKind::COUNT],
}

impl Default for Renderers {
    fn default() -> Self {
        Self {
            table: NodeKind::ALL.map(blocks::default_renderer),
        }
    }
}

impl Renderers {
    /// Host defaults with the editorconfig-aware list renderers installed.
    pub fn with_editorconfig() -> Self {
        Self::default().with_overrides(&crate::lists::RENDERERS)
    }

    pub fn get(&self, kind: NodeKind) -> RenderFn {
        self.table[kind.index()]
    }

    pub fn set(&mut self, kind: NodeKind, render: RenderFn) {
        self.table[kind.index()] = render;
    }

    pub fn with_overrides(mut self, overrides: &[(NodeKind, RenderFn)]) -> Self {
        for (kind, render) in overrides {
            self.set(*kind, *render);
        }
        self
    }

    /// Install a renderer addressed by its node tag, e.g. `"bullet_list"`.
    pub fn override_named(&mut self, tag: &str, render: RenderFn) -> Result<(), RenderError> {
        let kind: NodeKind = tag.parse()?;
        self.set(kind, render);
        Ok(())
    }
}

/// Render a parsed document to formatted Markdown.
pub fn render_document(
    document: &Node,
    renderers: &Renderers,
    options: &FormatOptions,
    directive: Option<IndentDirective>,
) -> String {
    let mut context = RenderContext::new(renderers, options, directive);
    context.render(document)
}

/// Marker glyph for a list: bullets alternate `-`/`*` and ordered lists
/// alternate `.`/`)` across directly adjacent lists, so that they stay
/// separate lists when parsed again.
pub fn get_list_marker_type(node: &Node) -> &'static str {
    let run = node.list_attrs().map_or(1, |attrs| attrs.run);
    let primary = run % 2 == 1;
    match (node.kind, primary) {
        (NodeKind::OrderedList, true) => ".",
        (NodeKind::OrderedList, false) => ")",
        (_, true) => "-",
        (_, false) => "*",
    }
}
