use std::ops::{Deref, DerefMut};

use super::Renderers;
use crate::config::FormatOptions;
use crate::lists::IndentDirective;
use crate::tree::Node;

/// State threaded through one document render.
///
/// The indent directive is resolved once per document and carried here, so
/// concurrent renders of different files never share it.
pub struct RenderContext<'a> {
    renderers: &'a Renderers,
    options: &'a FormatOptions,
    directive: Option<IndentDirective>,
    indent_stack: Vec<usize>,
}

impl<'a> RenderContext<'a> {
    pub fn new(renderers: &'a Renderers, options: &'a FormatOptions, directive: Option<IndentDirective>) -> Self {
        Self {
            renderers,
            options,
            directive,
            indent_stack: Vec::new(),
        }
    }

    pub fn options(&self) -> &FormatOptions {
        self.options
    }

    pub fn directive(&self) -> Option<IndentDirective> {
        self.directive
    }

    /// Total columns of indentation enclosing the node being rendered.
    pub fn indent_width(&self) -> usize {
        self.indent_stack.iter().sum()
    }

    /// Push `width` columns of indentation until the returned guard is dropped.
    pub fn indented(&mut self, width: usize) -> Indented<'_, 'a> {
        self.indent_stack.push(width);
        Indented { context: self }
    }

    pub fn render(&mut self, node: &Node) -> String {
        let render = self.renderers.get(node.kind);
        render(node, self)
    }

    pub fn render_children(&mut self, node: &Node, separator: &str) -> String {
        node.children
            .iter()
            .map(|child| self.render(child))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Scoped indentation; pops its width on drop, including during unwinding.
pub struct Indented<'c, 'a> {
    context: &'c mut RenderContext<'a>,
}

impl<'a> Deref for Indented<'_, 'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for Indented<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for Indented<'_, '_> {
    fn drop(&mut self) {
        self.context.indent_stack.pop();
    }
}
