//! Owned Markdown syntax tree built from the pulldown-cmark event stream.
//!
//! The renderers work on a tree rather than on events because list
//! rendering needs to look at whole items (and at sibling lists) before it
//! can decide on markers and indentation.

use std::fmt;
use std::str::FromStr;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::render::RenderError;

/// Every kind of node the renderers know how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    BlockQuote,
    CodeBlock,
    HtmlBlock,
    ThematicBreak,
    BulletList,
    OrderedList,
    ListItem,
    Text,
    SoftBreak,
    HardBreak,
    CodeSpan,
    Emphasis,
    Strong,
    Link,
    Image,
    InlineHtml,
}

impl NodeKind {
    pub const COUNT: usize = 19;

    pub const ALL: [NodeKind; NodeKind::COUNT] = [
        NodeKind::Document,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::BlockQuote,
        NodeKind::CodeBlock,
        NodeKind::HtmlBlock,
        NodeKind::ThematicBreak,
        NodeKind::BulletList,
        NodeKind::OrderedList,
        NodeKind::ListItem,
        NodeKind::Text,
        NodeKind::SoftBreak,
        NodeKind::HardBreak,
        NodeKind::CodeSpan,
        NodeKind::Emphasis,
        NodeKind::Strong,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::InlineHtml,
    ];

    /// Position of this kind in [`NodeKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The snake_case tag used when renderers are addressed by name.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::BlockQuote => "blockquote",
            NodeKind::CodeBlock => "code_block",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::ThematicBreak => "hr",
            NodeKind::BulletList => "bullet_list",
            NodeKind::OrderedList => "ordered_list",
            NodeKind::ListItem => "list_item",
            NodeKind::Text => "text",
            NodeKind::SoftBreak => "softbreak",
            NodeKind::HardBreak => "hardbreak",
            NodeKind::CodeSpan => "code_inline",
            NodeKind::Emphasis => "em",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::InlineHtml => "html_inline",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::OrderedList)
    }

    /// Block-level kinds close any implicit paragraph that is still open.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::BlockQuote
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::ThematicBreak
                | NodeKind::BulletList
                | NodeKind::OrderedList
                | NodeKind::ListItem
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NodeKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| RenderError::UnknownNodeKind(s.to_string()))
    }
}

/// How a link was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](dest)` and every reference form, which are emitted inline
    Inline,
    /// `<https://example.com>`
    Autolink,
    /// `<user@example.com>`
    Email,
}

/// Attributes shared by bullet and ordered lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListAttrs {
    /// Starting number; only ordered lists have one
    pub start: Option<u64>,
    /// 1-based position in a run of directly adjacent lists of the same kind
    pub run: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    None,
    /// Hidden paragraphs come from tight list items, where the parser emits no
    /// paragraph tags.
    Paragraph {
        hidden: bool,
    },
    Heading {
        level: u8,
    },
    /// Verbatim content of text, code spans and HTML.
    Literal(String),
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    Link {
        kind: LinkKind,
        dest: String,
        title: String,
    },
    List(ListAttrs),
    ListItem {
        /// Whether the parent list is tight
        tight: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub data: NodeData,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, data: NodeData) -> Self {
        Self {
            kind,
            data,
            children: Vec::new(),
        }
    }

    /// Text content of literal-bearing nodes, empty for everything else.
    pub fn literal(&self) -> &str {
        match &self.data {
            NodeData::Literal(text) => text,
            NodeData::CodeBlock { literal, .. } => literal,
            _ => "",
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.data, NodeData::Paragraph { hidden: true })
    }

    pub fn list_attrs(&self) -> Option<&ListAttrs> {
        match &self.data {
            NodeData::List(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Parse CommonMark text into a document node.
    pub fn parse(text: &str) -> Node {
        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(text, Options::empty()) {
            builder.push_event(event);
        }
        builder.finish()
    }
}

/// Whether a list has no visible paragraph directly inside any of its items.
pub fn is_tight_list(node: &Node) -> bool {
    node.children
        .iter()
        .flat_map(|item| item.children.iter())
        .all(|child| child.kind != NodeKind::Paragraph || child.is_hidden())
}

struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Document, NodeData::None)],
        }
    }

    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                if self.top_is_hidden_paragraph() {
                    self.close();
                }
                self.close();
            }
            Event::Text(text) => self.text(&text),
            Event::Html(html) => {
                if self.top().kind == NodeKind::HtmlBlock {
                    self.append_literal(&html);
                } else {
                    self.inline_leaf(NodeKind::InlineHtml, html.into_string());
                }
            }
            Event::InlineHtml(html) => self.inline_leaf(NodeKind::InlineHtml, html.into_string()),
            Event::Code(code) => self.inline_leaf(NodeKind::CodeSpan, code.into_string()),
            Event::SoftBreak => self.inline_node(Node::new(NodeKind::SoftBreak, NodeData::None)),
            Event::HardBreak => self.inline_node(Node::new(NodeKind::HardBreak, NodeData::None)),
            Event::Rule => {
                self.close_hidden_paragraph();
                self.attach(Node::new(NodeKind::ThematicBreak, NodeData::None));
            }
            other => log::debug!("[mdfmt-render] Skipping unsupported event: {other:?}"),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let (kind, data) = match tag {
            Tag::Paragraph => (NodeKind::Paragraph, NodeData::Paragraph { hidden: false }),
            Tag::Heading { level, .. } => (NodeKind::Heading, NodeData::Heading { level: level as u8 }),
            Tag::BlockQuote(_) => (NodeKind::BlockQuote, NodeData::None),
            Tag::CodeBlock(code_kind) => {
                let info = match code_kind {
                    CodeBlockKind::Fenced(info) => {
                        let info = info.trim();
                        (!info.is_empty()).then(|| info.to_string())
                    }
                    CodeBlockKind::Indented => None,
                };
                (
                    NodeKind::CodeBlock,
                    NodeData::CodeBlock {
                        info,
                        literal: String::new(),
                    },
                )
            }
            Tag::HtmlBlock => (NodeKind::HtmlBlock, NodeData::Literal(String::new())),
            Tag::List(Some(start)) => (
                NodeKind::OrderedList,
                NodeData::List(ListAttrs {
                    start: Some(start),
                    run: 1,
                }),
            ),
            Tag::List(None) => (NodeKind::BulletList, NodeData::List(ListAttrs { start: None, run: 1 })),
            Tag::Item => (NodeKind::ListItem, NodeData::ListItem { tight: true }),
            Tag::Emphasis => (NodeKind::Emphasis, NodeData::None),
            Tag::Strong => (NodeKind::Strong, NodeData::None),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => (NodeKind::Link, link_data(link_type, &dest_url, &title)),
            Tag::Image {
                link_type,
                dest_url,
                title,
                ..
            } => (NodeKind::Image, link_data(link_type, &dest_url, &title)),
            other => {
                // Only reachable when parser extensions are enabled
                log::debug!("[mdfmt-render] Treating unsupported tag as paragraph: {other:?}");
                (NodeKind::Paragraph, NodeData::Paragraph { hidden: false })
            }
        };

        if kind.is_block() {
            self.close_hidden_paragraph();
        } else {
            self.open_inline_container();
        }
        self.stack.push(Node::new(kind, data));
    }

    fn text(&mut self, text: &str) {
        match self.top().kind {
            NodeKind::CodeBlock | NodeKind::HtmlBlock => self.append_literal(text),
            _ => self.inline_leaf(NodeKind::Text, text.to_string()),
        }
    }

    fn inline_leaf(&mut self, kind: NodeKind, content: String) {
        self.open_inline_container();
        let parent = self.top_mut();
        if kind == NodeKind::Text
            && let Some(last) = parent.children.last_mut()
            && last.kind == NodeKind::Text
            && let NodeData::Literal(existing) = &mut last.data
        {
            existing.push_str(&content);
            return;
        }
        parent.children.push(Node::new(kind, NodeData::Literal(content)));
    }

    fn inline_node(&mut self, node: Node) {
        self.open_inline_container();
        self.top_mut().children.push(node);
    }

    fn append_literal(&mut self, text: &str) {
        match &mut self.top_mut().data {
            NodeData::Literal(literal) | NodeData::CodeBlock { literal, .. } => literal.push_str(text),
            _ => {}
        }
    }

    /// Inline content directly inside a block container belongs to a hidden paragraph.
    fn open_inline_container(&mut self) {
        if matches!(
            self.top().kind,
            NodeKind::ListItem | NodeKind::BlockQuote | NodeKind::Document
        ) {
            self.stack
                .push(Node::new(NodeKind::Paragraph, NodeData::Paragraph { hidden: true }));
        }
    }

    fn close_hidden_paragraph(&mut self) {
        if self.top_is_hidden_paragraph() {
            self.close();
        }
    }

    fn top_is_hidden_paragraph(&self) -> bool {
        self.top().is_hidden()
    }

    /// Pop the innermost open node and attach it to its parent.
    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(mut node) = self.stack.pop() {
            if node.kind.is_list() {
                let tight = is_tight_list(&node);
                for item in &mut node.children {
                    if let NodeData::ListItem { tight: item_tight } = &mut item.data {
                        *item_tight = tight;
                    }
                }
            }
            self.attach(node);
        }
    }

    fn attach(&mut self, mut node: Node) {
        let parent = self.top_mut();
        if node.kind.is_list() {
            let previous_run = parent
                .children
                .last()
                .filter(|sibling| sibling.kind == node.kind)
                .and_then(|sibling| sibling.list_attrs())
                .map(|attrs| attrs.run);
            if let (Some(previous), NodeData::List(attrs)) = (previous_run, &mut node.data) {
                attrs.run = previous + 1;
            }
        }
        parent.children.push(node);
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document, NodeData::None))
    }

    fn top(&self) -> &Node {
        // The document node is never popped before `finish`
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Node {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

fn link_data(link_type: LinkType, dest: &str, title: &str) -> NodeData {
    let kind = match link_type {
        LinkType::Autolink => LinkKind::Autolink,
        LinkType::Email => LinkKind::Email,
        _ => LinkKind::Inline,
    };
    NodeData::Link {
        kind,
        dest: dest.to_string(),
        title: title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &Node) -> Vec<NodeKind> {
        node.children.iter().map(|child| child.kind).collect()
    }

    #[test]
    fn test_tight_list_gets_hidden_paragraphs() {
        let doc = Node::parse("- one\n- two\n");
        assert_eq!(kinds(&doc), vec![NodeKind::BulletList]);

        let list = &doc.children[0];
        assert!(is_tight_list(list));
        assert_eq!(list.children.len(), 2);
        let paragraph = &list.children[0].children[0];
        assert_eq!(paragraph.kind, NodeKind::Paragraph);
        assert!(paragraph.is_hidden());
        assert_eq!(paragraph.children[0].literal(), "one");
    }

    #[test]
    fn test_loose_list_is_not_tight() {
        let doc = Node::parse("- one\n\n- two\n");
        let list = &doc.children[0];
        assert!(!is_tight_list(list));
        assert!(matches!(list.children[0].data, NodeData::ListItem { tight: false }));
    }

    #[test]
    fn test_nested_list_follows_hidden_paragraph() {
        let doc = Node::parse("- Item 1\n  - Nested item\n- Item 2\n");
        let item = &doc.children[0].children[0];
        assert_eq!(kinds(item), vec![NodeKind::Paragraph, NodeKind::BulletList]);
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = Node::parse("7. seven\n8. eight\n");
        let list = &doc.children[0];
        assert_eq!(list.kind, NodeKind::OrderedList);
        assert_eq!(list.list_attrs().and_then(|attrs| attrs.start), Some(7));
    }

    #[test]
    fn test_adjacent_lists_count_runs() {
        let doc = Node::parse("- a\n* b\n+ c\n");
        let runs: Vec<usize> = doc
            .children
            .iter()
            .filter_map(|list| list.list_attrs().map(|attrs| attrs.run))
            .collect();
        assert_eq!(runs, vec![1, 2, 3]);
    }

    #[test]
    fn test_text_events_are_merged() {
        let doc = Node::parse("a [b c\n");
        let paragraph = &doc.children[0];
        assert_eq!(paragraph.children.len(), 1);
        assert_eq!(paragraph.children[0].literal(), "a [b c");
    }

    #[test]
    fn test_code_block_literal_and_info() {
        let doc = Node::parse("```rust\nfn main() {}\n```\n");
        let block = &doc.children[0];
        assert_eq!(
            block.data,
            NodeData::CodeBlock {
                info: Some("rust".to_string()),
                literal: "fn main() {}\n".to_string(),
            }
        );
    }

    #[test]
    fn test_node_kind_from_tag() {
        assert_eq!("bullet_list".parse::<NodeKind>(), Ok(NodeKind::BulletList));
        assert_eq!("ordered_list".parse::<NodeKind>(), Ok(NodeKind::OrderedList));
        assert_eq!(
            "bullet_lsit".parse::<NodeKind>(),
            Err(RenderError::UnknownNodeKind("bullet_lsit".to_string()))
        );
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::ALL[kind.index()], kind);
        }
    }
}
