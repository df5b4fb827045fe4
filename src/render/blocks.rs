use std::sync::LazyLock;

use regex::Regex;

use super::context::RenderContext;
use super::{RenderFn, inline, wrap};
use crate::config::WrapMode;
use crate::tree::{Node, NodeData, NodeKind};

const THEMATIC_BREAK: &str = "______________________________________________________________________";

/// Lines a parser would read as the start of another block.
static ATX_HEADING_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}(?:[ \t]|$)").unwrap());
static BULLET_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+](?:[ \t]|$)").unwrap());
static ORDERED_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,9})([.)])(?:[ \t]|$)").unwrap());
static SETEXT_UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:=+|-+)[ \t]*$").unwrap());
static FENCE_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:~{3,}|`{3,})").unwrap());
static THEMATIC_BREAK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-[ \t]*-[ \t]*-[ \t-]*$").unwrap());

pub(super) fn default_renderer(kind: NodeKind) -> RenderFn {
    match kind {
        NodeKind::Document => document,
        NodeKind::Paragraph => paragraph,
        NodeKind::Heading => heading,
        NodeKind::BlockQuote => blockquote,
        NodeKind::CodeBlock => code_block,
        NodeKind::HtmlBlock => html_block,
        NodeKind::ThematicBreak => thematic_break,
        NodeKind::BulletList => crate::lists::default_bullet_list,
        NodeKind::OrderedList => crate::lists::default_ordered_list,
        NodeKind::ListItem => list_item,
        NodeKind::Text => inline::text,
        NodeKind::SoftBreak => inline::soft_break,
        NodeKind::HardBreak => inline::hard_break,
        NodeKind::CodeSpan => inline::code_span,
        NodeKind::Emphasis => inline::emphasis,
        NodeKind::Strong => inline::strong,
        NodeKind::Link => inline::link,
        NodeKind::Image => inline::image,
        NodeKind::InlineHtml => inline::inline_html,
    }
}

fn document(node: &Node, context: &mut RenderContext<'_>) -> String {
    let text = context.render_children(node, "\n\n");
    if text.is_empty() { text } else { text + "\n" }
}

fn paragraph(node: &Node, context: &mut RenderContext<'_>) -> String {
    let text = inline::render_inline(node, context);
    let text = match context.options().wrap {
        WrapMode::Columns(columns) => {
            let available = columns.saturating_sub(context.indent_width());
            wrap::wrap_text(&text, available)
        }
        WrapMode::Keep | WrapMode::No => text,
    };

    text.split('\n')
        .enumerate()
        .map(|(idx, line)| escape_line_beginning(line.trim_matches([' ', '\t']), idx > 0))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape the first character of a paragraph line that would otherwise start another block.
fn escape_line_beginning(line: &str, continuation: bool) -> String {
    if ATX_HEADING_START.is_match(line)
        || BULLET_START.is_match(line)
        || FENCE_START.is_match(line)
        || THEMATIC_BREAK_LINE.is_match(line)
        || line.starts_with('>')
        || (continuation && SETEXT_UNDERLINE.is_match(line))
    {
        return format!("\\{line}");
    }
    if let Some(caps) = ORDERED_START.captures(line) {
        let digits = &caps[1];
        return format!("{digits}\\{}", &line[digits.len()..]);
    }
    line.to_string()
}

fn heading(node: &Node, context: &mut RenderContext<'_>) -> String {
    let level = match node.data {
        NodeData::Heading { level } => level as usize,
        _ => 1,
    };
    // Setext headings may span lines; ATX headings cannot
    let mut text = inline::render_inline(node, context)
        .replace("\\\n", " ")
        .replace('\n', " ")
        .trim()
        .to_string();
    // A trailing '#' would be read as a closing sequence
    if text.ends_with('#') {
        text.pop();
        text.push_str("\\#");
    }

    let marker = "#".repeat(level);
    if text.is_empty() { marker } else { format!("{marker} {text}") }
}

fn blockquote(node: &Node, context: &mut RenderContext<'_>) -> String {
    let text = {
        let mut context = context.indented(2);
        context.render_children(node, "\n\n")
    };
    text.split('\n')
        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_block(node: &Node, _context: &mut RenderContext<'_>) -> String {
    let (info, literal) = match &node.data {
        NodeData::CodeBlock { info, literal } => (info.as_deref().unwrap_or(""), literal.as_str()),
        _ => ("", ""),
    };

    // Backticks are not allowed in the info string of a backtick fence
    let fence_char = if info.contains('`') { '~' } else { '`' };
    let fence_len = longest_run(literal, fence_char).max(2) + 1;
    let fence = fence_char.to_string().repeat(fence_len);

    let mut text = format!("{fence}{info}\n{literal}");
    if !literal.is_empty() && !literal.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&fence);
    text
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn html_block(node: &Node, _context: &mut RenderContext<'_>) -> String {
    node.literal().trim_end_matches('\n').to_string()
}

fn thematic_break(_node: &Node, _context: &mut RenderContext<'_>) -> String {
    THEMATIC_BREAK.to_string()
}

/// Item content only; markers and indentation are added by the list renderers.
fn list_item(node: &Node, context: &mut RenderContext<'_>) -> String {
    let tight = matches!(node.data, NodeData::ListItem { tight: true });
    let separator = if tight { "\n" } else { "\n\n" };
    let text = context.render_children(node, separator);
    if text.trim().is_empty() { String::new() } else { text }
}
