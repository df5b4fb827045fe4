use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::context::RenderContext;
use crate::config::WrapMode;
use crate::tree::{LinkKind, Node, NodeData, NodeKind};

/// Text that a parser would decode as an entity or numeric character reference.
static CHAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(?:#[0-9]{1,7};|#[xX][0-9a-fA-F]{1,6};|[a-zA-Z][a-zA-Z0-9]{1,31};)").unwrap());

/// Render the inline children of a paragraph, heading or span.
pub(super) fn render_inline(node: &Node, context: &mut RenderContext<'_>) -> String {
    let mut out = String::new();
    for (idx, child) in node.children.iter().enumerate() {
        let mut rendered = context.render(child);
        // "!" right before a link would turn it into an image
        let before_link = node
            .children
            .get(idx + 1)
            .is_some_and(|next| next.kind == NodeKind::Link);
        if child.kind == NodeKind::Text && before_link && rendered.ends_with('!') {
            rendered.pop();
            rendered.push_str("\\!");
        }
        out.push_str(&rendered);
    }
    out
}

pub(super) fn text(node: &Node, _context: &mut RenderContext<'_>) -> String {
    escape_text(node.literal())
}

pub(super) fn soft_break(_node: &Node, context: &mut RenderContext<'_>) -> String {
    match context.options().wrap {
        WrapMode::Keep => "\n".to_string(),
        WrapMode::No | WrapMode::Columns(_) => " ".to_string(),
    }
}

pub(super) fn hard_break(_node: &Node, _context: &mut RenderContext<'_>) -> String {
    "\\\n".to_string()
}

pub(super) fn code_span(node: &Node, _context: &mut RenderContext<'_>) -> String {
    let code = node.literal();

    let mut runs = HashSet::new();
    let mut current = 0;
    for c in code.chars().chain(std::iter::once('\0')) {
        if c == '`' {
            current += 1;
        } else if current > 0 {
            runs.insert(current);
            current = 0;
        }
    }
    let ticks = "`".repeat((1..).find(|len| !runs.contains(len)).unwrap_or(1));

    // One space on each side is stripped again by the parser
    let needs_padding = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if needs_padding {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

pub(super) fn emphasis(node: &Node, context: &mut RenderContext<'_>) -> String {
    format!("*{}*", render_inline(node, context))
}

pub(super) fn strong(node: &Node, context: &mut RenderContext<'_>) -> String {
    format!("**{}**", render_inline(node, context))
}

pub(super) fn link(node: &Node, context: &mut RenderContext<'_>) -> String {
    let (kind, dest, title) = link_parts(node);
    match kind {
        LinkKind::Autolink | LinkKind::Email => format!("<{dest}>"),
        LinkKind::Inline => {
            let text = render_inline(node, context);
            format!("[{text}]({})", link_target(dest, title))
        }
    }
}

pub(super) fn image(node: &Node, context: &mut RenderContext<'_>) -> String {
    let (_, dest, title) = link_parts(node);
    let alt = render_inline(node, context);
    format!("![{alt}]({})", link_target(dest, title))
}

pub(super) fn inline_html(node: &Node, _context: &mut RenderContext<'_>) -> String {
    node.literal().to_string()
}

fn link_parts(node: &Node) -> (LinkKind, &str, &str) {
    match &node.data {
        NodeData::Link { kind, dest, title } => (*kind, dest.as_str(), title.as_str()),
        _ => (LinkKind::Inline, "", ""),
    }
}

fn link_target(dest: &str, title: &str) -> String {
    let dest = link_destination(dest);
    if title.is_empty() {
        dest
    } else {
        let title = title.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{dest} \"{title}\"")
    }
}

fn link_destination(dest: &str) -> String {
    let needs_angle_brackets = dest.is_empty()
        || dest.starts_with('<')
        || dest.chars().any(|c| c.is_whitespace() || c.is_control())
        || !parens_balanced(dest);
    let dest = dest.replace('\\', "\\\\");
    if needs_angle_brackets {
        format!("<{}>", dest.replace('<', "\\<").replace('>', "\\>"))
    } else {
        dest
    }
}

fn parens_balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(lower) => depth = lower,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Backslash-escape characters that would otherwise be read as Markdown syntax.
pub(crate) fn escape_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (idx, &c) in chars.iter().enumerate() {
        match c {
            '\\' | '*' | '[' | ']' | '<' | '`' => {
                out.push('\\');
                out.push(c);
            }
            '_' => {
                // Intraword underscores never delimit emphasis
                let prev_word = idx > 0 && chars[idx - 1].is_alphanumeric();
                let next_word = chars.get(idx + 1).is_some_and(|next| next.is_alphanumeric());
                if !(prev_word && next_word) {
                    out.push('\\');
                }
                out.push('_');
            }
            '&' => {
                let rest: String = chars[idx..].iter().take(40).collect();
                if CHAR_REFERENCE.is_match(&rest) {
                    out.push('\\');
                }
                out.push('&');
            }
            _ => out.push(c),
        }
    }
    out
}
