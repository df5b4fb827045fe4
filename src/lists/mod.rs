//! Bullet and ordered list renderers with configurable indentation.
//!
//! These replace the host's fixed-indent list renderers. The width of the
//! marker still decides the default indent; an [`IndentDirective`] from
//! `.editorconfig` overrides it for every continuation line and nested block
//! of the list's items.

pub mod indent;

pub use indent::{IndentDirective, IndentStyle, ResolvedIndent, resolve_indent};

use crate::render::{RenderContext, RenderFn, get_list_marker_type, is_tight_list};
use crate::tree::{Node, NodeKind};

/// Renderer overrides to install in the host's table.
pub const RENDERERS: [(NodeKind, RenderFn); 2] = [
    (NodeKind::BulletList, render_bullet_list),
    (NodeKind::OrderedList, render_ordered_list),
];

const FIRST_LINE_INDENT: &str = " ";

/// Render a bullet list using the context's indent directive.
pub fn render_bullet_list(node: &Node, context: &mut RenderContext<'_>) -> String {
    let directive = context.directive();
    bullet_list(node, context, directive)
}

/// Render an ordered list using the context's indent directive.
pub fn render_ordered_list(node: &Node, context: &mut RenderContext<'_>) -> String {
    let directive = context.directive();
    ordered_list(node, context, directive)
}

/// Host default: indentation always follows the marker width.
pub(crate) fn default_bullet_list(node: &Node, context: &mut RenderContext<'_>) -> String {
    bullet_list(node, context, None)
}

/// Host default: indentation always follows the marker width.
pub(crate) fn default_ordered_list(node: &Node, context: &mut RenderContext<'_>) -> String {
    ordered_list(node, context, None)
}

fn bullet_list(node: &Node, context: &mut RenderContext<'_>, directive: Option<IndentDirective>) -> String {
    let marker_type = get_list_marker_type(node);
    let default_width = marker_type.len() + FIRST_LINE_INDENT.len();
    let indent = resolve_indent(default_width, directive);
    let block_separator = if is_tight_list(node) { "\n" } else { "\n\n" };

    let mut context = context.indented(indent.width);
    node.children
        .iter()
        .map(|item| {
            let text = context.render(item);
            prefix_item(&text, marker_type, &indent.unit)
        })
        .collect::<Vec<_>>()
        .join(block_separator)
}

fn ordered_list(node: &Node, context: &mut RenderContext<'_>, directive: Option<IndentDirective>) -> String {
    let consecutive_numbering = context.options().number;
    let marker_type = get_list_marker_type(node);
    let block_separator = if is_tight_list(node) { "\n" } else { "\n\n" };
    let list_len = node.children.len() as u64;
    let starting_number = node.list_attrs().and_then(|attrs| attrs.start).unwrap_or(1);

    // Reserve room for the widest number that will be printed
    let widest_number = (list_len + starting_number).saturating_sub(1);
    let default_width = if consecutive_numbering {
        format!("{widest_number}{marker_type}{FIRST_LINE_INDENT}").len()
    } else {
        format!("{starting_number}{marker_type}{FIRST_LINE_INDENT}").len()
    };
    let indent = resolve_indent(default_width, directive);

    let number_width = widest_number.to_string().len();
    let first_item_marker = format!("{starting_number}{marker_type}");
    // Every later item repeats "1", zero-padded to the width of the first number
    let other_item_marker = format!(
        "{}1{marker_type}",
        "0".repeat(starting_number.to_string().len() - 1)
    );

    let mut context = context.indented(indent.width);
    node.children
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let text = context.render(item);
            let label = if consecutive_numbering {
                let number = starting_number + idx as u64;
                format!("{number:0>number_width$}{marker_type}")
            } else if idx == 0 {
                first_item_marker.clone()
            } else {
                other_item_marker.clone()
            };
            prefix_item(&text, &label, &indent.unit)
        })
        .collect::<Vec<_>>()
        .join(block_separator)
}

/// Put the marker before the first line and `indent_unit` before every other
/// non-empty line. Blank lines stay empty.
fn prefix_item(text: &str, marker: &str, indent_unit: &str) -> String {
    let mut lines = text.split('\n');
    let mut formatted = Vec::new();

    match lines.next() {
        Some(first) if !first.is_empty() => formatted.push(format!("{marker}{FIRST_LINE_INDENT}{first}")),
        _ => formatted.push(marker.to_string()),
    }
    formatted.extend(lines.map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{indent_unit}{line}")
        }
    }));
    formatted.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatOptions;
    use crate::render::{Renderers, render_document};
    use pretty_assertions::assert_eq;

    fn format_with(text: &str, directive: Option<IndentDirective>, number: bool) -> String {
        let options = FormatOptions {
            number,
            ..FormatOptions::default()
        };
        render_document(&Node::parse(text), &Renderers::with_editorconfig(), &options, directive)
    }

    fn format(text: &str, directive: Option<IndentDirective>) -> String {
        format_with(text, directive, false)
    }

    #[test]
    fn test_bullet_nested_four_spaces() {
        let out = format("- Item 1\n  - Nested item\n- Item 2\n", Some(IndentDirective::spaces(4)));
        assert_eq!(out, "- Item 1\n    - Nested item\n- Item 2\n");
    }

    #[test]
    fn test_bullet_continuation_four_spaces() {
        let out = format("- Item 1\n  with continuation\n- Item 2\n", Some(IndentDirective::spaces(4)));
        assert_eq!(out, "- Item 1\n    with continuation\n- Item 2\n");
    }

    #[test]
    fn test_bullet_tabs() {
        let out = format("- Item 1\n  - Nested item\n- Item 2\n", Some(IndentDirective::tabs(4)));
        assert_eq!(out, "- Item 1\n\t- Nested item\n- Item 2\n");
    }

    #[test]
    fn test_tabs_compose_per_level() {
        let input = "- a\n  - b\n    - c\n";
        let out = format(input, Some(IndentDirective::tabs(4)));
        assert_eq!(out, "- a\n\t- b\n\t\t- c\n");
    }

    #[test]
    fn test_passthrough_normalizes_to_marker_width() {
        let out = format("- Item 1\n    - Nested item\n- Item 2\n", None);
        assert_eq!(out, "- Item 1\n  - Nested item\n- Item 2\n");
    }

    #[test]
    fn test_ordered_nested_four_spaces() {
        let out = format("1. Item 1\n   1. Nested item\n2. Item 2\n", Some(IndentDirective::spaces(4)));
        assert_eq!(out, "1. Item 1\n    1. Nested item\n1. Item 2\n");
    }

    #[test]
    fn test_ordered_repeated_numbering_pads_placeholder() {
        let out = format("7. a\n8. b\n9. c\n", None);
        assert_eq!(out, "7. a\n1. b\n1. c\n");

        let out = format("10. a\n11. b\n", None);
        assert_eq!(out, "10. a\n01. b\n");
    }

    #[test]
    fn test_repeated_numbering_ignores_list_length() {
        let input: String = (1..=12).map(|n| format!("{n}. item\n")).collect();
        // Markers stay one digit wide even though the list reaches 12
        assert_eq!(format(&input, None), "1. item\n".repeat(12));
    }

    #[test]
    fn test_ordered_consecutive_numbering_zero_pads() {
        let input: String = (1..=10).map(|n| format!("{n}. item\n")).collect();
        let out = format_with(&input, None, true);
        let expected: String = (1..=10).map(|n| format!("{n:02}. item\n")).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_consecutive_default_width_follows_widest_number() {
        let input = "9. a\n   b\n10. c\n";
        let out = format_with(input, None, true);
        assert_eq!(out, "09. a\n    b\n10. c\n");
    }

    #[test]
    fn test_loose_list_keeps_blank_lines_unindented() {
        let input = "- one\n\n  para\n\n- two\n";
        let out = format(input, Some(IndentDirective::spaces(4)));
        assert_eq!(out, "- one\n\n    para\n\n- two\n");
    }

    #[test]
    fn test_empty_item_has_no_trailing_space() {
        let out = format("-\n- b\n", None);
        assert_eq!(out, "-\n- b\n");
    }

    #[test]
    fn test_zero_size_directive_does_not_panic() {
        let out = format("- a\n\n  b\n", Some(IndentDirective::spaces(0)));
        assert_eq!(out, "- a\n\nb\n");
    }

    #[test]
    fn test_code_block_in_item_uses_directive() {
        let input = "- item\n\n  ```\n  code\n  ```\n";
        let out = format(input, Some(IndentDirective::spaces(4)));
        assert_eq!(out, "- item\n\n    ```\n    code\n    ```\n");
    }

    #[test]
    fn test_prefix_item() {
        assert_eq!(prefix_item("a\n\nb", "-", "  "), "- a\n\n  b");
        assert_eq!(prefix_item("", "1.", "   "), "1.");
    }
}
