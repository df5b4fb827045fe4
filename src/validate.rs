//! Check that formatting did not change what a document means.

use pulldown_cmark::{Options, Parser, html};

/// Render Markdown to HTML with the same parser settings the formatter uses.
pub fn to_html(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(text, Options::empty()));
    out
}

/// Whether `original` and `formatted` render to the same HTML.
///
/// Whitespace runs are collapsed first: wrapping legitimately turns spaces
/// into newlines and back.
pub fn renders_equal(original: &str, formatted: &str) -> bool {
    normalize_html(&to_html(original)) == normalize_html(&to_html(formatted))
}

fn normalize_html(html: &str) -> String {
    html.split_whitespace().collect::<Vec<_>>().join(" ")
}
