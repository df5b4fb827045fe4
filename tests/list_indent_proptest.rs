use mdfmt_lib::render::render_document;
use mdfmt_lib::{FormatOptions, IndentDirective, Node, Renderers};
use proptest::prelude::*;

fn format_with(text: &str, directive: Option<IndentDirective>) -> String {
    render_document(
        &Node::parse(text),
        &Renderers::with_editorconfig(),
        &FormatOptions::default(),
        directive,
    )
}

/// Nested bullet/ordered lists where each item is at most one level deeper than the previous.
fn nested_list_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((0usize..4, "[a-z]{1,8}", any::<bool>(), any::<bool>()), 1..12).prop_map(|items| {
        let mut out = String::new();
        let mut depth = 0usize;
        for (i, (wanted, word, ordered, continuation)) in items.into_iter().enumerate() {
            depth = if i == 0 { 0 } else { wanted.min(depth + 1) };
            let indent = "   ".repeat(depth);
            let marker = if ordered { "1." } else { "-" };
            out.push_str(&format!("{indent}{marker} {word}\n"));
            if continuation {
                out.push_str(&format!("{indent}   more {word}\n"));
            }
        }
        out
    })
}

fn directive_strategy() -> impl Strategy<Value = Option<IndentDirective>> {
    prop_oneof![
        Just(None),
        (3usize..=5).prop_map(|size| Some(IndentDirective::spaces(size))),
        (1usize..=8).prop_map(|size| Some(IndentDirective::tabs(size))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_formatting_is_idempotent(text in nested_list_strategy(), directive in directive_strategy()) {
        let once = format_with(&text, directive);
        let twice = format_with(&once, directive);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_lines_are_never_indented(text in nested_list_strategy(), directive in directive_strategy()) {
        let formatted = format_with(&text, directive);
        for line in formatted.lines() {
            prop_assert!(line.is_empty() || !line.trim().is_empty(), "whitespace-only line in {:?}", formatted);
        }
    }

    #[test]
    fn test_tab_directive_indents_only_with_tabs(text in nested_list_strategy(), size in 1usize..=8) {
        let formatted = format_with(&text, Some(IndentDirective::tabs(size)));
        for line in formatted.lines() {
            let leading: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            prop_assert!(leading.chars().all(|c| c == '\t'), "space indentation in {:?}", line);
        }
    }
}
