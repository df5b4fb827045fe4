//! Paragraph wrapping for `wrap = <columns>`
//!
//! Words are filled greedily. Code spans are kept whole so that runs of
//! spaces inside them survive, and lines ending in a hard break stay
//! separate lines.

use unicode_width::UnicodeWidthStr;

/// Wrap rendered paragraph text so each line fits within `width` columns.
///
/// A single word wider than `width` gets a line of its own; it is never split.
pub fn wrap_text(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|segment| fill(&split_words(segment), width.max(1)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fill(words: &[String], width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in words {
        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Split on spaces, keeping code spans (including their spaces) inside one word.
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut idx = 0;

    while idx < chars.len() {
        let c = chars[idx];
        match c {
            '\\' if idx + 1 < chars.len() => {
                current.push(c);
                current.push(chars[idx + 1]);
                idx += 2;
            }
            '`' => {
                let run = count_run(&chars, idx, '`');
                match find_closing_run(&chars, idx + run, run) {
                    Some(end) => {
                        current.extend(&chars[idx..end + run]);
                        idx = end + run;
                    }
                    None => {
                        current.extend(&chars[idx..idx + run]);
                        idx += run;
                    }
                }
            }
            ' ' => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                idx += 1;
            }
            _ => {
                current.push(c);
                idx += 1;
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn count_run(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == ch).count()
}

fn find_closing_run(chars: &[char], from: usize, len: usize) -> Option<usize> {
    let mut idx = from;
    while idx < chars.len() {
        if chars[idx] == '`' {
            let run = count_run(chars, idx, '`');
            if run == len {
                return Some(idx);
            }
            idx += run;
        } else {
            idx += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_fill() {
        assert_eq!(wrap_text("aaa bbb ccc ddd", 7), "aaa bbb\nccc ddd");
    }

    #[test]
    fn test_long_word_gets_own_line() {
        assert_eq!(wrap_text("a supercalifragilistic b", 5), "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn test_code_span_is_atomic() {
        assert_eq!(wrap_text("x `a  b` y", 3), "x\n`a  b`\ny");
    }

    #[test]
    fn test_hard_breaks_are_kept() {
        assert_eq!(wrap_text("one two\\\nthree", 80), "one two\\\nthree");
    }

    #[test]
    fn test_zero_width_still_makes_progress() {
        assert_eq!(wrap_text("a b", 0), "a\nb");
    }

    #[test]
    fn test_wide_characters_count_double() {
        assert_eq!(wrap_text("日本 語", 5), "日本\n語");
    }
}
