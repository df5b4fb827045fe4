//! Section glob matching for `.editorconfig`
//!
//! Editorconfig globs are close to globset's with `literal_separator`: `*`
//! stops at `/` while `**` crosses it. The differences handled here are
//! numeric ranges (`{1..3}`), which are expanded into alternations, and
//! anchoring: a glob without `/` matches at any depth below the file.

use std::sync::LazyLock;

use globset::{GlobBuilder, GlobMatcher};
use regex::{Captures, Regex};

/// Ranges wider than this are left unexpanded (and so match nothing)
const MAX_RANGE_LEN: i64 = 1000;

static NUMERIC_RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(-?\d+)\.\.(-?\d+)\}").unwrap());

// `**` directly followed by a name, as in `docs/**.md`
static GLUED_DOUBLE_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|/)\*\*([^/*])").unwrap());

#[derive(Debug, Clone)]
pub struct SectionMatcher {
    matcher: GlobMatcher,
}

impl SectionMatcher {
    pub fn new(section: &str) -> Result<Self, globset::Error> {
        let pattern = translate(section);
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    /// `relative_path` is the target relative to the `.editorconfig` directory, `/`-separated.
    pub fn is_match(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }
}

fn translate(section: &str) -> String {
    let ranges = expand_numeric_ranges(section);
    let pattern = GLUED_DOUBLE_STAR.replace_all(&ranges, "$1**/*$2");
    if pattern.contains('/') {
        pattern.trim_start_matches('/').to_string()
    } else {
        format!("**/{pattern}")
    }
}

fn expand_numeric_ranges(pattern: &str) -> String {
    NUMERIC_RANGE
        .replace_all(pattern, |caps: &Captures| {
            let bounds = (caps[1].parse::<i64>(), caps[2].parse::<i64>());
            let (Ok(start), Ok(end)) = bounds else {
                return caps[0].to_string();
            };
            let (low, high) = if start <= end { (start, end) } else { (end, start) };
            if high - low >= MAX_RANGE_LEN {
                log::debug!("[mdfmt-config] Numeric range {} is too wide to expand", &caps[0]);
                return caps[0].to_string();
            }
            let numbers: Vec<String> = (low..=high).map(|n| n.to_string()).collect();
            format!("{{{}}}", numbers.join(","))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(section: &str, path: &str) -> bool {
        SectionMatcher::new(section).unwrap().is_match(path)
    }

    #[test]
    fn test_basename_glob_matches_any_depth() {
        assert!(matches("*.md", "test.md"));
        assert!(matches("*.md", "docs/test.md"));
        assert!(!matches("*.md", "test.txt"));
    }

    #[test]
    fn test_star_matches_everything() {
        assert!(matches("*", "README.md"));
        assert!(matches("*", "a/b/c.rs"));
    }

    #[test]
    fn test_slash_anchors_to_config_dir() {
        assert!(matches("docs/*.md", "docs/a.md"));
        assert!(!matches("docs/*.md", "other/docs/a.md"));
        assert!(!matches("docs/*.md", "docs/deep/a.md"));
        assert!(matches("/docs/**/*.md", "docs/deep/a.md"));
    }

    #[test]
    fn test_double_star_glued_to_name() {
        assert!(matches("docs/**.md", "docs/a.md"));
        assert!(matches("docs/**.md", "docs/deep/er/a.md"));
        assert!(!matches("docs/**.md", "other/a.md"));
    }

    #[test]
    fn test_alternatives_and_classes() {
        assert!(matches("*.{md,markdown}", "a.markdown"));
        assert!(matches("[Rr]EADME.md", "README.md"));
        assert!(!matches("[!R]EADME.md", "README.md"));
    }

    #[test]
    fn test_numeric_ranges() {
        assert_eq!(expand_numeric_ranges("file{1..3}.md"), "file{1,2,3}.md");
        assert!(matches("chapter{1..12}.md", "chapter10.md"));
        assert!(!matches("chapter{1..12}.md", "chapter13.md"));
    }
}
