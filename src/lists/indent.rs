//! Indentation unit resolution for list continuation lines.

use std::fmt;
use std::str::FromStr;

/// Character used to indent list continuation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentStyle {
    Space,
    Tab,
}

impl IndentStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentStyle::Space => "space",
            IndentStyle::Tab => "tab",
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "space" => Ok(IndentStyle::Space),
            "tab" => Ok(IndentStyle::Tab),
            other => Err(format!("unknown indent style '{other}'")),
        }
    }
}

/// Indentation settings that apply to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndentDirective {
    pub style: IndentStyle,
    pub size: usize,
}

impl IndentDirective {
    pub fn new(style: IndentStyle, size: usize) -> Self {
        Self { style, size }
    }

    pub fn spaces(size: usize) -> Self {
        Self::new(IndentStyle::Space, size)
    }

    pub fn tabs(size: usize) -> Self {
        Self::new(IndentStyle::Tab, size)
    }
}

/// The literal prefix for continuation lines and the column width it stands for.
///
/// For tabs the two disagree: one `\t` is written, but nested content is
/// tracked as if it were `width` columns deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndent {
    pub unit: String,
    pub width: usize,
}

/// Resolve the indent for a list whose markers occupy `default_width` columns.
///
/// Without a directive the marker-derived default is used, which keeps the
/// output identical to an unconfigured formatter.
pub fn resolve_indent(default_width: usize, directive: Option<IndentDirective>) -> ResolvedIndent {
    match directive {
        None => ResolvedIndent {
            unit: " ".repeat(default_width),
            width: default_width,
        },
        Some(IndentDirective {
            style: IndentStyle::Tab,
            size,
        }) => ResolvedIndent {
            unit: "\t".to_string(),
            width: size,
        },
        Some(IndentDirective {
            style: IndentStyle::Space,
            size,
        }) => ResolvedIndent {
            unit: " ".repeat(size),
            width: size,
        },
    }
}
