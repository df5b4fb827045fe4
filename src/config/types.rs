use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;

/// Name of the formatter options file, shared with mdformat.
pub const MDFORMAT_CONFIG_FILE: &str = ".mdformat.toml";

/// Paragraph wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawWrapMode", into = "RawWrapMode")]
pub enum WrapMode {
    /// Keep line breaks as written
    #[default]
    Keep,
    /// Join every paragraph onto one line
    No,
    /// Fill paragraphs to this many columns
    Columns(usize),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawWrapMode {
    Columns(i64),
    Keyword(String),
}

impl TryFrom<RawWrapMode> for WrapMode {
    type Error = String;

    fn try_from(raw: RawWrapMode) -> Result<Self, Self::Error> {
        match raw {
            RawWrapMode::Columns(columns) if columns > 0 => Ok(WrapMode::Columns(columns as usize)),
            RawWrapMode::Columns(columns) => Err(format!("wrap width must be positive, got {columns}")),
            RawWrapMode::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<WrapMode> for RawWrapMode {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Keep => RawWrapMode::Keyword("keep".to_string()),
            WrapMode::No => RawWrapMode::Keyword("no".to_string()),
            WrapMode::Columns(columns) => RawWrapMode::Columns(columns as i64),
        }
    }
}

impl FromStr for WrapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(WrapMode::Keep),
            "no" => Ok(WrapMode::No),
            other => match other.parse::<usize>() {
                Ok(columns) if columns > 0 => Ok(WrapMode::Columns(columns)),
                _ => Err(format!("invalid wrap mode '{s}' (expected 'keep', 'no' or a positive integer)")),
            },
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapMode::Keep => f.write_str("keep"),
            WrapMode::No => f.write_str("no"),
            WrapMode::Columns(columns) => write!(f, "{columns}"),
        }
    }
}

/// Line ending written to formatted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    #[default]
    Lf,
    Crlf,
    /// Reuse the first line ending found in the input
    Keep,
}

impl FromStr for EndOfLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lf" => Ok(EndOfLine::Lf),
            "crlf" => Ok(EndOfLine::Crlf),
            "keep" => Ok(EndOfLine::Keep),
            _ => Err(format!("invalid end of line '{s}' (expected 'lf', 'crlf' or 'keep')")),
        }
    }
}

impl EndOfLine {
    /// Convert `\n`-terminated output to this line ending, looking at `source` for `Keep`.
    pub fn apply(self, output: String, source: &str) -> String {
        let crlf = match self {
            EndOfLine::Lf => false,
            EndOfLine::Crlf => true,
            EndOfLine::Keep => source
                .find('\n')
                .is_some_and(|pos| pos > 0 && source.as_bytes()[pos - 1] == b'\r'),
        };
        if crlf { output.replace('\n', "\r\n") } else { output }
    }
}

/// Formatting options read from `.mdformat.toml`
///
/// Keys this formatter does not use (such as mdformat's `extensions`) are
/// accepted and ignored so the file can be shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Paragraph wrapping mode
    pub wrap: WrapMode,

    /// Number ordered list items consecutively instead of repeating "1."
    pub number: bool,

    /// Line ending of the output
    pub end_of_line: EndOfLine,

    /// Check that the output renders to the same HTML as the input
    pub validate: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            wrap: WrapMode::default(),
            number: false,
            end_of_line: EndOfLine::default(),
            validate: true,
        }
    }
}

/// Options given on the command line; set fields win over the options file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub wrap: Option<WrapMode>,
    pub number: Option<bool>,
    pub end_of_line: Option<EndOfLine>,
    pub validate: Option<bool>,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: FormatOptions) -> FormatOptions {
        if let Some(wrap) = self.wrap {
            options.wrap = wrap;
        }
        if let Some(number) = self.number {
            options.number = number;
        }
        if let Some(end_of_line) = self.end_of_line {
            options.end_of_line = end_of_line;
        }
        if let Some(validate) = self.validate {
            options.validate = validate;
        }
        options
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse a configuration file
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError { path: String, message: String },
}
