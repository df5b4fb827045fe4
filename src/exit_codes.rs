//! Exit codes for mdfmt
//!
//! These exit codes allow CI systems to tell "needs formatting" apart from
//! a broken invocation.

/// Success - Every file is formatted (or was reformatted)
pub const SUCCESS: i32 = 0;

/// `--check` found at least one file that would be reformatted
pub const UNFORMATTED: i32 = 1;

/// Tool error - Configuration error, file access error, or failed validation
pub const TOOL_ERROR: i32 = 2;
