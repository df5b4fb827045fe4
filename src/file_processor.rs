//! File discovery and per-file formatting for the CLI

use anyhow::{Context, bail};
use ignore::WalkBuilder;
use mdfmt_lib::{EditorConfigResolver, FormatOptions, FormatSession, OptionOverrides, Renderers};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings shared by every file of one invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Report files that would change instead of writing them
    pub check: bool,
    /// Take list indentation from `.editorconfig`
    pub use_editorconfig: bool,
    /// CLI flags layered over each file's `.mdformat.toml`
    pub overrides: OptionOverrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Reformatted,
    WouldReformat,
}

/// Expand the command line paths into the Markdown files to format.
///
/// Explicit files are always included; directories are walked for Markdown
/// files, honoring `.gitignore`.
pub fn discover_markdown_files(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if !path.is_dir() {
            bail!("File not found: {path_str}");
        }

        let mut types_builder = ignore::types::TypesBuilder::new();
        types_builder.add_defaults();
        types_builder.add("markdown", "*.md")?;
        types_builder.add("markdown", "*.markdown")?;
        types_builder.select("markdown");
        let types = types_builder.build()?;

        for entry in WalkBuilder::new(path).types(types).build() {
            let entry = entry?;
            if entry.file_type().is_some_and(|ft| ft.is_file()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    log::debug!("[mdfmt-cli] Discovered {} markdown files", files.len());
    Ok(files)
}

fn session_for(
    file: Option<&Path>,
    resolver: &Arc<EditorConfigResolver>,
    opts: &ProcessOptions,
) -> anyhow::Result<FormatSession> {
    let options = opts.overrides.apply(FormatOptions::for_file(file)?);
    let mut session = FormatSession::with_resolver(options, Arc::clone(resolver));
    if !opts.use_editorconfig {
        session = session.with_renderers(Renderers::default());
    }
    session.set_current_file(file);
    Ok(session)
}

/// Format one file in place (or only compare it in check mode).
pub fn process_file(
    path: &Path,
    resolver: &Arc<EditorConfigResolver>,
    opts: &ProcessOptions,
) -> anyhow::Result<FileOutcome> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let session = session_for(Some(path), resolver, opts)?;
    let formatted = session.format_checked(&content)?;

    if formatted == content {
        return Ok(FileOutcome::Unchanged);
    }
    if opts.check {
        return Ok(FileOutcome::WouldReformat);
    }
    std::fs::write(path, formatted).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(FileOutcome::Reformatted)
}

/// Format every file, in parallel when the `parallel` feature is enabled.
///
/// Each file gets its own session; only the `.editorconfig` cache is shared.
pub fn process_files(files: &[PathBuf], opts: &ProcessOptions) -> Vec<(PathBuf, anyhow::Result<FileOutcome>)> {
    let resolver = Arc::new(EditorConfigResolver::new());
    let run = |path: &PathBuf| (path.clone(), process_file(path, &resolver, opts));

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        files.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files.iter().map(run).collect()
    }
}

/// Format standard input to standard output, resolving configuration from the working directory.
pub fn process_stdin(opts: &ProcessOptions) -> anyhow::Result<FileOutcome> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read standard input")?;

    let resolver = Arc::new(EditorConfigResolver::new());
    let session = session_for(None, &resolver, opts)?;
    let formatted = session.format_checked(&content)?;

    if opts.check {
        return Ok(if formatted == content {
            FileOutcome::Unchanged
        } else {
            FileOutcome::WouldReformat
        });
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(formatted.as_bytes())?;
    stdout.flush()?;
    Ok(if formatted == content {
        FileOutcome::Unchanged
    } else {
        FileOutcome::Reformatted
    })
}
