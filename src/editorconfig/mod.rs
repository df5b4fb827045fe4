//! `.editorconfig` resolution for indentation settings.
//!
//! Only `indent_style`, `indent_size` and `tab_width` influence formatting;
//! every other property is resolved but ignored.

mod glob;
mod parser;

pub use glob::SectionMatcher;
pub use parser::{EditorConfigFile, Section, parse};

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::ConfigError;
use crate::lists::{IndentDirective, IndentStyle};

pub const EDITORCONFIG_FILE: &str = ".editorconfig";

/// Tab width assumed when `indent_style = tab` gives no size at all
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Prevent runaway traversal on pathological paths
const MAX_DEPTH: usize = 100;

/// Properties that apply to one file after inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn apply(&mut self, properties: &[(String, String)]) {
        for (key, value) in properties {
            if value.eq_ignore_ascii_case("unset") {
                self.values.remove(key);
            } else {
                self.values.insert(key.clone(), value.clone());
            }
        }
    }

    /// Fill in the values editorconfig derives from each other.
    fn apply_defaults(&mut self) {
        let tab_style = self
            .get("indent_style")
            .is_some_and(|style| style.eq_ignore_ascii_case("tab"));
        if tab_style && self.get("indent_size").is_none() {
            self.values.insert("indent_size".to_string(), "tab".to_string());
        }

        let size_is_tab = self
            .get("indent_size")
            .is_some_and(|size| size.eq_ignore_ascii_case("tab"));
        if size_is_tab && let Some(tab_width) = self.get("tab_width").map(str::to_string) {
            self.values.insert("indent_size".to_string(), tab_width);
        }

        if self.get("tab_width").is_none()
            && let Some(size) = self.get("indent_size").filter(|size| size.parse::<usize>().is_ok())
        {
            let size = size.to_string();
            self.values.insert("tab_width".to_string(), size);
        }
    }

    /// The indentation directive these properties describe, if any.
    pub fn indent_directive(&self) -> Option<IndentDirective> {
        let style = self.get("indent_style").and_then(|style| match style.parse::<IndentStyle>() {
            Ok(style) => Some(style),
            Err(e) => {
                log::debug!("[mdfmt-config] Ignoring indent_style: {e}");
                None
            }
        });
        let size = self.get("indent_size").and_then(|size| size.parse::<usize>().ok());

        match (style, size) {
            (Some(style), Some(size)) => Some(IndentDirective::new(style, size)),
            (None, Some(size)) => Some(IndentDirective::spaces(size)),
            (Some(IndentStyle::Tab), None) => Some(IndentDirective::tabs(DEFAULT_TAB_WIDTH)),
            (Some(IndentStyle::Space), None) | (None, None) => None,
        }
    }
}

struct LoadedSection {
    matcher: Option<SectionMatcher>,
    properties: Vec<(String, String)>,
}

struct LoadedFile {
    root: bool,
    sections: Vec<LoadedSection>,
}

impl LoadedFile {
    fn compile(file: EditorConfigFile, path: &Path) -> Self {
        let sections = file
            .sections
            .into_iter()
            .map(|section| {
                let matcher = match SectionMatcher::new(&section.glob) {
                    Ok(matcher) => Some(matcher),
                    Err(e) => {
                        log::warn!(
                            "[mdfmt-config] Skipping section [{}] in {}: {e}",
                            section.glob,
                            path.display()
                        );
                        None
                    }
                };
                LoadedSection {
                    matcher,
                    properties: section.properties,
                }
            })
            .collect();
        Self {
            root: file.root,
            sections,
        }
    }
}

/// Resolves `.editorconfig` properties for file paths.
///
/// Parsed files are cached by path, so resolving every file of a project
/// reads each `.editorconfig` once. The cache is shared safely between threads.
#[derive(Default)]
pub struct EditorConfigResolver {
    cache: RwLock<HashMap<PathBuf, Option<Arc<LoadedFile>>>>,
}

impl EditorConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the properties that apply to `path`.
    ///
    /// The file itself does not need to exist.
    pub fn properties(&self, path: &Path) -> Result<Properties, ConfigError> {
        let target = absolute_path(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;

        // Nearest file first; stop after the first `root = true`
        let mut chain: Vec<(PathBuf, Arc<LoadedFile>)> = Vec::new();
        let mut dir = target.parent();
        for _ in 0..MAX_DEPTH {
            let Some(current) = dir else {
                break;
            };
            if let Some(file) = self.load(&current.join(EDITORCONFIG_FILE))? {
                let is_root = file.root;
                chain.push((current.to_path_buf(), file));
                if is_root {
                    log::debug!("[mdfmt-config] Stopping at root .editorconfig in {}", current.display());
                    break;
                }
            }
            dir = current.parent();
        }

        let mut properties = Properties::default();
        for (dir, file) in chain.iter().rev() {
            let Some(relative) = relative_glob_path(&target, dir) else {
                continue;
            };
            for section in &file.sections {
                if section.matcher.as_ref().is_some_and(|m| m.is_match(&relative)) {
                    properties.apply(&section.properties);
                }
            }
        }
        properties.apply_defaults();
        Ok(properties)
    }

    /// The indentation directive for `path`.
    ///
    /// Unreadable configuration is logged and treated like no configuration.
    pub fn indent_directive(&self, path: &Path) -> Option<IndentDirective> {
        match self.properties(path) {
            Ok(properties) => {
                let directive = properties.indent_directive();
                log::debug!("[mdfmt-config] Indent directive for {}: {directive:?}", path.display());
                directive
            }
            Err(e) => {
                log::warn!("[mdfmt-config] Ignoring .editorconfig for {}: {e}", path.display());
                None
            }
        }
    }

    fn load(&self, config_path: &Path) -> Result<Option<Arc<LoadedFile>>, ConfigError> {
        if let Ok(cache) = self.cache.read()
            && let Some(cached) = cache.get(config_path)
        {
            return Ok(cached.clone());
        }

        let loaded = if config_path.is_file() {
            log::debug!("[mdfmt-config] Reading {}", config_path.display());
            let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::IoError {
                source,
                path: config_path.display().to_string(),
            })?;
            Some(Arc::new(LoadedFile::compile(parse(&content), config_path)))
        } else {
            None
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(config_path.to_path_buf(), loaded.clone());
        }
        Ok(loaded)
    }
}

/// Make `path` absolute and drop `.`/`..` components without touching the filesystem.
fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// `target` relative to `dir`, joined with `/` as editorconfig globs expect.
fn relative_glob_path(target: &Path, dir: &Path) -> Option<String> {
    let relative = target.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
