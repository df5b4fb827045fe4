use std::path::{Path, PathBuf};

use super::types::{ConfigError, FormatOptions, MDFORMAT_CONFIG_FILE};

/// Prevent runaway traversal on pathological paths
const MAX_DEPTH: usize = 100;

impl FormatOptions {
    /// Parse options from the contents of a `.mdformat.toml` file.
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Load options from an explicit file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path_str.clone(),
        })?;
        Self::from_toml_str(&content, &path_str)
    }

    /// Find the nearest `.mdformat.toml` at or above `start_dir`.
    ///
    /// Returns the path of the file that was found together with its options.
    pub fn discover(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current_dir = if start_dir.is_relative() {
            std::env::current_dir()
                .map(|cwd| cwd.join(start_dir))
                .unwrap_or_else(|_| start_dir.to_path_buf())
        } else {
            start_dir.to_path_buf()
        };

        for _ in 0..MAX_DEPTH {
            let config_path = current_dir.join(MDFORMAT_CONFIG_FILE);
            if config_path.is_file() {
                log::debug!("[mdfmt-config] Found options file: {}", config_path.display());
                let options = Self::load(&config_path)?;
                return Ok(Some((config_path, options)));
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => {
                    log::debug!("[mdfmt-config] Reached filesystem root without an options file");
                    return Ok(None);
                }
            }
        }

        log::debug!("[mdfmt-config] Maximum traversal depth reached");
        Ok(None)
    }

    /// Options that apply to `file`, or to the current directory for stdin.
    pub fn for_file(file: Option<&Path>) -> Result<Self, ConfigError> {
        let start_dir = match file.and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self::discover(&start_dir)?.map(|(_, options)| options).unwrap_or_default())
    }
}
