//! Lenient parser for the `.editorconfig` INI dialect.
//!
//! Nothing here is fatal: lines that are neither comments, section headers
//! nor `key = value` pairs are skipped.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorConfigFile {
    /// `root = true` in the preamble stops the upward search
    pub root: bool,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The glob between the brackets
    pub glob: String,
    /// Lowercased keys with trimmed values, in file order
    pub properties: Vec<(String, String)>,
}

pub fn parse(content: &str) -> EditorConfigFile {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut file = EditorConfigFile::default();

    for (line_num, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(glob) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            file.sections.push(Section {
                glob: glob.to_string(),
                properties: Vec::new(),
            });
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::debug!("[mdfmt-config] Skipping malformed .editorconfig line {}: {line}", line_num + 1);
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if key.is_empty() {
            continue;
        }

        match file.sections.last_mut() {
            Some(section) => section.properties.push((key, value)),
            None if key == "root" => file.root = value.eq_ignore_ascii_case("true"),
            None => log::debug!("[mdfmt-config] Ignoring preamble key '{key}'"),
        }
    }

    file
}
