// ini.rs - Sectioned key = value configuration provider

use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::literal::{parse_literal, strip_comment, unquote};
use super::traits::{BoxError, ConfigMap, ConfigValue, Provider};
use super::ParseError;

fn section_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\[+)\s*([^\[\]]+?)\s*(\]+)\s*(?:#.*)?$").expect("valid section regex")
    })
}

fn keyword_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*("[^"]*"|'[^']*'|[^'"=\s][^=]*?)\s*=\s*(.*?)\s*$"#)
            .expect("valid keyword regex")
    })
}

/// Provider for INI-style files with nested `[section]` / `[[subsection]]` markers
///
/// In literal mode (the default) values are parsed as typed literals, so
/// `count = 5` yields an integer and `names = ['a', 'b']` a list. With
/// literal mode off every value is a plain string.
#[derive(Debug, Clone)]
pub struct IniProvider {
    literal: bool,
    section: Option<String>,
}

impl IniProvider {
    pub fn new() -> Self {
        Self {
            literal: true,
            section: None,
        }
    }

    /// Toggle typed literal parsing of values
    pub fn literal(mut self, literal: bool) -> Self {
        self.literal = literal;
        self
    }

    /// Only return the key/value pairs of the named top-level section
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Parse configuration text that has already been read into memory
    pub fn parse_str(&self, content: &str) -> Result<ConfigMap, ParseError> {
        let config = parse_sections(content, self.literal)?;
        match &self.section {
            None => Ok(config),
            Some(name) => scope_to_section(config, name),
        }
    }
}

impl Default for IniProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for IniProvider {
    fn provide(&self, file_path: &Path, command_name: &str) -> Result<ConfigMap, BoxError> {
        let content = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), command = command_name, "configuration file not found, using empty configuration");
                String::new()
            }
            Err(e) => {
                return Err(ParseError::Io {
                    path: file_path.to_path_buf(),
                    source: e,
                }
                .into())
            }
        };
        Ok(self.parse_str(&content)?)
    }
}

/// Flatten the configuration down to one section's own entries.
pub(crate) fn scope_to_section(mut config: ConfigMap, name: &str) -> Result<ConfigMap, ParseError> {
    match config.remove(name) {
        Some(ConfigValue::Table(table)) => Ok(table),
        _ => Err(ParseError::MissingSection(name.to_string())),
    }
}

fn parse_sections(content: &str, literal: bool) -> Result<ConfigMap, ParseError> {
    let mut root = ConfigMap::new();
    // Names of the currently open sections, outermost first.
    let mut path: Vec<String> = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = section_marker().captures(raw_line) {
            let depth = caps[1].len();
            if depth != caps[3].len() {
                return Err(ParseError::Syntax {
                    line: line_no,
                    message: "cannot compute the section depth".to_string(),
                });
            }
            if depth > path.len() + 1 {
                return Err(ParseError::Syntax {
                    line: line_no,
                    message: "section too nested".to_string(),
                });
            }
            let name = unquote(&caps[2]).to_string();
            path.truncate(depth - 1);
            let parent = section_mut(&mut root, &path);
            if parent.contains_key(&name) {
                return Err(ParseError::Syntax {
                    line: line_no,
                    message: format!("duplicate section name '{}'", name),
                });
            }
            parent.insert(name.clone(), ConfigValue::Table(ConfigMap::new()));
            path.push(name);
            continue;
        }

        let caps = keyword_line().captures(raw_line).ok_or_else(|| ParseError::Syntax {
            line: line_no,
            message: format!("invalid line '{}'", trimmed),
        })?;
        let key = unquote(caps[1].trim()).to_string();
        let raw_value = &caps[2];

        let value = if literal {
            parse_literal(raw_value).map_err(|message| ParseError::Literal {
                line: line_no,
                message,
            })?
        } else {
            Some(ConfigValue::String(unquote(strip_comment(raw_value).trim()).to_string()))
        };

        let section = section_mut(&mut root, &path);
        if section.contains_key(&key) {
            return Err(ParseError::Syntax {
                line: line_no,
                message: format!("duplicate keyword name '{}'", key),
            });
        }
        match value {
            Some(value) => {
                section.insert(key, value);
            }
            None => debug!(line = line_no, key = %key, "skipping key set to None"),
        }
    }

    Ok(root)
}

fn section_mut<'a>(root: &'a mut ConfigMap, path: &[String]) -> &'a mut ConfigMap {
    let mut current = root;
    for name in path {
        let entry = current
            .entry(name.clone())
            .or_insert_with(|| ConfigValue::Table(ConfigMap::new()));
        if !entry.is_table() {
            *entry = ConfigValue::Table(ConfigMap::new());
        }
        current = match entry {
            ConfigValue::Table(table) => table,
            _ => unreachable!("entry was just made a table"),
        };
    }
    current
}
