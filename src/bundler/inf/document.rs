//! Section-keyed text documents in INF syntax.
//!
//! [`InfDocument`] is the in-memory form of every file this crate generates
//! for the Windows setup engines: the install script itself and the
//! IExpress directives. It is an ordered list of sections, each holding raw
//! lines. Lines of the form `key=value` can be addressed by key.
//!
//! # Key matching
//!
//! A line belongs to `key` when it starts with `key=`. This is a literal
//! prefix match: callers must not use keys that contain `=`, and a key that
//! is a prefix of another key followed by `=` would match both. The first
//! matching line wins; duplicate lines are never merged.

use crate::bundler::{Result, utils::fs::{TextEncoding, write_text_file}};
use std::{fmt, path::Path};

/// Line terminator required by the setup engines on every host.
pub const CRLF: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    lines: Vec<String>,
}

/// Ordered, section-keyed text document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfDocument {
    sections: Vec<Section>,
}

impl InfDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the lines of `section` wholesale.
    ///
    /// An existing section keeps its position; a new one is appended.
    pub fn set_section<I, S>(&mut self, section: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.section_mut(section).lines = lines;
    }

    /// Appends one raw line to `section`, creating the section if needed.
    pub fn add_line(&mut self, section: &str, line: impl Into<String>) {
        self.section_mut(section).lines.push(line.into());
    }

    /// Sets `key=value` in `section`.
    ///
    /// The first existing line for `key` is rewritten in place; otherwise a
    /// new line is appended.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl fmt::Display) {
        let line = format!("{key}={value}");
        let lines = &mut self.section_mut(section).lines;
        match find_key(lines, key) {
            Some(index) => lines[index] = line,
            None => lines.push(line),
        }
    }

    /// Appends `item` to the comma-separated list stored under `key`.
    ///
    /// Creates `key=item` if the key is not present yet.
    pub fn append_to_list_value(&mut self, section: &str, key: &str, item: &str) {
        let lines = &mut self.section_mut(section).lines;
        match find_key(lines, key) {
            Some(index) => {
                let line = &mut lines[index];
                line.push(',');
                line.push_str(item);
            }
            None => lines.push(format!("{key}={item}")),
        }
    }

    /// Returns the lines of `section`, or an empty slice if it does not exist.
    pub fn section_lines(&self, section: &str) -> &[String] {
        self.section(section)
            .map(|s| s.lines.as_slice())
            .unwrap_or_default()
    }

    /// Returns the value stored under `key` in `section`.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        let lines = &self.section(section)?.lines;
        find_key(lines, key).map(|index| &lines[index][key.len() + 1..])
    }

    /// Returns whether `section` exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Section names in insertion order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Serializes the document and writes it to `path`.
    ///
    /// The file is plain ASCII when possible, UTF-16 otherwise.
    pub fn write_to_file(&self, path: &Path) -> Result<TextEncoding> {
        write_text_file(path, &self.to_string())
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    lines: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

fn find_key(lines: &[String], key: &str) -> Option<usize> {
    lines.iter().position(|line| {
        line.strip_prefix(key)
            .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Renders `[section]` headers in insertion order, each followed by its
/// lines and a blank line, joined with CRLF.
impl fmt::Display for InfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<&str> = Vec::new();
        let headers: Vec<String> = self.sections.iter().map(|s| format!("[{}]", s.name)).collect();

        for (section, header) in self.sections.iter().zip(&headers) {
            lines.push(header);
            lines.extend(section.lines.iter().map(String::as_str));
            lines.push("");
        }

        f.write_str(&lines.join(CRLF))
    }
}
