//! The INI-like configuration codec.
//!
//! An ordered sequence of named sections, each an ordered sequence of
//! key/value lines. Key lookup is case-insensitive and returns the first
//! match. No escaping is supported; values may contain `=` (a line is
//! split only on the first one).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `key=value` line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IniLine {
    pub key: String,
    pub value: String,
}

impl fmt::Display for IniLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// A named section of ordered lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IniSection {
    pub name: String,
    pub lines: Vec<IniLine>,
}

impl IniSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// First line with the given key, compared case-insensitively.
    pub fn find(&self, key: &str) -> Option<&IniLine> {
        self.lines
            .iter()
            .find(|line| line.key.eq_ignore_ascii_case(key))
    }

    /// Value for the key, or the default when absent.
    pub fn get_value<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.find(key).map_or(default, |line| line.value.as_str())
    }

    /// Updates the value for the key, appending a new line when absent.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        match self
            .lines
            .iter_mut()
            .find(|line| line.key.eq_ignore_ascii_case(key))
        {
            Some(line) => line.value = value.into(),
            None => self.lines.push(IniLine {
                key: key.to_string(),
                value: value.into(),
            }),
        }
    }

    /// Removes every line with the given key.
    pub fn remove(&mut self, key: &str) {
        self.lines.retain(|line| !line.key.eq_ignore_ascii_case(key));
    }
}

impl fmt::Display for IniSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// An ordered sequence of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IniFile {
    pub sections: Vec<IniSection>,
}

impl IniFile {
    /// First section with the given name, compared case-insensitively.
    pub fn find_section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// The section with the given name, created on first use.
    pub fn get_or_create_section(&mut self, name: &str) -> &mut IniSection {
        let position = self
            .sections
            .iter()
            .position(|section| section.name.eq_ignore_ascii_case(name));
        match position {
            Some(index) => &mut self.sections[index],
            None => {
                self.sections.push(IniSection::new(name));
                self.sections.last_mut().unwrap()
            }
        }
    }

    /// Value of a key within a section, or the default.
    pub fn get_value<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.find_section(section)
            .map_or(default, |section| section.get_value(key, default))
    }

    /// Sets a value within a section, creating the section when absent.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.get_or_create_section(section).set_value(key, value);
    }

    /// Parses the text representation.
    ///
    /// Blank lines are skipped; a line starting with `[` opens a section;
    /// any other line under an open section splits once on the first `=`.
    /// Lines before the first section header are ignored.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut file = Self::default();

        for line in lines {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header.strip_suffix(']').unwrap_or(header);
                file.sections.push(IniSection::new(name));
            } else if let Some(section) = file.sections.last_mut() {
                let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
                section.lines.push(IniLine {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        file
    }
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}
