//! The paired-line menu codec (MNU files).
//!
//! A menu is an ordered sequence of code/comment pairs, one line each.
//! The list ends at the first empty code or at the format's end marker:
//! a code whose characters from position 5 onward are a run of asterisks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters stripped from a code in the last lookup pass.
const CODE_PUNCTUATION: [char; 3] = ['-', '=', ':'];

/// One code/comment pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub code: String,
    pub comment: String,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.comment)
    }
}

/// An ordered sequence of menu entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFile {
    pub entries: Vec<MenuEntry>,
}

impl MenuFile {
    /// Appends an entry, chaining.
    pub fn add(&mut self, code: impl Into<String>, comment: impl Into<String>) -> &mut Self {
        self.entries.push(MenuEntry {
            code: code.into(),
            comment: comment.into(),
        });
        self
    }

    /// Parses the server representation: lines consumed two at a time.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut menu = Self::default();
        let mut index = 0;

        while index < lines.len() {
            let code = lines[index].as_ref();
            if code.is_empty() || is_end_marker(code) {
                break;
            }

            let Some(comment) = lines.get(index + 1) else {
                break;
            };

            menu.add(code, comment.as_ref());
            index += 2;
        }

        menu
    }

    /// Finds the entry for a code, falling back through three
    /// normalization passes: exact, trimmed, trimmed of punctuation.
    pub fn get_entry(&self, code: &str) -> Option<&MenuEntry> {
        if let Some(entry) = self.find(code) {
            return Some(entry);
        }

        let trimmed = code.trim();
        if let Some(entry) = self.find(trimmed) {
            return Some(entry);
        }

        // last pass compares with punctuation stripped from both sides
        let bare = Self::trim_code(trimmed);
        self.entries
            .iter()
            .find(|entry| Self::trim_code(&entry.code).eq_ignore_ascii_case(bare))
    }

    /// Comment for the code, or the default when absent.
    pub fn get_value<'a>(&'a self, code: &str, default: &'a str) -> &'a str {
        self.get_entry(code)
            .map_or(default, |entry| entry.comment.as_str())
    }

    /// Strips surrounding punctuation from a code.
    pub fn trim_code(code: &str) -> &str {
        code.trim_matches(|c| CODE_PUNCTUATION.contains(&c))
    }

    fn find(&self, code: &str) -> Option<&MenuEntry> {
        self.entries
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for MenuFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// The designated end-of-list marker: asterisks from position 5 onward.
fn is_end_marker(code: &str) -> bool {
    code.get(5..).map_or(false, |tail| tail == "*****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let lines = ["IBIS", "Электронный каталог", "RDR", "Читатели"];
        let menu = MenuFile::parse(&lines);
        assert_eq!(menu.entries.len(), 2);
        assert_eq!(menu.entries[0].code, "IBIS");
        assert_eq!(menu.entries[1].comment, "Читатели");
    }

    #[test]
    fn test_parse_stops_at_end_marker() {
        let lines = ["1", "one", "**********", "tail", "2", "two"];
        let menu = MenuFile::parse(&lines);
        assert_eq!(menu.entries.len(), 1);
    }

    #[test]
    fn test_parse_stops_at_empty_code() {
        let lines = ["1", "one", "", "ignored"];
        let menu = MenuFile::parse(&lines);
        assert_eq!(menu.entries.len(), 1);
    }

    #[test]
    fn test_parse_stops_at_missing_comment() {
        let lines = ["1", "one", "2"];
        let menu = MenuFile::parse(&lines);
        assert_eq!(menu.entries.len(), 1);
    }

    #[test]
    fn test_short_code_is_not_end_marker() {
        // fewer than five leading characters cannot carry the marker
        let lines = ["*", "star"];
        let menu = MenuFile::parse(&lines);
        assert_eq!(menu.entries.len(), 1);
    }

    #[test]
    fn test_lookup_normalization_passes() {
        let mut menu = MenuFile::default();
        menu.add("1.-", "x");
        assert_eq!(menu.get_entry("1.-").unwrap().comment, "x");
        assert_eq!(menu.get_entry(" 1.- ").unwrap().comment, "x");
        assert_eq!(menu.get_entry("1.").unwrap().comment, "x");
        assert!(menu.get_entry("2").is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut menu = MenuFile::default();
        menu.add("ibis", "catalog");
        assert_eq!(menu.get_value("IBIS", ""), "catalog");
    }

    #[test]
    fn test_get_value_default() {
        let menu = MenuFile::default();
        assert_eq!(menu.get_value("nope", "dflt"), "dflt");
    }
}
