//! Search dictionary types: terms, postings and found lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One dictionary term with its posting count.
///
/// Wire form is `count#text`; a line without `#` yields a zero count and
/// the whole line as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub count: u32,
    pub text: String,
}

impl TermInfo {
    /// Decodes one term line.
    pub fn parse_line(line: &str) -> Self {
        match line.split_once('#') {
            Some((count, text)) => Self {
                count: count.trim().parse().unwrap_or(0),
                text: text.to_string(),
            },
            None => Self {
                count: 0,
                text: line.to_string(),
            },
        }
    }

    /// Decodes a term list, skipping empty lines.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Self> {
        lines
            .iter()
            .map(|line| line.as_ref())
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect()
    }
}

impl fmt::Display for TermInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.count, self.text)
    }
}

/// One posting of a term: the record, field and occurrence it indexes.
///
/// Wire form is `mfn#tag#occurrence#count#text`, the trailing text being
/// optional. Decoding stops at the first line with fewer than four parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPosting {
    pub mfn: u32,
    pub tag: u32,
    pub occurrence: u32,
    pub count: u32,
    pub text: String,
}

impl TermPosting {
    fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.splitn(5, '#');
        let mfn = parts.next()?.trim().parse().ok()?;
        let tag = parts.next()?.trim().parse().ok()?;
        let occurrence = parts.next()?.trim().parse().ok()?;
        let count = parts.next()?.trim().parse().ok()?;
        Some(Self {
            mfn,
            tag,
            occurrence,
            count,
            text: parts.next().unwrap_or_default().to_string(),
        })
    }

    /// Decodes a posting list, stopping at the first malformed line.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Self> {
        let mut result = Vec::new();
        for line in lines {
            match Self::parse_line(line.as_ref()) {
                Some(posting) => result.push(posting),
                None => break,
            }
        }
        result
    }
}

impl fmt::Display for TermPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}#{}#{}#{}",
            self.mfn, self.tag, self.occurrence, self.count, self.text
        )
    }
}

/// One search hit: an MFN with an optional formatted description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundLine {
    pub mfn: u32,
    pub description: String,
}

impl FoundLine {
    /// Decodes one hit line, `mfn` alone or `mfn#description`.
    pub fn parse_line(line: &str) -> Self {
        match line.split_once('#') {
            Some((mfn, description)) => Self {
                mfn: mfn.trim().parse().unwrap_or(0),
                description: description.to_string(),
            },
            None => Self {
                mfn: line.trim().parse().unwrap_or(0),
                description: String::new(),
            },
        }
    }

    /// Decodes a hit list, skipping empty lines.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Self> {
        lines
            .iter()
            .map(|line| line.as_ref())
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect()
    }

    /// Projects a hit list onto bare MFNs.
    pub fn to_mfn(found: &[Self]) -> Vec<u32> {
        found.iter().map(|line| line.mfn).collect()
    }
}

impl fmt::Display for FoundLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.mfn)
        } else {
            write!(f, "{}#{}", self.mfn, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_with_and_without_hash() {
        let term = TermInfo::parse_line("42#K=BYTE");
        assert_eq!(term.count, 42);
        assert_eq!(term.text, "K=BYTE");

        let bare = TermInfo::parse_line("K=BYTE");
        assert_eq!(bare.count, 0);
        assert_eq!(bare.text, "K=BYTE");
    }

    #[test]
    fn test_term_list_skips_empty_lines() {
        let terms = TermInfo::parse(&["1#A", "", "2#B"]);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[1].count, 2);
    }

    #[test]
    fn test_posting_full_line() {
        let postings = TermPosting::parse(&["12#700#1#3#Пушкин, А. С."]);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].mfn, 12);
        assert_eq!(postings[0].tag, 700);
        assert_eq!(postings[0].occurrence, 1);
        assert_eq!(postings[0].count, 3);
        assert_eq!(postings[0].text, "Пушкин, А. С.");
    }

    #[test]
    fn test_posting_text_is_optional() {
        let postings = TermPosting::parse(&["12#700#1#3"]);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].text, "");
    }

    #[test]
    fn test_posting_stops_at_short_line() {
        let postings = TermPosting::parse(&["1#2#3#4#x", "1#2#3", "5#6#7#8"]);
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_found_line_forms() {
        let hit = FoundLine::parse_line("17#Brief description");
        assert_eq!(hit.mfn, 17);
        assert_eq!(hit.description, "Brief description");

        let bare = FoundLine::parse_line("17");
        assert_eq!(bare.mfn, 17);
        assert!(bare.description.is_empty());
    }

    #[test]
    fn test_found_to_mfn() {
        let found = FoundLine::parse(&["1#a", "2", "3#c"]);
        assert_eq!(FoundLine::to_mfn(&found), vec![1, 2, 3]);
    }
}
