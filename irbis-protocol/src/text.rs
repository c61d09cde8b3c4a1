//! Text encodings and format-string utilities.
//!
//! Two encodings are multiplexed within one packet: ANSI is the server's
//! native Windows-1251 code page, UTF is pass-through UTF-8 supplied by the
//! caller. Every line is tagged with its encoding at encode and decode time;
//! the encoding is never implicit context.

use encoding_rs::WINDOWS_1251;

/// The two-byte control sequence separating record fields on the wire.
///
/// Inside bulk text payloads the server reuses it as a logical newline.
pub const IRBIS_DELIMITER: &[u8] = b"\x1F\x1E";

/// The field delimiter as a string slice, for text-level replacement.
pub const IRBIS_DELIMITER_TEXT: &str = "\x1F\x1E";

/// Text encoding of a single protocol line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// The server's native code page (Windows-1251).
    Ansi,
    /// Pass-through UTF-8, transmitted unmodified.
    Utf,
}

impl Encoding {
    /// Converts text to wire bytes in this encoding.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Ansi => to_ansi(text),
            Encoding::Utf => text.as_bytes().to_vec(),
        }
    }

    /// Converts wire bytes in this encoding to text.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Ansi => from_ansi(bytes),
            Encoding::Utf => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Converts text to the server's code page.
pub fn to_ansi(text: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1251.encode(text);
    bytes.into_owned()
}

/// Converts bytes in the server's code page to text.
pub fn from_ansi(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1251.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Replaces every field delimiter in a bulk text payload with a newline.
pub fn irbis_to_dos(text: &str) -> String {
    text.replace(IRBIS_DELIMITER_TEXT, "\n")
}

/// Splits a bulk text payload on field delimiters.
pub fn irbis_to_lines(text: &str) -> Vec<&str> {
    text.split(IRBIS_DELIMITER_TEXT).collect()
}

/// Strips `/* ...` comments from a format string.
///
/// A comment opener is only recognized outside single-quoted, double-quoted
/// and vertical-bar-quoted spans and runs to the end of the line; the line
/// terminator itself is preserved, the comment text is not.
pub fn remove_comments(text: &str) -> String {
    if text.is_empty() || !text.contains("/*") {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut state = '\0';
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];

        match state {
            '\'' | '"' | '|' => {
                if c == state {
                    state = '\0';
                }
                result.push(c);
            }
            _ => {
                if c == '/' && index + 1 < chars.len() && chars[index + 1] == '*' {
                    while index < chars.len() {
                        let c = chars[index];
                        if c == '\r' || c == '\n' {
                            result.push(c);
                            break;
                        }
                        index += 1;
                    }
                } else {
                    if c == '\'' || c == '"' || c == '|' {
                        state = c;
                    }
                    result.push(c);
                }
            }
        }

        index += 1;
    }

    result
}

/// Prepares a dynamic format string for transmission.
///
/// Comments are stripped first. If the remainder still contains a control
/// character it is returned unmodified: the server tolerates embedded
/// control bytes in some contexts and further stripping would corrupt them.
/// Otherwise all remaining control characters are stripped.
pub fn prepare_format(text: &str) -> String {
    let text = remove_comments(text);
    if text.is_empty() {
        return text;
    }

    if text.chars().any(|c| (c as u32) < 0x20) {
        return text;
    }

    text.chars().filter(|&c| (c as u32) >= 0x20).collect()
}
