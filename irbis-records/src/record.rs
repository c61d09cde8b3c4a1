//! The bibliographic record codec.
//!
//! Client representation of one record, as transmitted in responses:
//!
//! ```text
//! <mfn>#<status>
//! 0#<version>
//! <tag>#<value>^<code><value>^<code><value>...
//! ...
//! ```
//!
//! On the wire the lines are separated by the two-byte control sequence
//! `0x1F 0x1E` rather than conventional newlines.

use irbis_protocol::{ProtocolError, IRBIS_DELIMITER_TEXT};
use serde::{Deserialize, Serialize};
use std::fmt;

// Record status bits.

/// The record is logically deleted.
pub const LOGICALLY_DELETED: u32 = 1;
/// The record is physically deleted.
pub const PHYSICALLY_DELETED: u32 = 2;
/// The record is temporarily absent.
pub const ABSENT: u32 = 4;
/// The record has not been reindexed yet.
pub const NON_ACTUALIZED: u32 = 8;
/// The most recent version of the record.
pub const LAST_VERSION: u32 = 32;
/// The record is locked for editing.
pub const LOCKED_RECORD: u32 = 64;

/// Prefix of every subfield within a field body.
const SUBFIELD_MARKER: char = '^';

/// A subfield: a one-character code plus a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubField {
    pub code: char,
    pub value: String,
}

impl SubField {
    pub fn new(code: char, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// Decodes one `^`-split token; empty tokens are discarded.
    fn decode(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let code = chars.next()?;
        Some(Self {
            code,
            value: chars.as_str().to_string(),
        })
    }
}

impl fmt::Display for SubField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{}{}", self.code, self.value)
    }
}

/// A field: an integer tag, an optional value preceding any subfields,
/// and an ordered sequence of subfields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub tag: u32,
    /// Value up to the first subfield marker.
    pub value: String,
    pub subfields: Vec<SubField>,
}

impl Field {
    pub fn new(tag: u32, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
            subfields: Vec::new(),
        }
    }

    /// Appends a subfield, chaining.
    pub fn add(&mut self, code: char, value: impl Into<String>) -> &mut Self {
        self.subfields.push(SubField::new(code, value));
        self
    }

    /// First subfield with the given code, compared case-insensitively.
    pub fn get_subfield(&self, code: char) -> Option<&SubField> {
        self.subfields
            .iter()
            .find(|sf| sf.code.eq_ignore_ascii_case(&code))
    }

    /// Decodes a field from its protocol line.
    pub fn decode(line: &str) -> Self {
        let (tag, body) = line.split_once('#').unwrap_or((line, ""));
        let mut field = Self::new(tag.parse().unwrap_or(0), "");

        let rest = match body.strip_prefix(SUBFIELD_MARKER) {
            Some(rest) => rest,
            None => {
                let mut parts = body.splitn(2, SUBFIELD_MARKER);
                field.value = parts.next().unwrap_or("").to_string();
                parts.next().unwrap_or("")
            }
        };

        for token in rest.split(SUBFIELD_MARKER) {
            if let Some(subfield) = SubField::decode(token) {
                field.subfields.push(subfield);
            }
        }

        field
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tag, self.value)?;
        for subfield in &self.subfields {
            write!(f, "{subfield}")?;
        }
        Ok(())
    }
}

/// A bibliographic record: an MFN, a version, a status bit-field and an
/// ordered sequence of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the database the record belongs to.
    pub database: String,
    pub mfn: u32,
    pub version: u32,
    pub status: u32,
    pub fields: Vec<Field>,
}

impl Record {
    /// Appends a field with the given tag and value, returning it for
    /// subfield population.
    pub fn add(&mut self, tag: u32, value: impl Into<String>) -> &mut Field {
        self.fields.push(Field::new(tag, value));
        self.fields.last_mut().unwrap()
    }

    /// Decodes the record from its client representation.
    pub fn decode(lines: &[String]) -> Result<Self, ProtocolError> {
        let (mfn, status, version) = decode_envelope(lines)?;
        let mut record = Self {
            mfn,
            status,
            version,
            ..Self::default()
        };

        for line in &lines[2..] {
            if !line.is_empty() {
                record.fields.push(Field::decode(line));
            }
        }

        Ok(record)
    }

    /// Value of the first field with the given tag.
    pub fn fm(&self, tag: u32) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.tag == tag)
            .map(|field| field.value.as_str())
    }

    /// Value of the first matching subfield among fields with the given tag.
    pub fn fm_subfield(&self, tag: u32, code: char) -> Option<&str> {
        self.fields
            .iter()
            .filter(|field| field.tag == tag)
            .find_map(|field| field.get_subfield(code))
            .map(|sf| sf.value.as_str())
    }

    /// Non-empty values of all fields with the given tag.
    pub fn fma(&self, tag: u32) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.tag == tag && !field.value.is_empty())
            .map(|field| field.value.as_str())
            .collect()
    }

    /// Non-empty values of all matching subfields among fields with the
    /// given tag.
    pub fn fma_subfield(&self, tag: u32, code: char) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.tag == tag)
            .flat_map(|field| &field.subfields)
            .filter(|sf| sf.code.eq_ignore_ascii_case(&code) && !sf.value.is_empty())
            .map(|sf| sf.value.as_str())
            .collect()
    }

    /// The given occurrence of a repeating field.
    pub fn get_field(&self, tag: u32, occurrence: usize) -> Option<&Field> {
        self.fields
            .iter()
            .filter(|field| field.tag == tag)
            .nth(occurrence)
    }

    /// All fields with the given tag, in order.
    pub fn get_fields(&self, tag: u32) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|field| field.tag == tag)
            .collect()
    }

    /// Deleted either logically or physically?
    pub fn is_deleted(&self) -> bool {
        self.status & (LOGICALLY_DELETED | PHYSICALLY_DELETED) != 0
    }

    /// Wire form for submission to the server, delimiter-separated.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}{d}0#{}{d}",
            self.mfn,
            self.status,
            self.version,
            d = IRBIS_DELIMITER_TEXT
        )?;
        for field in &self.fields {
            write!(f, "{field}{IRBIS_DELIMITER_TEXT}")?;
        }
        Ok(())
    }
}

/// A record with the same envelope but the fields kept as unparsed lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub database: String,
    pub mfn: u32,
    pub version: u32,
    pub status: u32,
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Decodes the envelope, deferring field parsing.
    pub fn decode(lines: &[String]) -> Result<Self, ProtocolError> {
        let (mfn, status, version) = decode_envelope(lines)?;
        Ok(Self {
            mfn,
            status,
            version,
            fields: lines[2..].to_vec(),
            ..Self::default()
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.status & (LOGICALLY_DELETED | PHYSICALLY_DELETED) != 0
    }
}

/// Parses the two envelope lines shared by both record flavours.
fn decode_envelope(lines: &[String]) -> Result<(u32, u32, u32), ProtocolError> {
    if lines.len() < 2 {
        return Err(ProtocolError::TruncatedPayload {
            expected: 2,
            actual: lines.len(),
        });
    }

    let mut first = lines[0].splitn(2, '#');
    let mfn = first.next().unwrap_or("").parse().unwrap_or(0);
    let status = first.next().unwrap_or("").parse().unwrap_or(0);

    let version = lines[1]
        .splitn(2, '#')
        .nth(1)
        .unwrap_or("")
        .parse()
        .unwrap_or(0);

    Ok((mfn, status, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_lines() -> Vec<String> {
        [
            "123#32",
            "0#4",
            "700#^aПушкин^bА. С.",
            "200#^aЕвгений Онегин",
            "300#Роман в стихах",
            "910#до разделителя^a0^bЧЗ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_decode_envelope() {
        let record = Record::decode(&sample_lines()).unwrap();
        assert_eq!(record.mfn, 123);
        assert_eq!(record.status, 32);
        assert_eq!(record.version, 4);
        assert_eq!(record.fields.len(), 4);
    }

    #[test]
    fn test_decode_subfields_in_order() {
        let record = Record::decode(&sample_lines()).unwrap();
        let field = record.get_field(700, 0).unwrap();
        assert_eq!(field.value, "");
        assert_eq!(field.subfields.len(), 2);
        assert_eq!(field.subfields[0], SubField::new('a', "Пушкин"));
        assert_eq!(field.subfields[1], SubField::new('b', "А. С."));
    }

    #[test]
    fn test_decode_value_before_subfields() {
        let record = Record::decode(&sample_lines()).unwrap();
        let field = record.get_field(910, 0).unwrap();
        assert_eq!(field.value, "до разделителя");
        assert_eq!(field.subfields[0], SubField::new('a', "0"));
        assert_eq!(field.subfields[1], SubField::new('b', "ЧЗ"));
    }

    #[test]
    fn test_decode_field_without_subfields() {
        let field = Field::decode("300#Роман в стихах");
        assert_eq!(field.tag, 300);
        assert_eq!(field.value, "Роман в стихах");
        assert!(field.subfields.is_empty());
    }

    #[test]
    fn test_decode_bad_integers_default_to_zero() {
        let lines: Vec<String> = ["oops#", "0#"].iter().map(|s| s.to_string()).collect();
        let record = Record::decode(&lines).unwrap();
        assert_eq!(record.mfn, 0);
        assert_eq!(record.status, 0);
        assert_eq!(record.version, 0);
    }

    #[test]
    fn test_decode_short_payload_fails() {
        let lines = vec!["1#0".to_string()];
        assert!(matches!(
            Record::decode(&lines),
            Err(ProtocolError::TruncatedPayload {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_accessors() {
        let record = Record::decode(&sample_lines()).unwrap();
        assert_eq!(record.fm(300), Some("Роман в стихах"));
        assert_eq!(record.fm_subfield(700, 'a'), Some("Пушкин"));
        assert_eq!(record.fm_subfield(700, 'A'), Some("Пушкин"));
        assert_eq!(record.fma(300), vec!["Роман в стихах"]);
        assert_eq!(record.fma_subfield(700, 'b'), vec!["А. С."]);
        assert!(record.fm(999).is_none());
        assert_eq!(record.get_fields(200).len(), 1);
    }

    #[test]
    fn test_status_bits() {
        let mut record = Record::default();
        record.status = 3;
        assert!(record.is_deleted());
        record.status = LAST_VERSION;
        assert!(!record.is_deleted());
        record.status = PHYSICALLY_DELETED;
        assert!(record.is_deleted());
    }

    #[test]
    fn test_encode_wire_form() {
        let mut record = Record {
            mfn: 5,
            status: 0,
            version: 2,
            ..Record::default()
        };
        record.add(200, "").add('a', "Заглавие");
        record.add(300, "Примечание");
        assert_eq!(
            record.encode(),
            "5#0\x1F\x1E0#2\x1F\x1E200#^aЗаглавие\x1F\x1E300#Примечание\x1F\x1E"
        );
    }

    #[test]
    fn test_roundtrip_explicit() {
        // N fields, M subfields each, for N, M in {0, 1, 5}
        for n in [0usize, 1, 5] {
            for m in [0usize, 1, 5] {
                let mut record = Record {
                    mfn: 77,
                    status: 0,
                    version: 1,
                    ..Record::default()
                };
                for i in 0..n {
                    let field = record.add(100 + i as u32, format!("value{i}"));
                    for j in 0..m {
                        field.add(char::from(b'a' + j as u8), format!("sub{j}"));
                    }
                }

                let encoded = record.encode();
                let lines: Vec<String> = encoded
                    .split(IRBIS_DELIMITER_TEXT)
                    .map(|s| s.to_string())
                    .collect();
                let decoded = Record::decode(&lines).unwrap();
                assert_eq!(decoded.mfn, record.mfn);
                assert_eq!(decoded.version, record.version);
                assert_eq!(decoded.fields, record.fields);
            }
        }
    }

    #[test]
    fn test_raw_record_keeps_lines() {
        let raw = RawRecord::decode(&sample_lines()).unwrap();
        assert_eq!(raw.mfn, 123);
        assert_eq!(raw.fields.len(), 4);
        assert_eq!(raw.fields[0], "700#^aПушкин^bА. С.");
    }

    prop_compose! {
        fn arb_value()(value in "[а-яА-Яa-zA-Z0-9 .,-]{0,20}") -> String { value }
    }

    prop_compose! {
        fn arb_field()(
            tag in 1u32..2000,
            value in arb_value(),
            codes in proptest::collection::vec(proptest::char::range('a', 'z'), 0..5),
            values in proptest::collection::vec(arb_value(), 5),
        ) -> Field {
            let mut field = Field::new(tag, value);
            for (code, value) in codes.iter().zip(values) {
                field.add(*code, value);
            }
            field
        }
    }

    proptest! {
        #[test]
        fn prop_record_roundtrip(
            mfn in 1u32..100_000,
            version in 0u32..100,
            fields in proptest::collection::vec(arb_field(), 0..8),
        ) {
            let record = Record { mfn, version, fields, ..Record::default() };
            let encoded = record.encode();
            let lines: Vec<String> = encoded
                .split(IRBIS_DELIMITER_TEXT)
                .map(|s| s.to_string())
                .collect();
            let decoded = Record::decode(&lines).unwrap();
            prop_assert_eq!(decoded.mfn, record.mfn);
            prop_assert_eq!(decoded.version, record.version);
            prop_assert_eq!(decoded.fields, record.fields);
        }
    }
}
