//! # irbis-records
//!
//! Structured-text codecs for the formats carried inside IRBIS64 responses.
//!
//! This crate provides:
//! - The bibliographic record codec (tag/subfield notation with
//!   control-byte field separators)
//! - The INI-like configuration codec and the paired-line menu codec
//! - Fixed-column positional decoders for server descriptors
//!   (databases, processes, clients, users, statistics)
//! - Search dictionary types: terms, postings, found lines, scenarios

pub mod info;
pub mod ini;
pub mod menu;
pub mod record;
pub mod scenario;
pub mod term;

pub use info::{ClientInfo, DatabaseInfo, ProcessInfo, ServerStat, UserInfo, VersionInfo};
pub use ini::{IniFile, IniLine, IniSection};
pub use menu::{MenuEntry, MenuFile};
pub use record::{
    Field, RawRecord, Record, SubField, ABSENT, LAST_VERSION, LOCKED_RECORD, LOGICALLY_DELETED,
    NON_ACTUALIZED, PHYSICALLY_DELETED,
};
pub use scenario::SearchScenario;
pub use term::{FoundLine, TermInfo, TermPosting};
