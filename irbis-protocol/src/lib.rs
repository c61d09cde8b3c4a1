//! # irbis-protocol
//!
//! Wire protocol implementation for the IRBIS64 library automation server.
//!
//! This crate provides:
//! - Outbound query encoding with a decimal byte-length preamble
//! - Inbound response decoding with a cursor over the raw byte buffer
//! - The return-code table and per-operation acceptable-code sets
//! - Text utilities for the two encodings multiplexed within one packet
//!   (the server's Windows-1251 code page and pass-through UTF-8)

pub mod codes;
pub mod error;
pub mod query;
pub mod response;
pub mod text;

pub use codes::{describe_error, READ_RECORD_CODES, READ_TERM_CODES};
pub use error::{ProtocolError, ServerError};
pub use query::{ClientIdentity, Query};
pub use response::Response;
pub use text::{Encoding, IRBIS_DELIMITER, IRBIS_DELIMITER_TEXT};

/// Default port the IRBIS64 server listens on.
pub const DEFAULT_PORT: u16 = 6666;

// Common ready-made formats understood by the server.

/// Full record dump.
pub const ALL_FORMAT: &str = "&uf('+0')";
/// Brief bibliographic description.
pub const BRIEF_FORMAT: &str = "@brief";
/// Keyword list.
pub const IBIS_FORMAT: &str = "@ibiskw_h";
/// Full description with holdings.
pub const INFO_FORMAT: &str = "@info_w";
/// Format chosen by the server according to the record's worksheet.
pub const OPTIMIZED_FORMAT: &str = "@";

// Common search-term prefixes.

/// Keywords.
pub const KEYWORD_PREFIX: &str = "K=";
/// Individual author, editor or compiler.
pub const AUTHOR_PREFIX: &str = "A=";
/// Collective author or event.
pub const COLLECTIVE_PREFIX: &str = "M=";
/// Title.
pub const TITLE_PREFIX: &str = "T=";
/// Inventory number, barcode or RFID tag.
pub const INVENTORY_PREFIX: &str = "IN=";
/// Document index within the database.
pub const INDEX_PREFIX: &str = "I=";
