//! Outbound query encoding.
//!
//! Wire form of one packet:
//!
//! ```text
//! <decimal byte length of body><LF>
//! <command><LF><workstation><LF><command><LF><client id><LF><query id><LF>
//! <password><LF><username><LF><LF><LF><LF>
//! <argument lines, each caller-terminated with LF>
//! ```
//!
//! The byte length is computed after encoding conversion, never before:
//! a value may change length when its encoding changes.

use crate::text;
use bytes::{BufMut, BytesMut};

/// Per-connection identity the dispatch layer supplies for every query.
#[derive(Debug, Clone, Default)]
pub struct ClientIdentity {
    /// Workstation (ARM) code, e.g. "C" for cataloger.
    pub workstation: String,
    /// Client id negotiated at connect time.
    pub client_id: u32,
    /// Monotonic query sequence number.
    pub query_id: u32,
    pub username: String,
    pub password: String,
}

/// An ordered, append-only accumulator for one outbound command.
///
/// Built once, sent once, then discarded.
#[derive(Debug)]
pub struct Query {
    buffer: BytesMut,
}

impl Query {
    /// Starts a query for the given command, appending the fixed preamble
    /// of connection-identity lines.
    pub fn new(identity: &ClientIdentity, command: &str) -> Self {
        let mut query = Self {
            buffer: BytesMut::with_capacity(1024),
        };

        query.add_ansi(command).new_line();
        query.add_ansi(&identity.workstation).new_line();
        query.add_ansi(command).new_line();
        query.add(identity.client_id as i64).new_line();
        query.add(identity.query_id as i64).new_line();
        query.add_ansi(&identity.password).new_line();
        query.add_ansi(&identity.username).new_line();
        // three reserved lines
        query.new_line();
        query.new_line();
        query.new_line();

        query
    }

    /// Appends a numeric argument rendered as decimal text (ANSI).
    pub fn add(&mut self, value: i64) -> &mut Self {
        let text = value.to_string();
        self.add_ansi(&text)
    }

    /// Appends a value converted to the server's native code page.
    pub fn add_ansi(&mut self, value: &str) -> &mut Self {
        self.buffer.extend_from_slice(&text::to_ansi(value));
        self
    }

    /// Appends an already-correctly-encoded value, unmodified.
    pub fn add_utf(&mut self, value: &str) -> &mut Self {
        self.buffer.extend_from_slice(value.as_bytes());
        self
    }

    /// Terminates the current logical line.
    pub fn new_line(&mut self) -> &mut Self {
        self.buffer.put_u8(b'\n');
        self
    }

    /// Byte length of the body accumulated so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Renders the wire form: the decimal byte length of everything
    /// appended so far, a line feed, then the body.
    pub fn encode(&self) -> BytesMut {
        let prefix = self.buffer.len().to_string();
        let mut packet = BytesMut::with_capacity(prefix.len() + 1 + self.buffer.len());
        packet.extend_from_slice(prefix.as_bytes());
        packet.put_u8(b'\n');
        packet.extend_from_slice(&self.buffer);
        packet
    }
}
