//! Inbound response decoding.
//!
//! A response is an immutable byte buffer plus a cursor that only ever
//! advances. Construction eagerly consumes the fixed header: the echoed
//! command, the client id, the query id and seven reserved lines. The
//! first structured field read after that is, by convention of every
//! command, the return code.

use crate::error::ServerError;
use crate::text::Encoding;
use bytes::Bytes;

/// A fully received server response.
#[derive(Debug)]
pub struct Response {
    buffer: Bytes,
    offset: usize,
    /// Echoed command code.
    pub command: String,
    /// Client id echoed by the server.
    pub client_id: i32,
    /// Query sequence number echoed by the server.
    pub query_id: i32,
    return_code: Option<i32>,
}

impl Response {
    /// Wraps the raw bytes and consumes the fixed header.
    pub fn decode(buffer: Bytes) -> Self {
        let mut response = Self {
            buffer,
            offset: 0,
            command: String::new(),
            client_id: 0,
            query_id: 0,
            return_code: None,
        };

        response.command = response.read_ansi();
        response.client_id = response.read_integer();
        response.query_id = response.read_integer();
        for _ in 0..7 {
            response.get_line();
        }

        response
    }

    /// Raw bytes of the next line, advancing the cursor past the
    /// terminator. Terminators are CR LF, lone CR or lone LF; at the end
    /// of the buffer whatever remains is returned without one.
    pub fn get_line(&mut self) -> &[u8] {
        let start = self.offset;
        let mut end = start;

        while end < self.buffer.len() {
            let byte = self.buffer[end];
            if byte == b'\r' || byte == b'\n' {
                let mut next = end + 1;
                if byte == b'\r' && next < self.buffer.len() && self.buffer[next] == b'\n' {
                    next += 1;
                }
                self.offset = next;
                return &self.buffer[start..end];
            }
            end += 1;
        }

        self.offset = end;
        &self.buffer[start..end]
    }

    /// Reads one line in the given encoding.
    pub fn read_line(&mut self, encoding: Encoding) -> String {
        let line = self.get_line();
        encoding.decode(line)
    }

    /// Reads one line in the server's native code page.
    pub fn read_ansi(&mut self) -> String {
        self.read_line(Encoding::Ansi)
    }

    /// Reads one pass-through UTF-8 line.
    pub fn read_utf(&mut self) -> String {
        self.read_line(Encoding::Utf)
    }

    /// Reads one line as a base-10 integer, defaulting to 0 on a
    /// non-numeric or empty line.
    pub fn read_integer(&mut self) -> i32 {
        let line = self.get_line();
        std::str::from_utf8(line)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Reads one line as the return code and memoizes it.
    ///
    /// Re-reading advances the cursor again; callers read it at most once
    /// per response.
    pub fn read_return_code(&mut self) -> i32 {
        let code = self.read_integer();
        self.return_code = Some(code);
        code
    }

    /// The memoized return code, 0 if none has been read yet.
    pub fn return_code(&self) -> i32 {
        self.return_code.unwrap_or(0)
    }

    /// Reads the return code and fails when it is negative and not in the
    /// caller-supplied acceptable set.
    pub fn check_return_code(&mut self, acceptable: &[i32]) -> Result<(), ServerError> {
        let code = self.read_return_code();
        if code < 0 && !acceptable.contains(&code) {
            return Err(ServerError::new(code));
        }
        Ok(())
    }

    /// Decodes the rest of the buffer line by line. Empty trailing lines
    /// are preserved, since some formats are positional.
    pub fn read_remaining_lines(&mut self, encoding: Encoding) -> Vec<String> {
        let mut lines = Vec::new();
        while self.offset < self.buffer.len() {
            lines.push(self.read_line(encoding));
        }
        lines
    }

    /// Decodes the untouched remainder as one block, for free-text
    /// payloads where line semantics do not apply.
    pub fn read_remaining_text(&mut self, encoding: Encoding) -> String {
        let text = encoding.decode(&self.buffer[self.offset..]);
        self.offset = self.buffer.len();
        text
    }

    /// Bytes left past the cursor.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }
}
