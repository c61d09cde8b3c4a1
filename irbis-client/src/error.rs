//! Client error types.

use irbis_protocol::{ProtocolError, ServerError};
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timeout")]
    Timeout,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("not connected")]
    NotConnected,

    #[error("malformed connection string: {0}")]
    ConnectionString(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("server error: {0}")]
    Server(#[from] ServerError),
}

impl ClientError {
    /// The server's return code, when the server rejected the operation.
    pub fn return_code(&self) -> Option<i32> {
        match self {
            ClientError::Server(err) => Some(err.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_accessor() {
        let err = ClientError::Server(ServerError::new(-140));
        assert_eq!(err.return_code(), Some(-140));
        assert_eq!(ClientError::Timeout.return_code(), None);
    }
}
