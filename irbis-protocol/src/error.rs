//! Protocol error types.

use thiserror::Error;

/// Protocol-level errors: the byte stream did not have the shape the
/// protocol promises. Surfaced to the caller, never recovered.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response payload is truncated: expected at least {expected} line(s), got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },
}

/// A negative return code outside the operation's acceptable set.
///
/// The message comes from the static return-code table, with an
/// "unknown error" fallback for unmapped codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server error {code}: {message}")]
pub struct ServerError {
    pub code: i32,
    pub message: String,
}

impl ServerError {
    /// Builds an error for the given code with the table description.
    pub fn new(code: i32) -> Self {
        Self {
            code,
            message: crate::codes::describe_error(code).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_carries_description() {
        let err = ServerError::new(-600);
        assert_eq!(err.code, -600);
        assert_eq!(err.message, "Запись логически удалена");
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::new(-4444);
        let text = err.to_string();
        assert!(text.contains("-4444"));
        assert!(text.contains("Неверный пароль"));
    }
}
