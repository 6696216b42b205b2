//! Error taxonomy
//!
//! Parse errors are the only fatal errors in this engine. Lookups (find by
//! name/type, anchor by identity, route by name) return empty results or
//! `None` instead, and binder value absence falls back to template content.

use thiserror::Error;

/// A fatal markup parse error. No partial document is returned alongside one.
#[derive(Debug, Clone, Error)]
#[error("malformed markup at byte {position}: {message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the input where the error was detected
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Result alias for parse operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::new("unclosed tag: <div>", 12);
        assert_eq!(err.to_string(), "malformed markup at byte 12: unclosed tag: <div>");
    }
}
