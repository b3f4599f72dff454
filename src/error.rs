//! Error types for JSON binding.
//!
//! Errors fall into four categories, mirroring the stages of a decode:
//!
//! - **Lexical**: malformed token, escape, number, or character. Always
//!   carries the absolute byte offset into the input.
//! - **Structural**: the wrong token appeared where an object start, array
//!   start, or field name was expected; also unterminated containers and the
//!   recursion depth limit.
//! - **Binding**: no usable constructor, a handle invocation failure, a
//!   converter producing the wrong type, or a fixed-size array length
//!   mismatch.
//! - **Metadata**: a member lookup missed, a platform type was requested
//!   from the cache, or a frozen registry refused a registration.
//!
//! Lexical and structural errors abort the entire decode; binding errors
//! abort the whole object under construction. Unknown object keys are never
//! errors — they are structurally skipped.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbind::{from_json, Error};
//!
//! let result: Result<i64, Error> = from_json("1e");
//! assert!(matches!(result, Err(Error::Lexical { .. })));
//! ```

use thiserror::Error;

/// All errors produced by the tokenizer, metadata cache, converter registry,
/// and binding engine.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed token, escape sequence, number, or character.
    #[error("lexical error at offset {offset}: {msg}")]
    Lexical { offset: usize, msg: String },

    /// Unexpected token where a structural token was required, or the
    /// recursion depth limit was exceeded.
    #[error("structural error: {msg}")]
    Structural { msg: String },

    /// A value could not be bound to its target type.
    #[error("binding error: {msg}")]
    Binding { msg: String },

    /// A descriptor, member, or registration request was rejected.
    #[error("metadata error: {msg}")]
    Metadata { msg: String },
}

impl Error {
    /// Creates a lexical error at an absolute byte offset into the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbind::Error;
    ///
    /// let err = Error::lexical(12, "unterminated string");
    /// assert!(err.to_string().contains("offset 12"));
    /// ```
    pub fn lexical(offset: usize, msg: impl Into<String>) -> Self {
        Error::Lexical {
            offset,
            msg: msg.into(),
        }
    }

    /// Creates a structural error.
    pub fn structural(msg: impl Into<String>) -> Self {
        Error::Structural { msg: msg.into() }
    }

    /// Creates a binding error.
    pub fn binding(msg: impl Into<String>) -> Self {
        Error::Binding { msg: msg.into() }
    }

    /// Creates a metadata error.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Error::Metadata { msg: msg.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_carries_offset() {
        let err = Error::lexical(42, "bad escape");
        match &err {
            Error::Lexical { offset, msg } => {
                assert_eq!(*offset, 42);
                assert_eq!(msg, "bad escape");
            }
            other => panic!("expected lexical error, got {other:?}"),
        }
        assert!(err.to_string().contains("offset 42"));
    }

    #[test]
    fn test_display_prefixes() {
        assert!(Error::structural("x").to_string().starts_with("structural"));
        assert!(Error::binding("x").to_string().starts_with("binding"));
        assert!(Error::metadata("x").to_string().starts_with("metadata"));
    }
}
