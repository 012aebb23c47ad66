//! Error types for Bencode decoding.
//!
//! Every decode failure is terminal for the decode call that produced it: the
//! first error found at any nesting depth is returned unchanged and no partial
//! value is kept.
//!
//! ## Error Categories
//!
//! - **Grammar errors**: [`ErrorKind::UnexpectedToken`], [`ErrorKind::MissingDelimiter`]
//! - **Length errors**: [`ErrorKind::InvalidLength`], [`ErrorKind::TruncatedInput`]
//! - **Integer errors**: [`ErrorKind::InvalidInteger`] (leading zeros, `-0`, junk)
//! - **Limits and policy**: [`ErrorKind::NestingTooDeep`], [`ErrorKind::TrailingData`]
//! - **Projection and serde**: [`ErrorKind::InvalidUtf8`], [`ErrorKind::Custom`]
//!
//! Decode errors carry the byte offset at which the problem was detected.
//!
//! ## Examples
//!
//! ```rust
//! use benspan::{decode, ErrorKind};
//!
//! let err = decode(b"i03e").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidInteger);
//! assert_eq!(err.offset(), Some(1));
//! ```

use std::fmt;
use thiserror::Error;

/// The category of an [`Error`], without its context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedToken,
    MissingDelimiter,
    InvalidLength,
    TruncatedInput,
    InvalidInteger,
    NestingTooDeep,
    TrailingData,
    InvalidUtf8,
    Custom,
}

impl ErrorKind {
    /// Returns a stable, human-readable name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::MissingDelimiter => "missing delimiter",
            ErrorKind::InvalidLength => "invalid length",
            ErrorKind::TruncatedInput => "truncated input",
            ErrorKind::InvalidInteger => "invalid integer",
            ErrorKind::NestingTooDeep => "nesting too deep",
            ErrorKind::TrailingData => "trailing data",
            ErrorKind::InvalidUtf8 => "invalid utf-8",
            ErrorKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents all possible errors produced while decoding or projecting Bencode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The byte at `offset` cannot start a value (`None` means end of input).
    #[error("unexpected token {} at offset {offset}", display_byte(.found))]
    UnexpectedToken { offset: usize, found: Option<u8> },

    /// A required `:` or `e` terminator was not found.
    #[error("missing delimiter '{expected}' at offset {offset}")]
    MissingDelimiter { offset: usize, expected: char },

    /// A string length prefix is empty, negative or malformed.
    #[error("invalid string length {text:?} at offset {offset}")]
    InvalidLength { offset: usize, text: String },

    /// The input ends before the declared content does.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Integer text is not in canonical base-10 form.
    #[error("invalid integer {text:?} at offset {offset}")]
    InvalidInteger { offset: usize, text: String },

    /// Lists and maps are nested deeper than the configured limit.
    #[error("nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    /// Bytes remain after the first complete value.
    #[error("trailing data at offset {offset}: {remaining} bytes after value")]
    TrailingData { offset: usize, remaining: usize },

    /// A byte string could not be rendered as UTF-8 text.
    #[error("byte string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// Custom error, raised through serde.
    #[error("{0}")]
    Custom(String),
}

fn display_byte(found: &Option<u8>) -> String {
    match *found {
        None => "end of input".to_string(),
        Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
        Some(b) => format!("0x{:02x}", b),
    }
}

impl Error {
    pub fn unexpected_token(offset: usize, found: Option<u8>) -> Self {
        Error::UnexpectedToken { offset, found }
    }

    pub fn missing_delimiter(offset: usize, expected: char) -> Self {
        Error::MissingDelimiter { offset, expected }
    }

    pub fn invalid_length(offset: usize, text: &[u8]) -> Self {
        Error::InvalidLength {
            offset,
            text: String::from_utf8_lossy(text).into_owned(),
        }
    }

    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Error::TruncatedInput {
            offset,
            needed,
            available,
        }
    }

    pub fn invalid_integer(offset: usize, text: &[u8]) -> Self {
        Error::InvalidInteger {
            offset,
            text: String::from_utf8_lossy(text).into_owned(),
        }
    }

    pub fn nesting_too_deep(offset: usize, limit: usize) -> Self {
        Error::NestingTooDeep { offset, limit }
    }

    pub fn trailing_data(offset: usize, remaining: usize) -> Self {
        Error::TrailingData { offset, remaining }
    }

    pub fn invalid_utf8(offset: usize) -> Self {
        Error::InvalidUtf8 { offset }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benspan::{Error, ErrorKind};
    ///
    /// let err = Error::custom("something went wrong");
    /// assert_eq!(err.kind(), ErrorKind::Custom);
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Error::MissingDelimiter { .. } => ErrorKind::MissingDelimiter,
            Error::InvalidLength { .. } => ErrorKind::InvalidLength,
            Error::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Error::InvalidInteger { .. } => ErrorKind::InvalidInteger,
            Error::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Error::TrailingData { .. } => ErrorKind::TrailingData,
            Error::InvalidUtf8 { .. } => ErrorKind::InvalidUtf8,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns the input offset the error refers to, if it has one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Error::UnexpectedToken { offset, .. }
            | Error::MissingDelimiter { offset, .. }
            | Error::InvalidLength { offset, .. }
            | Error::TruncatedInput { offset, .. }
            | Error::InvalidInteger { offset, .. }
            | Error::NestingTooDeep { offset, .. }
            | Error::TrailingData { offset, .. }
            | Error::InvalidUtf8 { offset } => Some(*offset),
            Error::Custom(_) => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
