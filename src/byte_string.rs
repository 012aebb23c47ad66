//! Standalone Bencode byte strings.
//!
//! [`encode_str`] is the only encoder in this crate: it renders one byte
//! string as `<len>:<content>`. [`ByteString`] pairs that raw form with the
//! content it encodes and can be built from either side.
//!
//! ```rust
//! use benspan::{encode_str, ByteString};
//!
//! assert_eq!(encode_str("spam"), b"4:spam");
//! assert_eq!(encode_str(""), b"0:");
//!
//! let parsed = ByteString::parse(b"4:spam").unwrap();
//! assert_eq!(parsed, ByteString::from_value("spam"));
//! assert!(ByteString::parse(b"4:spams").is_err());
//! ```

use crate::{Decoder, Error, Result};
use std::fmt;

/// Encodes `content` as a Bencode byte string.
///
/// The length prefix is the byte length of `content`, so multi-byte UTF-8
/// text is counted in bytes, not characters.
#[must_use]
pub fn encode_str(content: impl AsRef<[u8]>) -> Vec<u8> {
    let content = content.as_ref();
    let header = content.len().to_string();
    let mut out = Vec::with_capacity(header.len() + 1 + content.len());
    out.extend_from_slice(header.as_bytes());
    out.push(b':');
    out.extend_from_slice(content);
    out
}

/// A single Bencode byte string: its encoded form and the content it holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByteString {
    raw: Vec<u8>,
    value: Vec<u8>,
}

impl ByteString {
    /// Builds the canonical encoding of `content`.
    pub fn from_value(content: impl AsRef<[u8]>) -> Self {
        let value = content.as_ref().to_vec();
        ByteString {
            raw: encode_str(&value),
            value,
        }
    }

    /// Parses an input that must consist of exactly one byte string.
    ///
    /// # Errors
    ///
    /// Empty input fails with `UnexpectedToken`; otherwise the string
    /// routine's errors apply, and bytes after the declared content fail with
    /// `TrailingData`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benspan::{ByteString, ErrorKind};
    ///
    /// let empty = ByteString::parse(b"0:").unwrap();
    /// assert_eq!(empty.raw(), b"0:");
    /// assert!(empty.value().is_empty());
    ///
    /// let err = ByteString::parse(b"0gg").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::MissingDelimiter);
    /// ```
    pub fn parse(encoded: &[u8]) -> Result<Self> {
        if encoded.is_empty() {
            return Err(Error::unexpected_token(0, None));
        }

        let mut decoder = Decoder::new(encoded);
        let value = decoder.extract_string_bytes()?;
        decoder.finish()?;

        let (raw, _) = encoded.split_at(decoder.position());
        Ok(ByteString {
            raw: raw.to_vec(),
            value,
        })
    }

    /// Returns the encoded form, `<len>:<content>`.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the content as text if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    #[must_use]
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.raw))
    }
}
