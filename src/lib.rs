//! # benspan
//!
//! A span-preserving decoder for [Bencode](https://en.wikipedia.org/wiki/Bencode),
//! the encoding used by BitTorrent metainfo files and tracker responses.
//!
//! ## What it does
//!
//! Decoding produces a [`Value`] tree. Every node remembers the exact input
//! bytes it was decoded from as a [`Span`], so callers can hash or re-emit a
//! sub-structure byte for byte (the classic case is the `info` dictionary of
//! a torrent, whose raw bytes are the info-hash input).
//!
//! ## Key Features
//!
//! - **Spans**: `value.raw(input)` returns the bytes that produced any node
//! - **Strict**: non-canonical integers, truncated strings and trailing bytes
//!   are errors, each carrying the byte offset it was detected at
//! - **Big integers**: integers beyond `i64` decode into a `BigInt`
//! - **Bounded**: nesting depth is capped by [`DecodeOptions::max_depth`]
//! - **Serde compatible**: [`from_slice`] reads typed Rust structures and
//!   [`Value`] implements `Serialize`
//! - **JSON projection**: [`to_json`] renders a tree as `serde_json` values
//!
//! ## Quick Start
//!
//! ```rust
//! use benspan::decode;
//!
//! let input = b"d3:cow3:moo4:spaml1:a1:bee";
//! let value = decode(input).unwrap();
//!
//! assert_eq!(value.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
//!
//! let spam = value.get(b"spam").unwrap();
//! assert_eq!(spam.raw(input), Some(&b"l1:a1:be"[..]));
//! assert_eq!(spam.span().range(), 17..25);
//! ```
//!
//! ### Typed decoding
//!
//! ```rust
//! use benspan::from_slice;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Peer { ip: String, port: u16 }
//!
//! let peer: Peer = from_slice(b"d2:ip9:127.0.0.14:porti6881ee").unwrap();
//! assert_eq!(peer, Peer { ip: "127.0.0.1".to_string(), port: 6881 });
//! ```
//!
//! ### JSON
//!
//! ```rust
//! use benspan::{decode, to_json_string, Utf8Policy};
//!
//! let value = decode(b"li3ei-3e4:spam4:eggse").unwrap();
//! let json = to_json_string(&value, Utf8Policy::Strict).unwrap();
//! assert_eq!(json, r#"[3,-3,"spam","eggs"]"#);
//! ```
//!
//! ## Logging
//!
//! The decoder emits `tracing` events: `debug` at each failure site and
//! `trace` for successful top-level decodes. No subscriber is installed by
//! the library.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All input indexing is bounds-checked
//! - Length prefixes are parsed with checked arithmetic
//! - Recursion depth is bounded, so hostile input cannot overflow the stack

pub mod byte_string;
pub mod de;
pub mod decoder;
pub mod error;
pub mod json;
pub mod macros;
pub mod map;
pub mod options;
pub mod value;

pub use byte_string::{encode_str, ByteString};
pub use de::{from_value, ValueDeserializer};
pub use decoder::Decoder;
pub use error::{Error, ErrorKind, Result};
pub use json::{to_json, to_json_string, to_json_string_pretty};
pub use map::BenMap;
pub use options::{DecodeOptions, Trailing, Utf8Policy, DEFAULT_MAX_DEPTH};
pub use value::{Integer, Span, Value, ValueKind};

use serde::de::DeserializeOwned;

/// Decodes exactly one Bencode value from `input`.
///
/// The whole input must be consumed: bytes after the first complete value
/// fail with [`ErrorKind::TrailingData`]. Use [`decode_prefix`] to stop after
/// the first value instead.
///
/// # Examples
///
/// ```rust
/// use benspan::{decode, ErrorKind, Value};
///
/// assert_eq!(decode(b"4:spam").unwrap(), Value::str("spam"));
/// assert_eq!(decode(b"4:spams").unwrap_err().kind(), ErrorKind::TrailingData);
/// assert_eq!(decode(b"5:ab").unwrap_err().kind(), ErrorKind::TruncatedInput);
/// ```
///
/// # Errors
///
/// Returns the first error found; no partial value is produced.
pub fn decode(input: &[u8]) -> Result<Value> {
    decode_with_options(input, DecodeOptions::default())
}

/// Decodes one value from `input` with custom options.
///
/// # Examples
///
/// ```rust
/// use benspan::{decode_with_options, DecodeOptions, ErrorKind};
///
/// let options = DecodeOptions::new().with_max_depth(2);
/// assert!(decode_with_options(b"llee", options.clone()).is_ok());
/// let err = decode_with_options(b"llleee", options).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
/// ```
///
/// # Errors
///
/// Returns the first error found. With [`Trailing::Reject`], leftover input
/// is an error.
pub fn decode_with_options(input: &[u8], options: DecodeOptions) -> Result<Value> {
    let mut decoder = Decoder::with_options(input, options);
    let value = decoder.decode_one()?;
    decoder.finish()?;
    Ok(value)
}

/// Decodes the first value in `input` and reports how many bytes it used.
///
/// Nothing after the first complete value is examined.
///
/// # Examples
///
/// ```rust
/// use benspan::decode_prefix;
///
/// let (value, consumed) = decode_prefix(b"4:spams").unwrap();
/// assert_eq!(value.as_str(), Some("spam"));
/// assert_eq!(consumed, 6);
/// ```
///
/// # Errors
///
/// Returns the first error found inside the first value.
pub fn decode_prefix(input: &[u8]) -> Result<(Value, usize)> {
    let mut decoder = Decoder::new(input);
    let value = decoder.decode_one()?;
    Ok((value, decoder.position()))
}

/// Decodes `input` and deserializes it into `T`.
///
/// # Examples
///
/// ```rust
/// use benspan::from_slice;
///
/// let names: Vec<String> = from_slice(b"l4:spam4:eggse").unwrap();
/// assert_eq!(names, vec!["spam", "eggs"]);
/// ```
///
/// # Errors
///
/// Fails with any decode error, or with [`ErrorKind::Custom`] if the decoded
/// value does not have the shape `T` expects.
pub fn from_slice<T>(input: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = decode(input)?;
    from_value(&value)
}
