//! The Bencode decode engine.
//!
//! [`Decoder`] owns a cursor into an immutable input buffer and decodes one
//! value at a time by recursive descent. The byte under the cursor selects the
//! extraction routine:
//!
//! | Lookahead | Routine | Grammar |
//! |-----------|---------|---------|
//! | `0`-`9` | string | `<length>:<bytes>` |
//! | `i` | integer | `i<digits>e` |
//! | `l` | list | `l<value>*e` |
//! | `d` | map | `d(<string><value>)*e` |
//!
//! Each routine consumes exactly the bytes of its value and records them as
//! the value's [`Span`]. Errors are returned at the first problem found and
//! leave the cursor at an unspecified position; a decoder that has failed
//! should be dropped.
//!
//! ## Usage
//!
//! Most callers should use [`decode`](crate::decode). The decoder itself is
//! useful for reading several values back to back:
//!
//! ```rust
//! use benspan::Decoder;
//!
//! let mut decoder = Decoder::new(b"i1e4:spam");
//! assert_eq!(decoder.decode_one().unwrap().as_i64(), Some(1));
//! assert_eq!(decoder.position(), 3);
//! assert_eq!(decoder.decode_one().unwrap().as_str(), Some("spam"));
//! assert!(decoder.is_at_end());
//! ```

use crate::options::{DecodeOptions, Trailing};
use crate::{BenMap, Error, Integer, Result, Span, Value, ValueKind};
use num_bigint::BigInt;
use tracing::{debug, trace};

/// Longest slice of offending input copied into an error message.
const PREVIEW_LEN: usize = 32;

#[inline]
fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// A cursor-driven Bencode decoder over a borrowed input buffer.
pub struct Decoder<'de> {
    input: &'de [u8],
    position: usize,
    depth: usize,
    options: DecodeOptions,
}

impl<'de> Decoder<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: DecodeOptions) -> Self {
        Decoder {
            input,
            position: 0,
            depth: 0,
            options,
        }
    }

    /// Returns the offset of the next unconsumed byte.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the unconsumed part of the input.
    #[must_use]
    pub fn remaining(&self) -> &'de [u8] {
        self.input.get(self.position..).unwrap_or_default()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Decodes the value starting at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::UnexpectedToken`](crate::ErrorKind::UnexpectedToken)
    /// if the cursor is at the end of input or on a byte that cannot start a
    /// value, or with whatever error the selected extraction routine reports.
    pub fn decode_one(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b) if is_digit(b) => self.extract_string(),
            Some(b'i') => self.extract_integer(),
            Some(b'l') => self.extract_list(),
            Some(b'd') => self.extract_map(),
            found => {
                debug!(offset = self.position, ?found, "no value starts here");
                Err(Error::unexpected_token(self.position, found))
            }
        }
    }

    /// Applies the trailing-data policy once the top-level value is decoded.
    ///
    /// # Errors
    ///
    /// With [`Trailing::Reject`], fails with
    /// [`ErrorKind::TrailingData`](crate::ErrorKind::TrailingData) if any
    /// input is left.
    pub fn finish(&self) -> Result<()> {
        let remaining = self.remaining().len();
        trace!(consumed = self.position, remaining, "top-level value decoded");
        if remaining > 0 && self.options.trailing == Trailing::Reject {
            debug!(offset = self.position, remaining, "trailing data after value");
            return Err(Error::trailing_data(self.position, remaining));
        }
        Ok(())
    }

    /// Decodes a byte string at the cursor without going through dispatch.
    ///
    /// Map keys are read this way, so a key that is not a string fails with
    /// the string routine's own error.
    pub fn extract_string(&mut self) -> Result<Value> {
        let start = self.position;
        let content = self.extract_string_bytes()?;
        Ok(Value::new(
            ValueKind::Str(content),
            Span::new(start, self.position),
        ))
    }

    pub(crate) fn extract_string_bytes(&mut self) -> Result<Vec<u8>> {
        let start = self.position;
        let rest = self.remaining();
        let digit_count = rest.iter().take_while(|&&b| is_digit(b)).count();
        let digits = &rest[..digit_count];
        let colon = start + digit_count;

        if digits.is_empty() {
            let text = preview(rest, b':');
            debug!(offset = start, text = %String::from_utf8_lossy(text), "string length has no digits");
            return Err(Error::invalid_length(start, text));
        }
        if self.input.get(colon) != Some(&b':') {
            // A ':' further on means the prefix itself is malformed.
            if rest[digit_count..].contains(&b':') {
                let text = preview(rest, b':');
                debug!(offset = start, text = %String::from_utf8_lossy(text), "string length is not a number");
                return Err(Error::invalid_length(start, text));
            }
            debug!(offset = colon, "string length not followed by ':'");
            return Err(Error::missing_delimiter(colon, ':'));
        }

        let content_start = colon + 1;
        let available = self.input.len() - content_start;
        let len = match parse_length(digits) {
            Some(len) if len <= available => len,
            parsed => {
                let needed = parsed.unwrap_or(usize::MAX);
                debug!(offset = content_start, needed, available, "string content truncated");
                return Err(Error::truncated(content_start, needed, available));
            }
        };

        let content_end = content_start + len;
        self.position = content_end;
        Ok(self.input[content_start..content_end].to_vec())
    }

    fn extract_integer(&mut self) -> Result<Value> {
        let start = self.position;
        let text_start = start + 1;
        let rest = self.input.get(text_start..).unwrap_or_default();

        let text_len = match rest.iter().position(|&b| b == b'e') {
            Some(len) => len,
            None => {
                debug!(offset = self.input.len(), "integer not terminated by 'e'");
                return Err(Error::missing_delimiter(self.input.len(), 'e'));
            }
        };
        let text = &rest[..text_len];

        let integer = match parse_integer(text) {
            Some(integer) => integer,
            None => {
                debug!(offset = text_start, text = %String::from_utf8_lossy(text), "invalid integer");
                return Err(Error::invalid_integer(text_start, text));
            }
        };

        self.position = text_start + text_len + 1;
        Ok(Value::new(
            ValueKind::Int(integer),
            Span::new(start, self.position),
        ))
    }

    fn extract_list(&mut self) -> Result<Value> {
        let start = self.position;
        self.enter(start)?;
        self.position += 1;

        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.unterminated(start)),
                Some(b'e') => break,
                Some(_) => items.push(self.decode_one()?),
            }
        }

        self.position += 1;
        self.depth -= 1;
        Ok(Value::new(
            ValueKind::List(items),
            Span::new(start, self.position),
        ))
    }

    fn extract_map(&mut self) -> Result<Value> {
        let start = self.position;
        self.enter(start)?;
        self.position += 1;

        let mut map = BenMap::new();
        loop {
            match self.peek() {
                None => return Err(self.unterminated(start)),
                Some(b'e') => break,
                Some(_) => {
                    let key = self.extract_string_bytes()?;
                    let value = self.decode_one()?;
                    if let Some(previous) = map.insert(key, value) {
                        trace!(offset = previous.span().start, "duplicate map key replaced");
                    }
                }
            }
        }

        self.position += 1;
        self.depth -= 1;
        Ok(Value::new(
            ValueKind::Map(map),
            Span::new(start, self.position),
        ))
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        if self.depth >= self.options.max_depth {
            debug!(offset, limit = self.options.max_depth, "nesting limit reached");
            return Err(Error::nesting_too_deep(offset, self.options.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn unterminated(&self, start: usize) -> Error {
        debug!(offset = start, "container not terminated before end of input");
        Error::truncated(self.input.len(), 1, 0)
    }
}

/// Returns up to [`PREVIEW_LEN`] bytes of `rest`, stopping before `stop`.
fn preview(rest: &[u8], stop: u8) -> &[u8] {
    let end = rest
        .iter()
        .take(PREVIEW_LEN)
        .position(|&b| b == stop)
        .unwrap_or_else(|| rest.len().min(PREVIEW_LEN));
    &rest[..end]
}

/// Parses ASCII digits as a length, returning `None` on overflow.
fn parse_length(digits: &[u8]) -> Option<usize> {
    digits.iter().try_fold(0usize, |acc, &d| {
        acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
    })
}

/// Parses canonical integer text: optional `-`, no leading zeros, no `-0`.
fn parse_integer(text: &[u8]) -> Option<Integer> {
    let digits = text.strip_prefix(b"-").unwrap_or(text);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if text.len() > 1 && text[0] == b'0' {
        return None;
    }
    if text.starts_with(b"-0") {
        return None;
    }

    let s = std::str::from_utf8(text).ok()?;
    let integer = match s.parse::<i64>() {
        Ok(i) => Integer::Small(i),
        Err(_) => Integer::from(s.parse::<BigInt>().ok()?),
    };

    // The span must be the one canonical spelling of the value.
    if integer.to_string().as_bytes() != text {
        return None;
    }
    Some(integer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn decode_all(input: &[u8]) -> Result<Value> {
        let mut decoder = Decoder::new(input);
        let value = decoder.decode_one()?;
        decoder.finish()?;
        Ok(value)
    }

    #[test]
    fn test_dispatch_rejects_unknown_bytes() {
        for input in [&b"x"[..], b"e", b"-1:a", b":", b" i1e"] {
            let err = decode_all(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedToken, "{:?}", input);
            assert_eq!(err.offset(), Some(0));
        }
        assert_eq!(
            decode_all(b"").unwrap_err(),
            Error::unexpected_token(0, None)
        );
    }

    #[test]
    fn test_string_span_covers_header() {
        let value = decode_all(b"4:spam").unwrap();
        assert_eq!(value.as_bytes(), Some(&b"spam"[..]));
        assert_eq!(value.span(), Span::new(0, 6));

        let value = decode_all(b"0:").unwrap();
        assert_eq!(value.as_bytes(), Some(&b""[..]));
        assert_eq!(value.raw(b"0:"), Some(&b"0:"[..]));
    }

    #[test]
    fn test_string_arbitrary_bytes() {
        let input = b"3:\x00\xff:";
        let value = decode_all(input).unwrap();
        assert_eq!(value.as_bytes(), Some(&b"\x00\xff:"[..]));
        assert!(value.as_str().is_none());
    }

    #[test]
    fn test_string_leading_zero_length_is_accepted() {
        let input = b"03:abc";
        let value = decode_all(input).unwrap();
        assert_eq!(value.as_str(), Some("abc"));
        assert_eq!(value.raw(input), Some(&input[..]));
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(
            decode_all(b"0gg").unwrap_err(),
            Error::missing_delimiter(1, ':')
        );
        assert_eq!(
            decode_all(b"12").unwrap_err(),
            Error::missing_delimiter(2, ':')
        );
        assert_eq!(decode_all(b"5:ab").unwrap_err(), Error::truncated(2, 5, 2));
        assert_eq!(
            decode_all(b"1x:ab").unwrap_err(),
            Error::invalid_length(0, b"1x")
        );
        assert_eq!(
            decode_all(b"12a:abc").unwrap_err(),
            Error::invalid_length(0, b"12a")
        );
        assert_eq!(
            decode_all(b"d1x:ai1ee").unwrap_err(),
            Error::invalid_length(1, b"1x")
        );

        let err = decode_all(b"99999999999999999999999999:x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), Some(27));
    }

    #[test]
    fn test_direct_string_extraction_validates_length() {
        let err = Decoder::new(b"-3:abc").extract_string().unwrap_err();
        assert_eq!(err, Error::invalid_length(0, b"-3"));

        let err = Decoder::new(b":abc").extract_string().unwrap_err();
        assert_eq!(err, Error::invalid_length(0, b""));

        let err = Decoder::new(b"i3e").extract_string().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLength);
    }

    #[test]
    fn test_integers() {
        assert_eq!(decode_all(b"i0e").unwrap().as_i64(), Some(0));
        assert_eq!(decode_all(b"i3e").unwrap().as_i64(), Some(3));
        assert_eq!(decode_all(b"i-3e").unwrap().as_i64(), Some(-3));
        assert_eq!(
            decode_all(b"i-9223372036854775808e").unwrap().as_i64(),
            Some(i64::MIN)
        );

        let value = decode_all(b"i-42e").unwrap();
        assert_eq!(value.span(), Span::new(0, 5));
    }

    #[test]
    fn test_big_integers() {
        let input = b"i18446744073709551616e";
        let value = decode_all(input).unwrap();
        match value.as_integer() {
            Some(Integer::Big(b)) => assert_eq!(b.to_string(), "18446744073709551616"),
            other => panic!("expected big integer, got {:?}", other),
        }
        assert_eq!(value.raw(input), Some(&input[..]));
        assert!(decode_all(b"i-018446744073709551616e").is_err());
    }

    #[test]
    fn test_invalid_integers() {
        for (input, text) in [
            (&b"i03e"[..], &b"03"[..]),
            (b"i-0e", b"-0"),
            (b"i-03e", b"-03"),
            (b"ie", b""),
            (b"i-e", b"-"),
            (b"i+3e", b"+3"),
            (b"i1.5e", b"1.5"),
            (b"i 1e", b" 1"),
            (b"i--1e", b"--1"),
        ] {
            assert_eq!(
                decode_all(input).unwrap_err(),
                Error::invalid_integer(1, text),
                "{:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_integer_missing_terminator() {
        assert_eq!(
            decode_all(b"i42").unwrap_err(),
            Error::missing_delimiter(3, 'e')
        );
        assert_eq!(
            decode_all(b"i").unwrap_err(),
            Error::missing_delimiter(1, 'e')
        );
    }

    #[test]
    fn test_list_spans() {
        let input = b"l4:spami42ee";
        let value = decode_all(input).unwrap();
        assert_eq!(value.span(), Span::new(0, input.len()));

        let items = value.as_list().unwrap();
        assert_eq!(items[0].span(), Span::new(1, 7));
        assert_eq!(items[1].span(), Span::new(7, 11));
    }

    #[test]
    fn test_unterminated_containers() {
        for input in [&b"l"[..], b"li1e", b"d", b"d1:ai1e", b"lli1ee"] {
            let err = decode_all(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput, "{:?}", input);
            assert_eq!(err.offset(), Some(input.len()));
        }
    }

    #[test]
    fn test_map_keys_use_string_rules() {
        assert_eq!(
            decode_all(b"di1ei2ee").unwrap_err(),
            Error::invalid_length(1, b"i1ei2ee")
        );
        let err = decode_all(b"d1:ae").unwrap_err();
        assert_eq!(err, Error::unexpected_token(4, Some(b'e')));
        let err = decode_all(b"d1:a").unwrap_err();
        assert_eq!(err, Error::unexpected_token(4, None));
    }

    #[test]
    fn test_map_duplicate_keys_last_wins() {
        let value = decode_all(b"d1:ai1e1:bi2e1:ai3ee").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(b"a").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_map_unsorted_keys_keep_wire_order() {
        let value = decode_all(b"d1:bi1e1:ai2ee").unwrap();
        let keys: Vec<&[u8]> = value.as_map().unwrap().keys().map(|k| k.as_slice()).collect();
        assert_eq!(keys, vec![&b"b"[..], &b"a"[..]]);
    }

    #[test]
    fn test_nesting_limit() {
        let options = DecodeOptions::new().with_max_depth(2);
        assert!(Decoder::with_options(b"llee", options.clone()).decode_one().is_ok());

        let err = Decoder::with_options(b"llleee", options.clone())
            .decode_one()
            .unwrap_err();
        assert_eq!(err, Error::nesting_too_deep(2, 2));

        let err = Decoder::with_options(b"d1:ad1:bd1:cleeee", options)
            .decode_one()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);

        let flat = DecodeOptions::new().with_max_depth(0);
        assert!(Decoder::with_options(b"i1e", flat.clone()).decode_one().is_ok());
        assert!(Decoder::with_options(b"le", flat).decode_one().is_err());
    }

    #[test]
    fn test_deep_nesting_within_default_limit() {
        let depth = 200;
        let mut input = vec![b'l'; depth];
        input.extend(std::iter::repeat(b'e').take(depth));
        assert!(decode_all(&input).is_ok());

        let depth = 300;
        let mut input = vec![b'l'; depth];
        input.extend(std::iter::repeat(b'e').take(depth));
        assert_eq!(
            decode_all(&input).unwrap_err().kind(),
            ErrorKind::NestingTooDeep
        );
    }

    #[test]
    fn test_finish_policy() {
        let mut decoder = Decoder::new(b"i1eXY");
        decoder.decode_one().unwrap();
        assert_eq!(decoder.remaining(), b"XY");
        assert_eq!(decoder.finish().unwrap_err(), Error::trailing_data(3, 2));

        let options = DecodeOptions::new().with_trailing(Trailing::Allow);
        let mut decoder = Decoder::with_options(b"i1eXY", options);
        decoder.decode_one().unwrap();
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_parse_length_overflow() {
        assert_eq!(parse_length(b"0"), Some(0));
        assert_eq!(parse_length(b"0042"), Some(42));
        assert_eq!(parse_length(b"999999999999999999999999999999"), None);
    }

    #[test]
    fn test_preview_stops_at_delimiter() {
        assert_eq!(preview(b"-3:abc", b':'), b"-3");
        assert_eq!(preview(b"abc", b':'), b"abc");
        assert_eq!(preview(&[b'x'; 100], b':').len(), PREVIEW_LEN);
    }
}
