//! Decoded value tree.
//!
//! This module provides [`Value`], one node of a decoded Bencode tree, and the
//! closed set of node shapes in [`ValueKind`]:
//!
//! - `Str`: a byte string, not necessarily UTF-8
//! - `Int`: a signed integer of any size ([`Integer`])
//! - `List`: an ordered sequence of values
//! - `Map`: a [`BenMap`] from byte-string keys to values
//!
//! Every node remembers the [`Span`] of input bytes it was decoded from, so
//! the exact original encoding of any subtree can be recovered with
//! [`Value::raw`].
//!
//! ## Equality
//!
//! Two values are equal when their contents are equal. Spans do not take part
//! in the comparison, which lets a subtree re-decoded from its own raw bytes
//! compare equal to the original.
//!
//! ```rust
//! use benspan::{decode, Value};
//!
//! let input = b"l4:spami42ee";
//! let list = decode(input).unwrap();
//! let second = &list.as_list().unwrap()[1];
//!
//! assert_eq!(second.raw(input), Some(&b"i42e"[..]));
//! assert_eq!(decode(second.raw(input).unwrap()).unwrap(), *second);
//! assert_eq!(*second, Value::int(42));
//! ```

use crate::BenMap;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// A half-open range of byte offsets into the decoded input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the bytes this span covers in `input`, or `None` if `input`
    /// is too short to be the buffer the span was taken from.
    #[inline]
    #[must_use]
    pub fn slice<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        input.get(self.range())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A Bencode integer.
///
/// Values that fit in an `i64` are always stored as [`Integer::Small`]; only
/// values outside that range use [`Integer::Big`]. Construct through the
/// `From` impls to keep that invariant.
///
/// # Examples
///
/// ```rust
/// use benspan::Integer;
/// use num_bigint::BigInt;
///
/// let small = Integer::from(BigInt::from(7));
/// assert_eq!(small, Integer::Small(7));
///
/// let big: Integer = "123456789012345678901234567890".parse::<BigInt>().unwrap().into();
/// assert!(big.as_i64().is_none());
/// assert_eq!(big.to_string(), "123456789012345678901234567890");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Integer {
    Small(i64),
    Big(BigInt),
}

impl Integer {
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Integer::Small(i) => Some(*i),
            Integer::Big(_) => None,
        }
    }

    #[must_use]
    pub fn to_bigint(&self) -> BigInt {
        match self {
            Integer::Small(i) => BigInt::from(*i),
            Integer::Big(b) => b.clone(),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Small(i) => write!(f, "{}", i),
            Integer::Big(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::Small(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer::Small(value as i64)
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(small) => Integer::Small(small),
            Err(_) => Integer::Big(value),
        }
    }
}

/// The shape and content of a decoded node.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Str(Vec<u8>),
    Int(Integer),
    List(Vec<Value>),
    Map(BenMap),
}

/// One node of a decoded Bencode tree together with its source span.
///
/// # Examples
///
/// ```rust
/// use benspan::{decode, ValueKind};
///
/// let value = decode(b"d3:cow3:mooe").unwrap();
/// match value.kind() {
///     ValueKind::Map(map) => assert_eq!(map.len(), 1),
///     _ => panic!("expected map"),
/// }
/// assert_eq!(value.span().range(), 0..12);
/// ```
#[derive(Clone, Debug)]
pub struct Value {
    kind: ValueKind,
    span: Span,
}

impl Value {
    #[inline]
    #[must_use]
    pub fn new(kind: ValueKind, span: Span) -> Self {
        Value { kind, span }
    }

    /// Creates a byte string value with an empty span.
    pub fn str(content: impl AsRef<[u8]>) -> Self {
        Value::new(ValueKind::Str(content.as_ref().to_vec()), Span::default())
    }

    /// Creates an integer value with an empty span.
    pub fn int(value: impl Into<Integer>) -> Self {
        Value::new(ValueKind::Int(value.into()), Span::default())
    }

    /// Creates a list value with an empty span.
    pub fn list(items: Vec<Value>) -> Self {
        Value::new(ValueKind::List(items), Span::default())
    }

    /// Creates a map value with an empty span.
    pub fn map(entries: BenMap) -> Self {
        Value::new(ValueKind::Map(entries), Span::default())
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    /// Returns the span of input bytes this value was decoded from.
    ///
    /// Values built by hand have an empty span at offset 0.
    #[inline]
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the exact bytes of `input` this value was decoded from.
    ///
    /// `input` must be the buffer that was passed to the decoder.
    #[inline]
    #[must_use]
    pub fn raw<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        self.span.slice(input)
    }

    /// Returns the name of this value's type: `string`, `int`, `list` or `map`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Str(_) => "string",
            ValueKind::Int(_) => "int",
            ValueKind::List(_) => "list",
            ValueKind::Map(_) => "map",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self.kind, ValueKind::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self.kind, ValueKind::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.kind, ValueKind::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.kind, ValueKind::Map(_))
    }

    /// If the value is a byte string, returns its content.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.kind {
            ValueKind::Str(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a byte string holding valid UTF-8, returns it as text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benspan::Value;
    ///
    /// assert_eq!(Value::str("spam").as_str(), Some("spam"));
    /// assert_eq!(Value::str([0xffu8, 0xfe]).as_str(), None);
    /// assert_eq!(Value::int(1).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<&Integer> {
        match &self.kind {
            ValueKind::Int(i) => Some(i),
            _ => None,
        }
    }

    /// If the value is an integer that fits in an `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::as_i64)
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BenMap> {
        match &self.kind {
            ValueKind::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benspan::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert!(value.get(b"missing").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.kind {
            ValueKind::Str(bytes) => serialize_bytes_or_str(bytes, serializer),
            ValueKind::Int(Integer::Small(i)) => serializer.serialize_i64(*i),
            ValueKind::Int(Integer::Big(b)) => match i128::try_from(b) {
                Ok(wide) => serializer.serialize_i128(wide),
                Err(_) => serializer.collect_str(b),
            },
            ValueKind::List(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ValueKind::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(&KeyRef(k), v)?;
                }
                out.end()
            }
        }
    }
}

struct KeyRef<'a>(&'a [u8]);

impl Serialize for KeyRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_bytes_or_str(self.0, serializer)
    }
}

fn serialize_bytes_or_str<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match std::str::from_utf8(bytes) {
        Ok(text) => serializer.serialize_str(text),
        Err(_) => serializer.serialize_bytes(bytes),
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::new(ValueKind::Str(value), Span::default())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::list(value)
    }
}

impl From<BenMap> for Value {
    fn from(value: BenMap) -> Self {
        Value::map(value)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.kind {
            ValueKind::Int(Integer::Small(i)) => Ok(i),
            ValueKind::Int(Integer::Big(b)) => Err(crate::Error::custom(format!(
                "integer {} does not fit in i64",
                b
            ))),
            _ => Err(crate::Error::custom(format!(
                "expected int, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        let type_name = value.type_name();
        match value.kind {
            ValueKind::Str(bytes) => Ok(bytes),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                type_name
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        let offset = value.span.start;
        let bytes = Vec::<u8>::try_from(value)?;
        String::from_utf8(bytes).map_err(|_| crate::Error::invalid_utf8(offset))
    }
}
