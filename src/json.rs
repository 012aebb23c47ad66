//! JSON projection of decoded values.
//!
//! Bencode byte strings have no character set, so projecting them to JSON
//! text needs a [`Utf8Policy`]:
//!
//! - [`Utf8Policy::Strict`] fails on the first string (or map key) that is not
//!   valid UTF-8, reporting the offset of the offending node
//! - [`Utf8Policy::Lossy`] replaces invalid sequences with U+FFFD
//!
//! Integers beyond the `i64` range are rendered as JSON numbers when they fit
//! in a `u64`, and as decimal strings otherwise.
//!
//! ```rust
//! use benspan::{decode, to_json_string, Utf8Policy};
//!
//! let value = decode(b"d3:numi3e4:spaml1:a1:bee").unwrap();
//! let json = to_json_string(&value, Utf8Policy::Strict).unwrap();
//! assert_eq!(json, r#"{"num":3,"spam":["a","b"]}"#);
//! ```

use crate::options::Utf8Policy;
use crate::{Error, Integer, Result, Value, ValueKind};
use serde_json::{Map, Number, Value as Json};

/// Projects `value` into a [`serde_json::Value`].
///
/// # Errors
///
/// With [`Utf8Policy::Strict`], fails with
/// [`ErrorKind::InvalidUtf8`](crate::ErrorKind::InvalidUtf8) if any string or
/// key is not valid UTF-8.
pub fn to_json(value: &Value, policy: Utf8Policy) -> Result<Json> {
    match value.kind() {
        ValueKind::Str(bytes) => text(bytes, value.span().start, policy).map(Json::String),
        ValueKind::Int(integer) => Ok(number(integer)),
        ValueKind::List(items) => items
            .iter()
            .map(|item| to_json(item, policy))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        ValueKind::Map(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, item) in entries.iter() {
                // Keys have no span of their own; blame the enclosing map.
                let key = text(key, value.span().start, policy)?;
                object.insert(key, to_json(item, policy)?);
            }
            Ok(Json::Object(object))
        }
    }
}

/// Projects `value` and renders it as compact JSON text.
///
/// # Errors
///
/// Fails under the same conditions as [`to_json`].
pub fn to_json_string(value: &Value, policy: Utf8Policy) -> Result<String> {
    let json = to_json(value, policy)?;
    serde_json::to_string(&json).map_err(Error::custom)
}

/// Like [`to_json_string`], with indentation.
///
/// # Errors
///
/// Fails under the same conditions as [`to_json`].
pub fn to_json_string_pretty(value: &Value, policy: Utf8Policy) -> Result<String> {
    let json = to_json(value, policy)?;
    serde_json::to_string_pretty(&json).map_err(Error::custom)
}

fn text(bytes: &[u8], offset: usize, policy: Utf8Policy) -> Result<String> {
    match policy {
        Utf8Policy::Strict => String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::invalid_utf8(offset)),
        Utf8Policy::Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn number(integer: &Integer) -> Json {
    match integer {
        Integer::Small(i) => Json::Number(Number::from(*i)),
        Integer::Big(big) => match u64::try_from(big) {
            Ok(wide) => Json::Number(Number::from(wide)),
            Err(_) => Json::String(big.to_string()),
        },
    }
}
