//! Deserializing Rust types from decoded values.
//!
//! [`from_value`] drives any `T: Deserialize` from a borrowed [`Value`] tree,
//! so strings and byte slices can borrow straight out of the tree.
//! [`from_slice`](crate::from_slice) decodes and deserializes in one step.
//!
//! ## Mapping
//!
//! | Bencode | Rust |
//! |---------|------|
//! | byte string | `String`, `&str` (when UTF-8), `&[u8]`, `Vec<u8>`, unit enum variant |
//! | integer | any integer type that can hold it; `bool` from `0`/`1` |
//! | list | `Vec<T>`, tuples, tuple structs |
//! | map | structs, maps, single-key maps for data-carrying enum variants |
//!
//! Bencode has no null, so an `Option` field is `Some` when its key is
//! present and `None` when it is missing.
//!
//! ```rust
//! use benspan::{decode, from_value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Info<'a> {
//!     name: &'a str,
//!     #[serde(rename = "piece length")]
//!     piece_length: u32,
//! }
//!
//! let value = decode(b"d4:name4:test12:piece lengthi16384ee").unwrap();
//! let info: Info = from_value(&value).unwrap();
//! assert_eq!(info, Info { name: "test", piece_length: 16384 });
//! ```

use crate::{Error, Integer, Result, Value, ValueKind};
use serde::de::value::{SeqDeserializer as ByteSeq, StrDeserializer};
use serde::de::{self, IntoDeserializer};
use serde::{forward_to_deserialize_any, Deserialize};

/// Deserializes an instance of `T` from a decoded value.
///
/// # Errors
///
/// Fails with [`ErrorKind::Custom`](crate::ErrorKind::Custom) if the value's
/// shape does not match `T`.
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// A serde `Deserializer` over a borrowed [`Value`].
pub struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> ValueDeserializer<'de> {
    pub fn new(value: &'de Value) -> Self {
        ValueDeserializer { value }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::custom(format!(
            "expected {}, found {} at offset {}",
            expected,
            self.value.type_name(),
            self.value.span().start
        ))
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.kind() {
            ValueKind::Str(bytes) => visit_bytes_or_str(bytes, visitor),
            ValueKind::Int(Integer::Small(i)) => visitor.visit_i64(*i),
            ValueKind::Int(Integer::Big(big)) => {
                if let Ok(wide) = u128::try_from(big) {
                    visitor.visit_u128(wide)
                } else if let Ok(wide) = i128::try_from(big) {
                    visitor.visit_i128(wide)
                } else {
                    Err(Error::custom(format!(
                        "integer {} at offset {} is out of range",
                        big,
                        self.value.span().start
                    )))
                }
            }
            ValueKind::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            ValueKind::Map(map) => visitor.visit_map(MapDeserializer::new(map.iter())),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.as_i64() {
            Some(0) => visitor.visit_bool(false),
            Some(1) => visitor.visit_bool(true),
            _ => Err(self.mismatch("0 or 1")),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.kind() {
            ValueKind::Str(bytes) => visitor.visit_borrowed_bytes(bytes),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.kind() {
            ValueKind::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            // Lets `Vec<u8>` and `[u8; N]` read a byte string.
            ValueKind::Str(bytes) => {
                visitor.visit_seq(ByteSeq::<_, Error>::new(bytes.iter().copied()))
            }
            _ => Err(self.mismatch("list")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.kind() {
            ValueKind::Map(map) => visitor.visit_map(MapDeserializer::new(map.iter())),
            _ => Err(self.mismatch("map")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.kind() {
            ValueKind::Str(bytes) => {
                let variant = std::str::from_utf8(bytes)
                    .map_err(|_| self.mismatch("UTF-8 variant name"))?;
                let access: StrDeserializer<'_, Error> = variant.into_deserializer();
                visitor.visit_enum(access)
            }
            ValueKind::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                None => Err(self.mismatch("enum variant")),
            },
            _ => Err(self.mismatch("enum variant")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct identifier
    }
}

fn visit_bytes_or_str<'de, V>(bytes: &'de [u8], visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match std::str::from_utf8(bytes) {
        Ok(text) => visitor.visit_borrowed_str(text),
        Err(_) => visitor.visit_borrowed_bytes(bytes),
    }
}

struct SeqDeserializer<'de> {
    iter: std::slice::Iter<'de, Value>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(items: &'de [Value]) -> Self {
        SeqDeserializer { iter: items.iter() }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'de> {
    iter: indexmap::map::Iter<'de, Vec<u8>, Value>,
    value: Option<&'de Value>,
}

impl<'de> MapDeserializer<'de> {
    fn new(iter: indexmap::map::Iter<'de, Vec<u8>, Value>) -> Self {
        MapDeserializer { iter, value: None }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map keys and enum variant names: raw bytes, offered as text when UTF-8.
struct KeyDeserializer<'de>(&'de [u8]);

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_bytes_or_str(self.0, visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.0)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.0)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        option unit unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

struct EnumDeserializer<'de> {
    variant: &'de [u8],
    value: &'de Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(KeyDeserializer(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: &'de Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(ValueDeserializer::new(self.value).mismatch("unit variant name"))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(ValueDeserializer::new(self.value), visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(ValueDeserializer::new(self.value), visitor)
    }
}
