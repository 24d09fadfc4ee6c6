//! Unmarshaling: [`Value`] into `T: Deserialize`.
//!
//! [`ValueDeserializer`] is strict. Each `deserialize_*` hint accepts exactly
//! the matching variant, so an `I8` only fills an `i8` and a `U16` only a
//! `u16`; everything else is an [`Error::TypeMismatch`]. The exceptions:
//!
//! - `i64` also accepts `Timestamp`, and `u64` accepts a non-negative one;
//! - `Null` fills any destination with its zero value (`Option` gets `None`,
//!   an enum gets its first variant when that variant is a unit);
//! - sequences accept the bytes of a `Binary` or `Id` as `U8` elements.
//!
//! Struct fields are read through the [`StructCache`]: each declared field is
//! looked up by its serialized name and unknown keys are ignored. A field
//! that is absent or `Null` is left to serde, so `#[serde(default)]` applies
//! and `Option` becomes `None`. A field with no default is reported missing
//! the first time, flagged in the cache, and filled with its zero value from
//! then on; [`from_value`](crate::from_value) and [`from_map`](crate::from_map)
//! retry transparently when that happens.
//!
//! ```rust
//! use nson::{from_map, Error, Map, Value};
//! use serde::Deserialize;
//!
//! fn three() -> u16 {
//!     3
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Sensor {
//!     #[serde(default = "three")]
//!     id: u16,
//!     label: String,
//!     reading: Option<f32>,
//! }
//!
//! let mut map = Map::new();
//! map.insert("unused", true);
//!
//! let sensor: Sensor = from_map(map.clone()).unwrap();
//! assert_eq!(sensor, Sensor { id: 3, label: String::new(), reading: None });
//!
//! map.insert("id", Value::U32(3));
//! assert!(matches!(from_map::<Sensor>(map), Err(Error::TypeMismatch { .. })));
//! ```

use crate::cache::{StructCache, StructInfo};
use crate::format::{EMBED_TOKEN, ID_LEN, ID_TOKEN, TIMESTAMP_TOKEN, VALUE_TOKEN};
use crate::{DataType, Error, Map, Result, Value};
use once_cell::sync::Lazy;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserializer, Visitor};
use std::sync::Arc;
use tracing::debug;

static NULL: Value = Value::Null;
static EMPTY_MAP: Lazy<Value> = Lazy::new(|| Value::Map(Map::new()));
static BYTE_VALUES: Lazy<Vec<Value>> = Lazy::new(|| (0..=u8::MAX).map(Value::U8).collect());

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::type_mismatch(expected, found.data_type().name())
}

fn length_mismatch(expected: usize, found: usize) -> Error {
    Error::type_mismatch(
        &format!("Array of length {}", expected),
        &format!("Array of length {}", found),
    )
}

/// Runs an unmarshal attempt again whenever it failed on a missing field
/// that the cache has just learned to zero-fill.
pub(crate) fn retry_learned<T, F>(mut attempt: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let cache = StructCache::global();
    loop {
        let generation = cache.generation();
        match attempt() {
            Err(Error::MissingField(field)) if cache.generation() != generation => {
                debug!(field = %field, "retrying unmarshal with zero-filled field");
            }
            result => return result,
        }
    }
}

/// Deserializer reading from a borrowed [`Value`].
///
/// Prefer [`from_value`](crate::from_value), which also retries after the
/// struct cache learns a field without a default.
///
/// # Examples
///
/// ```rust
/// use nson::{Value, ValueDeserializer};
/// use serde::Deserialize;
///
/// let n = u8::deserialize(ValueDeserializer::new(&Value::U8(9))).unwrap();
/// assert_eq!(n, 9);
/// assert!(u8::deserialize(ValueDeserializer::new(&Value::I8(9))).is_err());
/// ```
pub struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> ValueDeserializer<'de> {
    #[must_use]
    pub fn new(value: &'de Value) -> Self {
        ValueDeserializer { value }
    }

    fn visit_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let seq = match self.value {
            Value::Null => SeqDeserializer::Nulls(len),
            other => SeqDeserializer::from_value(other)?,
        };
        if seq.remaining() != len {
            return Err(length_mismatch(len, seq.remaining()));
        }
        visitor.visit_seq(seq)
    }
}

macro_rules! strict_scalar {
    ($($method:ident => $visit:ident($variant:ident, $zero:expr);)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.value {
                    Value::$variant(v) => visitor.$visit(*v),
                    Value::Null => visitor.$visit($zero),
                    other => Err(mismatch(DataType::$variant.name(), other)),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::I8(v) => visitor.visit_i8(*v),
            Value::U8(v) => visitor.visit_u8(*v),
            Value::I16(v) => visitor.visit_i16(*v),
            Value::U16(v) => visitor.visit_u16(*v),
            Value::I32(v) => visitor.visit_i32(*v),
            Value::U32(v) => visitor.visit_u32(*v),
            Value::I64(v) => visitor.visit_i64(*v),
            Value::U64(v) => visitor.visit_u64(*v),
            Value::F32(v) => visitor.visit_f32(*v),
            Value::F64(v) => visitor.visit_f64(*v),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Binary(bin) => visitor.visit_borrowed_bytes(bin.as_slice()),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::Values(arr.iter())),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::Timestamp(ts) => visitor.visit_i64(ts.millis()),
            Value::Id(id) => visitor.visit_borrowed_bytes(id.as_bytes()),
        }
    }

    strict_scalar! {
        deserialize_bool => visit_bool(Bool, false);
        deserialize_i8 => visit_i8(I8, 0);
        deserialize_u8 => visit_u8(U8, 0);
        deserialize_i16 => visit_i16(I16, 0);
        deserialize_u16 => visit_u16(U16, 0);
        deserialize_i32 => visit_i32(I32, 0);
        deserialize_u32 => visit_u32(U32, 0);
        deserialize_f32 => visit_f32(F32, 0.0);
        deserialize_f64 => visit_f64(F64, 0.0);
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::I64(v) => visitor.visit_i64(*v),
            Value::Timestamp(ts) => visitor.visit_i64(ts.millis()),
            Value::Null => visitor.visit_i64(0),
            other => Err(mismatch("I64", other)),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::U64(v) => visitor.visit_u64(*v),
            Value::Timestamp(ts) if ts.millis() >= 0 => visitor.visit_u64(ts.millis() as u64),
            Value::Null => visitor.visit_u64(0),
            other => Err(mismatch("U64", other)),
        }
    }

    fn deserialize_i128<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("i128"))
    }

    fn deserialize_u128<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type("u128"))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::type_mismatch("single-character String", "String")),
                }
            }
            Value::Null => visitor.visit_char('\0'),
            other => Err(mismatch("String", other)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Null => visitor.visit_borrowed_str(""),
            other => Err(mismatch("String", other)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Binary(bin) => visitor.visit_borrowed_bytes(bin.as_slice()),
            Value::Id(id) => visitor.visit_borrowed_bytes(id.as_bytes()),
            Value::Null => visitor.visit_borrowed_bytes(&[]),
            other => Err(mismatch("Binary", other)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            other => Err(mismatch("Null", other)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match name {
            TIMESTAMP_TOKEN => match self.value {
                Value::Timestamp(ts) => visitor.visit_i64(ts.millis()),
                Value::Null => visitor.visit_i64(0),
                other => Err(mismatch("Timestamp", other)),
            },
            ID_TOKEN => match self.value {
                Value::Id(id) => visitor.visit_borrowed_bytes(id.as_bytes()),
                Value::Null => visitor.visit_bytes(&[0u8; ID_LEN]),
                other => Err(mismatch("Id", other)),
            },
            // A `Value` destination: keep Timestamp and Id distinguishable
            // from I64 and Binary by wrapping them under their private keys.
            VALUE_TOKEN => match self.value {
                Value::Timestamp(_) => visitor.visit_map(TokenMap::new(TIMESTAMP_TOKEN, self.value)),
                Value::Id(_) => visitor.visit_map(TokenMap::new(ID_TOKEN, self.value)),
                _ => self.deserialize_any(visitor),
            },
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let seq = match self.value {
            Value::Null => SeqDeserializer::Nulls(0),
            other => SeqDeserializer::from_value(other)?,
        };
        visitor.visit_seq(seq)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.visit_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.visit_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
            Value::Null => visitor.visit_map(MapDeserializer::empty()),
            other => Err(mismatch("Map", other)),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let source: &'de Value = match self.value {
            Value::Map(_) => self.value,
            Value::Null => Lazy::force(&EMPTY_MAP),
            other => return Err(mismatch("Map", other)),
        };

        let cache = StructCache::global();
        let info = cache.get_or_build(name, fields);
        let mut access = StructDeserializer::new(Arc::clone(&info), source);
        match visitor.visit_map(&mut access) {
            // Only a field this struct skipped, reported once its own keys
            // ran out; errors from nested values pass through untouched.
            Err(Error::MissingField(field)) if access.exhausted => {
                if let Some(index) = access.skipped_index(&field) {
                    cache.mark_zero_fill(&info, index);
                }
                Err(Error::MissingField(field))
            }
            result => result,
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Map(map) if map.len() == 1 => {
                let (variant, value) = map
                    .iter()
                    .next()
                    .ok_or_else(|| Error::custom("empty enum map"))?;
                visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
            }
            Value::Null => match variants.first() {
                Some(first) => visitor.visit_enum(EnumDeserializer::new(first, None)),
                None => Err(mismatch("String or single-entry Map", &NULL)),
            },
            other => Err(mismatch("String or single-entry Map", other)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Entry point for `from_map`: only struct-like destinations are accepted.
pub(crate) struct RootDeserializer<'de> {
    inner: ValueDeserializer<'de>,
}

impl<'de> RootDeserializer<'de> {
    pub(crate) fn new(value: &'de Value) -> Self {
        RootDeserializer {
            inner: ValueDeserializer::new(value),
        }
    }
}

fn root_error(kind: &str) -> Error {
    Error::structural(format!(
        "unmarshal destination must be a struct or map, found {}",
        kind
    ))
}

macro_rules! reject_root {
    ($($method:ident => $kind:expr,)*) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                Err(root_error($kind))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for RootDeserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.inner.deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.inner.deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.inner.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match name {
            TIMESTAMP_TOKEN => Err(root_error("Timestamp")),
            ID_TOKEN => Err(root_error("Id")),
            VALUE_TOKEN => self.inner.deserialize_newtype_struct(name, visitor),
            _ => visitor.visit_newtype_struct(self),
        }
    }

    reject_root! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "str",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_identifier => "identifier",
        deserialize_ignored_any => "ignored value",
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(root_error(name))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(root_error("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(root_error(name))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(root_error(name))
    }
}

enum SeqDeserializer<'de> {
    Values(std::slice::Iter<'de, Value>),
    Bytes(std::slice::Iter<'de, u8>),
    Nulls(usize),
}

impl<'de> SeqDeserializer<'de> {
    fn from_value(value: &'de Value) -> Result<Self> {
        match value {
            Value::Array(arr) => Ok(SeqDeserializer::Values(arr.iter())),
            Value::Binary(bin) => Ok(SeqDeserializer::Bytes(bin.as_slice().iter())),
            Value::Id(id) => Ok(SeqDeserializer::Bytes(id.as_bytes().iter())),
            other => Err(mismatch("Array", other)),
        }
    }

    fn remaining(&self) -> usize {
        match self {
            SeqDeserializer::Values(iter) => iter.len(),
            SeqDeserializer::Bytes(iter) => iter.len(),
            SeqDeserializer::Nulls(n) => *n,
        }
    }

    fn next_value(&mut self) -> Option<&'de Value> {
        match self {
            SeqDeserializer::Values(iter) => iter.next(),
            SeqDeserializer::Bytes(iter) => iter.next().map(|&b| &BYTE_VALUES[b as usize]),
            SeqDeserializer::Nulls(n) if *n > 0 => {
                *n -= 1;
                Some(&NULL)
            }
            SeqDeserializer::Nulls(_) => None,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.next_value() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining())
    }
}

struct MapDeserializer<'de> {
    iter: Option<indexmap::map::Iter<'de, String, Value>>,
    value: Option<&'de Value>,
}

impl<'de> MapDeserializer<'de> {
    fn new(map: &'de Map) -> Self {
        MapDeserializer {
            iter: Some(map.iter()),
            value: None,
        }
    }

    fn empty() -> Self {
        MapDeserializer {
            iter: None,
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.as_mut().and_then(Iterator::next) {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::<Error>::new(key))
                    .map(Some)
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
        self.iter.as_ref().map(ExactSizeIterator::len)
    }
}

/// Presents a Timestamp or Id to a `Value` visitor as `{token: value}`.
struct TokenMap<'de> {
    key: Option<&'static str>,
    value: &'de Value,
}

impl<'de> TokenMap<'de> {
    fn new(key: &'static str, value: &'de Value) -> Self {
        TokenMap {
            key: Some(key),
            value,
        }
    }
}

impl<'de> de::MapAccess<'de> for TokenMap<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.key.take() {
            Some(key) => seed
                .deserialize(BorrowedStrDeserializer::<Error>::new(key))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }
}

/// Walks a struct's cached fields in declared order, looking each one up in
/// the source map. Absent and `Null` fields are skipped unless the cache
/// says to zero-fill them; leftover keys are ignored.
struct StructDeserializer<'de> {
    info: Arc<StructInfo>,
    source: &'de Value,
    next: usize,
    value: Option<&'de Value>,
    skipped: Vec<usize>,
    exhausted: bool,
}

impl<'de> StructDeserializer<'de> {
    fn new(info: Arc<StructInfo>, source: &'de Value) -> Self {
        StructDeserializer {
            info,
            source,
            next: 0,
            value: None,
            skipped: Vec::new(),
            exhausted: false,
        }
    }

    fn lookup(&self, name: &str) -> Option<&'de Value> {
        match self.source {
            Value::Map(map) => map.get(name),
            _ => None,
        }
    }

    fn skipped_index(&self, name: &str) -> Option<usize> {
        self.skipped
            .iter()
            .copied()
            .find(|&index| self.info.fields()[index].name == name)
    }
}

impl<'de> de::MapAccess<'de> for StructDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        while let Some(field) = self.info.fields().get(self.next) {
            let index = self.next;
            let name = field.name;
            self.next += 1;

            let value = match self.lookup(name) {
                Some(value) if !value.is_null() => value,
                _ if self.info.zero_fill(index) => &NULL,
                _ => {
                    self.skipped.push(index);
                    continue;
                }
            };
            self.value = Some(value);
            return seed
                .deserialize(BorrowedStrDeserializer::<Error>::new(name))
                .map(Some);
        }
        self.exhausted = true;
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(FieldDeserializer {
                value,
                source: self.source,
            }),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// A struct field's value, plus the map it came from for embedded fields.
struct FieldDeserializer<'de> {
    value: &'de Value,
    source: &'de Value,
}

macro_rules! forward_to_value {
    ($($method:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                ValueDeserializer::new(self.value).$method($($arg,)* visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for FieldDeserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if name == EMBED_TOKEN {
            visitor.visit_newtype_struct(ValueDeserializer::new(self.source))
        } else {
            ValueDeserializer::new(self.value).deserialize_newtype_struct(name, visitor)
        }
    }

    forward_to_value! {
        deserialize_any();
        deserialize_bool();
        deserialize_i8();
        deserialize_i16();
        deserialize_i32();
        deserialize_i64();
        deserialize_i128();
        deserialize_u8();
        deserialize_u16();
        deserialize_u32();
        deserialize_u64();
        deserialize_u128();
        deserialize_f32();
        deserialize_f64();
        deserialize_char();
        deserialize_str();
        deserialize_string();
        deserialize_bytes();
        deserialize_byte_buf();
        deserialize_option();
        deserialize_unit();
        deserialize_unit_struct(name: &'static str);
        deserialize_seq();
        deserialize_tuple(len: usize);
        deserialize_tuple_struct(name: &'static str, len: usize);
        deserialize_map();
        deserialize_struct(name: &'static str, fields: &'static [&'static str]);
        deserialize_enum(name: &'static str, variants: &'static [&'static str]);
        deserialize_identifier();
        deserialize_ignored_any();
    }
}

struct EnumDeserializer<'de> {
    variant: &'de str,
    value: Option<&'de Value>,
}

impl<'de> EnumDeserializer<'de> {
    fn new(variant: &'de str, value: Option<&'de Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = VariantDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer<'de> {
    value: Option<&'de Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(mismatch("Null", other)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::type_mismatch("single-entry Map", "String")),
        }
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value) => ValueDeserializer::new(value).visit_tuple(len, visitor),
            None => Err(Error::type_mismatch("single-entry Map", "String")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Map(map)) => visitor.visit_map(MapDeserializer::new(map)),
            Some(other) => Err(mismatch("Map", other)),
            None => Err(Error::type_mismatch("single-entry Map", "String")),
        }
    }
}
