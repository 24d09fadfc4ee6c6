//! Typed value representation for NSON documents.
//!
//! [`Value`] is a closed tagged union: every value carries exactly one
//! variant, and each variant has its own wire tag (see [`DataType`]). Unlike
//! JSON-style value trees, integer widths and signedness are part of the
//! value, so `Value::I8(5)` and `Value::I16(5)` are different values.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use nson::{nson, Value};
//!
//! let small = Value::from(5i8);
//! let text = Value::from("hello");
//! let doc = nson!({
//!     "name": "Alice",
//!     "age": 30u8
//! });
//!
//! assert_eq!(small, Value::I8(5));
//! assert!(text.is_string());
//! assert!(doc.is_map());
//! ```
//!
//! ### Extracting Values
//!
//! `TryFrom` is exact: no widening, no narrowing.
//!
//! ```rust
//! use nson::Value;
//!
//! assert_eq!(i16::try_from(Value::I16(7)).unwrap(), 7);
//! assert!(i32::try_from(Value::I16(7)).is_err());
//! ```
//!
//! ### Converting from Rust Types
//!
//! ```rust
//! use nson::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.get("x"), Some(&Value::I32(10)));
//! ```

use crate::decode::decode_value_with_options;
use crate::encode::encode_value;
use crate::format::{ID_TOKEN, TIMESTAMP_TOKEN, VALUE_TOKEN};
use crate::options::DecodeOptions;
use crate::{Array, Binary, DataType, Error, Id, Map, Result, Timestamp};
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One typed unit of the document model.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Binary(Binary),
    Array(Array),
    Map(Map),
    Timestamp(Timestamp),
    Id(Id),
}

macro_rules! copy_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[inline]
        #[must_use]
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Value::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

macro_rules! ref_accessor {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty) => {
        #[inline]
        #[must_use]
        pub fn $name(&self) -> Option<&$ty> {
            match self {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }

        #[inline]
        pub fn $name_mut(&mut self) -> Option<&mut $ty> {
            match self {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl Value {
    /// Returns the variant of this value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::{DataType, Value};
    ///
    /// assert_eq!(Value::U16(1).data_type(), DataType::U16);
    /// assert_eq!(Value::Null.data_type().tag(), 0x02);
    /// ```
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::I8(_) => DataType::I8,
            Value::U8(_) => DataType::U8,
            Value::I16(_) => DataType::I16,
            Value::U16(_) => DataType::U16,
            Value::I32(_) => DataType::I32,
            Value::U32(_) => DataType::U32,
            Value::I64(_) => DataType::I64,
            Value::U64(_) => DataType::U64,
            Value::F32(_) => DataType::F32,
            Value::F64(_) => DataType::F64,
            Value::String(_) => DataType::String,
            Value::Binary(_) => DataType::Binary,
            Value::Array(_) => DataType::Array,
            Value::Map(_) => DataType::Map,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Id(_) => DataType::Id,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` for any fixed-width integer variant.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::U8(_)
                | Value::I16(_)
                | Value::U16(_)
                | Value::I32(_)
                | Value::U32(_)
                | Value::I64(_)
                | Value::U64(_)
        )
    }

    /// Returns `true` for integer and floating-point variants.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        self.is_integer() || matches!(self, Value::F32(_) | Value::F64(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    copy_accessor!(as_bool, Bool, bool);
    copy_accessor!(as_i8, I8, i8);
    copy_accessor!(as_u8, U8, u8);
    copy_accessor!(as_i16, I16, i16);
    copy_accessor!(as_u16, U16, u16);
    copy_accessor!(as_i32, I32, i32);
    copy_accessor!(as_u32, U32, u32);
    copy_accessor!(as_i64, I64, i64);
    copy_accessor!(as_u64, U64, u64);
    copy_accessor!(as_f32, F32, f32);
    copy_accessor!(as_f64, F64, f64);
    copy_accessor!(as_timestamp, Timestamp, Timestamp);
    copy_accessor!(as_id, Id, Id);
    ref_accessor!(as_binary, as_binary_mut, Binary, Binary);
    ref_accessor!(as_array, as_array_mut, Array, Array);
    ref_accessor!(as_map, as_map_mut, Map, Map);

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::I32(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Encodes the tag byte followed by the payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode_value(self, &mut buf)?;
        Ok(buf)
    }

    /// Decodes a single tagged value, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_value_with_options(bytes, &DecodeOptions::default())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Binary(bin) => bin.serialize(serializer),
            Value::Array(arr) => arr.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Timestamp(ts) => ts.serialize(serializer),
            Value::Id(id) => id.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid NSON value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i8<E>(self, v: i8) -> std::result::Result<Value, E> {
        Ok(Value::I8(v))
    }

    fn visit_i16<E>(self, v: i16) -> std::result::Result<Value, E> {
        Ok(Value::I16(v))
    }

    fn visit_i32<E>(self, v: i32) -> std::result::Result<Value, E> {
        Ok(Value::I32(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::I64(v))
    }

    fn visit_u8<E>(self, v: u8) -> std::result::Result<Value, E> {
        Ok(Value::U8(v))
    }

    fn visit_u16<E>(self, v: u16) -> std::result::Result<Value, E> {
        Ok(Value::U16(v))
    }

    fn visit_u32<E>(self, v: u32) -> std::result::Result<Value, E> {
        Ok(Value::U32(v))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::U64(v))
    }

    fn visit_f32<E>(self, v: f32) -> std::result::Result<Value, E> {
        Ok(Value::F32(v))
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::F64(v))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Binary(Binary::from(v)))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Binary(Binary::from(v)))
    }

    fn visit_unit<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_seq<A>(self, seq: A) -> std::result::Result<Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        ArrayVisitor.visit_seq(seq).map(Value::Array)
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut map = Map::new();
        let first: Option<String> = access.next_key()?;
        match first.as_deref() {
            // Timestamp and Id travel through serde as single-entry maps under
            // private keys, so they keep their variant.
            Some(TIMESTAMP_TOKEN) => {
                let millis: i64 = access.next_value()?;
                return Ok(Value::Timestamp(Timestamp::from_millis(millis)));
            }
            Some(ID_TOKEN) => {
                let bytes: Binary = access.next_value()?;
                return Id::from_slice(&bytes).map(Value::Id).map_err(de::Error::custom);
            }
            Some(_) => {}
            None => return Ok(Value::Map(map)),
        }

        if let Some(key) = first {
            let value: Value = access.next_value()?;
            map.insert(key, value);
        }
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(VALUE_TOKEN, ValueVisitor)
    }
}

struct ArrayVisitor;

impl<'de> Visitor<'de> for ArrayVisitor {
    type Value = Array;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Array, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut arr = Array::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(elem) = seq.next_element::<Value>()? {
            arr.push(elem);
        }
        Ok(arr)
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ArrayVisitor)
    }
}

struct MapVisitor;

impl<'de> Visitor<'de> for MapVisitor {
    type Value = Map;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string-keyed map")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Map, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor)
    }
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::type_mismatch(
                            DataType::$variant.name(),
                            other.data_type().name(),
                        )),
                    }
                }
            }
        )*
    };
}

from_scalar! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Binary => Binary,
    Array => Array,
    Map => Map,
    Timestamp => Timestamp,
    Id => Id,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(Array::from(v))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Timestamp(Timestamp::from(dt))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_is_exact() {
        assert_eq!(i8::try_from(Value::I8(-1)).unwrap(), -1);
        assert_eq!(
            i64::try_from(Value::I32(1)).unwrap_err(),
            Error::type_mismatch("I64", "I32")
        );
        assert_eq!(
            u32::try_from(Value::I32(1)).unwrap_err(),
            Error::type_mismatch("U32", "I32")
        );
        assert!(i64::try_from(Value::Timestamp(Timestamp::from_millis(1))).is_err());
        assert_eq!(String::try_from(Value::from("x")).unwrap(), "x");
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(1u8), Value::U8(1));
        assert_eq!(Value::from(1i16), Value::I16(1));
        assert_eq!(Value::from(1.5f32), Value::F32(1.5));
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3u64)), Value::U64(3));
    }

    #[test]
    fn test_accessors() {
        let mut value = Value::Map(Map::new());
        assert!(value.is_map());
        value.as_map_mut().unwrap().insert("k", 1i32);
        assert_eq!(value.as_map().unwrap().len(), 1);
        assert_eq!(value.as_i32(), None);

        assert!(Value::U64(1).is_integer());
        assert!(Value::F64(1.0).is_number());
        assert!(!Value::F64(1.0).is_integer());
        assert!(!Value::Timestamp(Timestamp::default()).is_number());
    }

    #[test]
    fn test_data_type_matches_every_variant() {
        let values = vec![
            (Value::Null, DataType::Null),
            (Value::Bool(false), DataType::Bool),
            (Value::I8(0), DataType::I8),
            (Value::U8(0), DataType::U8),
            (Value::I16(0), DataType::I16),
            (Value::U16(0), DataType::U16),
            (Value::I32(0), DataType::I32),
            (Value::U32(0), DataType::U32),
            (Value::I64(0), DataType::I64),
            (Value::U64(0), DataType::U64),
            (Value::F32(0.0), DataType::F32),
            (Value::F64(0.0), DataType::F64),
            (Value::from(""), DataType::String),
            (Value::Binary(Binary::new()), DataType::Binary),
            (Value::Array(Array::new()), DataType::Array),
            (Value::Map(Map::new()), DataType::Map),
            (Value::Timestamp(Timestamp::default()), DataType::Timestamp),
            (Value::Id(Id::default()), DataType::Id),
        ];
        for (value, data_type) in values {
            assert_eq!(value.data_type(), data_type);
        }
    }

    #[test]
    fn test_json_deserialize() {
        let value: Value = serde_json::from_str(r#"{"a": [1, -2, 1.5, null, "s"]}"#).unwrap();
        let arr = value.as_map().unwrap().get_array("a").unwrap();
        assert_eq!(arr[0], Value::U64(1));
        assert_eq!(arr[1], Value::I64(-2));
        assert_eq!(arr[2], Value::F64(1.5));
        assert_eq!(arr[3], Value::Null);
        assert_eq!(arr[4], Value::from("s"));
    }
}
