//! Marshaling: `T: Serialize` into [`Value`].
//!
//! [`ValueSerializer`] maps each serde data-model call onto exactly one NSON
//! variant, keeping integer widths intact: `serialize_i8` produces `I8`,
//! `serialize_u16` produces `U16`, and so on. Structs and string-keyed maps
//! become `Map`; sequences and tuples become `Array`.
//!
//! Enums follow serde's externally tagged convention: a unit variant is its
//! name as a `String`, any other variant is a single-entry `Map` from the
//! variant name to its payload.
//!
//! ## Omitting empty fields
//!
//! [`is_empty`] plugs into `skip_serializing_if`:
//!
//! ```rust
//! use nson::{to_map, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Counter {
//!     #[serde(skip_serializing_if = "nson::is_empty")]
//!     hits: u32,
//! }
//!
//! assert!(to_map(&Counter { hits: 0 }).unwrap().get("hits").is_none());
//! assert_eq!(to_map(&Counter { hits: 7 }).unwrap().get("hits"), Some(&Value::U32(7)));
//! ```

use crate::format::{EMBED_TOKEN, ID_TOKEN, TIMESTAMP_TOKEN};
use crate::{Array, Binary, Error, Id, Map, Result, Timestamp, Value};
use serde::{ser, Serialize};

/// Serializer whose output is a [`Value`].
///
/// # Examples
///
/// ```rust
/// use nson::{Value, ValueSerializer};
/// use serde::Serialize;
///
/// assert_eq!(5u16.serialize(ValueSerializer).unwrap(), Value::U16(5));
/// assert_eq!('x'.serialize(ValueSerializer).unwrap(), Value::from("x"));
/// ```
pub struct ValueSerializer;

pub struct SerializeArray {
    array: Array,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
}

/// Payload of a tuple or struct variant, wrapped as `{variant: payload}` on `end`.
pub struct SerializeVariant<S> {
    variant: &'static str,
    inner: S,
}

/// Serializes a value, unwrapping an [`Embed`](crate::Embed) that has no
/// parent to splice into.
pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer).map(|v| match take_embedded(v) {
        Ok(map) => Value::Map(map),
        Err(v) => v,
    })
}

// An embedded struct travels up to its parent as `{EMBED_TOKEN: Map}`.
fn embedded(map: Map) -> Value {
    let mut marker = Map::with_capacity(1);
    marker.insert(EMBED_TOKEN, Value::Map(map));
    Value::Map(marker)
}

fn take_embedded(value: Value) -> std::result::Result<Map, Value> {
    match value {
        Value::Map(map) if map.len() == 1 && map.contains_key(EMBED_TOKEN) => {
            match map.into_iter().next() {
                Some((_, Value::Map(inner))) => Ok(inner),
                Some((key, other)) => {
                    let mut map = Map::with_capacity(1);
                    map.insert(key, other);
                    Err(Value::Map(map))
                }
                None => Err(Value::Map(Map::new())),
            }
        }
        other => Err(other),
    }
}

fn tagged(variant: &'static str, payload: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(variant, payload);
    Value::Map(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeVariant<SerializeArray>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeVariant<SerializeMap>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::I8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::I16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::I32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::I64(v))
    }

    fn serialize_i128(self, _v: i128) -> Result<Value> {
        Err(Error::unsupported_type("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::U8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::U16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::U32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::U64(v))
    }

    fn serialize_u128(self, _v: u128) -> Result<Value> {
        Err(Error::unsupported_type("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(Binary::from(v)))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        match name {
            TIMESTAMP_TOKEN => match to_value(value)? {
                Value::I64(millis) => Ok(Value::Timestamp(Timestamp::from_millis(millis))),
                other => Err(Error::custom(format!(
                    "Timestamp payload must be I64, found {}",
                    other.data_type()
                ))),
            },
            ID_TOKEN => match to_value(value)? {
                Value::Binary(bytes) => Id::from_slice(&bytes).map(Value::Id),
                other => Err(Error::custom(format!(
                    "Id payload must be Binary, found {}",
                    other.data_type()
                ))),
            },
            EMBED_TOKEN => match to_value(value)? {
                Value::Map(map) => Ok(embedded(map)),
                other => Err(Error::unsupported_type(format!(
                    "embedded value must be a struct or map, found {}",
                    other.data_type()
                ))),
            },
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray> {
        Ok(SerializeArray::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray> {
        Ok(SerializeArray::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeArray> {
        Ok(SerializeArray::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<SerializeArray>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeArray::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<SerializeMap>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeMap::with_capacity(len),
        })
    }
}

impl SerializeArray {
    fn with_capacity(len: usize) -> Self {
        SerializeArray {
            array: Array::with_capacity(len),
        }
    }
}

impl SerializeMap {
    fn with_capacity(len: usize) -> Self {
        SerializeMap {
            map: Map::with_capacity(len),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.array.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.array))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeArray> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, ser::SerializeSeq::end(self.inner)?))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::unsupported_type(format!(
                "map key must be a string, found {}",
                other.data_type()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match take_embedded(value.serialize(ValueSerializer)?) {
            Ok(fields) => self.map.extend(fields),
            Err(value) => {
                self.map.insert(key, value);
            }
        }
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeMap> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, ser::SerializeStruct::end(self.inner)?))
    }
}

/// Reports whether a value is the zero value of its kind.
///
/// Intended for `#[serde(skip_serializing_if = "nson::is_empty")]`. Zero
/// numbers, `false`, `'\0'`, empty strings, byte strings, sequences and maps,
/// `None` and unit are empty. Structs, [`Timestamp`], [`Id`] and enum
/// variants never are, and newtype wrappers report their inner value.
///
/// # Examples
///
/// ```rust
/// use nson::is_empty;
///
/// assert!(is_empty(&0u32));
/// assert!(is_empty(&Vec::<String>::new()));
/// assert!(is_empty(&None::<i32>));
/// assert!(!is_empty(&Some(0)));
/// assert!(!is_empty(&"x"));
/// ```
pub fn is_empty<T>(value: &T) -> bool
where
    T: ?Sized + Serialize,
{
    value.serialize(EmptyProbe).unwrap_or(false)
}

struct EmptyProbe;

/// Counts entries without serializing them.
struct CountEntries {
    count: usize,
    never_empty: bool,
}

impl CountEntries {
    fn new() -> Self {
        CountEntries {
            count: 0,
            never_empty: false,
        }
    }

    fn opaque() -> Self {
        CountEntries {
            count: 0,
            never_empty: true,
        }
    }

    fn done(&self) -> Result<bool> {
        Ok(!self.never_empty && self.count == 0)
    }
}

impl ser::Serializer for EmptyProbe {
    type Ok = bool;
    type Error = Error;

    type SerializeSeq = CountEntries;
    type SerializeTuple = CountEntries;
    type SerializeTupleStruct = CountEntries;
    type SerializeTupleVariant = CountEntries;
    type SerializeMap = CountEntries;
    type SerializeStruct = CountEntries;
    type SerializeStructVariant = CountEntries;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<bool> {
        Ok(!v)
    }

    fn serialize_i8(self, v: i8) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i16(self, v: i16) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i32(self, v: i32) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i64(self, v: i64) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u8(self, v: u8) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u16(self, v: u16) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u32(self, v: u32) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u64(self, v: u64) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_f32(self, v: f32) -> Result<bool> {
        Ok(v == 0.0)
    }

    fn serialize_f64(self, v: f64) -> Result<bool> {
        Ok(v == 0.0)
    }

    fn serialize_char(self, v: char) -> Result<bool> {
        Ok(v == '\0')
    }

    fn serialize_str(self, v: &str) -> Result<bool> {
        Ok(v.is_empty())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<bool> {
        Ok(v.is_empty())
    }

    fn serialize_none(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_unit(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<bool> {
        Ok(false)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        if name == TIMESTAMP_TOKEN || name == ID_TOKEN {
            return Ok(false);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<CountEntries> {
        Ok(CountEntries::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<CountEntries> {
        Ok(CountEntries::new())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<CountEntries> {
        Ok(CountEntries::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<CountEntries> {
        Ok(CountEntries::opaque())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<CountEntries> {
        Ok(CountEntries::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<CountEntries> {
        Ok(CountEntries::opaque())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<CountEntries> {
        Ok(CountEntries::opaque())
    }
}

impl ser::SerializeSeq for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_element<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeTuple for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_element<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeTupleStruct for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeTupleVariant for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeMap for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_key<T>(&mut self, _key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.count += 1;
        Ok(())
    }

    fn serialize_value<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeStruct for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

impl ser::SerializeStructVariant for CountEntries {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        self.done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Inner {
        x: i32,
    }

    #[derive(Serialize)]
    struct Meters(f64);

    #[derive(Serialize)]
    enum Shape {
        Dot,
        Circle(f32),
        Rect { w: u8, h: u8 },
        Pair(i8, i8),
    }

    #[test]
    fn test_embedded_fields_are_spliced() {
        #[derive(Serialize)]
        struct Outer {
            name: &'static str,
            inner: crate::Embed<Inner>,
            after: bool,
        }

        let outer = Outer {
            name: "n",
            inner: crate::Embed(Inner { x: 4 }),
            after: true,
        };
        let map = to_value(&outer).unwrap().as_map().cloned().unwrap();
        assert_eq!(
            map.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["name", "x", "after"]
        );
        assert_eq!(map.get("x"), Some(&Value::I32(4)));

        assert_eq!(
            to_value(&crate::Embed(Inner { x: 1 })).unwrap(),
            to_value(&Inner { x: 1 }).unwrap()
        );
        assert!(matches!(
            to_value(&vec![crate::Embed(5u8)]),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_scalars_keep_width() {
        assert_eq!(to_value(&-1i8).unwrap(), Value::I8(-1));
        assert_eq!(to_value(&1u16).unwrap(), Value::U16(1));
        assert_eq!(to_value(&1usize).unwrap(), Value::U64(1));
        assert_eq!(to_value(&-1isize).unwrap(), Value::I64(-1));
        assert_eq!(to_value(&1.5f32).unwrap(), Value::F32(1.5));
        assert_eq!(to_value(&()).unwrap(), Value::Null);
        assert_eq!(to_value(&None::<u8>).unwrap(), Value::Null);
    }

    #[test]
    fn test_wide_integers_unsupported() {
        assert!(matches!(to_value(&1i128), Err(Error::UnsupportedType(_))));
        assert!(matches!(to_value(&1u128), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Shape::Dot).unwrap(), Value::from("Dot"));

        let circle = to_value(&Shape::Circle(1.0)).unwrap();
        assert_eq!(circle.as_map().unwrap().get("Circle"), Some(&Value::F32(1.0)));

        let rect = to_value(&Shape::Rect { w: 2, h: 3 }).unwrap();
        let body = rect.as_map().unwrap().get_map("Rect").unwrap();
        assert_eq!(body.get("h"), Some(&Value::U8(3)));

        let pair = to_value(&Shape::Pair(1, 2)).unwrap();
        assert_eq!(pair.as_map().unwrap().get_array("Pair").unwrap().len(), 2);
    }

    #[test]
    fn test_map_keys_must_be_strings() {
        let mut good = BTreeMap::new();
        good.insert("a".to_string(), 1u8);
        assert!(to_value(&good).unwrap().is_map());

        let mut bad = HashMap::new();
        bad.insert(1u8, 1u8);
        assert!(matches!(to_value(&bad), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_special_newtypes() {
        let ts = Timestamp::from_millis(42);
        assert_eq!(to_value(&ts).unwrap(), Value::Timestamp(ts));

        let id = Id::from_bytes([9; 12]);
        assert_eq!(to_value(&id).unwrap(), Value::Id(id));

        assert_eq!(to_value(&Meters(2.0)).unwrap(), Value::F64(2.0));
    }

    #[test]
    fn test_value_passes_through() {
        let mut map = Map::new();
        map.insert("ts", Timestamp::from_millis(1));
        map.insert("id", Id::from_bytes([1; 12]));
        map.insert("bin", Binary::from(vec![1]));
        map.insert("small", Value::I16(-4));
        let value = Value::Map(map);
        assert_eq!(to_value(&value).unwrap(), value);
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&0i64));
        assert!(is_empty(&0.0f32));
        assert!(is_empty(&false));
        assert!(is_empty(&""));
        assert!(is_empty(&Binary::new()));
        assert!(is_empty(&HashMap::<String, i32>::new()));
        assert!(is_empty(&Meters(0.0)));
        assert!(is_empty(&Value::Null));

        assert!(!is_empty(&1u8));
        assert!(!is_empty(&true));
        assert!(!is_empty(&vec![0u8]));
        assert!(!is_empty(&Inner { x: 0 }));
        assert!(!is_empty(&Timestamp::from_millis(0)));
        assert!(!is_empty(&Id::default()));
        assert!(!is_empty(&Shape::Dot));
        assert!(!is_empty(&(0, 0)));
    }
}
