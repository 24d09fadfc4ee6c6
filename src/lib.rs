//! # nson
//!
//! A Serde-compatible implementation of NSON, a self-describing,
//! strongly-typed binary document format in the spirit of BSON.
//!
//! ## Key Features
//!
//! - **Typed values**: integer widths and signedness survive the round trip;
//!   `Value::I8(5)` and `Value::U16(5)` are different values with different tags
//! - **Strict unmarshaling**: no silent widening or narrowing; an `I8` never
//!   lands in an `i16`
//! - **Hostile-input safe decoding**: every declared length is validated
//!   against configurable bounds before anything is allocated
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`,
//!   including `rename`, `skip`, `default` and `skip_serializing_if`; [`Embed`]
//!   promotes a struct's fields into its parent
//! - **12-byte Ids**: time-ordered identifiers with a lock-free generator
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! nson = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Marshal, encode, decode, unmarshal
//!
//! ```rust
//! use nson::{from_slice, to_vec, Id};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: Id,
//!     name: String,
//!     age: u8,
//!     #[serde(skip_serializing_if = "nson::is_empty")]
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     id: Id::new(),
//!     name: "Alice".to_string(),
//!     age: 30,
//!     tags: vec![],
//! };
//!
//! let bytes = to_vec(&user).unwrap();
//! let back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Working with documents directly
//!
//! ```rust
//! use nson::{nson, Map, Value};
//!
//! let doc = nson!({ "a": 1i32, "b": "x" });
//! let map = doc.as_map().unwrap();
//!
//! let bytes = map.to_bytes().unwrap();
//! let decoded = Map::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded.get("a"), Some(&Value::I32(1)));
//! assert_eq!(decoded.get_str("b").unwrap(), "x");
//! ```
//!
//! ## Mapping Rust types
//!
//! | Rust | NSON |
//! |------|------|
//! | `bool` | `Bool` |
//! | `i8`..`i64`, `u8`..`u64` | the variant of the same width |
//! | `isize` / `usize` | `I64` / `U64` |
//! | `f32` / `f64` | `F32` / `F64` |
//! | `String`, `&str`, `char` | `String` |
//! | [`Binary`], `#[serde(with = "nson::bytes")]` | `Binary` |
//! | `Vec<T>`, arrays, tuples | `Array` |
//! | structs, string-keyed maps | `Map` |
//! | [`Timestamp`], `#[serde(with = "nson::datetime")]` | `Timestamp` |
//! | [`Id`] | `Id` |
//! | [`Embed<T>`] | `T`'s fields, spliced into the parent `Map` |
//! | `Option::None`, `()` | `Null` |
//! | unit enum variant | `String` |
//! | other enum variants | `Map` with one entry |
//!
//! `i128`/`u128` and maps with non-string keys are rejected with
//! [`Error::UnsupportedType`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (cache builds, rejected input, framed
//! reads and writes) and never installs a subscriber.

pub mod array;
pub mod binary;
pub mod cache;
pub mod de;
pub mod decode;
pub mod embed;
pub mod encode;
pub mod error;
pub mod format;
pub mod id;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod timestamp;
pub mod value;

pub use array::Array;
pub use binary::{bytes, Binary};
pub use cache::{FieldInfo, StructCache, StructInfo};
pub use de::ValueDeserializer;
pub use decode::{
    decode_array, decode_array_with_options, decode_map, decode_map_with_options, decode_value,
    decode_value_with_options,
};
pub use embed::Embed;
pub use encode::{encode_array, encode_map, encode_value};
pub use error::{Error, Result};
pub use format::{DataType, ID_LEN, MAX_KEY_LEN, MAX_NSON_SIZE, MIN_BLOB_SIZE, MIN_NSON_SIZE};
pub use id::{Id, IdGenerator};
pub use map::Map;
pub use options::DecodeOptions;
pub use ser::{is_empty, ValueSerializer};
pub use timestamp::{datetime, Timestamp};
pub use value::Value;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Errors
///
/// Returns an error if the value contains a type NSON cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Marshal a struct or string-keyed map into a document.
///
/// # Examples
///
/// ```rust
/// use nson::{to_map, Embed, Error, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Base { id: u32 }
///
/// #[derive(Serialize)]
/// struct Record {
///     base: Embed<Base>,
///     #[serde(rename = "n")]
///     name: String,
///     #[serde(skip)]
///     cached: bool,
/// }
///
/// let map = to_map(&Record { base: Embed(Base { id: 1 }), name: "x".into(), cached: true }).unwrap();
/// assert_eq!(map.get("id"), Some(&Value::U32(1)));
/// assert_eq!(map.get("n"), Some(&Value::from("x")));
/// assert!(!map.contains_key("cached"));
///
/// assert!(matches!(to_map(&5u8), Err(Error::Structural(_))));
/// ```
///
/// # Errors
///
/// Returns [`Error::Structural`] if `value` does not marshal to a map, and
/// any error [`to_value`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_map<T>(value: &T) -> Result<Map>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Map(map) => Ok(map),
        other => Err(Error::structural(format!(
            "marshal source must be a struct or map, found {}",
            other.data_type()
        ))),
    }
}

/// Marshal and encode a struct or map into document bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_map(value)?.to_bytes()
}

/// Marshal, encode and write a document in full.
///
/// # Examples
///
/// ```rust
/// use nson::{from_reader, to_writer};
/// use serde::{Deserialize, Serialize};
/// use std::io::Cursor;
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
///
/// let point: Point = from_reader(Cursor::new(buffer)).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if marshaling or encoding fails, or [`Error::Io`] if the
/// writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_map(value)?.write_to(&mut writer)
}

/// Convert a [`Value`] into any `T: Deserialize`, with strict type checks.
///
/// # Examples
///
/// ```rust
/// use nson::{from_value, Value};
///
/// let n: u32 = from_value(Value::U32(7)).unwrap();
/// assert_eq!(n, 7);
/// assert!(from_value::<u64>(Value::U32(7)).is_err());
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    de::retry_learned(|| T::deserialize(ValueDeserializer::new(&value)))
}

/// Unmarshal a document into a struct or map.
///
/// # Errors
///
/// Returns [`Error::Structural`] if `T` is not a struct or map,
/// [`Error::TypeMismatch`] if a field's variant does not match its type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_map<T>(map: Map) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = Value::Map(map);
    de::retry_learned(|| T::deserialize(de::RootDeserializer::new(&value)))
}

/// Decode document bytes and unmarshal them.
///
/// # Examples
///
/// ```rust
/// use nson::{from_slice, to_vec};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&Point { x: 1, y: 2 }).unwrap();
/// let point: Point = from_slice(&bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(bytes, &DecodeOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(bytes: &[u8], options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_map(decode_map_with_options(bytes, options)?)
}

/// Read one framed document from a stream and unmarshal it.
///
/// # Errors
///
/// Returns [`Error::Io`] on a short read, [`Error::Validation`] if the
/// length prefix is out of bounds, and any unmarshal error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_map(read_map(reader)?)
}

/// Read one framed document from a stream.
///
/// The length prefix is validated before the rest of the frame is read, so a
/// hostile prefix cannot trigger a large allocation.
///
/// # Examples
///
/// ```rust
/// use nson::{read_map, Error, Map};
/// use std::io::Cursor;
///
/// let mut map = Map::new();
/// map.insert("k", 1u8);
/// let bytes = map.to_bytes().unwrap();
/// assert_eq!(read_map(Cursor::new(bytes)).unwrap(), map);
///
/// let hostile = vec![0xff, 0xff, 0xff, 0x7f];
/// assert!(matches!(read_map(Cursor::new(hostile)), Err(Error::Validation(_))));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_map<R: io::Read>(reader: R) -> Result<Map> {
    read_map_with_options(reader, &DecodeOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_map_with_options<R: io::Read>(reader: R, options: &DecodeOptions) -> Result<Map> {
    let frame = read_frame(reader, "Map", options)?;
    decode_map_with_options(&frame, options)
}

/// Read one framed array from a stream.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_array<R: io::Read>(reader: R) -> Result<Array> {
    read_array_with_options(reader, &DecodeOptions::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_array_with_options<R: io::Read>(reader: R, options: &DecodeOptions) -> Result<Array> {
    let frame = read_frame(reader, "Array", options)?;
    decode_array_with_options(&frame, options)
}

fn read_frame<R: io::Read>(mut reader: R, kind: &str, options: &DecodeOptions) -> Result<Vec<u8>> {
    let len = reader.read_u32::<LittleEndian>()?;
    decode::check_frame_len(len, kind, options)?;

    let mut frame = vec![0u8; len as usize];
    LittleEndian::write_u32(&mut frame[..4], len);
    reader.read_exact(&mut frame[4..])?;
    tracing::trace!(kind, len, "read framed container");
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_bytes_round_trip() {
        let point = Point { x: 1, y: -2 };
        let bytes = to_vec(&point).unwrap();
        assert_eq!(from_slice::<Point>(&bytes).unwrap(), point);
    }

    #[test]
    fn test_stream_round_trip() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 3, y: 4 }).unwrap();
        to_writer(&mut buffer, &Point { x: 5, y: 6 }).unwrap();

        let mut cursor = Cursor::new(buffer);
        let first: Point = from_reader(&mut cursor).unwrap();
        let second: Point = from_reader(&mut cursor).unwrap();
        assert_eq!(first, Point { x: 3, y: 4 });
        assert_eq!(second, Point { x: 5, y: 6 });
        assert!(matches!(from_reader::<_, Point>(&mut cursor), Err(Error::Io(_))));
    }

    #[test]
    fn test_read_array() {
        let arr: Array = vec![Value::U8(1), Value::from("x")].into();
        let mut buffer = Vec::new();
        arr.write_to(&mut buffer).unwrap();
        assert_eq!(read_array(Cursor::new(buffer)).unwrap(), arr);
    }

    #[test]
    fn test_read_frame_bounds() {
        assert!(matches!(
            read_map(Cursor::new(vec![4, 0, 0, 0])),
            Err(Error::Validation(_))
        ));
        let options = DecodeOptions::new().with_max_size(16);
        assert!(matches!(
            read_map_with_options(Cursor::new(vec![17, 0, 0, 0]), &options),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            read_map(Cursor::new(vec![9, 0, 0, 0, 0])),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_to_map_rejects_non_maps() {
        assert!(matches!(to_map(&None::<Point>), Err(Error::Structural(_))));
        assert!(matches!(to_map(&vec![1, 2]), Err(Error::Structural(_))));
        assert!(to_map(&Some(Point { x: 0, y: 0 })).is_ok());
    }

    #[test]
    fn test_from_map_rejects_non_structs() {
        assert!(matches!(from_map::<u32>(Map::new()), Err(Error::Structural(_))));
        assert!(matches!(from_map::<Vec<u8>>(Map::new()), Err(Error::Structural(_))));
        assert_eq!(from_map::<Point>(Map::new()).unwrap(), Point { x: 0, y: 0 });
    }
}
