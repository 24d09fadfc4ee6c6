//! Ordered string-keyed maps, the document type of NSON.
//!
//! [`Map`] wraps an [`IndexMap`] so iteration and encoding follow insertion
//! order. Only round-trip equality is part of the wire contract, but a stable
//! order keeps encoded bytes deterministic for a given map.
//!
//! ## Typed getters
//!
//! Besides plain [`Map::get`], every variant has a getter that checks the
//! stored variant exactly, mirroring the strict unmarshal rules:
//!
//! ```rust
//! use nson::{Error, Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("port", Value::U16(8080));
//!
//! assert_eq!(map.get_u16("port").unwrap(), 8080);
//! assert!(matches!(map.get_u32("port"), Err(Error::TypeMismatch { .. })));
//! assert!(matches!(map.get_u16("host"), Err(Error::KeyNotFound(_))));
//! ```

use crate::decode::decode_map_with_options;
use crate::encode::encode_map;
use crate::options::DecodeOptions;
use crate::{Array, Binary, DataType, Error, Id, Result, Timestamp, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::Write;

/// An ordered map of string keys to [`Value`]s.
///
/// # Examples
///
/// ```rust
/// use nson::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("first", 1i32);
/// map.insert("second", 2i32);
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map(IndexMap<String, Value>);

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, key: &str) -> Result<$ty> {
            match self.lookup(key)? {
                Value::$variant(v) => Ok(*v),
                other => Err(Error::type_mismatch(DataType::$variant.name(), other.data_type().name())),
            }
        }
    };
}

macro_rules! typed_ref_getter {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self, key: &str) -> Result<&$ty> {
            match self.lookup(key)? {
                Value::$variant(v) => Ok(v),
                other => Err(Error::type_mismatch(DataType::$variant.name(), other.data_type().name())),
            }
        }
    };
}

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// Keys are validated when the map is encoded, not here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// assert!(map.insert("key", 42i32).is_none());
    /// assert_eq!(map.insert("key", 43i32), Some(Value::I32(42)));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    fn lookup(&self, key: &str) -> Result<&Value> {
        self.0.get(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// Returns `true` if the key is present and holds `Null`.
    pub fn is_null(&self, key: &str) -> Result<bool> {
        Ok(self.lookup(key)?.is_null())
    }

    typed_getter!(get_bool, Bool, bool);
    typed_getter!(get_i8, I8, i8);
    typed_getter!(get_u8, U8, u8);
    typed_getter!(get_i16, I16, i16);
    typed_getter!(get_u16, U16, u16);
    typed_getter!(get_i32, I32, i32);
    typed_getter!(get_u32, U32, u32);
    typed_getter!(
        /// Reads an `I64` entry. A `Timestamp` entry is not accepted here;
        /// use [`Map::get_timestamp`].
        get_i64,
        I64,
        i64
    );
    typed_getter!(get_u64, U64, u64);
    typed_getter!(get_f32, F32, f32);
    typed_getter!(get_f64, F64, f64);
    typed_getter!(get_timestamp, Timestamp, Timestamp);
    typed_getter!(get_id, Id, Id);
    typed_ref_getter!(get_binary, Binary, Binary);
    typed_ref_getter!(get_array, Array, Array);
    typed_ref_getter!(get_map, Map, Map);

    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.lookup(key)? {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("String", other.data_type().name())),
        }
    }

    /// Encodes the map as a document: the framed map payload without a tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Map;
    ///
    /// assert_eq!(Map::new().to_bytes().unwrap(), vec![5, 0, 0, 0, 0]);
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode_map(self, &mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_map_with_options(bytes, &DecodeOptions::default())
    }

    /// Encodes the map and writes it out in full.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        tracing::trace!(len = bytes.len(), "writing framed map");
        writer.write_all(&bytes)?;
        Ok(())
    }
}

impl Extend<(String, Value)> for Map {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl From<HashMap<String, Value>> for Map {
    fn from(map: HashMap<String, Value>) -> Self {
        Map(map.into_iter().collect())
    }
}

impl From<IndexMap<String, Value>> for Map {
    fn from(map: IndexMap<String, Value>) -> Self {
        Map(map)
    }
}

impl From<Map> for HashMap<String, Value> {
    fn from(map: Map) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}
