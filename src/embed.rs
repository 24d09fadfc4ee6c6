//! Embedded structs: fields promoted into the enclosing document.
//!
//! Wrapping a struct field in [`Embed`] writes the inner struct's fields
//! directly into the parent map instead of under the field's own key, and
//! reads them back from the parent map on unmarshal. Unlike
//! `#[serde(flatten)]`, embedded fields go through the same strict,
//! cache-driven path as any other struct, so an `I8` never fills an
//! embedded `i16`.
//!
//! ```rust
//! use nson::{from_map, to_map, Embed, Error, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Base {
//!     id: u32,
//! }
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Device {
//!     base: Embed<Base>,
//!     online: bool,
//! }
//!
//! let device = Device { base: Embed(Base { id: 7 }), online: true };
//! let mut map = to_map(&device).unwrap();
//! assert_eq!(map.get("id"), Some(&Value::U32(7)));
//! assert!(!map.contains_key("base"));
//! assert_eq!(from_map::<Device>(map.clone()).unwrap(), device);
//!
//! map.insert("id", Value::U8(7));
//! assert!(matches!(from_map::<Device>(map), Err(Error::TypeMismatch { .. })));
//! ```
//!
//! Other serde formats see an ordinary nested value.

use crate::format::EMBED_TOKEN;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// A struct (or string-keyed map) whose fields live in the parent document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Embed<T>(pub T);

impl<T> Embed<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Embed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Embed<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Embed<T> {
    fn from(inner: T) -> Self {
        Embed(inner)
    }
}

impl<T: Serialize> Serialize for Embed<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(EMBED_TOKEN, &self.0)
    }
}

struct EmbedVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for EmbedVisitor<T> {
    type Value = Embed<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an embedded struct")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Embed<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Embed)
    }

    fn visit_map<A>(self, access: A) -> Result<Embed<T>, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        T::deserialize(de::value::MapAccessDeserializer::new(access)).map(Embed)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Embed<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(EMBED_TOKEN, EmbedVisitor(PhantomData))
    }
}
