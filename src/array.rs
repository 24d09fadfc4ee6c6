//! Ordered sequences of values.

use crate::decode::decode_array_with_options;
use crate::encode::encode_array;
use crate::options::DecodeOptions;
use crate::{Result, Value};
use std::io::Write;
use std::ops::{Deref, DerefMut};

/// An ordered list of [`Value`]s, encoded as the `Array` variant.
///
/// Elements may be of mixed variants.
///
/// # Examples
///
/// ```rust
/// use nson::{Array, Value};
///
/// let mut arr = Array::new();
/// arr.push(1i32);
/// arr.push("two");
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], Value::I32(1));
/// assert_eq!(Array::from_bytes(&arr.to_bytes().unwrap()).unwrap(), arr);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array(Vec<Value>);

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Array(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Array(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    /// Encodes the framed array payload, without a leading tag.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode_array(self, &mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_array_with_options(bytes, &DecodeOptions::default())
    }

    /// Encodes the array and writes it out in full.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        tracing::trace!(len = bytes.len(), "writing framed array");
        writer.write_all(&bytes)?;
        Ok(())
    }
}

impl Deref for Array {
    type Target = Vec<Value>;

    fn deref(&self) -> &Vec<Value> {
        &self.0
    }
}

impl DerefMut for Array {
    fn deref_mut(&mut self) -> &mut Vec<Value> {
        &mut self.0
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array(values)
    }
}

impl From<Array> for Vec<Value> {
    fn from(arr: Array) -> Self {
        arr.0
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Array(iter.into_iter().map(Into::into).collect())
    }
}
