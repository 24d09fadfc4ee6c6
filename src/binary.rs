//! Opaque byte strings.
//!
//! serde has no dedicated byte-buffer type: a `Vec<u8>` serializes as a
//! sequence of `u8`, which this crate faithfully turns into an `Array` of `U8`
//! values. To get the compact `Binary` variant instead, either wrap the buffer
//! in [`Binary`] or annotate the field with [`bytes`]:
//!
//! ```rust
//! use nson::{to_map, Binary, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Blob {
//!     raw: Binary,
//!     #[serde(with = "nson::bytes")]
//!     tagged: Vec<u8>,
//!     plain: Vec<u8>,
//! }
//!
//! let map = to_map(&Blob {
//!     raw: Binary::from(vec![1, 2]),
//!     tagged: vec![3],
//!     plain: vec![4],
//! })
//! .unwrap();
//!
//! assert!(matches!(map.get("raw"), Some(Value::Binary(_))));
//! assert!(matches!(map.get("tagged"), Some(Value::Binary(_))));
//! assert!(matches!(map.get("plain"), Some(Value::Array(_))));
//! ```

use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let raw = s.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(Error::validation(format!("odd-length hex string: {}", s)));
    }

    raw.chunks_exact(2)
        .map(|pair| match (hex_nibble(pair[0]), hex_nibble(pair[1])) {
            (Some(hi), Some(lo)) => Ok(hi << 4 | lo),
            _ => Err(Error::validation(format!("invalid hex string: {}", s))),
        })
        .collect()
}

/// An owned byte string that encodes as the `Binary` variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binary(Vec<u8>);

impl Binary {
    #[must_use]
    pub fn new() -> Self {
        Binary(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Lowercase hex rendering of the bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Binary;
    ///
    /// let bin = Binary::from(vec![0xde, 0xad]);
    /// assert_eq!(bin.to_hex(), "dead");
    /// assert_eq!(Binary::from_hex("DEAD").unwrap(), bin);
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        decode_hex(s).map(Binary)
    }
}

impl Deref for Binary {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Binary(bytes.to_vec())
    }
}

impl From<Binary> for Vec<u8> {
    fn from(bin: Binary) -> Self {
        bin.0
    }
}

impl Serialize for Binary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

struct BinaryVisitor;

impl<'de> Visitor<'de> for BinaryVisitor {
    type Value = Binary;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a byte string")
    }

    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Binary, E>
    where
        E: de::Error,
    {
        Ok(Binary(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Binary, E>
    where
        E: de::Error,
    {
        Ok(Binary(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Binary, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Ok(Binary(bytes))
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_byte_buf(BinaryVisitor)
    }
}

/// `#[serde(with = "nson::bytes")]` for `Vec<u8>` fields that should encode
/// as `Binary` rather than an `Array` of `U8`.
pub mod bytes {
    use super::Binary;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Binary::deserialize(deserializer).map(Binary::into_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let bytes = vec![0x00, 0x0f, 0xf0, 0xff];
        assert_eq!(encode_hex(&bytes), "000ff0ff");
        assert_eq!(decode_hex("000FF0ff").unwrap(), bytes);
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        assert!(matches!(decode_hex("abc"), Err(Error::Validation(_))));
        assert!(matches!(decode_hex("zz"), Err(Error::Validation(_))));
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_deref_and_conversions() {
        let bin = Binary::from(&[1u8, 2, 3][..]);
        assert_eq!(bin.len(), 3);
        assert_eq!(&bin[..], &[1, 2, 3]);
        let raw: Vec<u8> = bin.into();
        assert_eq!(raw, vec![1, 2, 3]);
    }

    #[test]
    fn test_json_representation() {
        let bin = Binary::from(vec![7, 8]);
        let json = serde_json::to_string(&bin).unwrap();
        assert_eq!(json, "[7,8]");
        let back: Binary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bin);
    }
}
