//! 12-byte identifiers and their generator.
//!
//! ```text
//! +---+---+---+---+---+---+---+---+---+---+---+---+
//! |       timestamp       | count |    random     |
//! +---+---+---+---+---+---+---+---+---+---+---+---+
//!   0   1   2   3   4   5   6   7   8   9   10  11
//! ```
//!
//! - **timestamp**: milliseconds since the Unix epoch, 48 bits, big-endian
//! - **count**: a per-generator counter, wrapped modulo 65536, big-endian
//! - **random**: 32 random bits
//!
//! Ids produced by one generator in increasing milliseconds sort by their
//! timestamp prefix. Uniqueness is best-effort, not cryptographic.
//!
//! ## Examples
//!
//! ```rust
//! use nson::Id;
//!
//! let id = Id::new();
//! let hex = id.to_hex();
//! assert_eq!(hex.len(), 24);
//! assert_eq!(Id::from_hex(&hex).unwrap(), id);
//! ```

use crate::binary::{decode_hex, encode_hex};
use crate::format::{ID_LEN, ID_TOKEN};
use crate::{Error, Result};
use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const TIMESTAMP_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// A 12-byte identifier, encoded on the wire as the `Id` variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id([u8; ID_LEN]);

impl Id {
    /// Generates a new identifier from the process-wide [`IdGenerator`].
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        IdGenerator::global().generate()
    }

    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Id(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub const fn into_bytes(self) -> [u8; ID_LEN] {
        self.0
    }

    /// Builds an identifier from a byte slice, which must be exactly 12 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; ID_LEN] = bytes.try_into().map_err(|_| {
            Error::validation(format!("Id must be {} bytes, got {}", ID_LEN, bytes.len()))
        })?;
        Ok(Id(array))
    }

    /// Parses a 24-character hex string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Id;
    ///
    /// let id = Id::from_hex("0186b2a1f2c30001deadbeef").unwrap();
    /// assert_eq!(id.as_bytes()[11], 0xef);
    /// assert!(Id::from_hex("abc").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != ID_LEN * 2 {
            return Err(Error::validation(format!(
                "Id hex must be {} chars: {}",
                ID_LEN * 2,
                s
            )));
        }
        Id::from_slice(&decode_hex(s)?)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Milliseconds since the Unix epoch recorded in the first six bytes.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        BigEndian::read_uint(&self.0[..6], 6) as i64
    }

    /// The generation time, to millisecond precision.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp()).single()
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_hex())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Id(bytes)
    }
}

impl From<Id> for [u8; ID_LEN] {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// Produces [`Id`]s from an owned atomic counter.
///
/// `generate` may be called from any number of threads without further
/// synchronization; the counter is the only shared state.
///
/// # Examples
///
/// ```rust
/// use nson::IdGenerator;
///
/// let generator = IdGenerator::new();
/// let a = generator.generate();
/// let b = generator.generate();
/// assert_ne!(a, b);
/// ```
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU32,
}

static GLOBAL_GENERATOR: Lazy<IdGenerator> = Lazy::new(IdGenerator::new);

impl IdGenerator {
    /// Creates a generator whose counter is seeded from the clock.
    #[must_use]
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        Self::with_counter(seed)
    }

    /// Creates a generator whose counter starts at `start`.
    #[must_use]
    pub fn with_counter(start: u32) -> Self {
        IdGenerator {
            counter: AtomicU32::new(start),
        }
    }

    /// The process-wide generator used by [`Id::new`].
    pub fn global() -> &'static IdGenerator {
        &GLOBAL_GENERATOR
    }

    /// Generates an identifier stamped with the current time.
    pub fn generate(&self) -> Id {
        self.generate_at(Utc::now().timestamp_millis())
    }

    /// Generates an identifier stamped with `millis` since the Unix epoch.
    ///
    /// Only the low 48 bits of `millis` are kept.
    pub fn generate_at(&self, millis: i64) -> Id {
        let count = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1) % 65536;

        let mut bytes = [0u8; ID_LEN];
        BigEndian::write_uint(&mut bytes[..6], millis as u64 & TIMESTAMP_MASK, 6);
        BigEndian::write_u16(&mut bytes[6..8], count as u16);
        BigEndian::write_u32(&mut bytes[8..], rand::random::<u32>());
        Id(bytes)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

struct IdBytes<'a>(&'a [u8]);

impl Serialize for IdBytes<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.0)
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_newtype_struct(ID_TOKEN, &IdBytes(&self.0))
        }
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 12-byte Id")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Id, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_bytes(IdVisitor)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Id, E>
    where
        E: de::Error,
    {
        Id::from_slice(v).map_err(E::custom)
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Id, E>
    where
        E: de::Error,
    {
        Id::from_hex(v).map_err(E::custom)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Id, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut bytes = [0u8; ID_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(de::Error::invalid_length(ID_LEN + 1, &self));
        }
        Ok(Id(bytes))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(IdVisitor)
        } else {
            deserializer.deserialize_newtype_struct(ID_TOKEN, IdVisitor)
        }
    }
}
