//! Millisecond timestamps.
//!
//! [`Timestamp`] is the native counterpart of the `Timestamp` variant. For
//! `chrono::DateTime<Utc>` fields, use the [`datetime`] helpers:
//!
//! ```rust
//! use chrono::{DateTime, TimeZone, Utc};
//! use nson::{from_map, to_map, Timestamp, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Event {
//!     #[serde(with = "nson::datetime")]
//!     at: DateTime<Utc>,
//! }
//!
//! let event = Event { at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap() };
//! let map = to_map(&event).unwrap();
//! assert_eq!(map.get("at"), Some(&Value::Timestamp(Timestamp::from_millis(1_700_000_000_123))));
//! assert_eq!(from_map::<Event>(map).unwrap(), event);
//! ```

use crate::format::TIMESTAMP_TOKEN;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Signed milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    #[inline]
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp_millis())
    }

    /// Truncates `dt` to millisecond precision.
    #[must_use]
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_millis())
    }

    /// Returns `None` when the timestamp is outside chrono's representable range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(&dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_i64(self.0)
        } else {
            serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &self.0)
        }
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("milliseconds since the Unix epoch")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Timestamp)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        Ok(Timestamp(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Timestamp)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_i64(TimestampVisitor)
        } else {
            deserializer.deserialize_newtype_struct(TIMESTAMP_TOKEN, TimestampVisitor)
        }
    }
}

fn to_datetime<E: de::Error>(ts: Timestamp) -> Result<DateTime<Utc>, E> {
    ts.to_datetime()
        .ok_or_else(|| E::custom(format!("timestamp {} out of range", ts.millis())))
}

/// `#[serde(with = "nson::datetime")]` for `DateTime<Utc>` fields.
pub mod datetime {
    use super::Timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Timestamp::from_datetime(dt).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::to_datetime(Timestamp::deserialize(deserializer)?)
    }

    /// Same as the parent module, for `Option<DateTime<Utc>>`.
    pub mod option {
        use super::Timestamp;
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match dt {
                Some(dt) => serializer.serialize_some(&Timestamp::from_datetime(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<Timestamp>::deserialize(deserializer)?
                .map(super::super::to_datetime)
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_conversion_truncates_to_millis() {
        let dt = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let ts = Timestamp::from_datetime(&dt);
        assert_eq!(ts.millis(), 1_700_000_000_123);
        assert_eq!(ts.to_datetime().unwrap().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_out_of_range() {
        assert!(Timestamp::from_millis(i64::MAX).to_datetime().is_none());
        assert_eq!(Timestamp::from_millis(i64::MAX).to_string(), format!("{}ms", i64::MAX));
    }

    #[test]
    fn test_json_is_plain_millis() {
        let ts = Timestamp::from_millis(-5);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "-5");
        assert_eq!(serde_json::from_str::<Timestamp>("-5").unwrap(), ts);
    }
}
