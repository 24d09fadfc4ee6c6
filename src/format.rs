//! NSON wire format: variant tags and size limits.
//!
//! Every encoded value starts with a one-byte tag naming its variant, followed
//! by a payload whose shape depends on the tag:
//!
//! ```text
//! Value         := tag:u8 ++ payload(tag)
//! Bool          := 1 byte (0x00|0x01)
//! Fixed-N       := N raw bytes, little-endian (1/2/4/8, or 12 for Id)
//! String/Binary := len:u32 (includes these 4 bytes) ++ content[len-4]
//! Array         := total_len:u32 (includes itself) ++ (tag:u8 ++ payload)* ++ 0x00
//! Map           := total_len:u32 (includes itself)
//!                  ++ (keylen:u8 ++ key[keylen-1] ++ tag:u8 ++ payload)* ++ 0x00
//! ```
//!
//! A document is a `Map` payload without its tag, so an empty document is the
//! five bytes `05 00 00 00 00`.
//!
//! | Variant   | Tag  | Payload |
//! |-----------|------|---------|
//! | Bool      | 0x01 | 1 byte |
//! | Null      | 0x02 | none |
//! | F32       | 0x11 | 4 bytes LE |
//! | F64       | 0x12 | 8 bytes LE |
//! | I32       | 0x13 | 4 bytes LE |
//! | I64       | 0x14 | 8 bytes LE |
//! | U32       | 0x15 | 4 bytes LE |
//! | U64       | 0x16 | 8 bytes LE |
//! | I8        | 0x17 | 1 byte |
//! | U8        | 0x18 | 1 byte |
//! | I16       | 0x19 | 2 bytes LE |
//! | U16       | 0x1A | 2 bytes LE |
//! | String    | 0x21 | length-prefixed UTF-8 |
//! | Binary    | 0x22 | length-prefixed bytes |
//! | Array     | 0x31 | framed entries |
//! | Map       | 0x32 | framed keyed entries |
//! | Timestamp | 0x41 | 8 bytes LE, milliseconds since epoch |
//! | Id        | 0x42 | 12 raw bytes |

use crate::{Error, Result};
use std::fmt;

/// Smallest legal container: the length field plus the terminator.
pub const MIN_NSON_SIZE: u32 = 4 + 1;

/// Smallest legal String or Binary: the length field with no content.
pub const MIN_BLOB_SIZE: u32 = 4;

/// Default upper bound on any declared length (32 MiB).
pub const MAX_NSON_SIZE: u32 = 32 * 1024 * 1024;

/// Longest map key, in UTF-8 bytes.
pub const MAX_KEY_LEN: usize = 254;

/// Width of an [`Id`](crate::Id) payload.
pub const ID_LEN: usize = 12;

/// Newtype names that let `Timestamp`, `Id`, `Value` and `Embed` pass through
/// serde without losing their meaning when the other side is this crate.
pub(crate) const TIMESTAMP_TOKEN: &str = "$__nson_private_Timestamp";
pub(crate) const ID_TOKEN: &str = "$__nson_private_Id";
pub(crate) const VALUE_TOKEN: &str = "$__nson_private_Value";
pub(crate) const EMBED_TOKEN: &str = "$__nson_private_Embed";

/// The closed set of NSON variants and their wire tags.
///
/// # Examples
///
/// ```rust
/// use nson::DataType;
///
/// assert_eq!(DataType::Map.tag(), 0x32);
/// assert_eq!(DataType::try_from(0x13).unwrap(), DataType::I32);
/// assert!(DataType::try_from(0x7f).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    Bool = 0x01,
    Null = 0x02,
    F32 = 0x11,
    F64 = 0x12,
    I32 = 0x13,
    I64 = 0x14,
    U32 = 0x15,
    U64 = 0x16,
    I8 = 0x17,
    U8 = 0x18,
    I16 = 0x19,
    U16 = 0x1A,
    String = 0x21,
    Binary = 0x22,
    Array = 0x31,
    Map = 0x32,
    Timestamp = 0x41,
    Id = 0x42,
}

impl DataType {
    /// Returns the wire tag of this variant.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the variant name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::Null => "Null",
            DataType::F32 => "F32",
            DataType::F64 => "F64",
            DataType::I32 => "I32",
            DataType::I64 => "I64",
            DataType::U32 => "U32",
            DataType::U64 => "U64",
            DataType::I8 => "I8",
            DataType::U8 => "U8",
            DataType::I16 => "I16",
            DataType::U16 => "U16",
            DataType::String => "String",
            DataType::Binary => "Binary",
            DataType::Array => "Array",
            DataType::Map => "Map",
            DataType::Timestamp => "Timestamp",
            DataType::Id => "Id",
        }
    }

    /// Width of the payload for fixed-width variants, `None` for
    /// length-prefixed ones.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            DataType::Null => Some(0),
            DataType::Bool | DataType::I8 | DataType::U8 => Some(1),
            DataType::I16 | DataType::U16 => Some(2),
            DataType::I32 | DataType::U32 | DataType::F32 => Some(4),
            DataType::I64 | DataType::U64 | DataType::F64 | DataType::Timestamp => Some(8),
            DataType::Id => Some(ID_LEN),
            DataType::String | DataType::Binary | DataType::Array | DataType::Map => None,
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        let data_type = match tag {
            0x01 => DataType::Bool,
            0x02 => DataType::Null,
            0x11 => DataType::F32,
            0x12 => DataType::F64,
            0x13 => DataType::I32,
            0x14 => DataType::I64,
            0x15 => DataType::U32,
            0x16 => DataType::U64,
            0x17 => DataType::I8,
            0x18 => DataType::U8,
            0x19 => DataType::I16,
            0x1A => DataType::U16,
            0x21 => DataType::String,
            0x22 => DataType::Binary,
            0x31 => DataType::Array,
            0x32 => DataType::Map,
            0x41 => DataType::Timestamp,
            0x42 => DataType::Id,
            other => {
                return Err(Error::unsupported_type(format!(
                    "unknown tag 0x{:02X}",
                    other
                )))
            }
        };
        Ok(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DataType; 18] = [
        DataType::Bool,
        DataType::Null,
        DataType::F32,
        DataType::F64,
        DataType::I32,
        DataType::I64,
        DataType::U32,
        DataType::U64,
        DataType::I8,
        DataType::U8,
        DataType::I16,
        DataType::U16,
        DataType::String,
        DataType::Binary,
        DataType::Array,
        DataType::Map,
        DataType::Timestamp,
        DataType::Id,
    ];

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<u8> = ALL.iter().map(|t| t.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ALL.len());
        assert!(!tags.contains(&0x00));
    }

    #[test]
    fn test_tag_lookup_matches_enum() {
        for data_type in ALL {
            assert_eq!(DataType::try_from(data_type.tag()).unwrap(), data_type);
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = DataType::try_from(0x00).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert!(err.to_string().contains("0x00"));
    }
}
