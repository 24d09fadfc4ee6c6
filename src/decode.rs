//! Bytes to value.
//!
//! Every length field is validated against [`DecodeOptions`] before the
//! bytes it covers are sliced out, and every container must consume exactly
//! the length it declares. Decoding borrows from the input and only
//! allocates for the values it produces.
//!
//! Running out of input at the top level is an [`Error::Io`]; running past
//! the end of an enclosing container is an [`Error::Validation`], since the
//! bytes exist but belong to someone else.

use crate::format::{MIN_BLOB_SIZE, MIN_NSON_SIZE};
use crate::options::DecodeOptions;
use crate::{Array, Binary, DataType, Error, Id, Map, Result, Timestamp, Value};
use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Decodes one tagged value, rejecting trailing bytes.
///
/// # Examples
///
/// ```rust
/// use nson::{decode_value, Value};
///
/// assert_eq!(decode_value(&[0x18, 0x07]).unwrap(), Value::U8(7));
/// assert!(decode_value(&[0x18, 0x07, 0x00]).is_err());
/// ```
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    decode_value_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_value_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let mut reader = Reader::top_level(bytes);
    let value = Decoder::new(options).read_value(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Decodes a document: a framed map payload without a tag.
pub fn decode_map(bytes: &[u8]) -> Result<Map> {
    decode_map_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_map_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Map> {
    let mut reader = Reader::top_level(bytes);
    let map = Decoder::new(options).read_map(&mut reader)?;
    reader.finish()?;
    Ok(map)
}

/// Decodes a framed array payload without a tag.
pub fn decode_array(bytes: &[u8]) -> Result<Array> {
    decode_array_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_array_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Array> {
    let mut reader = Reader::top_level(bytes);
    let array = Decoder::new(options).read_array(&mut reader)?;
    reader.finish()?;
    Ok(array)
}

/// Checks a container length prefix against `[MIN_NSON_SIZE, max_size]`.
pub(crate) fn check_frame_len(len: u32, kind: &str, options: &DecodeOptions) -> Result<()> {
    check_len(len, MIN_NSON_SIZE, kind, options)
}

fn check_len(len: u32, min: u32, kind: &str, options: &DecodeOptions) -> Result<()> {
    if len < min || len > options.max_size {
        debug!(kind, len, min, max = options.max_size, "rejecting declared length");
        return Err(Error::validation(format!(
            "invalid {} length {} (expected {}..={})",
            kind, len, min, options.max_size
        )));
    }
    Ok(())
}

struct Reader<'a> {
    buf: &'a [u8],
    framed: bool,
}

impl<'a> Reader<'a> {
    fn top_level(buf: &'a [u8]) -> Self {
        Reader { buf, framed: false }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(if self.framed {
                Error::validation(format!("{} overruns its enclosing container", what))
            } else {
                Error::io(&format!("unexpected end of input reading {}", what))
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn read_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4, what)?))
    }

    fn finish(&self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else if self.framed {
            Err(Error::validation(format!(
                "{} bytes after terminator within declared length",
                self.buf.len()
            )))
        } else {
            Err(Error::validation(format!("{} trailing bytes", self.buf.len())))
        }
    }
}

struct Decoder<'o> {
    options: &'o DecodeOptions,
    depth: usize,
}

impl<'o> Decoder<'o> {
    fn new(options: &'o DecodeOptions) -> Self {
        Decoder { options, depth: 0 }
    }

    fn read_value(&mut self, r: &mut Reader<'_>) -> Result<Value> {
        let tag = r.read_u8("tag")?;
        let data_type = DataType::try_from(tag).map_err(|err| {
            debug!(tag, "rejecting unknown tag");
            err
        })?;
        self.read_payload(data_type, r)
    }

    fn read_payload(&mut self, data_type: DataType, r: &mut Reader<'_>) -> Result<Value> {
        let value = match data_type {
            DataType::Null => Value::Null,
            DataType::Bool => match r.read_u8("Bool")? {
                0x00 => Value::Bool(false),
                0x01 => Value::Bool(true),
                other => {
                    return Err(Error::validation(format!("invalid Bool byte 0x{:02X}", other)))
                }
            },
            DataType::I8 => Value::I8(r.read_u8("I8")? as i8),
            DataType::U8 => Value::U8(r.read_u8("U8")?),
            DataType::I16 => Value::I16(LittleEndian::read_i16(r.take(2, "I16")?)),
            DataType::U16 => Value::U16(LittleEndian::read_u16(r.take(2, "U16")?)),
            DataType::I32 => Value::I32(LittleEndian::read_i32(r.take(4, "I32")?)),
            DataType::U32 => Value::U32(LittleEndian::read_u32(r.take(4, "U32")?)),
            DataType::I64 => Value::I64(LittleEndian::read_i64(r.take(8, "I64")?)),
            DataType::U64 => Value::U64(LittleEndian::read_u64(r.take(8, "U64")?)),
            DataType::F32 => Value::F32(LittleEndian::read_f32(r.take(4, "F32")?)),
            DataType::F64 => Value::F64(LittleEndian::read_f64(r.take(8, "F64")?)),
            DataType::Timestamp => Value::Timestamp(Timestamp::from_millis(
                LittleEndian::read_i64(r.take(8, "Timestamp")?),
            )),
            DataType::Id => Value::Id(Id::from_slice(r.take(crate::format::ID_LEN, "Id")?)?),
            DataType::String => {
                let bytes = self.read_blob(r, "String")?;
                Value::String(utf8(bytes, "String")?.to_owned())
            }
            DataType::Binary => Value::Binary(Binary::from(self.read_blob(r, "Binary")?)),
            DataType::Array => Value::Array(self.read_array(r)?),
            DataType::Map => Value::Map(self.read_map(r)?),
        };
        Ok(value)
    }

    fn read_blob<'a>(&self, r: &mut Reader<'a>, kind: &str) -> Result<&'a [u8]> {
        let len = r.read_u32(kind)?;
        check_len(len, MIN_BLOB_SIZE, kind, self.options)?;
        r.take((len - 4) as usize, kind)
    }

    fn enter_frame<'a>(&mut self, r: &mut Reader<'a>, kind: &str) -> Result<Reader<'a>> {
        let len = r.read_u32(kind)?;
        check_frame_len(len, kind, self.options)?;

        self.depth += 1;
        if self.depth > self.options.max_depth {
            debug!(depth = self.depth, max = self.options.max_depth, "rejecting nesting depth");
            return Err(Error::validation(format!(
                "nesting deeper than {}",
                self.options.max_depth
            )));
        }

        let body = r.take((len - 4) as usize, kind)?;
        Ok(Reader {
            buf: body,
            framed: true,
        })
    }

    fn read_map(&mut self, r: &mut Reader<'_>) -> Result<Map> {
        let mut body = self.enter_frame(r, "Map")?;
        let mut map = Map::new();

        loop {
            let key_len = body.read_u8("key length")?;
            if key_len == 0 {
                break;
            }
            if key_len == 1 {
                return Err(Error::validation("empty map key"));
            }
            let key = utf8(body.take(key_len as usize - 1, "key")?, "key")?;
            if map.contains_key(key) {
                return Err(Error::validation(format!("duplicate map key {:?}", key)));
            }
            let value = self.read_value(&mut body)?;
            map.insert(key, value);
        }

        body.finish()?;
        self.depth -= 1;
        Ok(map)
    }

    fn read_array(&mut self, r: &mut Reader<'_>) -> Result<Array> {
        let mut body = self.enter_frame(r, "Array")?;
        let mut array = Array::new();

        loop {
            let tag = body.read_u8("tag")?;
            if tag == 0 {
                break;
            }
            let data_type = DataType::try_from(tag).map_err(|err| {
                debug!(tag, "rejecting unknown tag");
                err
            })?;
            array.push(self.read_payload(data_type, &mut body)?);
        }

        body.finish()?;
        self.depth -= 1;
        Ok(array)
    }
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| Error::validation(format!("invalid UTF-8 in {}: {}", what, e)))
}
