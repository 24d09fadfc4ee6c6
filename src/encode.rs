//! Value to bytes.
//!
//! Containers are written with a placeholder length which is patched once
//! their entries are in the buffer, so nothing is encoded twice.

use crate::format::MAX_KEY_LEN;
use crate::{Array, Error, Map, Result, Value};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Appends the tag byte and payload of `value` to `buf`.
///
/// # Examples
///
/// ```rust
/// use nson::{encode_value, Value};
///
/// let mut buf = Vec::new();
/// encode_value(&Value::I16(-2), &mut buf).unwrap();
/// assert_eq!(buf, vec![0x19, 0xfe, 0xff]);
/// ```
pub fn encode_value(value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    buf.push(value.data_type().tag());
    encode_payload(value, buf)
}

/// Appends the framed map payload (no tag). This is the document form.
pub fn encode_map(map: &Map, buf: &mut Vec<u8>) -> Result<()> {
    let start = begin_frame(buf)?;
    for (key, value) in map.iter() {
        write_key(key, buf)?;
        encode_value(value, buf)?;
    }
    end_frame(buf, start)
}

/// Appends the framed array payload (no tag).
pub fn encode_array(array: &Array, buf: &mut Vec<u8>) -> Result<()> {
    let start = begin_frame(buf)?;
    for value in array.iter() {
        encode_value(value, buf)?;
    }
    end_frame(buf, start)
}

fn encode_payload(value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => buf.write_u8(u8::from(*b))?,
        Value::I8(v) => buf.write_i8(*v)?,
        Value::U8(v) => buf.write_u8(*v)?,
        Value::I16(v) => buf.write_i16::<LittleEndian>(*v)?,
        Value::U16(v) => buf.write_u16::<LittleEndian>(*v)?,
        Value::I32(v) => buf.write_i32::<LittleEndian>(*v)?,
        Value::U32(v) => buf.write_u32::<LittleEndian>(*v)?,
        Value::I64(v) => buf.write_i64::<LittleEndian>(*v)?,
        Value::U64(v) => buf.write_u64::<LittleEndian>(*v)?,
        Value::F32(v) => buf.write_f32::<LittleEndian>(*v)?,
        Value::F64(v) => buf.write_f64::<LittleEndian>(*v)?,
        Value::String(s) => write_blob(s.as_bytes(), buf)?,
        Value::Binary(bin) => write_blob(bin.as_slice(), buf)?,
        Value::Array(arr) => encode_array(arr, buf)?,
        Value::Map(map) => encode_map(map, buf)?,
        Value::Timestamp(ts) => buf.write_i64::<LittleEndian>(ts.millis())?,
        Value::Id(id) => buf.extend_from_slice(id.as_bytes()),
    }
    Ok(())
}

fn write_blob(bytes: &[u8], buf: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(bytes.len() + 4)
        .map_err(|_| Error::validation(format!("blob of {} bytes is too long", bytes.len())))?;
    buf.write_u32::<LittleEndian>(len)?;
    buf.extend_from_slice(bytes);
    Ok(())
}

fn write_key(key: &str, buf: &mut Vec<u8>) -> Result<()> {
    let len = key.len();
    if len == 0 || len > MAX_KEY_LEN {
        return Err(Error::validation(format!(
            "key length must be 1..={} bytes, got {}",
            MAX_KEY_LEN, len
        )));
    }
    buf.write_u8(len as u8 + 1)?;
    buf.extend_from_slice(key.as_bytes());
    Ok(())
}

fn begin_frame(buf: &mut Vec<u8>) -> Result<usize> {
    let start = buf.len();
    buf.write_u32::<LittleEndian>(0)?;
    Ok(start)
}

fn end_frame(buf: &mut Vec<u8>, start: usize) -> Result<()> {
    buf.push(0x00);
    let total = u32::try_from(buf.len() - start)
        .map_err(|_| Error::validation("container exceeds u32 length"))?;
    LittleEndian::write_u32(&mut buf[start..start + 4], total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Binary, Id, Timestamp};

    fn encoded(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_value(value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_empty_map_is_five_bytes() {
        let mut buf = Vec::new();
        encode_map(&Map::new(), &mut buf).unwrap();
        assert_eq!(buf, vec![0x05, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_fixed_width_layouts() {
        assert_eq!(encoded(&Value::Null), vec![0x02]);
        assert_eq!(encoded(&Value::Bool(true)), vec![0x01, 0x01]);
        assert_eq!(encoded(&Value::U8(0xAB)), vec![0x18, 0xAB]);
        assert_eq!(encoded(&Value::I32(1)), vec![0x13, 1, 0, 0, 0]);
        assert_eq!(encoded(&Value::U64(2)), vec![0x16, 2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            encoded(&Value::Timestamp(Timestamp::from_millis(-1))),
            vec![0x41, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        let id = Id::from_bytes([7; 12]);
        let bytes = encoded(&Value::Id(id));
        assert_eq!(bytes.len(), 13);
        assert_eq!(bytes[0], 0x42);
    }

    #[test]
    fn test_blob_length_counts_itself() {
        assert_eq!(encoded(&Value::from("hi")), vec![0x21, 6, 0, 0, 0, b'h', b'i']);
        assert_eq!(encoded(&Value::Binary(Binary::new())), vec![0x22, 4, 0, 0, 0]);
    }

    #[test]
    fn test_map_entry_layout() {
        let mut map = Map::new();
        map.insert("a", Value::I32(1));
        let mut buf = Vec::new();
        encode_map(&map, &mut buf).unwrap();
        assert_eq!(
            buf,
            vec![
                12, 0, 0, 0, // total length
                2, b'a', // key length includes one, key bytes
                0x13, 1, 0, 0, 0, // I32(1)
                0x00,
            ]
        );
    }

    #[test]
    fn test_array_has_no_keys() {
        let arr: Array = vec![Value::U8(1), Value::Null].into();
        let mut buf = Vec::new();
        encode_array(&arr, &mut buf).unwrap();
        assert_eq!(buf, vec![8, 0, 0, 0, 0x18, 1, 0x02, 0x00]);
    }

    #[test]
    fn test_key_length_bounds() {
        let mut map = Map::new();
        map.insert("", Value::Null);
        assert!(matches!(map.to_bytes(), Err(Error::Validation(_))));

        let mut map = Map::new();
        map.insert("k".repeat(MAX_KEY_LEN + 1), Value::Null);
        assert!(matches!(map.to_bytes(), Err(Error::Validation(_))));

        let mut map = Map::new();
        map.insert("k".repeat(MAX_KEY_LEN), Value::Null);
        assert!(map.to_bytes().is_ok());
    }
}
