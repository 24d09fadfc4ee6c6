use nson::{
    decode_array, decode_map, decode_map_with_options, decode_value, encode_value, read_map,
    Binary, DecodeOptions, Error, Id, Map, Timestamp, Value, MAX_KEY_LEN,
};
use std::io::Cursor;

fn encoded(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf).unwrap();
    buf
}

fn nested_maps(depth: usize) -> Map {
    let mut map = Map::new();
    map.insert("leaf", true);
    for _ in 0..depth {
        let mut outer = Map::new();
        outer.insert("child", map);
        map = outer;
    }
    map
}

#[test]
fn test_document_layout() {
    let mut map = Map::new();
    map.insert("a", Value::U8(7));
    assert_eq!(map.to_bytes().unwrap(), vec![9, 0, 0, 0, 2, b'a', 0x18, 7, 0]);
}

#[test]
fn test_scalar_layouts() {
    assert_eq!(encoded(&Value::Null), vec![0x02]);
    assert_eq!(encoded(&Value::Bool(true)), vec![0x01, 0x01]);
    assert_eq!(encoded(&Value::I16(-2)), vec![0x19, 0xfe, 0xff]);
    assert_eq!(encoded(&Value::U32(1)), vec![0x15, 1, 0, 0, 0]);
    assert_eq!(
        encoded(&Value::F64(1.0)),
        vec![0x12, 0, 0, 0, 0, 0, 0, 0xf0, 0x3f]
    );
    assert_eq!(
        encoded(&Value::Timestamp(Timestamp::from_millis(1))),
        vec![0x41, 1, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(encoded(&Value::from("hi")), vec![0x21, 6, 0, 0, 0, b'h', b'i']);
    assert_eq!(encoded(&Value::Binary(Binary::new())), vec![0x22, 4, 0, 0, 0]);

    let id = Id::from_bytes([0xab; 12]);
    let mut expected = vec![0x42];
    expected.extend_from_slice(&[0xab; 12]);
    assert_eq!(encoded(&Value::Id(id)), expected);
}

#[test]
fn test_empty_containers() {
    assert_eq!(decode_map(&[5, 0, 0, 0, 0]).unwrap(), Map::new());
    assert!(decode_array(&[5, 0, 0, 0, 0]).unwrap().is_empty());
    assert_eq!(
        decode_value(&[0x22, 4, 0, 0, 0]).unwrap(),
        Value::Binary(Binary::new())
    );
    assert_eq!(decode_value(&[0x21, 4, 0, 0, 0]).unwrap(), Value::from(""));
}

#[test]
fn test_container_length_below_minimum() {
    assert!(matches!(decode_map(&[4, 0, 0, 0, 0]), Err(Error::Validation(_))));
    assert!(matches!(decode_map(&[0, 0, 0, 0, 0]), Err(Error::Validation(_))));
}

#[test]
fn test_container_length_above_maximum() {
    let mut map = Map::new();
    map.insert("a", Value::U8(7));
    let bytes = map.to_bytes().unwrap();

    let options = DecodeOptions::new().with_max_size(8);
    assert!(matches!(
        decode_map_with_options(&bytes, &options),
        Err(Error::Validation(_))
    ));

    let hostile = [0xff, 0xff, 0xff, 0xff, 0];
    assert!(matches!(decode_map(&hostile), Err(Error::Validation(_))));
}

#[test]
fn test_blob_length_below_minimum() {
    assert!(matches!(
        decode_value(&[0x21, 3, 0, 0, 0]),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        decode_value(&[0x22, 0, 0, 0, 0]),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_truncated_input() {
    let mut map = Map::new();
    map.insert("name", "value");
    let bytes = map.to_bytes().unwrap();

    for cut in 0..bytes.len() {
        assert!(
            matches!(decode_map(&bytes[..cut]), Err(Error::Io(_))),
            "cut at {}",
            cut
        );
    }
    assert!(matches!(decode_value(&[0x14, 1, 2]), Err(Error::Io(_))));
    assert!(matches!(decode_value(&[]), Err(Error::Io(_))));
}

#[test]
fn test_blob_overruns_container() {
    let bytes = [12, 0, 0, 0, 2, b's', 0x21, 0xff, 0, 0, 0, 0];
    assert!(matches!(decode_map(&bytes), Err(Error::Validation(_))));
}

#[test]
fn test_missing_terminator() {
    let bytes = [8, 0, 0, 0, 2, b'k', 0x18, 1];
    assert!(matches!(decode_map(&bytes), Err(Error::Validation(_))));
}

#[test]
fn test_bytes_after_terminator() {
    assert!(matches!(
        decode_map(&[6, 0, 0, 0, 0, 0]),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        decode_map(&[5, 0, 0, 0, 0, 0]),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_unknown_tag() {
    let bytes = [8, 0, 0, 0, 2, b'k', 0x7f, 0];
    assert!(matches!(decode_map(&bytes), Err(Error::UnsupportedType(_))));
    assert!(matches!(decode_value(&[0x00]), Err(Error::UnsupportedType(_))));
}

#[test]
fn test_invalid_bool_byte() {
    assert!(matches!(decode_value(&[0x01, 0x02]), Err(Error::Validation(_))));
}

#[test]
fn test_invalid_utf8() {
    assert!(matches!(
        decode_value(&[0x21, 5, 0, 0, 0, 0xff]),
        Err(Error::Validation(_))
    ));
    let bad_key = [8, 0, 0, 0, 2, 0xff, 0x02, 0];
    assert!(matches!(decode_map(&bad_key), Err(Error::Validation(_))));
}

#[test]
fn test_key_length_bounds() {
    let mut map = Map::new();
    map.insert("k".repeat(MAX_KEY_LEN), Value::Null);
    let bytes = map.to_bytes().unwrap();
    assert_eq!(decode_map(&bytes).unwrap(), map);

    let mut map = Map::new();
    map.insert("k".repeat(MAX_KEY_LEN + 1), Value::Null);
    assert!(matches!(map.to_bytes(), Err(Error::Validation(_))));

    let mut map = Map::new();
    map.insert("", Value::Null);
    assert!(matches!(map.to_bytes(), Err(Error::Validation(_))));
}

#[test]
fn test_empty_key_on_wire() {
    let bytes = [7, 0, 0, 0, 1, 0x02, 0];
    assert!(matches!(decode_map(&bytes), Err(Error::Validation(_))));
}

#[test]
fn test_duplicate_keys_rejected() {
    let bytes = [11, 0, 0, 0, 2, b'k', 0x02, 2, b'k', 0x02, 0];
    assert!(matches!(decode_map(&bytes), Err(Error::Validation(_))));
}

#[test]
fn test_nesting_depth_limit() {
    let bytes = nested_maps(10).to_bytes().unwrap();
    assert!(decode_map(&bytes).is_ok());

    let options = DecodeOptions::new().with_max_depth(5);
    assert!(matches!(
        decode_map_with_options(&bytes, &options),
        Err(Error::Validation(_))
    ));

    let options = DecodeOptions::new().with_max_depth(11);
    assert_eq!(
        decode_map_with_options(&bytes, &options).unwrap(),
        nested_maps(10)
    );
}

#[test]
fn test_insertion_order_preserved() {
    let mut map = Map::new();
    for key in ["zeta", "alpha", "mid"] {
        map.insert(key, Value::Null);
    }
    let decoded = decode_map(&map.to_bytes().unwrap()).unwrap();
    assert_eq!(
        decoded.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["zeta", "alpha", "mid"]
    );
}

#[test]
fn test_hostile_stream_prefix() {
    let hostile = vec![0x00, 0x00, 0x00, 0x7f, 0x00];
    assert!(matches!(read_map(Cursor::new(hostile)), Err(Error::Validation(_))));
}
