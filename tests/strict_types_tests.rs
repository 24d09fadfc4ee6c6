//! Unmarshaling never converts between variants: each destination accepts
//! exactly one variant (plus `Null`), whatever the numeric value.

use nson::{from_map, from_value, Binary, Embed, Error, Id, Map, Timestamp, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

fn numeric_values() -> Vec<Value> {
    vec![
        Value::I8(1),
        Value::U8(1),
        Value::I16(1),
        Value::U16(1),
        Value::I32(1),
        Value::U32(1),
        Value::I64(1),
        Value::U64(1),
        Value::F32(1.0),
        Value::F64(1.0),
    ]
}

fn accepts<T: DeserializeOwned>(value: &Value) -> bool {
    from_value::<T>(value.clone()).is_ok()
}

fn accepted_by<T: DeserializeOwned>() -> Vec<&'static str> {
    numeric_values()
        .iter()
        .filter(|v| accepts::<T>(v))
        .map(|v| v.data_type().name())
        .collect()
}

#[test]
fn test_each_number_type_accepts_one_width() {
    assert_eq!(accepted_by::<i8>(), vec!["I8"]);
    assert_eq!(accepted_by::<u8>(), vec!["U8"]);
    assert_eq!(accepted_by::<i16>(), vec!["I16"]);
    assert_eq!(accepted_by::<u16>(), vec!["U16"]);
    assert_eq!(accepted_by::<i32>(), vec!["I32"]);
    assert_eq!(accepted_by::<u32>(), vec!["U32"]);
    assert_eq!(accepted_by::<i64>(), vec!["I64"]);
    assert_eq!(accepted_by::<u64>(), vec!["U64"]);
    assert_eq!(accepted_by::<f32>(), vec!["F32"]);
    assert_eq!(accepted_by::<f64>(), vec!["F64"]);
}

#[test]
fn test_mismatch_reports_both_sides() {
    let err = from_value::<u16>(Value::U32(3)).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: "U16".to_string(),
            found: "U32".to_string()
        }
    );
    assert_eq!(err.to_string(), "Type mismatch: expected U16, found U32");
}

#[test]
fn test_numbers_do_not_fill_bool_or_string() {
    assert!(matches!(from_value::<bool>(Value::U8(1)), Err(Error::TypeMismatch { .. })));
    assert!(matches!(from_value::<String>(Value::I32(1)), Err(Error::TypeMismatch { .. })));
    assert!(matches!(from_value::<i32>(Value::from("1")), Err(Error::TypeMismatch { .. })));
    assert!(matches!(from_value::<u8>(Value::Bool(true)), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_timestamp_fills_64_bit_integers() {
    let ts = Value::Timestamp(Timestamp::from_millis(1_000));
    assert_eq!(from_value::<i64>(ts.clone()).unwrap(), 1_000);
    assert_eq!(from_value::<u64>(ts.clone()).unwrap(), 1_000);
    assert_eq!(from_value::<Timestamp>(ts.clone()).unwrap(), Timestamp::from_millis(1_000));
    assert!(from_value::<i32>(ts.clone()).is_err());
    assert!(from_value::<String>(ts).is_err());

    let before_epoch = Value::Timestamp(Timestamp::from_millis(-1));
    assert!(from_value::<u64>(before_epoch).is_err());

    assert!(from_value::<Timestamp>(Value::I64(5)).is_err());
}

#[test]
fn test_id_and_binary_are_distinct() {
    let id = Id::from_bytes([3; 12]);
    assert_eq!(from_value::<Id>(Value::Id(id)).unwrap(), id);
    assert!(from_value::<Id>(Value::Binary(Binary::from(vec![3; 12]))).is_err());
    assert!(from_value::<Id>(Value::from("030303030303030303030303")).is_err());
    assert!(from_value::<Binary>(Value::U8(3)).is_err());
}

#[test]
fn test_sequences_from_bytes() {
    let bin = Value::Binary(Binary::from(vec![1, 2]));
    assert_eq!(from_value::<Vec<u8>>(bin.clone()).unwrap(), vec![1, 2]);
    assert_eq!(from_value::<[u8; 2]>(bin.clone()).unwrap(), [1, 2]);
    assert!(from_value::<Vec<i8>>(bin).is_err());

    let id = Id::from_bytes([9; 12]);
    assert_eq!(from_value::<[u8; 12]>(Value::Id(id)).unwrap(), [9; 12]);
}

#[test]
fn test_array_elements_checked() {
    let mixed = Value::from(vec![Value::U8(1), Value::U16(2)]);
    assert!(matches!(from_value::<Vec<u8>>(mixed), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_null_gives_zero_values() {
    assert_eq!(from_value::<i8>(Value::Null).unwrap(), 0);
    assert_eq!(from_value::<f64>(Value::Null).unwrap(), 0.0);
    assert!(!from_value::<bool>(Value::Null).unwrap());
    assert_eq!(from_value::<Option<String>>(Value::Null).unwrap(), None);
    assert_eq!(from_value::<Timestamp>(Value::Null).unwrap(), Timestamp::from_millis(0));
    assert_eq!(from_value::<Id>(Value::Null).unwrap(), Id::from_bytes([0; 12]));
}

#[test]
fn test_struct_field_mismatch() {
    #[derive(Deserialize, Debug)]
    struct Limits {
        #[allow(dead_code)]
        low: u8,
        #[allow(dead_code)]
        high: u64,
    }

    let mut map = Map::new();
    map.insert("low", Value::U8(1));
    map.insert("high", Value::U32(10));
    let err = from_map::<Limits>(map).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: "U64".to_string(),
            found: "U32".to_string()
        }
    );
}

#[test]
fn test_nested_struct_must_be_map() {
    #[derive(Deserialize, Debug)]
    struct Inner {
        #[allow(dead_code)]
        x: i32,
    }

    #[derive(Deserialize, Debug)]
    struct Outer {
        #[allow(dead_code)]
        inner: Inner,
    }

    let mut map = Map::new();
    map.insert("inner", Value::from(vec![Value::I32(1)]));
    assert!(matches!(from_map::<Outer>(map), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_unsupported_widths() {
    assert!(matches!(from_value::<i128>(Value::I64(1)), Err(Error::UnsupportedType(_))));
    assert!(matches!(from_value::<u128>(Value::U64(1)), Err(Error::UnsupportedType(_))));
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Base {
    value: i16,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Outer {
    base: Embed<Base>,
    name: String,
}

#[test]
fn test_embedded_field_mismatch() {
    let mut map = Map::new();
    map.insert("value", Value::I8(5));
    map.insert("name", "x");
    assert_eq!(
        from_map::<Outer>(map.clone()).unwrap_err(),
        Error::TypeMismatch {
            expected: "I16".to_string(),
            found: "I8".to_string()
        }
    );

    map.insert("value", Value::I16(5));
    let outer = from_map::<Outer>(map).unwrap();
    assert_eq!(outer.base.value, 5);
    assert_eq!(outer.name, "x");
}

#[test]
fn test_nested_embedded_field_mismatch() {
    #[derive(Deserialize, Debug)]
    struct Stamp {
        #[allow(dead_code)]
        seq: u64,
    }

    #[derive(Deserialize, Debug)]
    struct Header {
        #[allow(dead_code)]
        stamp: Embed<Stamp>,
        #[allow(dead_code)]
        flags: u8,
    }

    #[derive(Deserialize, Debug)]
    struct Packet {
        #[allow(dead_code)]
        header: Embed<Header>,
    }

    let mut map = Map::new();
    map.insert("seq", Value::U32(1));
    map.insert("flags", Value::U8(0));
    assert_eq!(
        from_map::<Packet>(map.clone()).unwrap_err(),
        Error::TypeMismatch {
            expected: "U64".to_string(),
            found: "U32".to_string()
        }
    );

    map.insert("flags", Value::I8(0));
    map.insert("seq", Value::U64(1));
    assert!(matches!(from_map::<Packet>(map), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_embedded_field_ignores_own_key() {
    let mut nested = Map::new();
    nested.insert("value", Value::I16(9));

    let mut map = Map::new();
    map.insert("base", nested);
    map.insert("value", Value::I8(9));
    assert!(matches!(from_map::<Outer>(map), Err(Error::TypeMismatch { .. })));
}
