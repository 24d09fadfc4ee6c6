/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Leaves go through `Value::from`, so the variant follows the Rust type of
/// the expression: `1u8` is `U8`, `1` is `I32`, `1.0f32` is `F32`. Negative
/// numbers and other multi-token expressions need parentheses.
///
/// # Examples
///
/// ```rust
/// use nson::{nson, Value};
///
/// let doc = nson!({
///     "name": "sensor",
///     "port": 8080u16,
///     "offset": (-3i8),
///     "tags": ["a", "b"],
///     "parent": null
/// });
///
/// let map = doc.as_map().unwrap();
/// assert_eq!(map.get("port"), Some(&Value::U16(8080)));
/// assert_eq!(map.get("offset"), Some(&Value::I8(-3)));
/// assert_eq!(map.get("parent"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! nson {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        let mut array = $crate::Array::new();
        $(
            array.push($crate::nson!($elem));
        )*
        $crate::Value::Array(array)
    }};

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key, $crate::nson!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
