//! Error types for NSON encoding, decoding, marshaling and unmarshaling.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! side is the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: truncated input, failed reads or writes
//! - **Validation Errors**: declared lengths outside bounds, bad keys, malformed bytes
//! - **Unsupported Types**: unknown wire tags, Rust types with no NSON counterpart
//! - **Type Mismatches**: strict unmarshal checks (no implicit widening or narrowing)
//! - **Structural Errors**: a root value that is not a struct or map
//! - **Missing Fields**: a struct field with no value, no default and no zero value
//!
//! ## Examples
//!
//! ```rust
//! use nson::{from_map, Error, Map, Value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug)]
//! struct Reading {
//!     value: i16,
//! }
//!
//! let mut map = Map::new();
//! map.insert("value", Value::I8(5));
//!
//! let err = from_map::<Reading>(map).unwrap_err();
//! assert!(matches!(err, Error::TypeMismatch { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while working with NSON data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing, including truncated input
    #[error("IO error: {0}")]
    Io(String),

    /// A declared length, key or byte sequence failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown wire tag, or a Rust type that cannot be represented
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Strict type check failure during unmarshaling
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The root value has the wrong shape for the operation
    #[error("Structural error: {0}")]
    Structural(String),

    /// A typed map getter was asked for a key that is not present
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A struct field had no value and no declared default
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a validation error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Error;
    ///
    /// let err = Error::validation("invalid map length 3");
    /// assert!(err.to_string().contains("map length"));
    /// ```
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::Error;
    ///
    /// let err = Error::type_mismatch("I16", "I8");
    /// assert_eq!(err.to_string(), "Type mismatch: expected I16, found I8");
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a structural error for a root value of the wrong shape.
    pub fn structural<T: fmt::Display>(msg: T) -> Self {
        Error::Structural(msg.to_string())
    }

    /// Creates a key-not-found error.
    pub fn key_not_found(key: &str) -> Self {
        Error::KeyNotFound(key.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Error::MissingField(field.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
