//! Bounds applied while decoding untrusted input.
//!
//! Every length-prefixed field is checked against these limits before any
//! buffer is allocated for it.
//!
//! ## Examples
//!
//! ```rust
//! use nson::{decode_map_with_options, DecodeOptions, Error, Map};
//!
//! let mut map = Map::new();
//! map.insert("payload", "x".repeat(64));
//! let bytes = map.to_bytes().unwrap();
//!
//! let options = DecodeOptions::new().with_max_size(32);
//! assert!(matches!(
//!     decode_map_with_options(&bytes, &options),
//!     Err(Error::Validation(_))
//! ));
//! ```

use crate::format::MAX_NSON_SIZE;

/// Default nesting limit for Maps and Arrays.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits for decoding.
///
/// # Examples
///
/// ```rust
/// use nson::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .with_max_size(1024 * 1024)
///     .with_max_depth(16);
/// assert_eq!(options.max_size, 1024 * 1024);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest declared length accepted for any String, Binary, Array or Map.
    pub max_size: u32,
    /// Deepest Map/Array nesting accepted; the root container is depth 1.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_size: MAX_NSON_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates default options (32 MiB length cap, depth 64).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nson::{DecodeOptions, MAX_NSON_SIZE};
    ///
    /// let options = DecodeOptions::new();
    /// assert_eq!(options.max_size, MAX_NSON_SIZE);
    /// assert_eq!(options.max_depth, 64);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
