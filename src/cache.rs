//! Field descriptors for native structs, computed once per type.
//!
//! serde's derive hands the deserializer each struct's name and its ordered
//! list of serialized field names (after `rename`, without `skip`ped fields).
//! [`StructCache`] turns that into a [`StructInfo`] the first time a type is
//! seen and hands out the same `Arc` afterwards. Entries are never evicted.
//!
//! Lookups take a shared read lock; a miss takes the write lock and checks
//! again before building, so concurrent first uses build an entry at most once.
//!
//! Each field also carries a *zero-fill* flag. Absent fields are normally
//! left to serde, which applies `#[serde(default)]` or `None`. A field that
//! has neither is reported missing once, flagged here, and from then on is
//! filled with its zero value. Omit-if-empty and embedding are not recorded
//! per field; they are expressed with `skip_serializing_if = "nson::is_empty"`
//! and [`Embed`](crate::Embed).
//!
//! ```rust
//! use nson::StructCache;
//!
//! static FIELDS: &[&str] = &["id", "name"];
//!
//! let cache = StructCache::new();
//! let first = cache.get_or_build("User", FIELDS);
//! let again = cache.get_or_build("User", FIELDS);
//!
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! assert_eq!(first.field("name").map(|f| f.index), Some(1));
//! ```

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One serialized field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Position in the declared field list.
    pub index: usize,
    /// Key used in the document.
    pub name: &'static str,
}

/// Ordered field descriptors for one struct type.
#[derive(Debug)]
pub struct StructInfo {
    name: &'static str,
    fields: Vec<FieldInfo>,
    zero_fill: Vec<AtomicBool>,
}

impl StructInfo {
    fn build(name: &'static str, fields: &'static [&'static str]) -> Self {
        StructInfo {
            name,
            fields: fields
                .iter()
                .enumerate()
                .map(|(index, &name)| FieldInfo { index, name })
                .collect(),
            zero_fill: fields.iter().map(|_| AtomicBool::new(false)).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether an absent field is filled with its zero value.
    #[must_use]
    pub fn zero_fill(&self, index: usize) -> bool {
        self.zero_fill
            .get(index)
            .map_or(false, |flag| flag.load(Ordering::Acquire))
    }
}

// Types are told apart by name plus the address of their static field list.
// Two types whose field lists share storage have identical entries anyway.
type CacheKey = (&'static str, usize, usize);

/// Shared cache of [`StructInfo`] entries.
#[derive(Debug, Default)]
pub struct StructCache {
    entries: RwLock<HashMap<CacheKey, Arc<StructInfo>>>,
    generation: AtomicUsize,
}

static GLOBAL_CACHE: Lazy<StructCache> = Lazy::new(StructCache::new);

impl StructCache {
    #[must_use]
    pub fn new() -> Self {
        StructCache {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache used by the unmarshal engine.
    pub fn global() -> &'static StructCache {
        &GLOBAL_CACHE
    }

    /// Returns the entry for a struct, building it on first use.
    pub fn get_or_build(
        &self,
        name: &'static str,
        fields: &'static [&'static str],
    ) -> Arc<StructInfo> {
        let key = (name, fields.as_ptr() as usize, fields.len());

        if let Some(info) = self.entries.read().get(&key) {
            return Arc::clone(info);
        }

        let mut entries = self.entries.write();
        if let Some(info) = entries.get(&key) {
            return Arc::clone(info);
        }

        let info = Arc::new(StructInfo::build(name, fields));
        debug!(name, fields = fields.len(), "cached struct layout");
        entries.insert(key, Arc::clone(&info));
        info
    }

    /// Flags a field for zero-filling. Returns `true` if the flag was newly set.
    pub fn mark_zero_fill(&self, info: &StructInfo, index: usize) -> bool {
        let newly_set = info
            .zero_fill
            .get(index)
            .map_or(false, |flag| !flag.swap(true, Ordering::AcqRel));
        if newly_set {
            self.generation.fetch_add(1, Ordering::AcqRel);
            debug!(
                name = info.name,
                field = info.fields[index].name,
                "field has no default, filling with zero value"
            );
        }
        newly_set
    }

    /// Counter bumped every time a zero-fill flag is set.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
