//! String interning for identifiers.
//!
//! Type names, member names, function names and symbol identifiers are all
//! interned once and handled as [`StringId`] afterwards. Analyses key their
//! maps by `StringId` rather than by owned strings, which keeps the class
//! hierarchy and the call graph as plain adjacency lists over small ids.
//!
//! # Usage
//!
//! ```
//! use gotoprog_core::interner::StringInterner;
//!
//! let interner = StringInterner::new();
//! let id = interner.get_or_intern("Base.run");
//! assert_eq!(&*interner.resolve(id), "Base.run");
//! assert_eq!(interner.get("Base.run"), Some(id));
//! ```
//!
//! The interner is shared behind an `Arc` by the symbol table and everything
//! derived from it, so interning goes through `&self` and a read-write lock.

use indexmap::IndexSet;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

/// Handle to an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

impl StringId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe string interner.
#[derive(Debug, Default)]
pub struct StringInterner {
    strings: RwLock<IndexSet<Arc<str>, FxBuildHasher>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `value`, returning the existing id if it was seen before.
    pub fn get_or_intern(&self, value: &str) -> StringId {
        if let Some(id) = self.get(value) {
            return id;
        }
        let mut strings = self.strings.write();
        // Another writer may have raced us between the read and write locks.
        let (index, _) = strings.insert_full(Arc::from(value));
        StringId(index as u32)
    }

    /// Look up an already-interned string without interning it.
    pub fn get(&self, value: &str) -> Option<StringId> {
        self.strings
            .read()
            .get_index_of(value)
            .map(|index| StringId(index as u32))
    }

    /// Resolve an id back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different interner.
    pub fn resolve(&self, id: StringId) -> Arc<str> {
        match self.strings.read().get_index(id.index()) {
            Some(value) => value.clone(),
            None => panic!("string id {} does not belong to this interner", id),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_stable() {
        let interner = StringInterner::new();
        let a = interner.get_or_intern("A");
        let b = interner.get_or_intern("B");
        assert_ne!(a, b);
        assert_eq!(interner.get_or_intern("A"), a);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = StringInterner::new();
        assert_eq!(interner.get("missing"), None);
        assert!(interner.is_empty());
    }

    #[test]
    fn test_resolve_round_trips() {
        let interner = StringInterner::new();
        let id = interner.get_or_intern("Derived.run");
        assert_eq!(&*interner.resolve(id), "Derived.run");
    }
}
