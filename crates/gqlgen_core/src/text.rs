//! String interning for SDL names.

use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// An interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Text(u32);

impl Text {
    /// Returns the raw index.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// A string interner that deduplicates names.
///
/// Interior mutability lets the lexer and parser share one interner by
/// reference while both add names to it.
#[derive(Debug)]
pub struct Interner {
    map: RefCell<FxHashMap<String, Text>>,
    strings: RefCell<Vec<String>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates a new interner with the built-in scalars and the SDL keywords
    /// pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            map: RefCell::new(FxHashMap::default()),
            strings: RefCell::new(Vec::new()),
        };

        for keyword in [
            "Int",
            "Float",
            "String",
            "Boolean",
            "ID",
            "Query",
            "Mutation",
            "Subscription",
            "deprecated",
            "specifiedBy",
            "reason",
            "url",
        ] {
            interner.intern(keyword);
        }

        interner
    }

    /// Interns a string, returning its identifier.
    pub fn intern(&self, s: &str) -> Text {
        let mut map = self.map.borrow_mut();
        if let Some(&id) = map.get(s) {
            return id;
        }

        let mut strings = self.strings.borrow_mut();
        let id = Text(u32::try_from(strings.len()).unwrap_or(u32::MAX));
        strings.push(s.to_string());
        map.insert(s.to_string(), id);
        id
    }

    /// Gets the string for an identifier.
    #[must_use]
    pub fn get(&self, id: Text) -> String {
        let strings = self.strings.borrow();
        strings.get(id.0 as usize).cloned().unwrap_or_default()
    }

    /// Returns true if `id` names the string `s`.
    #[must_use]
    pub fn is(&self, id: Text, s: &str) -> bool {
        self.strings
            .borrow()
            .get(id.0 as usize)
            .is_some_and(|stored| stored == s)
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    /// Returns true if no strings are interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern() {
        let interner = Interner::new();
        let id1 = interner.intern("hello");
        let id2 = interner.intern("hello");
        let id3 = interner.intern("world");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_get() {
        let interner = Interner::new();
        let id = interner.intern("test");
        assert_eq!(interner.get(id), "test");
        assert!(interner.is(id, "test"));
        assert!(!interner.is(id, "other"));
    }

    #[test]
    fn test_builtin_names() {
        let interner = Interner::new();
        let before = interner.len();
        let id = interner.intern("Boolean");
        assert_eq!(interner.get(id), "Boolean");
        assert_eq!(interner.len(), before);
    }
}
