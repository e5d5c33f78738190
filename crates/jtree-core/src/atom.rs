//! String interning for object keys.
//!
//! Mirrors the "one small ID-keyed handle type per concern" shape used
//! throughout the teacher workspace's model layer, but has no direct
//! teacher analog: the editor gets free interning from its rope/buffer
//! storage, whereas here object keys are interned explicitly so that
//! repeated key comparisons (sort/filter/search) are cheap integer
//! compares instead of string compares.

use std::collections::HashMap;

/// An interned string identifier. Two atoms compare equal iff their
/// underlying text is equal; comparison is `u32` equality, not string
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(u32);

/// Owns the interned string table for one document context.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: HashMap<Box<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomize `text`, reusing an existing atom if this exact string was
    /// interned before.
    pub fn atomize(&mut self, text: &str) -> Atom {
        if let Some(atom) = self.lookup.get(text) {
            return *atom;
        }
        let id = Atom(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    pub fn text(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_atom() {
        let mut i = Interner::new();
        let a = i.atomize("hello");
        let b = i.atomize("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_different_atom() {
        let mut i = Interner::new();
        let a = i.atomize("hello");
        let b = i.atomize("world");
        assert_ne!(a, b);
    }

    #[test]
    fn text_round_trips() {
        let mut i = Interner::new();
        let a = i.atomize("round-trip");
        assert_eq!(i.text(a), "round-trip");
    }
}
