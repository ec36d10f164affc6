//! String arena for tag names, attribute keys and other short identifiers
//!
//! All interned strings live in one growing buffer; an [`Atom`] is a 4-byte
//! index into the span table. Text payloads are not interned.

use crate::error::{DomError, Result};
use crate::types::Atom;
use ahash::AHashMap;

#[derive(Debug, Clone, Copy)]
struct Span {
    offset: u32,
    len: u32,
}

/// Interning arena owned by a single tree
#[derive(Debug)]
pub struct StringArena {
    buffer: String,
    spans: Vec<Span>,
    lookup: AHashMap<Box<str>, Atom>,
}

impl StringArena {
    pub fn new() -> Self {
        let mut arena = Self {
            buffer: String::with_capacity(1024),
            spans: Vec::with_capacity(128),
            lookup: AHashMap::with_capacity(128),
        };
        arena.spans.push(Span { offset: 0, len: 0 });
        arena.lookup.insert(Box::from(""), Atom::EMPTY);
        arena
    }

    /// Intern `s`, returning the existing handle if the bytes are known
    pub fn intern(&mut self, s: &str) -> Result<Atom> {
        if let Some(&atom) = self.lookup.get(s) {
            return Ok(atom);
        }

        let index = u32::try_from(self.spans.len()).map_err(|_| DomError::AllocationFailure)?;
        let offset = u32::try_from(self.buffer.len()).map_err(|_| DomError::AllocationFailure)?;
        let len = u32::try_from(s.len()).map_err(|_| DomError::AllocationFailure)?;
        offset.checked_add(len).ok_or(DomError::AllocationFailure)?;

        self.buffer.try_reserve(s.len())?;
        self.spans.try_reserve(1)?;
        self.lookup.try_reserve(1)?;

        self.buffer.push_str(s);
        self.spans.push(Span { offset, len });
        let atom = Atom(index);
        self.lookup.insert(Box::from(s), atom);
        Ok(atom)
    }

    /// Look up a string without interning it
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.lookup.get(s).copied()
    }

    /// Resolve a handle back to its bytes
    ///
    /// Handles from another arena resolve to the empty string when out of
    /// range.
    pub fn resolve(&self, atom: Atom) -> &str {
        match self.spans.get(atom.0 as usize) {
            Some(span) => {
                let start = span.offset as usize;
                &self.buffer[start..start + span.len as usize]
            }
            None => "",
        }
    }

    /// Number of distinct strings, including the empty string
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.len() <= 1
    }
}

impl Default for StringArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let mut arena = StringArena::new();
        let a = arena.intern("div").unwrap();
        let b = arena.intern("div").unwrap();
        let c = arena.intern("span").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(arena.resolve(a), "div");
        assert_eq!(arena.resolve(c), "span");
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_empty_string_is_preinterned() {
        let mut arena = StringArena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.intern("").unwrap(), Atom::EMPTY);
        assert_eq!(arena.resolve(Atom::EMPTY), "");
    }

    #[test]
    fn test_lookup_without_interning() {
        let mut arena = StringArena::new();
        arena.intern("class").unwrap();
        assert!(arena.get("class").is_some());
        assert!(arena.get("href").is_none());
        assert_eq!(arena.resolve(Atom(999)), "");
    }

    #[test]
    fn test_non_ascii_spans() {
        let mut arena = StringArena::new();
        let a = arena.intern("données").unwrap();
        let b = arena.intern("x").unwrap();
        assert_eq!(arena.resolve(a), "données");
        assert_eq!(arena.resolve(b), "x");
    }
}
