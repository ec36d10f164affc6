//! Attribute handles

use crate::arena::AttrData;
use crate::node::Node;
use crate::tree::Tree;
use crate::types::{AttrId, Atom, Namespace};
use std::fmt;

/// Handle to one key/value/namespace triple on an element
#[derive(Clone, Copy)]
pub struct Attribute<'a> {
    tree: &'a Tree,
    id: AttrId,
}

impl<'a> Attribute<'a> {
    pub(crate) fn new(tree: &'a Tree, id: AttrId) -> Self {
        Self { tree, id }
    }

    fn data(&self) -> &'a AttrData {
        self.tree.arena.attr(self.id)
    }

    pub fn id(&self) -> AttrId {
        self.id
    }

    pub(crate) fn key_atom(&self) -> Atom {
        self.data().key
    }

    pub fn key(&self) -> &'a str {
        self.tree.resolve(self.data().key)
    }

    pub fn value(&self) -> &'a str {
        &self.data().value
    }

    pub fn namespace(&self) -> Namespace {
        self.data().ns
    }

    /// Element the attribute belongs to
    pub fn owner(&self) -> Node<'a> {
        Node::new(self.tree, self.data().owner)
    }

    pub fn previous(&self) -> Option<Attribute<'a>> {
        self.data().prev.map(|id| Attribute::new(self.tree, id))
    }

    pub fn next(&self) -> Option<Attribute<'a>> {
        self.data().next.map(|id| Attribute::new(self.tree, id))
    }

    /// `(key, value)` pair
    pub fn pair(&self) -> (&'a str, &'a str) {
        (self.key(), self.value())
    }
}

impl<'a> From<Attribute<'a>> for (&'a str, &'a str) {
    fn from(attr: Attribute<'a>) -> Self {
        attr.pair()
    }
}

impl PartialEq for Attribute<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Attribute<'_> {}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("ns", &self.namespace())
            .finish()
    }
}

impl fmt::Display for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.key(), self.value())
    }
}
