//! Lazy sequences over the link fields
//!
//! Every iterator here is a cursor over sibling/parent/child links: no
//! allocation, no locks, termination at a `None` link. Re-obtaining an
//! iterator from a handle restarts it.
//!
//! Mutating the tree while iterating is impossible through the safe API
//! (iterators borrow the tree shared); callers that collect ids first and
//! mutate afterwards see the structure as of each individual lookup.

use crate::attribute::Attribute;
use crate::node::Node;
use crate::tree::Tree;
use crate::types::{AttrId, NodeId};
use std::iter::FusedIterator;

/// Direct children of a node, double-ended
pub struct Children<'a> {
    tree: &'a Tree,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a Tree, parent: NodeId) -> Self {
        let data = tree.data(parent);
        Self {
            tree,
            front: data.first_child,
            back: data.last_child,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.tree.data(id).next_sibling;
        }
        Some(Node::new(self.tree, id))
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.tree.data(id).prev_sibling;
        }
        Some(Node::new(self.tree, id))
    }
}

impl FusedIterator for Children<'_> {}

/// Children of a node's parent, the node itself skipped
pub struct Siblings<'a> {
    inner: Option<Children<'a>>,
    skip: NodeId,
}

impl<'a> Siblings<'a> {
    pub(crate) fn new(tree: &'a Tree, node: NodeId) -> Self {
        Self {
            inner: tree.data(node).parent.map(|parent| Children::new(tree, parent)),
            skip: node,
        }
    }
}

impl<'a> Iterator for Siblings<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let skip = self.skip;
        self.inner.as_mut()?.find(|node| node.id() != skip)
    }
}

impl FusedIterator for Siblings<'_> {}

/// Pre-order walk below a node (the node itself excluded)
pub struct Descendants<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a Tree, root: NodeId) -> Self {
        Self {
            tree,
            root,
            next: tree.data(root).first_child,
        }
    }

    fn advance(&self, current: NodeId) -> Option<NodeId> {
        let data = self.tree.data(current);
        if let Some(child) = data.first_child {
            return Some(child);
        }

        let mut node = current;
        loop {
            if node == self.root {
                return None;
            }
            let data = self.tree.data(node);
            if let Some(sibling) = data.next_sibling {
                return Some(sibling);
            }
            node = data.parent?;
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.advance(id);
        Some(Node::new(self.tree, id))
    }
}

impl FusedIterator for Descendants<'_> {}

/// Parent chain up to the root
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self { tree, next: start }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.data(id).parent;
        Some(Node::new(self.tree, id))
    }
}

impl FusedIterator for Ancestors<'_> {}

/// Attributes of an element in insertion order
pub struct Attributes<'a> {
    tree: &'a Tree,
    next: Option<AttrId>,
}

impl<'a> Attributes<'a> {
    pub(crate) fn new(tree: &'a Tree, first: Option<AttrId>) -> Self {
        Self { tree, next: first }
    }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.arena.attr(id).next;
        Some(Attribute::new(self.tree, id))
    }
}

impl FusedIterator for Attributes<'_> {}

/// One step of a [`Traverse`] walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge<'a> {
    Open(Node<'a>),
    Close(Node<'a>),
}

/// Open/close walk of a subtree, root included
///
/// Every node yields `Open` before its descendants and `Close` after them,
/// which is exactly what a serializer needs without recursion.
pub struct Traverse<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<(NodeId, bool)>,
}

impl<'a> Traverse<'a> {
    pub fn new(node: Node<'a>) -> Self {
        Self {
            tree: node.tree(),
            root: node.id(),
            next: Some((node.id(), true)),
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, open) = self.next?;
        let data = self.tree.data(id);
        let node = Node::new(self.tree, id);

        if open {
            self.next = Some(match data.first_child {
                Some(child) => (child, true),
                None => (id, false),
            });
            return Some(Edge::Open(node));
        }

        self.next = if id == self.root {
            None
        } else if let Some(sibling) = data.next_sibling {
            Some((sibling, true))
        } else {
            data.parent.map(|parent| (parent, false))
        };
        Some(Edge::Close(node))
    }
}

impl FusedIterator for Traverse<'_> {}
