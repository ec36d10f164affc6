//! Query-by-criteria over a tree
//!
//! Every query walks the tree once in pre-order and materialises the hits
//! into a [`Collection`]. A collection is a snapshot of ids: later mutations
//! do not invalidate it, but the handles it yields report the current
//! structure (a removed node has no parent).

use crate::node::Node;
use crate::tag::TagCode;
use crate::tree::Tree;
use crate::types::NodeId;
use std::fmt;

/// Immutable list of node handles produced by one query
#[derive(Clone)]
pub struct Collection<'a> {
    tree: &'a Tree,
    ids: Vec<NodeId>,
}

impl<'a> Collection<'a> {
    pub(crate) fn from_walk<I, F>(tree: &'a Tree, walk: I, predicate: F) -> Self
    where
        I: Iterator<Item = Node<'a>>,
        F: Fn(&Node<'a>) -> bool,
    {
        let ids = walk.filter(|node| predicate(node)).map(|node| node.id()).collect();
        Self { tree, ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        self.ids.get(index).map(|&id| Node::new(self.tree, id))
    }

    pub fn first(&self) -> Option<Node<'a>> {
        self.get(0)
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + '_ {
        let tree = self.tree;
        self.ids.iter().map(move |&id| Node::new(tree, id))
    }
}

impl<'a> IntoIterator for Collection<'a> {
    type Item = Node<'a>;
    type IntoIter = IntoIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            tree: self.tree,
            ids: self.ids.into_iter(),
        }
    }
}

/// Owning iterator over a [`Collection`]
pub struct IntoIter<'a> {
    tree: &'a Tree,
    ids: std::vec::IntoIter<NodeId>,
}

impl<'a> Iterator for IntoIter<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| Node::new(self.tree, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for IntoIter<'_> {}

impl PartialEq for Collection<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.ids == other.ids
    }
}

impl Eq for Collection<'_> {}

impl fmt::Debug for Collection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Tree {
    /// Elements in pre-order matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Collection<'_>
    where
        F: Fn(&Node<'_>) -> bool,
    {
        Collection::from_walk(self, self.root().descendants(), |node| {
            node.is_element() && predicate(node)
        })
    }

    pub fn nodes_by_tag_code(&self, code: TagCode) -> Collection<'_> {
        self.find(|node| node.tag_code() == code)
    }

    /// Elements whose tag name equals `name`, ignoring ASCII case
    pub fn nodes_by_name(&self, name: &str) -> Collection<'_> {
        self.find(|node| node.tag_name().eq_ignore_ascii_case(name))
    }

    /// Elements carrying at least one attribute named exactly `key`
    pub fn nodes_by_attribute_key(&self, key: &str) -> Collection<'_> {
        self.find(|node| node.attributes().any(|attr| attr.key() == key))
    }

    /// Elements carrying some attribute whose value matches `value`
    pub fn nodes_by_attribute_value(&self, value: &str, case_insensitive: bool) -> Collection<'_> {
        self.find(|node| {
            node.attributes()
                .any(|attr| value_matches(attr.value(), value, case_insensitive))
        })
    }

    /// Elements carrying an attribute named `key` whose value matches `value`
    pub fn nodes_by_attribute_value_with_key(
        &self,
        key: &str,
        value: &str,
        case_insensitive: bool,
    ) -> Collection<'_> {
        self.find(|node| {
            node.attributes().any(|attr| {
                attr.key() == key && value_matches(attr.value(), value, case_insensitive)
            })
        })
    }
}

fn value_matches(actual: &str, wanted: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        actual.eq_ignore_ascii_case(wanted)
    } else {
        actual == wanted
    }
}
