//! Node handles
//!
//! A [`Node`] is `(tree, id)`: trivially copyable, never owning. Every read
//! is a slot lookup plus a link-field load. [`NodeMut`] carries the mutation
//! surface and borrows the tree exclusively.

use crate::arena::NodeData;
use crate::attribute::Attribute;
use crate::error::{DomError, Result};
use crate::iter::{Ancestors, Attributes, Children, Descendants, Siblings};
use crate::query::Collection;
use crate::serializer;
use crate::tag::TagCode;
use crate::tree::Tree;
use crate::types::{AttrId, Namespace, NodeId, NodeKind};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(tree: &'a Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn data(&self) -> &'a NodeData {
        self.tree.data(self.id)
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<Node<'a>> {
        id.map(|id| Node::new(self.tree, id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    /// False once the node has been destroyed through [`Tree::destroy`]
    pub fn is_alive(&self) -> bool {
        self.data().alive
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn tag_code(&self) -> TagCode {
        self.data().tag_code
    }

    /// Element name as parsed, or the DOM node name for other kinds
    pub fn tag_name(&self) -> &'a str {
        let data = self.data();
        match data.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => {
                self.tree.resolve(data.tag)
            }
            NodeKind::Document => "#document",
            NodeKind::DocumentFragment => "#document-fragment",
            _ => data.tag_code.as_str(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.data().ns
    }

    pub fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }

    pub fn is_void_element(&self) -> bool {
        self.data().is_void_element()
    }

    /// True for Text and Comment nodes and for `<style>` elements
    #[deprecated(note = "use `kind()` and `text()`")]
    pub fn is_text_node(&self) -> bool {
        matches!(self.kind(), NodeKind::Text | NodeKind::Comment)
            || (self.is_element() && self.tag_code() == TagCode::Style)
    }

    /// Payload of Text/Comment/CDATA/PI nodes; empty for other kinds
    pub fn text(&self) -> &'a str {
        let data = self.data();
        if data.kind.has_text() {
            &data.text
        } else {
            ""
        }
    }

    /// Name recorded on a DocumentType node
    pub fn doctype_name(&self) -> Option<&'a str> {
        let data = self.data();
        (data.kind == NodeKind::DocumentType).then_some(data.text.as_str())
    }

    /// Text of every Text node in this subtree, in document order, no
    /// separator
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        for node in std::iter::once(*self).chain(self.descendants()) {
            if node.is_text() {
                out.push_str(node.text());
            }
        }
        out
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.wrap(self.data().parent)
    }

    pub fn first_child(&self) -> Option<Node<'a>> {
        self.wrap(self.data().first_child)
    }

    pub fn last_child(&self) -> Option<Node<'a>> {
        self.wrap(self.data().last_child)
    }

    pub fn previous_sibling(&self) -> Option<Node<'a>> {
        self.wrap(self.data().prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<Node<'a>> {
        self.wrap(self.data().next_sibling)
    }

    pub fn has_children(&self) -> bool {
        self.data().first_child.is_some()
    }

    /// Direct children in document order
    pub fn children(&self) -> Children<'a> {
        Children::new(self.tree, self.id)
    }

    /// Children of the parent, without `self`
    pub fn siblings(&self) -> Siblings<'a> {
        Siblings::new(self.tree, self.id)
    }

    /// Pre-order walk of the subtree, `self` excluded
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants::new(self.tree, self.id)
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors::new(self.tree, self.data().parent)
    }

    /// Elements in this subtree matching `predicate`, in pre-order
    pub fn find<F>(&self, predicate: F) -> Collection<'a>
    where
        F: Fn(&Node<'a>) -> bool,
    {
        Collection::from_walk(self.tree, self.descendants(), |node| {
            node.is_element() && predicate(node)
        })
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes::new(self.tree, self.data().first_attr)
    }

    pub fn first_attribute(&self) -> Option<Attribute<'a>> {
        self.data()
            .first_attr
            .map(|id| Attribute::new(self.tree, id))
    }

    pub fn last_attribute(&self) -> Option<Attribute<'a>> {
        self.data()
            .last_attr
            .map(|id| Attribute::new(self.tree, id))
    }

    pub fn has_attributes(&self) -> bool {
        self.data().first_attr.is_some()
    }

    pub(crate) fn find_attribute(&self, key: &str) -> Option<AttrId> {
        // A key that was never interned cannot be on any element.
        let key = self.tree.strings.get(key)?;
        self.attributes()
            .find(|attr| attr.key_atom() == key)
            .map(|attr| attr.id())
    }

    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.find_attribute(key)
            .map(|id| Attribute::new(self.tree, id).value())
    }

    /// Like [`Node::attribute`], failing with `AttributeNotFound`
    pub fn at(&self, key: &str) -> Result<&'a str> {
        self.attribute(key)
            .ok_or_else(|| DomError::AttributeNotFound(key.to_string()))
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.find_attribute(key).is_some()
    }

    /// Outer HTML of this node
    pub fn html(&self) -> String {
        serializer::to_html(*self)
    }

    /// Same as [`Node::html`]
    pub fn html_deep(&self) -> String {
        self.html()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("tag", &self.tag_name())
            .finish()
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html())
    }
}

/// Exclusive handle carrying the mutation surface of a node
pub struct NodeMut<'a> {
    tree: &'a mut Tree,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(tree: &'a mut Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of the same node
    pub fn as_node(&self) -> Node<'_> {
        Node::new(self.tree, self.id)
    }

    /// Replace the first attribute named `key`, or append a new one
    pub fn set_attribute(&mut self, key: &str, value: &str) -> Result<AttrId> {
        self.tree
            .set_attribute(self.id, key, value, Namespace::Html)
    }

    pub fn set_attribute_ns(&mut self, key: &str, value: &str, ns: Namespace) -> Result<AttrId> {
        self.tree.set_attribute(self.id, key, value, ns)
    }

    /// Append an attribute even if the key is already present
    pub fn add_attribute(&mut self, key: &str, value: &str) -> Result<AttrId> {
        self.tree
            .add_attribute(self.id, key, value, Namespace::Html)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Result<bool> {
        self.tree.remove_attribute_by_key(self.id, key)
    }

    pub fn append_child(&mut self, child: NodeId) -> Result<()> {
        self.tree.append_child(self.id, child)
    }

    /// Insert `new` as the previous sibling of this node
    pub fn insert_before(&mut self, new: NodeId) -> Result<()> {
        self.tree.insert_before(self.id, new)
    }

    /// Insert `new` as the next sibling of this node
    pub fn insert_after(&mut self, new: NodeId) -> Result<()> {
        self.tree.insert_after(self.id, new)
    }

    pub fn remove_from_parent(&mut self) -> Result<()> {
        self.tree.remove_from_parent(self.id)
    }

    pub fn set_namespace(&mut self, ns: Namespace) -> Result<()> {
        self.tree.set_namespace(self.id, ns)
    }

    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.tree.set_text(self.id, text)
    }

    pub fn append_text(&mut self, text: &str) -> Result<NodeId> {
        self.tree.append_text(self.id, text)
    }
}
