//! The tree: sole owner of the node pool and the string arena
//!
//! ```text
//! Tree ─┬─ NodeArena   (node + attribute slots)
//!       ├─ StringArena (tag names, attribute keys)
//!       └─ root: NodeId (Document or DocumentFragment)
//! ```
//!
//! Handles ([`Node`], [`Attribute`](crate::Attribute)) borrow the tree and
//! cannot outlive it. Mutation goes through `&mut Tree`, so the borrow
//! checker enforces "many readers or one writer".

use crate::arena::{NodeArena, NodeData};
use crate::error::Result;
use crate::intern::StringArena;
use crate::node::{Node, NodeMut};
use crate::tag::TagCode;
use crate::types::{Atom, FragmentContext, Namespace, NodeId, NodeKind};
use std::sync::OnceLock;

/// Lazily resolved well-known nodes; reset on every structural change
#[derive(Debug, Default)]
struct LookupCache {
    document_element: OnceLock<Option<NodeId>>,
    head: OnceLock<Option<NodeId>>,
    body: OnceLock<Option<NodeId>>,
}

#[derive(Debug)]
pub struct Tree {
    pub(crate) arena: NodeArena,
    pub(crate) strings: StringArena,
    root: NodeId,
    fragment_context: Option<FragmentContext>,
    cache: LookupCache,
}

impl Tree {
    /// Empty tree with a Document root
    pub fn new_document() -> Self {
        Self::with_root(NodeKind::Document, None)
    }

    /// Empty tree with a DocumentFragment root parsed in `tag`/`ns` context
    pub fn new_fragment(tag: TagCode, ns: Namespace) -> Self {
        Self::with_root(
            NodeKind::DocumentFragment,
            Some(FragmentContext::new(tag, ns)),
        )
    }

    fn with_root(kind: NodeKind, fragment_context: Option<FragmentContext>) -> Self {
        let data = NodeData::new(kind, Atom::EMPTY, TagCode::Undefined, Namespace::Html);
        let (arena, root) = NodeArena::with_root(data);
        tracing::trace!("[Tree] new {} tree", kind);
        Self {
            arena,
            strings: StringArena::new(),
            root,
            fragment_context,
            cache: LookupCache::default(),
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node::new(self, self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn is_fragment(&self) -> bool {
        self.fragment_context.is_some()
    }

    pub fn fragment_context(&self) -> Option<FragmentContext> {
        self.fragment_context
    }

    /// Handle for a live node, `None` for destroyed or foreign ids
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        self.arena.contains(id).then(|| Node::new(self, id))
    }

    /// Mutable handle for a live node
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.arena.get(id)?;
        Ok(NodeMut::new(self, id))
    }

    /// First Element child of the root
    pub fn document_element(&self) -> Option<Node<'_>> {
        let id = *self.cache.document_element.get_or_init(|| {
            self.root()
                .children()
                .find(|child| child.kind() == NodeKind::Element)
                .map(|child| child.id())
        });
        id.map(|id| Node::new(self, id))
    }

    pub fn head(&self) -> Option<Node<'_>> {
        let id = *self
            .cache
            .head
            .get_or_init(|| self.find_html_child(TagCode::Head));
        id.map(|id| Node::new(self, id))
    }

    pub fn body(&self) -> Option<Node<'_>> {
        let id = *self
            .cache
            .body
            .get_or_init(|| self.find_html_child(TagCode::Body));
        id.map(|id| Node::new(self, id))
    }

    fn find_html_child(&self, code: TagCode) -> Option<NodeId> {
        self.document_element()?
            .children()
            .find(|child| {
                child.kind() == NodeKind::Element
                    && child.tag_code() == code
                    && child.namespace() == Namespace::Html
            })
            .map(|child| child.id())
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.arena.node(self.root).first_child.is_none()
    }

    /// Resolve an interned handle from this tree
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings.resolve(atom)
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        self.arena.node(id)
    }

    pub(crate) fn invalidate_lookups(&mut self) {
        self.cache = LookupCache::default();
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let tree = Tree::new_document();
        assert_eq!(tree.root().kind(), NodeKind::Document);
        assert!(tree.root().parent().is_none());
        assert!(tree.document_element().is_none());
        assert!(tree.head().is_none());
        assert!(tree.body().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_fragment());
    }

    #[test]
    fn test_new_fragment_records_context() {
        let tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        assert_eq!(tree.root().kind(), NodeKind::DocumentFragment);
        assert_eq!(
            tree.fragment_context(),
            Some(FragmentContext::new(TagCode::Div, Namespace::Html))
        );
    }

    #[test]
    fn test_lookups_follow_structure() {
        let mut tree = Tree::new_document();
        let html = tree.create_element("html").unwrap();
        let head = tree.create_element("head").unwrap();
        let body = tree.create_element("body").unwrap();
        let root = tree.root_id();
        tree.append_child(root, html).unwrap();
        tree.append_child(html, head).unwrap();
        tree.append_child(html, body).unwrap();

        assert_eq!(tree.document_element().unwrap().id(), html);
        assert_eq!(tree.head().unwrap().id(), head);
        assert_eq!(tree.body().unwrap().id(), body);

        tree.remove_from_parent(head).unwrap();
        assert!(tree.head().is_none());
        assert_eq!(tree.body().unwrap().id(), body);
    }

    #[test]
    fn test_node_lookup_rejects_unknown_ids() {
        let tree = Tree::new_document();
        assert!(tree.node(NodeId(0)).is_some());
        assert!(tree.node(NodeId(42)).is_none());
    }

    #[test]
    fn test_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tree>();
    }
}
