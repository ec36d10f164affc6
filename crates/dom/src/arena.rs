//! Arena-based node and attribute storage
//!
//! ## Memory Layout
//!
//! ```text
//! nodes: Vec<NodeData>   [Node0][Node1][Node2]...
//! attrs: Vec<AttrData>   [Attr0][Attr1]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Slots are append-only. A destroyed slot keeps its data with `alive`
//! cleared and is never handed out again, so every id stays meaningful for
//! the lifetime of the arena.

use crate::error::{DomError, Result};
use crate::tag::TagCode;
use crate::types::{AttrId, Atom, Namespace, NodeId, NodeKind};

/// One node record: kind, identity and the five structural links
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub tag: Atom,
    pub tag_code: TagCode,
    pub ns: Namespace,

    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,

    pub first_attr: Option<AttrId>,
    pub last_attr: Option<AttrId>,

    /// Text/Comment/CDATA/PI payload; the name for DocumentType
    pub text: String,

    pub alive: bool,
}

impl NodeData {
    pub fn new(kind: NodeKind, tag: Atom, tag_code: TagCode, ns: Namespace) -> Self {
        Self {
            kind,
            tag,
            tag_code,
            ns,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            first_attr: None,
            last_attr: None,
            text: String::new(),
            alive: true,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }

    /// Only HTML elements are void; `<svg><link>` may hold children
    pub fn is_void_element(&self) -> bool {
        self.kind == NodeKind::Element && self.ns == Namespace::Html && self.tag_code.is_void()
    }
}

/// One attribute record, doubly linked within its owning element
#[derive(Debug, Clone)]
pub struct AttrData {
    pub owner: NodeId,
    pub key: Atom,
    pub value: String,
    pub ns: Namespace,
    pub prev: Option<AttrId>,
    pub next: Option<AttrId>,
    pub alive: bool,
}

/// Pool of node and attribute slots
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<NodeData>,
    attrs: Vec<AttrData>,
    live_nodes: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            attrs: Vec::with_capacity(capacity),
            live_nodes: 0,
        }
    }

    /// Fresh arena whose slot 0 holds `root`
    pub fn with_root(root: NodeData) -> (Self, NodeId) {
        let mut arena = Self::new();
        arena.nodes.push(root);
        arena.live_nodes = 1;
        (arena, NodeId(0))
    }

    /// Append a node slot, returns its id
    pub fn alloc(&mut self, node: NodeData) -> Result<NodeId> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| DomError::AllocationFailure)?;
        self.nodes.try_reserve(1)?;
        self.nodes.push(node);
        self.live_nodes += 1;
        Ok(NodeId(id))
    }

    /// Append an attribute slot, returns its id
    pub fn alloc_attr(&mut self, attr: AttrData) -> Result<AttrId> {
        let id = u32::try_from(self.attrs.len()).map_err(|_| DomError::AllocationFailure)?;
        self.attrs.try_reserve(1)?;
        self.attrs.push(attr);
        Ok(AttrId(id))
    }

    /// Get a live node by id
    pub fn get(&self, id: NodeId) -> Result<&NodeData> {
        match self.nodes.get(id.index()) {
            Some(node) if node.alive => Ok(node),
            _ => Err(DomError::NodeNotFound(id.0)),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        match self.nodes.get_mut(id.index()) {
            Some(node) if node.alive => Ok(node),
            _ => Err(DomError::NodeNotFound(id.0)),
        }
    }

    /// Slot access for ids the crate handed out itself (live or tombstoned)
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn attr(&self, id: AttrId) -> &AttrData {
        &self.attrs[id.index()]
    }

    pub(crate) fn attr_mut(&mut self, id: AttrId) -> &mut AttrData {
        &mut self.attrs[id.index()]
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|node| node.alive)
    }

    /// Mark a detached node dead; its attributes go with it
    pub(crate) fn tombstone(&mut self, id: NodeId) {
        let mut attr = self.nodes[id.index()].first_attr;
        while let Some(attr_id) = attr {
            let slot = &mut self.attrs[attr_id.index()];
            slot.alive = false;
            attr = slot.next;
        }

        let node = &mut self.nodes[id.index()];
        if node.alive {
            node.alive = false;
            self.live_nodes -= 1;
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live_nodes
    }

    pub fn is_empty(&self) -> bool {
        self.live_nodes == 0
    }

    /// Total slots ever handed out, tombstones included
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Iterator over all live node ids in allocation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.alive)
            .map(|(idx, _)| NodeId(idx as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(code: TagCode) -> NodeData {
        NodeData::new(NodeKind::Element, Atom::EMPTY, code, Namespace::Html)
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = NodeArena::new();

        let id = arena.alloc(element(TagCode::Div)).unwrap();
        assert_eq!(id, NodeId(0));

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.tag_code, TagCode::Div);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(element(TagCode::Div)).unwrap();
        let b = arena.alloc(element(TagCode::Span)).unwrap();
        arena.tombstone(a);
        let c = arena.alloc(element(TagCode::P)).unwrap();

        assert!(a < b && b < c);
        assert_eq!(arena.slots(), 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_tombstoned_node_is_not_found() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(element(TagCode::Div)).unwrap();
        arena.tombstone(id);

        assert!(matches!(arena.get(id), Err(DomError::NodeNotFound(0))));
        assert!(!arena.contains(id));
        assert_eq!(arena.node_ids().count(), 0);
        // slot data survives for stale handles
        assert_eq!(arena.node(id).tag_code, TagCode::Div);
    }

    #[test]
    fn test_tombstone_kills_attributes() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(element(TagCode::A)).unwrap();
        let attr = arena
            .alloc_attr(AttrData {
                owner: id,
                key: Atom::EMPTY,
                value: "x".to_string(),
                ns: Namespace::Html,
                prev: None,
                next: None,
                alive: true,
            })
            .unwrap();
        arena.node_mut(id).first_attr = Some(attr);
        arena.node_mut(id).last_attr = Some(attr);

        arena.tombstone(id);
        assert!(!arena.attr(attr).alive);
    }

    #[test]
    fn test_void_classification() {
        assert!(element(TagCode::Br).is_void_element());
        assert!(!element(TagCode::Div).is_void_element());
        let text = NodeData::new(NodeKind::Text, Atom::EMPTY, TagCode::Text, Namespace::Html);
        assert!(!text.is_void_element());

        let mut foreign = element(TagCode::Input);
        assert!(foreign.is_void_element());
        foreign.ns = Namespace::MathMl;
        assert!(!foreign.is_void_element());
    }
}
