//! Mutator: every structural change to a [`Tree`] goes through here
//!
//! Each operation validates first and writes link fields second, so a
//! failure has no structural effect. When linking, sibling links are
//! written before the parent's first/last pointers and the child's parent
//! pointer is written last.

use crate::arena::{AttrData, NodeData};
use crate::error::{DomError, Result};
use crate::node::Node;
use crate::tag::TagCode;
use crate::tree::Tree;
use crate::types::{AttrId, Atom, Namespace, NodeId, NodeKind};

impl Tree {
    // ---- factories ---------------------------------------------------------

    /// New detached HTML element; the tag code is looked up from `name`
    pub fn create_element(&mut self, name: &str) -> Result<NodeId> {
        self.create_element_ns(name, Namespace::Html)
    }

    pub fn create_element_ns(&mut self, name: &str, ns: Namespace) -> Result<NodeId> {
        let tag = self.strings.intern(name)?;
        let code = TagCode::from_name(name);
        self.arena
            .alloc(NodeData::new(NodeKind::Element, tag, code, ns))
    }

    pub fn create_text(&mut self, text: &str) -> Result<NodeId> {
        self.create_character_node(NodeKind::Text, TagCode::Text, Atom::EMPTY, text)
    }

    pub fn create_comment(&mut self, text: &str) -> Result<NodeId> {
        self.create_character_node(NodeKind::Comment, TagCode::Comment, Atom::EMPTY, text)
    }

    pub fn create_cdata(&mut self, text: &str) -> Result<NodeId> {
        self.create_character_node(NodeKind::Cdata, TagCode::Cdata, Atom::EMPTY, text)
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> Result<NodeId> {
        let target = self.strings.intern(target)?;
        self.create_character_node(
            NodeKind::ProcessingInstruction,
            TagCode::ProcessingInstruction,
            target,
            data,
        )
    }

    pub fn create_doctype(&mut self, name: &str) -> Result<NodeId> {
        self.create_character_node(NodeKind::DocumentType, TagCode::Doctype, Atom::EMPTY, name)
    }

    fn create_character_node(
        &mut self,
        kind: NodeKind,
        code: TagCode,
        tag: Atom,
        text: &str,
    ) -> Result<NodeId> {
        let mut payload = String::new();
        payload.try_reserve(text.len())?;
        payload.push_str(text);
        self.arena
            .alloc(NodeData::new(kind, tag, code, Namespace::Html).with_text(payload))
    }

    // ---- structure ---------------------------------------------------------

    /// Link `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.detach(child);

        let prev = self.arena.node(parent).last_child;
        {
            let node = self.arena.node_mut(child);
            node.prev_sibling = prev;
            node.next_sibling = None;
        }
        match prev {
            Some(prev) => self.arena.node_mut(prev).next_sibling = Some(child),
            None => self.arena.node_mut(parent).first_child = Some(child),
        }
        self.arena.node_mut(parent).last_child = Some(child);
        self.arena.node_mut(child).parent = Some(parent);

        self.invalidate_lookups();
        Ok(())
    }

    /// Link `new` as the previous sibling of `anchor`
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) -> Result<()> {
        let parent = self.anchor_parent(anchor, new)?;
        if anchor == new {
            return Ok(());
        }
        self.detach(new);

        let prev = self.arena.node(anchor).prev_sibling;
        {
            let node = self.arena.node_mut(new);
            node.prev_sibling = prev;
            node.next_sibling = Some(anchor);
        }
        self.arena.node_mut(anchor).prev_sibling = Some(new);
        match prev {
            Some(prev) => self.arena.node_mut(prev).next_sibling = Some(new),
            None => self.arena.node_mut(parent).first_child = Some(new),
        }
        self.arena.node_mut(new).parent = Some(parent);

        self.invalidate_lookups();
        Ok(())
    }

    /// Link `new` as the next sibling of `anchor`
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) -> Result<()> {
        let parent = self.anchor_parent(anchor, new)?;
        if anchor == new {
            return Ok(());
        }
        self.detach(new);

        let next = self.arena.node(anchor).next_sibling;
        {
            let node = self.arena.node_mut(new);
            node.prev_sibling = Some(anchor);
            node.next_sibling = next;
        }
        self.arena.node_mut(anchor).next_sibling = Some(new);
        match next {
            Some(next) => self.arena.node_mut(next).prev_sibling = Some(new),
            None => self.arena.node_mut(parent).last_child = Some(new),
        }
        self.arena.node_mut(new).parent = Some(parent);

        self.invalidate_lookups();
        Ok(())
    }

    /// Unlink `node`; it and its subtree stay alive, detached
    ///
    /// Calling this on a detached node is a no-op.
    pub fn remove_from_parent(&mut self, node: NodeId) -> Result<()> {
        self.arena.get(node)?;
        if self.detach(node) {
            self.invalidate_lookups();
        }
        Ok(())
    }

    /// Detach `node` and tombstone it with its whole subtree
    ///
    /// Ids of destroyed nodes are never handed out again;
    /// [`Tree::node`] returns `None` for them.
    pub fn destroy(&mut self, node: NodeId) -> Result<()> {
        let kind = self.arena.get(node)?.kind;
        if node == self.root_id() {
            return Err(DomError::InvalidNodeType {
                expected: "non-root node".to_string(),
                actual: kind.to_string(),
            });
        }
        self.detach(node);

        let doomed: Vec<NodeId> = std::iter::once(node)
            .chain(self.handle(node).descendants().map(|n| n.id()))
            .collect();
        tracing::trace!("[Mutator] destroying {} nodes under {}", doomed.len(), node);
        for id in doomed {
            self.arena.tombstone(id);
        }

        self.invalidate_lookups();
        Ok(())
    }

    fn handle(&self, node: NodeId) -> Node<'_> {
        Node::new(self, node)
    }

    /// Unlink from the parent's child chain; returns whether it was attached
    fn detach(&mut self, node: NodeId) -> bool {
        let (parent, prev, next) = {
            let data = self.arena.node(node);
            match data.parent {
                Some(parent) => (parent, data.prev_sibling, data.next_sibling),
                None => return false,
            }
        };

        match prev {
            Some(prev) => self.arena.node_mut(prev).next_sibling = next,
            None => self.arena.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.arena.node_mut(next).prev_sibling = prev,
            None => self.arena.node_mut(parent).last_child = prev,
        }

        let data = self.arena.node_mut(node);
        data.prev_sibling = None;
        data.next_sibling = None;
        data.parent = None;
        true
    }

    fn anchor_parent(&self, anchor: NodeId, new: NodeId) -> Result<NodeId> {
        let parent = match self.arena.get(anchor)?.parent {
            Some(parent) => parent,
            None => {
                tracing::debug!("[Mutator] rejected insertion next to detached {}", anchor);
                return Err(DomError::NoParent(anchor));
            }
        };
        self.check_insertion(parent, new)?;
        Ok(parent)
    }

    fn check_parent(&self, parent: NodeId) -> Result<()> {
        let data = self.arena.get(parent)?;
        if data.is_void_element() {
            tracing::debug!("[Mutator] rejected child of void element {}", parent);
            return Err(DomError::VoidElementChild(parent));
        }
        if !data.kind.is_container() {
            tracing::debug!("[Mutator] rejected child of {} node {}", data.kind, parent);
            return Err(DomError::InvalidNodeType {
                expected: "Element, Document or DocumentFragment".to_string(),
                actual: data.kind.to_string(),
            });
        }
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_parent(parent)?;
        let child_data = self.arena.get(child)?;

        if matches!(
            child_data.kind,
            NodeKind::Document | NodeKind::DocumentFragment
        ) {
            tracing::debug!("[Mutator] rejected moving root {} under {}", child, parent);
            return Err(DomError::InvalidNodeType {
                expected: "non-root node".to_string(),
                actual: child_data.kind.to_string(),
            });
        }
        // A leaf can only be on the parent chain as the parent itself.
        let cycle = match child_data.first_child {
            None => child == parent,
            Some(_) => self.is_inclusive_ancestor(child, parent),
        };
        if cycle {
            tracing::debug!("[Mutator] rejected {} under {}: would form a cycle", child, parent);
            return Err(DomError::CycleViolation { parent, child });
        }
        Ok(())
    }

    /// True when `ancestor` is `node` or lies on its parent chain
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.arena.node(id).parent;
        }
        false
    }

    /// Overwrite the namespace tag; no structural effect
    pub fn set_namespace(&mut self, node: NodeId, ns: Namespace) -> Result<()> {
        self.arena.get_mut(node)?.ns = ns;
        self.invalidate_lookups();
        Ok(())
    }

    // ---- character data ----------------------------------------------------

    /// Replace the payload of a Text/Comment/CDATA/PI node or a doctype name
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        let data = self.arena.get_mut(node)?;
        if !data.kind.has_text() && data.kind != NodeKind::DocumentType {
            return Err(DomError::InvalidNodeType {
                expected: "character data node".to_string(),
                actual: data.kind.to_string(),
            });
        }
        let mut payload = String::new();
        payload.try_reserve(text.len())?;
        payload.push_str(text);
        data.text = payload;
        Ok(())
    }

    /// Append text under `parent`, merging into a trailing Text child
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.check_parent(parent)?;
        let last = self.arena.node(parent).last_child;
        if let Some(last) = last {
            let data = self.arena.node_mut(last);
            if data.kind == NodeKind::Text {
                data.text.try_reserve(text.len())?;
                data.text.push_str(text);
                return Ok(last);
            }
        }

        let node = self.create_text(text)?;
        self.append_child(parent, node)?;
        Ok(node)
    }

    // ---- attributes --------------------------------------------------------

    /// Append an attribute; duplicates are allowed
    pub fn add_attribute(
        &mut self,
        element: NodeId,
        key: &str,
        value: &str,
        ns: Namespace,
    ) -> Result<AttrId> {
        self.require_element(element)?;
        let key = self.strings.intern(key)?;
        let mut owned = String::new();
        owned.try_reserve(value.len())?;
        owned.push_str(value);

        let prev = self.arena.node(element).last_attr;
        let attr = self.arena.alloc_attr(AttrData {
            owner: element,
            key,
            value: owned,
            ns,
            prev,
            next: None,
            alive: true,
        })?;

        match prev {
            Some(prev) => self.arena.attr_mut(prev).next = Some(attr),
            None => self.arena.node_mut(element).first_attr = Some(attr),
        }
        self.arena.node_mut(element).last_attr = Some(attr);
        Ok(attr)
    }

    /// Replace the value of the first attribute named `key`, else append
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        key: &str,
        value: &str,
        ns: Namespace,
    ) -> Result<AttrId> {
        self.require_element(element)?;
        match self.handle(element).find_attribute(key) {
            Some(attr) => {
                let mut owned = String::new();
                owned.try_reserve(value.len())?;
                owned.push_str(value);
                let data = self.arena.attr_mut(attr);
                data.value = owned;
                data.ns = ns;
                Ok(attr)
            }
            None => self.add_attribute(element, key, value, ns),
        }
    }

    /// Remove the first attribute named `key`; returns whether one existed
    pub fn remove_attribute_by_key(&mut self, element: NodeId, key: &str) -> Result<bool> {
        self.require_element(element)?;
        let Some(attr) = self.handle(element).find_attribute(key) else {
            return Ok(false);
        };

        let (prev, next) = {
            let data = self.arena.attr(attr);
            (data.prev, data.next)
        };
        match prev {
            Some(prev) => self.arena.attr_mut(prev).next = next,
            None => self.arena.node_mut(element).first_attr = next,
        }
        match next {
            Some(next) => self.arena.attr_mut(next).prev = prev,
            None => self.arena.node_mut(element).last_attr = prev,
        }

        let data = self.arena.attr_mut(attr);
        data.prev = None;
        data.next = None;
        data.alive = false;
        Ok(true)
    }

    fn require_element(&self, node: NodeId) -> Result<()> {
        let kind = self.arena.get(node)?.kind;
        if kind != NodeKind::Element {
            return Err(DomError::InvalidNodeType {
                expected: NodeKind::Element.to_string(),
                actual: kind.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tree: &mut Tree, items: usize) -> (NodeId, Vec<NodeId>) {
        let root = tree.root_id();
        let ul = tree.create_element("ul").unwrap();
        tree.append_child(root, ul).unwrap();
        let lis = (0..items)
            .map(|i| {
                let li = tree.create_element("li").unwrap();
                tree.append_child(ul, li).unwrap();
                tree.append_text(li, &i.to_string()).unwrap();
                li
            })
            .collect();
        (ul, lis)
    }

    fn texts(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.node(parent)
            .unwrap()
            .children()
            .map(|n| n.inner_text())
            .collect()
    }

    #[test]
    fn test_append_moves_existing_child() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 3);

        tree.append_child(ul, lis[0]).unwrap();
        assert_eq!(texts(&tree, ul), vec!["1", "2", "0"]);
        assert_eq!(tree.node(ul).unwrap().first_child().unwrap().id(), lis[1]);
        assert_eq!(tree.node(ul).unwrap().last_child().unwrap().id(), lis[0]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 2);

        let first = tree.create_element("li").unwrap();
        tree.append_text(first, "a").unwrap();
        tree.insert_before(lis[0], first).unwrap();

        let last = tree.create_element("li").unwrap();
        tree.append_text(last, "z").unwrap();
        tree.insert_after(lis[1], last).unwrap();

        let middle = tree.create_element("li").unwrap();
        tree.append_text(middle, "m").unwrap();
        tree.insert_after(lis[0], middle).unwrap();

        assert_eq!(texts(&tree, ul), vec!["a", "0", "m", "1", "z"]);
        let reversed: Vec<_> = tree
            .node(ul)
            .unwrap()
            .children()
            .rev()
            .map(|n| n.inner_text())
            .collect();
        assert_eq!(reversed, vec!["z", "1", "m", "0", "a"]);
    }

    #[test]
    fn test_insert_next_to_self_is_noop() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 2);
        tree.insert_before(lis[1], lis[1]).unwrap();
        tree.insert_after(lis[0], lis[0]).unwrap();
        assert_eq!(texts(&tree, ul), vec!["0", "1"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 1);

        assert!(matches!(
            tree.append_child(lis[0], ul),
            Err(DomError::CycleViolation { .. })
        ));
        assert!(matches!(
            tree.append_child(ul, ul),
            Err(DomError::CycleViolation { .. })
        ));
        let inner = tree.node(lis[0]).unwrap().first_child().unwrap().id();
        assert!(matches!(
            tree.insert_before(inner, ul),
            Err(DomError::CycleViolation { .. })
        ));
        // nothing moved
        assert_eq!(texts(&tree, ul), vec!["0"]);
        assert_eq!(tree.node(ul).unwrap().parent().unwrap().id(), tree.root_id());
    }

    #[test]
    fn test_anchor_without_parent() {
        let mut tree = Tree::new_document();
        let a = tree.create_element("div").unwrap();
        let b = tree.create_element("div").unwrap();
        assert!(matches!(tree.insert_before(a, b), Err(DomError::NoParent(id)) if id == a));
        assert!(matches!(tree.insert_after(a, b), Err(DomError::NoParent(_))));
        let root = tree.root_id();
        assert!(matches!(tree.insert_after(root, b), Err(DomError::NoParent(_))));
    }

    #[test]
    fn test_void_and_leaf_parents_are_rejected() {
        let mut tree = Tree::new_document();
        let img = tree.create_element("img").unwrap();
        let text = tree.create_text("t").unwrap();
        let span = tree.create_element("span").unwrap();

        assert!(matches!(
            tree.append_child(img, span),
            Err(DomError::VoidElementChild(id)) if id == img
        ));
        assert!(matches!(
            tree.append_child(text, span),
            Err(DomError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            tree.append_text(img, "x"),
            Err(DomError::VoidElementChild(_))
        ));
    }

    #[test]
    fn test_root_cannot_move() {
        let mut tree = Tree::new_document();
        let div = tree.create_element("div").unwrap();
        let root = tree.root_id();
        assert!(matches!(
            tree.append_child(div, root),
            Err(DomError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            tree.destroy(root),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 3);

        tree.remove_from_parent(lis[1]).unwrap();
        tree.remove_from_parent(lis[1]).unwrap();

        assert!(tree.node(lis[1]).unwrap().parent().is_none());
        assert!(tree.node(lis[1]).unwrap().next_sibling().is_none());
        assert_eq!(texts(&tree, ul), vec!["0", "2"]);
        // the detached subtree is intact
        assert_eq!(tree.node(lis[1]).unwrap().inner_text(), "1");
    }

    #[test]
    fn test_destroy_tombstones_subtree() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let (ul, lis) = list(&mut tree, 2);
        let before = tree.len();

        tree.destroy(ul).unwrap();
        assert!(tree.node(ul).is_none());
        assert!(tree.node(lis[0]).is_none());
        assert_eq!(tree.len(), before - 5);
        assert!(tree.root().first_child().is_none());
        assert!(matches!(
            tree.append_child(tree.root_id(), ul),
            Err(DomError::NodeNotFound(_))
        ));

        let fresh = tree.create_element("p").unwrap();
        assert!(fresh > lis[1]);
    }

    #[test]
    fn test_append_text_coalesces() {
        let mut tree = Tree::new_fragment(TagCode::Div, Namespace::Html);
        let root = tree.root_id();
        let a = tree.append_text(root, "ab").unwrap();
        let b = tree.append_text(root, "cd").unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.root().children().count(), 1);
        assert_eq!(tree.root().inner_text(), "abcd");
    }

    #[test]
    fn test_attribute_list_operations() {
        let mut tree = Tree::new_document();
        let a = tree.create_element("a").unwrap();
        tree.add_attribute(a, "href", "/x", Namespace::Html).unwrap();
        tree.add_attribute(a, "class", "y", Namespace::Html).unwrap();
        tree.add_attribute(a, "href", "/dup", Namespace::Html).unwrap();

        tree.set_attribute(a, "href", "/z", Namespace::Html).unwrap();
        let pairs: Vec<_> = tree.node(a).unwrap().attributes().map(|x| x.pair()).collect();
        assert_eq!(pairs, vec![("href", "/z"), ("class", "y"), ("href", "/dup")]);

        assert!(tree.remove_attribute_by_key(a, "href").unwrap());
        assert_eq!(tree.node(a).unwrap().attribute("href"), Some("/dup"));
        assert!(tree.remove_attribute_by_key(a, "href").unwrap());
        assert!(!tree.remove_attribute_by_key(a, "href").unwrap());
        assert!(!tree.remove_attribute_by_key(a, "never-seen").unwrap());

        let node = tree.node(a).unwrap();
        assert_eq!(node.first_attribute(), node.last_attribute());
        assert_eq!(node.attributes().count(), 1);
    }

    #[test]
    fn test_attributes_only_on_elements() {
        let mut tree = Tree::new_document();
        let text = tree.create_text("t").unwrap();
        assert!(matches!(
            tree.add_attribute(text, "k", "v", Namespace::Html),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_set_namespace_and_text() {
        let mut tree = Tree::new_document();
        let el = tree.create_element("circle").unwrap();
        tree.set_namespace(el, Namespace::Svg).unwrap();
        assert_eq!(tree.node(el).unwrap().namespace(), Namespace::Svg);

        let comment = tree.create_comment("old").unwrap();
        tree.set_text(comment, "new").unwrap();
        assert_eq!(tree.node(comment).unwrap().text(), "new");
        assert!(matches!(
            tree.set_text(el, "x"),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_factories() {
        let mut tree = Tree::new_document();
        let pi = tree.create_processing_instruction("xml-stylesheet", "href=a").unwrap();
        let cdata = tree.create_cdata("x<y").unwrap();
        let doctype = tree.create_doctype("html").unwrap();
        let custom = tree.create_element("my-widget").unwrap();

        assert_eq!(tree.node(pi).unwrap().tag_name(), "xml-stylesheet");
        assert_eq!(tree.node(pi).unwrap().text(), "href=a");
        assert_eq!(tree.node(cdata).unwrap().kind(), NodeKind::Cdata);
        assert_eq!(tree.node(doctype).unwrap().doctype_name(), Some("html"));
        assert_eq!(tree.node(custom).unwrap().tag_code(), TagCode::Undefined);
        assert_eq!(tree.node(custom).unwrap().tag_name(), "my-widget");
    }
}
