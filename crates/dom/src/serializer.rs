//! HTML serializer
//!
//! Walks a subtree with [`Traverse`] (no recursion, so deep trees cannot
//! blow the stack) and writes HTML source into one growing `String`.
//!
//! - Void elements: start tag only, no `/>`
//! - Attribute values: double-quoted, `&` and `"` escaped
//! - Text: `&`, `<`, `>` escaped, except under raw-text parents such as
//!   `<script>` and `<style>` where it is written verbatim
//! - Document / DocumentFragment: children only

use crate::iter::{Edge, Traverse};
use crate::node::Node;
use crate::tree::Tree;
use crate::types::{Namespace, NodeKind};
use memchr::{memchr2, memchr3};

/// Outer HTML of `node`
pub fn to_html(node: Node<'_>) -> String {
    let mut out = String::with_capacity(estimate_capacity(node));
    write_html(node, &mut out);
    out
}

/// Append the outer HTML of `node` to `out`
pub fn write_html(node: Node<'_>, out: &mut String) {
    for edge in Traverse::new(node) {
        match edge {
            Edge::Open(node) => open(node, out),
            Edge::Close(node) => close(node, out),
        }
    }
}

/// Whole-tree serialization: doctype (if any) followed by the rest
pub fn serialize_tree(tree: &Tree) -> String {
    to_html(tree.root())
}

fn estimate_capacity(node: Node<'_>) -> usize {
    // Rough guess so the common case grows the buffer a handful of times.
    let mut bytes = 0usize;
    for n in std::iter::once(node).chain(node.descendants()) {
        bytes += n.text().len() + 2 * n.tag_name().len() + 5;
        bytes += n.attributes().map(|a| a.key().len() + a.value().len() + 4).sum::<usize>();
    }
    bytes
}

fn open(node: Node<'_>, out: &mut String) {
    match node.kind() {
        NodeKind::Element => {
            out.push('<');
            out.push_str(node.tag_name());
            for attr in node.attributes() {
                out.push(' ');
                push_attribute_prefix(attr.namespace(), attr.key(), out);
                out.push_str(attr.key());
                out.push_str("=\"");
                escape_attr(attr.value(), out);
                out.push('"');
            }
            out.push('>');
        }
        NodeKind::Text => {
            if node.parent().is_some_and(is_raw_text_container) {
                out.push_str(node.text());
            } else {
                escape_text(node.text(), out);
            }
        }
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(node.text());
            out.push_str("-->");
        }
        NodeKind::Cdata => {
            out.push_str("<![CDATA[");
            out.push_str(node.text());
            out.push_str("]]>");
        }
        NodeKind::ProcessingInstruction => {
            out.push_str("<?");
            out.push_str(node.tag_name());
            if !node.text().is_empty() {
                out.push(' ');
                out.push_str(node.text());
            }
            out.push('>');
        }
        NodeKind::DocumentType => {
            out.push_str("<!DOCTYPE");
            if let Some(name) = node.doctype_name().filter(|name| !name.is_empty()) {
                out.push(' ');
                out.push_str(name);
            }
            out.push('>');
        }
        NodeKind::Document | NodeKind::DocumentFragment => {}
    }
}

/// Text under `<script>`, `<style>` and the like is written verbatim. So is
/// top-level text of a fragment parsed in one of those contexts.
fn is_raw_text_container(parent: Node<'_>) -> bool {
    match parent.kind() {
        NodeKind::Element => {
            parent.namespace() == Namespace::Html && parent.tag_code().is_raw_text()
        }
        NodeKind::DocumentFragment => parent
            .tree()
            .fragment_context()
            .is_some_and(|ctx| ctx.namespace == Namespace::Html && ctx.tag.is_raw_text()),
        _ => false,
    }
}

fn close(node: Node<'_>, out: &mut String) {
    if node.is_element() && !node.is_void_element() {
        out.push_str("</");
        out.push_str(node.tag_name());
        out.push('>');
    }
}

/// Keys parsed from markup are stored without their prefix; keys set by hand
/// may already carry one.
fn push_attribute_prefix(ns: Namespace, key: &str, out: &mut String) {
    let prefix = match ns {
        Namespace::Xlink => "xlink:",
        Namespace::Xml => "xml:",
        Namespace::Xmlns if key != "xmlns" => "xmlns:",
        _ => return,
    };
    if !key.starts_with(prefix) {
        out.push_str(prefix);
    }
}

fn escape_text(s: &str, out: &mut String) {
    let bytes = s.as_bytes();
    let mut start = 0;
    while let Some(rel) = memchr3(b'&', b'<', b'>', &bytes[start..]) {
        let at = start + rel;
        out.push_str(&s[start..at]);
        out.push_str(match bytes[at] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        });
        start = at + 1;
    }
    out.push_str(&s[start..]);
}

fn escape_attr(s: &str, out: &mut String) {
    let bytes = s.as_bytes();
    let mut start = 0;
    while let Some(rel) = memchr2(b'&', b'"', &bytes[start..]) {
        let at = start + rel;
        out.push_str(&s[start..at]);
        out.push_str(if bytes[at] == b'&' { "&amp;" } else { "&quot;" });
        start = at + 1;
    }
    out.push_str(&s[start..]);
}

impl Tree {
    /// Full-document HTML
    pub fn serialize(&self) -> String {
        serialize_tree(self)
    }
}
