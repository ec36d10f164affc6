//! Core type definitions shared by the pool, the handles and the parser
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Links are ids into the pool, never owning pointers
//! 3. Ids are never reused within one tree

use crate::tag::TagCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier (index into the node pool)
///
/// Stable for the lifetime of the owning tree. Ids are not portable across
/// trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute identifier (index into the attribute table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct AttrId(pub(crate) u32);

impl AttrId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned string handle (index into the string arena)
///
/// Two atoms from the same arena are equal iff they name the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Atom(pub(crate) u32);

impl Atom {
    /// The empty string, always interned first
    pub const EMPTY: Atom = Atom(0);
}

/// Node kind matching the DOM node types the core models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeKind {
    Element = 1,
    Text = 3,
    Cdata = 4,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

impl NodeKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeKind::Element),
            3 => Some(NodeKind::Text),
            4 => Some(NodeKind::Cdata),
            7 => Some(NodeKind::ProcessingInstruction),
            8 => Some(NodeKind::Comment),
            9 => Some(NodeKind::Document),
            10 => Some(NodeKind::DocumentType),
            11 => Some(NodeKind::DocumentFragment),
            _ => None,
        }
    }

    /// Kinds that carry a character payload
    pub fn has_text(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::Comment | NodeKind::Cdata | NodeKind::ProcessingInstruction
        )
    }

    /// Kinds that may have children
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Element | NodeKind::Document | NodeKind::DocumentFragment
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Element => "Element",
            NodeKind::Text => "Text",
            NodeKind::Cdata => "CDATA",
            NodeKind::ProcessingInstruction => "ProcessingInstruction",
            NodeKind::Comment => "Comment",
            NodeKind::Document => "Document",
            NodeKind::DocumentType => "DocumentType",
            NodeKind::DocumentFragment => "DocumentFragment",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of namespaces the core recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Html,
    MathMl,
    Svg,
    Xlink,
    Xml,
    Xmlns,
}

impl Namespace {
    pub fn url(self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::Xlink => "http://www.w3.org/1999/xlink",
            Namespace::Xml => "http://www.w3.org/XML/1998/namespace",
            Namespace::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        [
            Namespace::Html,
            Namespace::MathMl,
            Namespace::Svg,
            Namespace::Xlink,
            Namespace::Xml,
            Namespace::Xmlns,
        ]
        .into_iter()
        .find(|ns| ns.url() == url)
    }

    /// Elements in these namespaces follow XML-ish rules inside HTML
    pub fn is_foreign(self) -> bool {
        matches!(self, Namespace::Svg | Namespace::MathMl)
    }
}

/// Element context a fragment was parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentContext {
    pub tag: TagCode,
    #[serde(default)]
    pub namespace: Namespace,
}

impl FragmentContext {
    pub fn new(tag: TagCode, namespace: Namespace) -> Self {
        Self { tag, namespace }
    }
}
