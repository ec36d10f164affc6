//! HTML5 DOM core
//!
//! An arena-backed document tree with cheap handles, query-by-criteria,
//! structural mutation and serialization.
//!
//! ## Core Design
//!
//! ```text
//! HTML text → Tokenizer → TreeBuilder → Tree ─┬─ NodeArena   (NodeId: u32)
//!                                             └─ StringArena (Atom: u32)
//!                                               ↓
//!                         Node / Attribute handles → Collection → HTML
//! ```
//!
//! - Links are ids into the pool, never owning pointers
//! - Handles are `(tree, id)` pairs; the tree is the only owner
//! - Reads share `&Tree`, writes take `&mut Tree`
//!
//! ```
//! use html_dom::{parse, TagCode};
//!
//! let mut tree = parse("<ul><li>1<li>2</ul>").unwrap();
//! assert_eq!(tree.nodes_by_tag_code(TagCode::Li).len(), 2);
//!
//! let ul = tree.nodes_by_tag_code(TagCode::Ul).ids()[0];
//! tree.node_mut(ul).unwrap().set_attribute("id", "list").unwrap();
//! assert_eq!(
//!     tree.node(ul).unwrap().html(),
//!     r#"<ul id="list"><li>1</li><li>2</li></ul>"#
//! );
//! ```

pub mod arena;
pub mod attribute;
pub mod error;
pub mod intern;
pub mod iter;
pub mod mutate;
pub mod node;
pub mod parser;
pub mod query;
pub mod serializer;
pub mod tag;
pub mod tree;
pub mod types;

pub use attribute::Attribute;
pub use error::{DomError, Result};
pub use iter::{Ancestors, Attributes, Children, Descendants, Edge, Siblings, Traverse};
pub use node::{Node, NodeMut};
pub use parser::{
    parse, parse_bytes, parse_fragment, parse_with_options, HtmlParser, ParseMode, ParseOptions,
    ParseStatus,
};
pub use query::Collection;
pub use tag::TagCode;
pub use tree::Tree;
pub use types::*;
