//! Minimal XML tree for DocBook sources.
//!
//! The converter walks a read-only arena tree: [`parse`] builds it from
//! quick-xml events and [`to_xml`] writes a subtree back out for elements
//! the converter does not handle.

mod node;
mod parse;
mod serialize;

pub use node::{Attribute, ChildrenIter, DescendantsIter, Document, Node, NodeData, NodeId, NodeKind};
pub use parse::{XML_NS, parse};
pub use serialize::to_xml;

/// DocBook 5 namespace.
pub const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";

/// XLink namespace used for `xlink:href` on DocBook 5 links.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
