//! XML serialization of a subtree.

use super::node::{Document, NodeData, NodeId};

/// Serialize a node and its descendants back to XML text.
pub fn to_xml(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeData::Element {
            name,
            prefix,
            attrs,
            ..
        } => {
            let qname = match prefix {
                Some(p) => format!("{p}:{name}"),
                None => name.clone(),
            };
            out.push('<');
            out.push_str(&qname);
            for attr in attrs {
                out.push(' ');
                out.push_str(&attr.qname);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            if !doc.has_children(id) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in doc.children(id) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&qname);
            out.push('>');
        }
        NodeData::Text(text) => escape_into(text, false, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
        NodeData::EntityRef(name) => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
