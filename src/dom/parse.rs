//! Tree builder driven by quick-xml events.
//!
//! The builder is tolerant of mismatched end tags: an end tag closes back to
//! the nearest open element with the same name, stray end tags are ignored,
//! and elements still open at end of input are closed implicitly. Syntax
//! errors reported by quick-xml are fatal.

use quick_xml::Reader;
use quick_xml::escape::{EscapeError, resolve_xml_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

use super::node::{Attribute, Document, NodeId};

/// Namespace bound to the `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse XML text into a [`Document`].
///
/// Returns [`Error::NoRoot`] when the input contains no element.
pub fn parse(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;

    let mut builder = TreeBuilder::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                builder.open(&e, false);
            }
            Ok(Event::Empty(e)) => {
                builder.open(&e, true);
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                builder.close(&String::from_utf8_lossy(name.as_ref()));
            }
            Ok(Event::Text(e)) => {
                builder.text(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                builder.text(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Ok(Some(c)) = e.resolve_char_ref() {
                    builder.text(c.encode_utf8(&mut [0; 4]));
                } else if let Some(resolved) = resolve_xml_entity(&entity) {
                    builder.text(resolved);
                } else {
                    builder.entity_ref(entity.into_owned());
                }
            }
            Ok(Event::Comment(e)) => {
                builder.comment(String::from_utf8_lossy(e.as_ref()).into_owned());
            }
            Ok(Event::PI(e)) => {
                let target = String::from_utf8_lossy(e.target()).into_owned();
                let data = String::from_utf8_lossy(e.content()).trim().to_string();
                builder.pi(target, data);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    let doc = builder.finish();
    if doc.root().is_none() {
        return Err(Error::NoRoot);
    }
    Ok(doc)
}

/// An element on the open stack together with the namespace bindings it
/// declared.
struct OpenElement {
    id: NodeId,
    qname: String,
    bindings: Vec<(Option<String>, String)>,
}

struct TreeBuilder {
    doc: Document,
    open: Vec<OpenElement>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            open: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open
            .last()
            .map(|e| e.id)
            .unwrap_or_else(|| self.doc.document())
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NS.to_string());
        }
        self.open
            .iter()
            .rev()
            .flat_map(|e| e.bindings.iter())
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.clone())
            .filter(|uri| !uri.is_empty())
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let (prefix, local) = split_qname(&qname);

        let mut raw_attrs = Vec::new();
        let mut bindings = Vec::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = unescape(&String::from_utf8_lossy(&attr.value));
            if key == "xmlns" {
                bindings.push((None, value.clone()));
            } else if let Some(p) = key.strip_prefix("xmlns:") {
                bindings.push((Some(p.to_string()), value.clone()));
            }
            raw_attrs.push((key, value));
        }

        // Bindings declared on this element apply to its own name.
        self.open.push(OpenElement {
            id: NodeId::NONE,
            qname: qname.clone(),
            bindings,
        });
        let namespace = self.lookup(prefix);
        let attrs = raw_attrs
            .into_iter()
            .map(|(key, value)| {
                let (attr_prefix, attr_local) = split_qname(&key);
                let namespace = match attr_prefix {
                    Some("xmlns") | None => None,
                    Some(p) => self.lookup(Some(p)),
                };
                Attribute {
                    local: attr_local.to_string(),
                    qname: key.clone(),
                    namespace,
                    value,
                }
            })
            .collect();
        let pending = self.open.pop();

        let parent = self.current();
        let id = self.doc.create_element(
            local.to_string(),
            prefix.map(str::to_string),
            namespace,
            attrs,
        );
        self.doc.append(parent, id);

        if !empty && let Some(mut element) = pending {
            element.id = id;
            self.open.push(element);
        }
    }

    fn close(&mut self, qname: &str) {
        if let Some(pos) = self.open.iter().rposition(|e| e.qname == qname) {
            self.open.truncate(pos);
        }
    }

    fn text(&mut self, text: &str) {
        // Character data outside the root element is not part of the tree.
        if self.open.is_empty() {
            return;
        }
        let parent = self.current();
        self.doc.append_text(parent, text);
    }

    fn entity_ref(&mut self, name: String) {
        if self.open.is_empty() {
            return;
        }
        let parent = self.current();
        let id = self.doc.create_entity_ref(name);
        self.doc.append(parent, id);
    }

    fn comment(&mut self, text: String) {
        let parent = self.current();
        let id = self.doc.create_comment(text);
        self.doc.append(parent, id);
    }

    fn pi(&mut self, target: String, data: String) {
        let parent = self.current();
        let id = self.doc.create_pi(target, data);
        self.doc.append(parent, id);
    }

    fn finish(self) -> Document {
        self.doc
    }
}

/// Split `prefix:local` into its parts.
fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Unescape an attribute value. Predefined entities and character
/// references are resolved; anything else stays as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    loop {
        let (verbatim, resume) = match unescape_with(rest, resolve_xml_entity) {
            Ok(value) => {
                out.push_str(&value);
                return out;
            }
            // The range covers the name between `&` and `;`.
            Err(EscapeError::UnrecognizedEntity(range, _)) => (range.start - 1, range.end + 1),
            // The range starts at the lone `&`.
            Err(EscapeError::UnterminatedEntity(range)) => (range.start, range.start + 1),
            Err(EscapeError::InvalidCharRef(_)) => {
                out.push_str(rest);
                return out;
            }
        };
        let head = &rest[..verbatim];
        match unescape_with(head, resolve_xml_entity) {
            Ok(value) => out.push_str(&value),
            Err(_) => out.push_str(head),
        }
        out.push_str(&rest[verbatim..resume]);
        rest = &rest[resume..];
    }
}
