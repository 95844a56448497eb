//! Arena-based XML tree.
//!
//! All nodes live in one vector; parent, child and sibling links are indices
//! into it. The tree is built once by [`crate::dom::parse`] and is read-only
//! afterwards.

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn to_option(self) -> Option<NodeId> {
        self.is_some().then_some(self)
    }
}

/// Kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    EntityRef,
}

/// XML attribute as written in the source.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Qualified name, e.g. `xlink:href`.
    pub qname: String,
    /// Local part of the name, e.g. `href`.
    pub local: String,
    /// Resolved namespace URI of a prefixed attribute.
    pub namespace: Option<String>,
    /// Unescaped value.
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        /// Local name.
        name: String,
        /// Prefix as written, if any.
        prefix: Option<String>,
        /// Resolved namespace URI.
        namespace: Option<String>,
        attrs: Vec<Attribute>,
    },
    /// Character data, including CDATA sections and resolved character
    /// references.
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
    /// Reference to an entity the parser could not resolve, e.g. `&rarr;`.
    EntityRef(String),
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
            NodeData::EntityRef(_) => NodeKind::EntityRef,
        }
    }
}

/// Parsed XML document.
pub struct Document {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Document {
    /// Create an empty document holding only the document node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        doc.document = doc.alloc(Node::new(NodeData::Document));
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The document node (parent of the root element).
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The root element, if the document has one.
    pub fn root(&self) -> Option<NodeId> {
        self.elements(self.document).next()
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.root() == Some(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn create_element(
        &mut self,
        name: String,
        prefix: Option<String>,
        namespace: Option<String>,
        attrs: Vec<Attribute>,
    ) -> NodeId {
        self.alloc(Node::new(NodeData::Element {
            name,
            prefix,
            namespace,
            attrs,
        }))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_pi(&mut self, target: String, data: String) -> NodeId {
        self.alloc(Node::new(NodeData::ProcessingInstruction { target, data }))
    }

    pub fn create_entity_ref(&mut self, name: String) -> NodeId {
        self.alloc(Node::new(NodeData::EntityRef(name)))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Append text to the last child if it is a text node, otherwise create
    /// a new text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.alloc(Node::new(NodeData::Text(text.to_string())));
        self.append(parent, text_node);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Element)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Text)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Previous sibling of any kind.
    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Next sibling of any kind.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn previous_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.previous(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.previous(sibling);
        }
        None
    }

    pub fn next_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.next(sibling);
        }
        None
    }

    /// Iterate over all children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            doc: self,
            current: first,
        }
    }

    /// Iterate over element children only.
    pub fn elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&id| self.is_element(id))
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.first_child.is_some())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    /// Name of a node: the local name of an element, the target of a
    /// processing instruction, the entity name of an entity reference, and
    /// `text`, `comment` or `document` otherwise.
    pub fn name(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => name,
            Some(NodeData::ProcessingInstruction { target, .. }) => target,
            Some(NodeData::EntityRef(name)) => name,
            Some(NodeData::Text(_)) => "text",
            Some(NodeData::Comment(_)) => "comment",
            Some(NodeData::Document) | None => "document",
        }
    }

    /// Whether the node is an element with the given local name.
    pub fn is_named(&self, id: NodeId, name: &str) -> bool {
        self.is_element(id) && self.name(id) == name
    }

    pub fn parent_name(&self, id: NodeId) -> &str {
        self.parent(id).map(|p| self.name(p)).unwrap_or("")
    }

    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { namespace, .. } => namespace.as_deref(),
            _ => None,
        })
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    /// Look up an attribute. A qualified name (`xml:id`) matches the name as
    /// written; a bare name matches the local name in any namespace.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        let qualified = name.contains(':');
        self.attributes(id)
            .iter()
            .find(|a| {
                if qualified {
                    a.qname == name
                } else {
                    a.local == name && !a.qname.starts_with("xmlns")
                }
            })
            .map(|a| a.value.as_str())
    }

    /// Look up an attribute by local name and namespace URI.
    pub fn attr_ns(&self, id: NodeId, local: &str, namespace: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.local == local && a.namespace.as_deref() == Some(namespace))
            .map(|a| a.value.as_str())
    }

    /// Character data of a text node, target data of a processing
    /// instruction, or the body of a comment.
    pub fn raw_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) | NodeData::Comment(s) => Some(s.as_str()),
            NodeData::ProcessingInstruction { data, .. } => Some(data.as_str()),
            _ => None,
        })
    }

    /// Concatenated character data of a node and all its descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(s)) => out.push_str(s),
            Some(NodeData::Element { .. }) | Some(NodeData::Document) => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First child element with the given name.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.elements(id).find(|&c| self.name(c) == name)
    }

    /// Follow a path of child element names (`tgroup`, `thead`, `row`).
    pub fn child_path(&self, id: NodeId, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(id, |current, name| self.child(current, name))
    }

    /// All nodes matching a path of child element names.
    pub fn children_path(&self, id: NodeId, path: &[&str]) -> Vec<NodeId> {
        let mut current = vec![id];
        for &name in path {
            current = current
                .into_iter()
                .flat_map(|c| self.elements(c).filter(move |&e| self.name(e) == name))
                .collect();
        }
        current
    }

    /// Descendants of a node in document order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> DescendantsIter<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        DescendantsIter { doc: self, stack }
    }

    /// First descendant element with the given name.
    pub fn descendant(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id).find(|&d| self.is_named(d, name))
    }

    /// All descendant elements with the given name, in document order.
    pub fn descendants_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&d| self.is_named(d, name))
            .collect()
    }

    /// First `inner` descendant that has an `outer` ancestor below `id`.
    pub fn descendant_within(&self, id: NodeId, outer: &str, inner: &str) -> Option<NodeId> {
        self.descendants(id).find(|&d| {
            if !self.is_named(d, inner) {
                return false;
            }
            let mut ancestor = self.parent(d);
            while let Some(a) = ancestor {
                if a == id {
                    return false;
                }
                if self.is_named(a, outer) {
                    return true;
                }
                ancestor = self.parent(a);
            }
            false
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .doc
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over descendants.
pub struct DescendantsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mut children: Vec<_> = self.doc.children(id).collect();
        children.reverse();
        self.stack.extend(children);
        Some(id)
    }
}
