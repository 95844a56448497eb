//! Itemized, ordered and variable lists, procedures and glossaries.

use crate::asciidoc::text::{break_leading_plus, is_blank_text, strip_indentation};
use crate::dom::NodeId;

use super::dispatch::{LIST_NAMES, PARA_NAMES, is_formatting};
use super::{Visitor, split_first};

/// Children that attach to a list item without a `+` continuation.
fn attaches_directly(name: &str) -> bool {
    matches!(name, "literallayout" | "itemizedlist" | "orderedlist")
}

impl Visitor<'_> {
    pub(super) fn visit_itemizedlist(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        self.append_block_title(id, "");
        if self.list_depth == 1 {
            self.out.push_blank_line();
        }
        true
    }

    pub(super) fn visit_procedure(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        self.append_block_title(id, "Procedure: ");
        self.visit_orderedlist(id)
    }

    /// `orderedlist`, `substeps` and `stepalternatives`.
    pub(super) fn visit_orderedlist(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        if let Some(numeration) = self.doc.attr(id, "numeration")
            && numeration != "arabic"
        {
            self.out.push_line(format!("[{numeration}]"));
        }
        if self.list_depth == 1 {
            self.out.push_blank_line();
        }
        true
    }

    pub(super) fn visit_variablelist(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        self.append_block_title(id, "");
        if self.out.last_is_empty() {
            self.out.pop_line();
        }
        true
    }

    fn list_marker(&self, id: NodeId) -> String {
        match self.doc.parent_name(id) {
            "orderedlist" | "procedure" | "substeps" => ".".repeat(self.list_depth),
            "stepalternatives" => "a.".to_string(),
            _ => "*".repeat(self.list_depth),
        }
    }

    /// `listitem` and `step`.
    ///
    /// Items holding only inline content are written on the marker line.
    /// Items with block children join them with `+` continuations; an item
    /// that opens with a block gets an `{empty}` principal text.
    pub(super) fn visit_listitem(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let marker = self.list_marker(id);
        self.out.push_text(&marker);

        if doc.elements(id).next().is_none() {
            self.append_item_text(id, true);
        } else if doc
            .children(id)
            .all(|c| doc.is_text(c) || is_formatting(doc.name(c)))
        {
            self.append_item_text(id, false);
        } else {
            self.append_mixed_item(id);
        }

        self.out.set_continuation(false);
        if !self.out.last_is_empty() {
            self.out.push_blank_line();
        }
        false
    }

    /// Inline item content. With `wrap` set, lines after the first become
    /// indented continuation lines; otherwise they all join the marker line.
    fn append_item_text(&mut self, id: NodeId, wrap: bool) {
        let (item_text, rest) = split_first(self.format_text(id));
        let mut first_line = true;
        for line in item_text.split('\n') {
            let line = strip_indentation(line);
            if line.is_empty() {
                continue;
            }
            if first_line {
                self.out.push_text(&format!(" {line}"));
                first_line = !wrap;
            } else {
                self.out.push_line(format!("  {line}"));
            }
        }
        if !rest.is_empty() {
            self.out.push_line("+");
            self.out.extend(rest);
        }
    }

    fn append_mixed_item(&mut self, id: NodeId) {
        let doc = self.doc;
        let mut first_line = true;
        for (i, child) in doc.children(id).enumerate() {
            if doc.is_text(child) && doc.raw_text(child).is_none_or(is_blank_text) {
                continue;
            }
            let name = doc.name(child);

            let mut local_continuation = false;
            if !(i == 0 || first_line || attaches_directly(name)) {
                self.out.push_line("+");
                self.out.set_continuation(true);
                local_continuation = true;
                first_line = true;
            }

            if PARA_NAMES.contains(&name) || doc.is_text(child) {
                let (item_text, rest) = split_first(self.format_block_text(child));
                let item_text = break_leading_plus(&item_text);
                if item_text.is_empty() && rest.is_empty() {
                    continue;
                }
                for line in item_text.split('\n') {
                    let line = strip_indentation(line);
                    if line.is_empty() {
                        continue;
                    }
                    if !first_line {
                        self.out.push_line(format!("  {line}"));
                    } else if local_continuation {
                        // The continuation flag was consumed while formatting.
                        self.out.push_line(line);
                    } else {
                        self.out.push_text(&format!(" {line}"));
                    }
                }
                if !rest.is_empty() {
                    if self.out.last() != Some("+") {
                        self.out.push_line("+");
                    }
                    self.out.extend(rest);
                }
            } else {
                if !is_formatting(name) {
                    if first_line && !local_continuation {
                        self.out.push_text(" {empty}");
                    }
                    if !(local_continuation || attaches_directly(name)) {
                        self.out.push_line("+");
                    }
                    self.out.set_continuation(false);
                }
                self.visit(child);
                self.out.set_continuation(true);
            }
            first_line = false;
        }
    }

    /// Lines of a paragraph's content, or of a bare text node.
    fn format_block_text(&mut self, id: NodeId) -> Vec<String> {
        if !self.doc.is_text(id) {
            return self.format_text(id);
        }
        self.out.push_blank_line();
        let mark = self.out.len();
        self.visit(id);
        let count = self.out.len() + 1 - mark;
        self.out.splice_back(count)
    }

    pub(super) fn visit_varlistentry(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        self.out.push_blank_line();

        if let Some(term) = doc.child(id, "term") {
            for text_line in self.format_text(term) {
                for (i, line) in text_line.split('\n').enumerate() {
                    let line = strip_indentation(line);
                    if line.is_empty() {
                        continue;
                    }
                    if i == 0 {
                        self.out.push_line(line);
                    } else {
                        self.out.push_text(&format!(" {line}"));
                    }
                }
            }
        }
        self.out.push_text("::");

        let Some(item) = doc.child(id, "listitem") else {
            return false;
        };
        let mut first_line = true;
        for (i, child) in doc.elements(item).enumerate() {
            let name = doc.name(child);
            let attached = name == "literallayout" || LIST_NAMES.contains(&name);

            let mut local_continuation = false;
            if !(i == 0 || first_line || attached) {
                self.out.push_line("+");
                self.out.push_blank_line();
                self.out.set_continuation(true);
                local_continuation = true;
            }

            if PARA_NAMES.contains(&name) {
                if i == 0 {
                    self.out.push_blank_line();
                }
                let (item_text, rest) = split_first(self.format_text(child));
                let item_text = break_leading_plus(&item_text);
                if item_text.is_empty() && rest.is_empty() {
                    continue;
                }
                for line in item_text.split('\n') {
                    let line = strip_indentation(line);
                    if line.is_empty() {
                        continue;
                    }
                    if first_line {
                        self.out.push_text(&line);
                        first_line = false;
                    } else {
                        self.out.push_line(line);
                    }
                }
                if !rest.is_empty() {
                    if self.out.last() != Some("+") {
                        self.out.push_line("+");
                    }
                    self.out.extend(rest);
                }
            } else {
                if !is_formatting(name) {
                    if !(local_continuation || attached) {
                        self.out.push_line("+");
                    }
                    self.out.set_continuation(false);
                }
                self.visit(child);
                self.out.set_continuation(true);
            }
        }
        false
    }

    pub(super) fn visit_glossentry(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        let follows_entry = self
            .doc
            .previous_element(id)
            .is_some_and(|prev| self.doc.is_named(prev, "glossentry"));
        if !follows_entry {
            self.out.push_line("[glossary]");
        }
        true
    }

    pub(super) fn visit_glossterm(&mut self, id: NodeId) -> bool {
        self.format_append_line(id, "::");
        false
    }

    pub(super) fn visit_glossdef(&mut self, id: NodeId) -> bool {
        let definition = self
            .doc
            .elements(id)
            .next()
            .map(|first| self.text(first))
            .unwrap_or_default();
        self.out.push_line(format!("  {definition}"));
        false
    }
}
