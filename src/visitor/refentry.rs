//! Manual page structure and command synopses.

use crate::asciidoc::text::trim;
use crate::dom::NodeId;

use super::Visitor;

impl Visitor<'_> {
    /// Manual page header.
    pub(super) fn visit_refmeta(&mut self, id: NodeId) -> bool {
        let entry = self.text_at(id, "refentrytitle").unwrap_or_default();
        let volume = self.text_at(id, "manvolnum").unwrap_or_default();
        let manual = self.misc_info(id, "manual");
        let source = self.misc_info(id, "source");

        self.out
            .push_line(format!("= {}({volume})", trim(&entry)));
        self.out.push_line(":doctype: manpage");
        self.out.push_line(format!(":man manual: {manual}"));
        self.out.push_line(format!(":man source: {source}"));
        self.out.push_line(":page-layout: base");
        self.out.push_blank_line();
        false
    }

    /// Text of the `refmiscinfo` with the given `class`.
    fn misc_info(&self, id: NodeId, class: &str) -> String {
        self.doc
            .descendants_named(id, "refmiscinfo")
            .into_iter()
            .find(|&info| self.doc.attr(info, "class") == Some(class))
            .map(|info| self.text(info))
            .unwrap_or_default()
    }

    pub(super) fn visit_refnamediv(&mut self, id: NodeId) -> bool {
        let name = self.text_at(id, "refname").unwrap_or_default();
        let purpose = self.text_at(id, "refpurpose").unwrap_or_default();
        self.out.push_line("== NAME");
        self.out.push_blank_line();
        self.out.push_line(format!("{name} - {purpose}"));
        self.out.push_blank_line();
        false
    }

    pub(super) fn visit_refsynopsisdiv(&mut self, _id: NodeId) -> bool {
        self.out.push_line("== SYNOPSIS");
        self.out.push_blank_line();
        true
    }

    pub(super) fn visit_cmdsynopsis(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let separator = doc.attr(id, "sepchar").unwrap_or(" ");
        self.out.push_blank_line();
        let parts: Vec<NodeId> = doc.elements(id).collect();
        if let Some((last, init)) = parts.split_last() {
            for &part in init {
                self.visit(part);
                self.out.push_text(separator);
            }
            self.visit(*last);
        }
        false
    }

    pub(super) fn visit_arg(&mut self, id: NodeId) -> bool {
        let (open, close) = match self.doc.attr(id, "choice") {
            Some("req") => ("{", "}"),
            Some("plain") => ("", ""),
            _ => ("[", "]"),
        };
        self.format_append_text(id, open, close);
        if self.doc.attr(id, "rep") == Some("repeat") {
            self.out.push_text("...");
        }
        false
    }

    /// Alternatives separated by ` | `.
    pub(super) fn visit_group(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let (open, close) = match doc.attr(id, "choice") {
            Some("req") => ("{", "}"),
            Some("opt") => ("[", "]"),
            _ => ("", ""),
        };
        self.out.push_text(open);
        let choices: Vec<NodeId> = doc.elements(id).collect();
        if let Some((last, init)) = choices.split_last() {
            for &choice in init {
                self.visit(choice);
                self.out.push_text(" | ");
            }
            self.visit(*last);
        }
        self.out.push_text(close);
        if doc.attr(id, "rep") == Some("repeat") {
            self.out.push_text("...");
        }
        false
    }

    pub(super) fn visit_sbr(&mut self) -> bool {
        self.out.push_text(" +");
        self.out.push_line("    ");
        false
    }

    pub(super) fn visit_citerefentry(&mut self, id: NodeId) -> bool {
        let entry = self.text_at(id, "refentrytitle").unwrap_or_default();
        let volume = self.text_at(id, "manvolnum").unwrap_or_default();
        self.out.push_text(&format!(
            "xref:man:{volume}/{entry}.adoc[*{entry}*({volume})]"
        ));
        false
    }
}
