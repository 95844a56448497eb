//! DocBook tree walker.
//!
//! [`Visitor`] walks the parsed tree depth first and writes AsciiDoc into a
//! [`LineBuffer`]. Each node is classified into a [`Handler`]; the handler
//! writes its markup and reports whether its children should be visited
//! automatically. Inline handlers extend the last output line, block
//! handlers push new lines.
//!
//! All traversal state lives on the visitor, so one visitor serves exactly
//! one conversion. Included documents get a visitor of their own.

mod blocks;
mod dispatch;
mod inline;
mod lists;
mod refentry;
mod sections;
mod tables;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::asciidoc::text::{trim, unwrap_text};
use crate::asciidoc::{LineBuffer, generate_id, normalize_id, reverse_subs};
use crate::dom::{Document, NodeId, NodeKind, to_xml};
use crate::options::ConversionOptions;

pub use dispatch::{Handler, classify};

/// Converts one parsed DocBook document to AsciiDoc lines.
pub struct Visitor<'a> {
    doc: &'a Document,
    opts: &'a ConversionOptions,
    out: LineBuffer,
    /// Heading level of the next section title.
    level: usize,
    list_depth: usize,
    in_table: bool,
    /// Markers of the inline formatting spans currently open.
    nested_formatting: Vec<char>,
    /// Set after a list or table so the next text starts on a fresh line.
    last_added_was_special: bool,
    requires_index: bool,
    /// Index terms still to skip after a multi-level entry.
    index_skip: Option<usize>,
    /// Nodes already rendered by an ancestor's handler.
    consumed: HashSet<NodeId>,
    /// Directory relative to which includes are resolved.
    base_dir: Option<PathBuf>,
    /// Canonical paths of the files whose conversion encloses this one.
    open_files: HashSet<PathBuf>,
}

impl<'a> Visitor<'a> {
    pub fn new(doc: &'a Document, opts: &'a ConversionOptions) -> Self {
        Self {
            doc,
            opts,
            out: LineBuffer::new(),
            level: 1,
            list_depth: 0,
            in_table: false,
            nested_formatting: Vec::new(),
            last_added_was_special: false,
            requires_index: false,
            index_skip: None,
            consumed: HashSet::new(),
            base_dir: None,
            open_files: HashSet::new(),
        }
    }

    /// Resolve includes relative to `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Mark the document as read from `path`: includes resolve next to it
    /// and may not include it again.
    pub fn with_source_file(mut self, path: &Path) -> Self {
        if let Some(dir) = path.parent() {
            self.base_dir = Some(dir.to_path_buf());
        }
        if let Ok(canonical) = path.canonicalize() {
            self.open_files.insert(canonical);
        }
        self
    }

    /// Convert the whole document starting at its root element.
    pub fn convert(mut self) -> String {
        if let Some(root) = self.doc.root() {
            self.visit(root);
        }
        self.finish()
    }

    /// The lines written so far.
    pub fn lines(&self) -> &[String] {
        self.out.lines()
    }

    pub fn into_buffer(self) -> LineBuffer {
        self.out
    }

    pub fn finish(self) -> String {
        self.out.finish()
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Visit a node: classify it, run its handler between the entry and exit
    /// hooks, and descend when the handler asks for it.
    pub fn visit(&mut self, id: NodeId) {
        if self.doc.kind(id) == Some(NodeKind::Comment) || self.consumed.contains(&id) {
            return;
        }

        let handler = classify(self.doc, id);
        self.before_traverse(id, handler);
        if self.run(handler, id) {
            self.traverse_children(id);
        }
        self.after_traverse(id, handler);
    }

    pub(crate) fn traverse_children(&mut self, id: NodeId) {
        let doc = self.doc;
        for child in doc.children(id) {
            self.visit(child);
        }
    }

    pub(crate) fn traverse_elements(&mut self, id: NodeId) {
        let doc = self.doc;
        for child in doc.elements(id) {
            self.visit(child);
        }
    }

    fn run(&mut self, handler: Handler, id: NodeId) -> bool {
        match handler {
            Handler::Pi => self.visit_pi(id),
            Handler::EntityRef => self.visit_entity_ref(id),
            Handler::Text => self.visit_text(id),
            Handler::Unknown => self.default_visit(id),
            Handler::Ignore => false,

            Handler::Admonition => self.process_admonition(id),
            Handler::Literal => self.process_literal(id),
            Handler::Keyword => self.process_keyword(id),
            Handler::Path => self.process_path(id),
            Handler::Ui => self.process_ui(id),
            Handler::Section => self.process_section(id, None, false),
            Handler::SpecialSection => {
                let doc = self.doc;
                self.process_section(id, Some(doc.name(id)), false)
            }

            Handler::Document => self.process_doc(id),
            Handler::Info => self.visit_info(id),
            Handler::Chapter => self.visit_chapter(id),
            Handler::Include => self.visit_include(id),
            Handler::Bridgehead => self.visit_bridgehead(id),

            Handler::FormalPara => self.visit_formalpara(id),
            Handler::Para => self.visit_para(id),
            Handler::SimPara => self.visit_simpara(id),

            Handler::ItemizedList => self.visit_itemizedlist(id),
            Handler::Procedure => self.visit_procedure(id),
            Handler::OrderedList => self.visit_orderedlist(id),
            Handler::VariableList => self.visit_variablelist(id),
            Handler::ListItem => self.visit_listitem(id),
            Handler::VarListEntry => self.visit_varlistentry(id),
            Handler::GlossEntry => self.visit_glossentry(id),
            Handler::GlossTerm => self.visit_glossterm(id),
            Handler::GlossDef => self.visit_glossdef(id),

            Handler::Citation => self.visit_citation(id),
            Handler::BiblioDiv => self.visit_bibliodiv(id),
            Handler::BiblioMisc => true,
            Handler::BiblioMixed => self.visit_bibliomixed(id),

            Handler::LiteralLayout => self.visit_literallayout(id),
            Handler::Screen => self.visit_screen(id),
            Handler::ProgramListing => self.visit_programlisting(id),
            Handler::Synopsis => self.visit_synopsis(id),
            Handler::Example => self.process_example(id),
            Handler::Sidebar => self.process_delimited(id, "sidebar", "****"),
            Handler::BlockQuote => self.process_delimited(id, "quote", "____"),
            Handler::Table => self.visit_table(id),
            Handler::Figure => self.visit_figure(id),
            Handler::FuncSynopsis => self.visit_funcsynopsis(id),
            Handler::QandaSet => self.visit_qandaset(id),

            Handler::Anchor => self.visit_anchor(id),
            Handler::Email => self.visit_email(id),
            Handler::Link => self.visit_link(id),
            Handler::Uri => self.visit_uri(id),
            Handler::Xref => self.visit_xref(id),
            Handler::Phrase => self.visit_phrase(id),
            Handler::ForeignPhrase => self.format_append_text(id, "", ""),
            Handler::Attribution | Handler::GuiIcon => {
                self.traverse_children(id);
                false
            }
            Handler::Quote => self.format_append_text(id, "\"`", "`\""),
            Handler::Emphasis => self.visit_emphasis(id),
            Handler::Remark => self.format_append_text(id, "##", "#"),
            Handler::Trademark => self.format_append_text(id, "#", "(TM)"),
            Handler::Footnote => self.visit_footnote(id),
            Handler::InlineMediaObject => self.visit_inlinemediaobject(id),
            Handler::IndexTerm => self.visit_indexterm(id),

            Handler::RefMeta => self.visit_refmeta(id),
            Handler::RefNameDiv => self.visit_refnamediv(id),
            Handler::RefSynopsisDiv => self.visit_refsynopsisdiv(id),
            Handler::CmdSynopsis => self.visit_cmdsynopsis(id),
            Handler::Arg => self.visit_arg(id),
            Handler::Group => self.visit_group(id),
            Handler::Optional => self.format_append_text(id, "[", "]"),
            Handler::Sbr => self.visit_sbr(),
            Handler::CiteRefEntry => self.visit_citerefentry(id),
        }
    }

    fn before_traverse(&mut self, id: NodeId, handler: Handler) {
        if handler != Handler::Ignore {
            self.ifdef_start(id);
        }

        if handler.opens_list() {
            self.list_depth += 1;
        } else if handler == Handler::Table {
            self.in_table = true;
        } else if handler == Handler::Emphasis {
            let marker = self.emphasis_marker(id);
            self.nested_formatting.push(marker);
        } else if handler == Handler::Literal {
            self.nested_formatting.push('+');
        }
    }

    fn after_traverse(&mut self, id: NodeId, handler: Handler) {
        if self.doc.is_root(id) {
            if self.requires_index {
                self.out.push_blank_line();
                self.out.push_line("ifdef::backend-docbook[]");
                self.out.push_line("[index]");
                self.out.push_line("== Index");
                self.out
                    .push_line("// Generated automatically by the DocBook toolchain.");
                self.out.push_line("endif::backend-docbook[]");
            }
        } else {
            if handler.opens_list() {
                self.list_depth = self.list_depth.saturating_sub(1);
            } else if handler == Handler::Table {
                self.in_table = false;
            } else if handler.pushes_marker() {
                self.nested_formatting.pop();
            }

            self.last_added_was_special = match handler {
                Handler::ItemizedList | Handler::Table => true,
                Handler::OrderedList => self.doc.name(id) == "orderedlist",
                _ => false,
            };
        }

        if handler != Handler::Ignore {
            self.ifdef_end(id);
        }
    }

    fn default_visit(&mut self, id: NodeId) -> bool {
        log::warn!("No visitor defined for <{}>! Skipping.", self.doc.name(id));
        for line in to_xml(self.doc, id).lines() {
            self.out.push_line(format!("// {line}"));
        }
        self.out.push_blank_line();
        false
    }

    // ------------------------------------------------------------------
    // Text extraction
    // ------------------------------------------------------------------

    /// Descendant text with AsciiDoc substitutions reversed and cell
    /// delimiters escaped inside tables.
    pub(crate) fn text(&self, id: NodeId) -> String {
        let text = reverse_subs(&self.doc.text(id));
        if self.in_table {
            text.replace('|', "\\|")
        } else {
            text
        }
    }

    /// [`text`](Self::text) of the first descendant element named `name`.
    pub(crate) fn text_at(&self, id: NodeId, name: &str) -> Option<String> {
        self.doc.descendant(id, name).map(|d| self.text(d))
    }

    /// [`text`](Self::text) of the first child element named `name`.
    pub(crate) fn child_text(&self, id: NodeId, name: &str) -> Option<String> {
        self.doc.child(id, name).map(|c| self.text(c))
    }

    /// Render the children of `id` on a fresh line and take the produced
    /// lines back out of the buffer.
    ///
    /// When the fresh line is absorbed by a pending flag, the line before it
    /// is taken as well.
    pub(crate) fn format_text(&mut self, id: NodeId) -> Vec<String> {
        self.out.push_blank_line();
        let mark = self.out.len();
        self.traverse_children(id);
        let count = self.out.len() + 1 - mark;
        self.out.splice_back(count)
    }

    /// Render `id` inline, wrapped in `prefix` and `suffix`, onto the last
    /// line.
    pub(crate) fn format_append_text(&mut self, id: NodeId, prefix: &str, suffix: &str) -> bool {
        let (first, rest) = split_first(self.format_text(id));
        self.out.push_text(&format!("{prefix}{}{suffix}", trim(&first)));
        self.out.extend(rest);
        false
    }

    /// Render `id` as a new line followed by `suffix`.
    pub(crate) fn format_append_line(&mut self, id: NodeId, suffix: &str) {
        let (first, rest) = split_first(self.format_text(id));
        self.out.push_line(format!("{first}{suffix}"));
        self.out.extend(rest);
    }

    // ------------------------------------------------------------------
    // Shared block helpers
    // ------------------------------------------------------------------

    /// The `title` child of a block, or the title inside its `info`.
    pub(crate) fn title_node(&self, id: NodeId) -> Option<NodeId> {
        self.doc
            .child(id, "title")
            .or_else(|| self.doc.child_path(id, &["info", "title"]))
    }

    /// Emit `.Title` above a block. Returns whether a title was written.
    pub(crate) fn append_block_title(&mut self, id: NodeId, prefix: &str) -> bool {
        let Some(title_node) = self.title_node(id) else {
            return false;
        };
        let (title, rest) = split_first(self.format_text(title_node));
        let see_also = self.doc.parent_name(id) == "itemizedlist"
            && self.doc.attr(id, "role") == Some("see-also-list");
        let leading = if see_also { "" } else { "." };
        self.out
            .push_line(format!("{leading}{prefix}{}", unwrap_text(&title)));
        self.out.extend(rest);
        self.out.set_adjoin_next(true);
        true
    }

    /// Emit a `[.role]` line for a block with a `role` attribute.
    pub(crate) fn append_block_role(&mut self, id: NodeId) -> bool {
        match self.doc.attr(id, "role") {
            Some(role) => {
                self.out.push_line(format!("[.{role}]"));
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Ids
    // ------------------------------------------------------------------

    /// The explicit id of an element, normalized when configured.
    pub(crate) fn resolve_id(&self, id: NodeId) -> Option<String> {
        let raw = self
            .doc
            .attr(id, "id")
            .or_else(|| self.doc.attr(id, "xml:id"))?;
        Some(if self.opts.normalize_ids {
            self.normalize_id(raw)
        } else {
            raw.to_string()
        })
    }

    pub(crate) fn normalize_id(&self, raw: &str) -> String {
        normalize_id(raw, &self.opts.id_prefix, &self.opts.id_separator)
    }

    pub(crate) fn generate_id(&self, title: &str) -> String {
        generate_id(title, &self.opts.id_prefix, &self.opts.id_separator)
    }

    /// Emit `[[id]]` unless the id matches the one AsciiDoc derives from
    /// `title`.
    pub(crate) fn append_anchor_unless_implicit(&mut self, id: NodeId, title: &str) {
        if let Some(anchor) = self.resolve_id(id)
            && anchor != self.generate_id(title)
        {
            self.out.push_line(format!("[[{anchor}]]"));
        }
    }

    // ------------------------------------------------------------------
    // Conditional directives
    // ------------------------------------------------------------------

    fn condition(&self, id: NodeId) -> Option<&'a str> {
        if self.doc.is_element(id) {
            self.doc.attr(id, "condition")
        } else {
            None
        }
    }

    pub(crate) fn ifdef_start(&mut self, id: NodeId) {
        if let Some(condition) = self.condition(id) {
            self.out.push_line(format!("ifdef::{condition}[]"));
        }
    }

    pub(crate) fn ifdef_end(&mut self, id: NodeId) {
        if let Some(condition) = self.condition(id) {
            self.out.push_line(format!("endif::{condition}[]"));
        }
    }

    /// Lines of the document header that follow the title and author.
    pub(crate) fn header_attributes(&mut self, book: bool, sourcedir: bool) {
        if book {
            if self.opts.compat_mode {
                self.out.push_line(":compat-mode:");
            }
            for line in [
                ":doctype: book",
                ":sectnums:",
                ":toc: left",
                ":icons: font",
                ":experimental:",
            ] {
                self.out.push_line(line);
            }
        }
        if self.opts.id_prefix != "_" {
            self.out
                .push_line(format!(":idprefix: {}", self.opts.id_prefix).trim_end());
        }
        if self.opts.id_separator != "_" {
            self.out
                .push_line(format!(":idseparator: {}", self.opts.id_separator).trim_end());
        }
        if sourcedir && !self.opts.attributes.contains_key("sourcedir") {
            self.out.push_line(":sourcedir: .");
        }
        for (name, value) in &self.opts.attributes {
            self.out.push_line(format!(":{name}: {value}").trim_end());
        }
    }
}

/// Split captured lines into the first line and the rest.
pub(crate) fn split_first(mut lines: Vec<String>) -> (String, Vec<String>) {
    if lines.is_empty() {
        return (String::new(), lines);
    }
    let first = lines.remove(0);
    (first, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn render(xml: &str) -> String {
        let doc = parse(xml).unwrap();
        let opts = ConversionOptions::default();
        Visitor::new(&doc, &opts).convert()
    }

    #[test]
    fn test_unknown_element_is_commented_out() {
        let out = render("<para>before <mystery kind=\"x\">y</mystery></para>");
        assert!(out.contains("// <mystery kind=\"x\">y</mystery>"));
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(render("<para>a<!-- hidden -->b</para>"), "\nab");
    }

    #[test]
    fn test_condition_wraps_inline_phrase() {
        assert_eq!(
            render(r#"<para>a<phrase condition="foo">b</phrase>c</para>"#),
            "\na\nifdef::foo[]\nb\nendif::foo[]\nc"
        );
    }

    #[test]
    fn test_index_placeholder() {
        let out = render("<article><para>Term<indexterm><primary>Term</primary></indexterm></para></article>");
        assert!(out.contains("(((Term)))"));
        assert!(out.ends_with(
            "ifdef::backend-docbook[]\n[index]\n== Index\n// Generated automatically by the DocBook toolchain.\nendif::backend-docbook[]"
        ));
    }

    #[test]
    fn test_format_text_captures_children() {
        let doc = parse("<para>one <emphasis>two</emphasis></para>").unwrap();
        let opts = ConversionOptions::default();
        let mut visitor = Visitor::new(&doc, &opts);
        let root = doc.root().unwrap();
        visitor.out.push_line("keep");
        let lines = visitor.format_text(root);
        assert_eq!(lines, vec!["one _two_".to_string()]);
        assert_eq!(visitor.lines(), &["keep".to_string()]);
    }

    #[test]
    fn test_split_first() {
        let (first, rest) = split_first(vec!["a".into(), "b".into()]);
        assert_eq!(first, "a");
        assert_eq!(rest, vec!["b".to_string()]);
        let (first, rest) = split_first(Vec::new());
        assert!(first.is_empty() && rest.is_empty());
    }
}
