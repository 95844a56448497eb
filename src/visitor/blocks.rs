//! Paragraphs, admonitions, verbatim and delimited blocks, figures,
//! bibliographies, Q&A sets and function synopses.

use std::path::Path;

use crate::asciidoc::text::{is_blank_text, lazy_quote, trim, trim_end, trim_start};
use crate::dom::NodeId;

use super::dispatch::{BLOCK_NAMES, PARA_NAMES};
use super::{Visitor, split_first};

impl Visitor<'_> {
    pub(super) fn visit_formalpara(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        self.append_block_title(id, "");
        true
    }

    pub(super) fn visit_para(&mut self, id: NodeId) -> bool {
        let empty_last = !self.out.is_empty() && self.out.last_is_empty();
        self.out.push_blank_line();
        self.last_added_was_special = false;
        self.append_block_role(id);
        if !empty_last {
            self.out.push_blank_line();
        }
        true
    }

    pub(super) fn visit_simpara(&mut self, id: NodeId) -> bool {
        let empty_last = !self.out.is_empty() && self.out.last_is_empty();
        self.out.push_blank_line();
        self.append_block_role(id);
        if !empty_last {
            self.out.push_blank_line();
        }
        true
    }

    /// `note`, `tip`, `warning`, `caution` and `important`.
    pub(super) fn process_admonition(&mut self, id: NodeId) -> bool {
        let label = self.doc.name(id).to_uppercase();
        if !self.out.continuation() {
            self.out.push_blank_line();
        }
        self.append_block_title(id, "");

        match self.run_in_para(id) {
            Some(para) => {
                self.out.set_continuation(false);
                self.out.set_adjoin_next(false);
                let (first, rest) = split_first(self.format_text(para));
                self.out
                    .push_line(format!("{label}: {}", trim_start(&first)));
                self.out.extend(rest);
                self.last_added_was_special = false;
            }
            None => {
                self.out.push_line(format!("[{label}]"));
                self.out.push_line("====");
                self.out.set_adjoin_next(true);
                self.traverse_children(id);
                self.out.set_adjoin_next(false);
                self.out.push_line("====");
            }
        }
        false
    }

    /// The single plain paragraph of an admonition body, if that is all the
    /// body holds.
    fn run_in_para(&self, id: NodeId) -> Option<NodeId> {
        let doc = self.doc;
        let mut body = doc
            .elements(id)
            .filter(|&e| !doc.is_named(e, "title") && !doc.is_named(e, "info"));
        let para = body.next()?;
        if body.next().is_some() || !PARA_NAMES.contains(&doc.name(para)) {
            return None;
        }
        if doc.attr(para, "role").is_some() || doc.attr(para, "condition").is_some() {
            return None;
        }
        if doc
            .elements(para)
            .any(|e| BLOCK_NAMES.contains(&doc.name(e)))
        {
            return None;
        }
        Some(para)
    }

    pub(super) fn visit_literallayout(&mut self, id: NodeId) -> bool {
        let raw = self.doc.text(id);
        let body = trim_end(&raw);
        self.out.push_blank_line();
        if body.lines().any(is_blank_text) {
            self.out.push_line("....");
            self.out.push_line(body);
            self.out.push_line("....");
        } else {
            for line in body.lines() {
                self.out.push_line(format!("  {line}"));
            }
        }
        false
    }

    pub(super) fn visit_screen(&mut self, id: NodeId) -> bool {
        let raw = self.doc.text(id);
        let body = trim_end(&raw);
        if self.doc.parent_name(id) != "para" {
            self.out.push_blank_line();
        }
        // Content holding a listing delimiter needs a literal block.
        if body.lines().any(|line| line.starts_with("----")) {
            self.out.push_line("[listing]");
            self.out.push_line("....");
            self.out.push_line(body);
            self.out.push_line("....");
        } else {
            self.out.push_line("----");
            self.out.push_line(body);
            self.out.push_line("----");
        }
        false
    }

    pub(super) fn visit_synopsis(&mut self, id: NodeId) -> bool {
        let raw = self.doc.text(id);
        self.out.push_blank_line();
        self.out.push_line("----");
        self.out.push_line(trim_end(&raw));
        self.out.push_line("----");
        false
    }

    pub(super) fn visit_programlisting(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let opts = self.opts;
        let language = doc
            .attr(id, "language")
            .or_else(|| doc.attr(id, "role"))
            .or_else(|| opts.attributes.get("source-language").map(String::as_str))
            .map(|lang| format!(",{}", lang.to_lowercase()))
            .unwrap_or_default();
        let linenums = if doc.attr(id, "linenumbering") == Some("numbered") {
            ",linenums"
        } else {
            ""
        };

        if doc.parent_name(id) != "para" {
            self.out.push_blank_line();
        }
        self.out
            .push_line(format!("[source{language}{linenums}]"));

        if doc
            .elements(id)
            .next()
            .is_some_and(|first| doc.is_named(first, "include"))
        {
            self.out.push_line("----");
            for include in doc.elements(id) {
                let href = doc.attr(include, "href").unwrap_or_default();
                self.out
                    .push_line(format!("include::{{sourcedir}}/{href}[]"));
            }
            self.out.push_line("----");
            return false;
        }

        let raw = doc.text(id);
        let body = trim_end(&raw);
        if opts.delimit_source || body.lines().any(is_blank_text) {
            self.out.push_line("----");
            self.out.push_line(body);
            self.out.push_line("----");
        } else {
            self.out.push_line(body);
        }
        false
    }

    /// `example` and `informalexample`.
    pub(super) fn process_example(&mut self, id: NodeId) -> bool {
        self.out.push_blank_line();
        self.append_block_title(id, "");
        self.out.push_line("====");
        self.out.set_adjoin_next(true);
        self.traverse_children(id);
        self.out.set_adjoin_next(false);
        self.out.push_line("====");
        false
    }

    /// Sidebars and block quotes. A body of one paragraph gets a style line
    /// instead of delimiters.
    pub(super) fn process_delimited(&mut self, id: NodeId, style: &str, delimiter: &str) -> bool {
        let doc = self.doc;
        self.out.push_blank_line();
        self.append_block_title(id, "");

        let mut body: Vec<NodeId> = doc.elements(id).collect();
        if body.first().is_some_and(|&first| doc.is_named(first, "title")) {
            body.remove(0);
        }

        match body.as_slice() {
            [para] if PARA_NAMES.contains(&doc.name(*para)) => {
                self.out.push_line(format!("[{style}]"));
                self.out.set_adjoin_next(false);
                self.format_append_line(*para, "");
            }
            _ => {
                self.out.push_line(delimiter);
                self.out.set_adjoin_next(true);
                self.traverse_children(id);
                self.out.set_adjoin_next(false);
                self.out.push_line(delimiter);
            }
        }
        false
    }

    /// `figure`, `mediaobject` and `screenshot`.
    pub(super) fn visit_figure(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        self.out.push_blank_line();
        self.append_block_title(id, "");

        match doc.descendant_within(id, "imageobject", "imagedata") {
            Some(image) => {
                let src = doc.attr(image, "fileref").unwrap_or_default();
                let alt = self.image_alt(id, src);
                self.out.push_blank_line();
                self.out.push_line(format!("image::{src}[{alt}]"));
                self.out.push_blank_line();
            }
            None => {
                let first = doc
                    .elements(id)
                    .next()
                    .map(|e| doc.name(e))
                    .unwrap_or_default();
                log::warn!("Unknown mediaobject <{first}>! Skipping.");
            }
        }
        false
    }

    /// Alt text of a media object. Text that merely repeats the file name is
    /// dropped.
    pub(super) fn image_alt(&self, id: NodeId, src: &str) -> String {
        let Some(phrase) = self.doc.descendant_within(id, "textobject", "phrase") else {
            return String::new();
        };
        let alt = self.text(phrase);
        let stem = Path::new(src)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if alt == stem {
            String::new()
        } else {
            lazy_quote(&alt)
        }
    }

    /// C function prototypes as a source block.
    pub(super) fn visit_funcsynopsis(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        if doc.parent_name(id) != "para" {
            self.out.push_blank_line();
        }
        self.out.push_line("[source,c]");
        self.out.push_line("----");

        if let Some(info) = doc.child(id, "funcsynopsisinfo") {
            let text = doc.text(info);
            for line in trim(&text).lines() {
                self.out.push_line(trim(line));
            }
            self.out.push_blank_line();
        }

        if let Some(prototype) = doc.child(id, "funcprototype") {
            let mut indent = 0;
            let mut first = true;
            self.out.push_blank_line();
            if let Some(funcdef) = doc.child(prototype, "funcdef") {
                let text = doc.text(funcdef);
                self.out.push_text(&text);
                indent = text.chars().count() + 2;
            }

            for param in doc.elements(prototype).filter(|&e| doc.is_named(e, "paramdef")) {
                self.open_parameter(&mut first, indent);
                let text = doc.text(param);
                let declaration = text.split('\n').next().unwrap_or_default();
                self.out.push_text(declaration);
                if let Some(params) = doc.child(param, "funcparams") {
                    self.out.push_text(&format!(" ({})", doc.text(params)));
                }
            }

            if let Some(varargs) = doc.child(prototype, "varargs") {
                self.open_parameter(&mut first, indent);
                self.out
                    .push_text(&format!("{}...", doc.text(varargs)));
            }

            self.out.push_text(if first { " (void);" } else { ");" });
        }

        self.out.push_line("----");
        false
    }

    fn open_parameter(&mut self, first: &mut bool, indent: usize) {
        if *first {
            self.out.push_text(" (");
            *first = false;
        } else {
            self.out.push_text(",");
            self.out.push_line(" ".repeat(indent));
        }
    }

    pub(super) fn visit_qandaset(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        for group in doc.elements(id) {
            let entries: Vec<NodeId> = if doc.is_named(group, "qandadiv") {
                doc.elements(group).collect()
            } else {
                vec![group]
            };
            for element in entries {
                match doc.name(element) {
                    "title" => {
                        self.out.push_line(format!(".{}", doc.text(element)));
                        self.out.push_blank_line();
                        self.out.push_line("[qanda]");
                    }
                    "qandaentry" => self.process_qandaentry(element),
                    _ => {}
                }
            }
        }
        false
    }

    fn process_qandaentry(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(question) = doc.child_path(id, &["question", "para"]) else {
            log::warn!("Missing question in qandaset! Skipping.");
            return;
        };
        if let Some(anchor) = self.resolve_id(id) {
            self.out.push_line(format!("[[{anchor}]]"));
        }
        self.format_append_line(question, "::");

        match doc.child(id, "answer") {
            Some(answer) => {
                let mut first = true;
                for child in doc.children(answer) {
                    if is_blank_text(&doc.text(child)) {
                        continue;
                    }
                    if !first {
                        self.out.push_line("+");
                        self.out.set_continuation(true);
                    }
                    first = false;
                    self.visit(child);
                }
                self.out.set_continuation(false);
            }
            None => log::warn!("Missing answer in qandaset!"),
        }
        self.out.push_blank_line();
    }

    pub(super) fn visit_bibliodiv(&mut self, _id: NodeId) -> bool {
        self.out.push_blank_line();
        self.out.push_line("[bibliography]");
        true
    }

    pub(super) fn visit_bibliomixed(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        self.out.push_blank_line();
        self.out.push_text("- ");
        for child in doc.children(id) {
            match doc.name(child) {
                "abbrev" => self
                    .out
                    .push_text(&format!("[[[{}]]] ", doc.text(child))),
                "title" => self.out.push_text(&doc.text(child)),
                _ => self.visit(child),
            }
        }
        false
    }

    pub(super) fn visit_citation(&mut self, id: NodeId) -> bool {
        let reference = self.doc.text(id);
        self.out.push_text(&format!("<<{reference}>>"));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionOptions;
    use crate::dom::parse;

    fn render(xml: &str) -> String {
        render_with(xml, &ConversionOptions::default())
    }

    fn render_with(xml: &str, opts: &ConversionOptions) -> String {
        let doc = parse(xml).unwrap();
        Visitor::new(&doc, opts).convert()
    }

    #[test]
    fn test_single_para_admonition_is_run_in() {
        assert_eq!(
            render("<note><para>Mind the gap</para></note>"),
            "\nNOTE: Mind the gap"
        );
    }

    #[test]
    fn test_admonition_with_block_content_is_delimited() {
        let out = render(
            "<note>\n  <para>\n    Please note the fruit:\n    <screen>Apple, oranges and bananas</screen>\n  </para>\n</note>",
        );
        assert!(out.contains(
            "[NOTE]\n====\nPlease note the fruit: \n----\nApple, oranges and bananas\n----\n===="
        ));
    }

    #[test]
    fn test_titled_admonition() {
        assert_eq!(
            render("<warning><title>Careful</title><para>Hot</para></warning>"),
            "\n.Careful\nWARNING: Hot"
        );
    }

    #[test]
    fn test_literallayout() {
        assert_eq!(
            render("<literallayout>one\ntwo</literallayout>"),
            "\n  one\n  two"
        );
        assert_eq!(
            render("<literallayout>one\n\ntwo</literallayout>"),
            "\n....\none\n\ntwo\n...."
        );
    }

    #[test]
    fn test_screen_with_dashes_uses_literal_block() {
        assert_eq!(
            render("<screen>a\n-----\nb</screen>"),
            "\n[listing]\n....\na\n-----\nb\n...."
        );
    }

    #[test]
    fn test_programlisting_language_and_linenums() {
        assert_eq!(
            render(r#"<programlisting language="Java" linenumbering="numbered">int x;</programlisting>"#),
            "\n[source,java,linenums]\n----\nint x;\n----"
        );
    }

    #[test]
    fn test_programlisting_without_delimiters() {
        let opts = ConversionOptions::default()
            .with_delimit_source(false)
            .with_attribute("source-language", "python");
        assert_eq!(
            render_with("<programlisting>print(1)</programlisting>", &opts),
            "\n[source,python]\nprint(1)"
        );
    }

    #[test]
    fn test_programlisting_includes() {
        let out = render(
            r#"<programlisting xmlns:xi="http://www.w3.org/2001/XInclude"><xi:include href="a.java" parse="text"/></programlisting>"#,
        );
        assert_eq!(out, "\n[source]\n----\ninclude::{sourcedir}/a.java[]\n----");
    }

    #[test]
    fn test_sidebar_single_para() {
        assert_eq!(
            render("<sidebar><para>Aside</para></sidebar>"),
            "\n[sidebar]\nAside"
        );
    }

    #[test]
    fn test_blockquote_with_title_and_paras() {
        assert_eq!(
            render("<blockquote><title>Q</title><para>a</para><para>b</para></blockquote>"),
            "\n.Q\n____\na\n\nb\n____"
        );
    }

    #[test]
    fn test_figure_alt_equal_to_file_name_is_dropped() {
        let out = render(
            r#"<figure><title>Shot</title><mediaobject><imageobject><imagedata fileref="img/shot.png"/></imageobject><textobject><phrase>shot</phrase></textobject></mediaobject></figure>"#,
        );
        assert_eq!(out, "\n.Shot\nimage::img/shot.png[]\n");
    }

    #[test]
    fn test_figure_without_image_is_skipped() {
        assert_eq!(render("<figure><caption>x</caption></figure>"), "");
    }

    #[test]
    fn test_funcsynopsis_void() {
        let out = render(
            "<funcsynopsis><funcprototype><funcdef>int <function>rand</function></funcdef><void/></funcprototype></funcsynopsis>",
        );
        assert_eq!(out, "\n[source,c]\n----\nint rand (void);\n----");
    }

    #[test]
    fn test_bibliomixed_entry() {
        let out = render(
            "<bibliodiv><bibliomixed><abbrev>walsh</abbrev><title>DocBook</title>, by Norman Walsh.</bibliomixed></bibliodiv>",
        );
        assert_eq!(out, "\n[bibliography]\n- [[[walsh]]] DocBook, by Norman Walsh.");
    }
}
