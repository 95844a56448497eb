//! Inline handlers: text, formatting spans, links, index terms and UI
//! macros. All of them extend the current output line.

use crate::asciidoc::text::{
    is_blank_text, lazy_quote, protect_leading_dots, sentence_per_line, strip_whitespace, trim,
    trim_end, trim_start,
};
use crate::dom::{NodeId, NodeKind, XLINK_NS};

use super::dispatch::{PARA_NAMES, is_formatting};
use super::{Visitor, split_first};

/// Characters that open an inline formatting span.
const FORMATTING_CHARS: &[char] = &['_', '*', '+', '`', '#'];

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c' | '\x0b')
}

/// Whether the text ends in a non-space character, ignoring one final line
/// break.
fn ends_adjacent(text: &str) -> bool {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.chars().last().is_some_and(|c| !is_inline_space(c))
}

fn starts_adjacent(text: &str) -> bool {
    text.chars().next().is_some_and(|c| !is_inline_space(c))
}

impl Visitor<'_> {
    pub(super) fn visit_text(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let Some(raw) = doc.raw_text(id) else {
            return false;
        };
        if is_blank_text(raw) {
            return false;
        }

        let parent = doc.parent_name(id);
        let in_para = PARA_NAMES.contains(&parent) || parent == "phrase";
        let mut text = raw.to_string();

        if in_para {
            let leading_space = raw.chars().next().filter(|&c| is_inline_space(c));
            text = strip_whitespace(&text, self.opts.wraps_preserved());
            if doc.previous_element(id).is_none() {
                text = trim_start(&text).to_string();
            } else if let Some(space) = leading_space
                && !text.starts_with(is_inline_space)
            {
                let last = self.out.last_or_empty();
                if last == "----" || last == "====" {
                    text.insert(0, space);
                } else if doc.previous(id).is_some_and(|prev| {
                    !matches!(doc.name(prev), "para" | "text")
                        && (last.ends_with(' ') || last.ends_with('\n') || last.is_empty())
                }) {
                    // The previous span already ends in whitespace.
                } else {
                    text.insert(0, ' ');
                }
            }
            if self.opts.sentence_per_line {
                text = sentence_per_line(&text);
            }
        }

        if self.in_table {
            text = text.replace('|', "\\|");
        }
        if !self.nested_formatting.is_empty() && text.starts_with(FORMATTING_CHARS) {
            text.insert(0, '\\');
        }
        if self.out.last_or_empty().is_empty() && text.starts_with('.') {
            text = protect_leading_dots(&text);
        }

        let readd_space = text.ends_with(' ') || text.ends_with('\n');
        let mut text = if self.last_added_was_special {
            format!("\n{}", trim_end(&text))
        } else {
            trim_end(&text).to_string()
        };
        if readd_space {
            text.push(' ');
        }
        self.out
            .push_text(&crate::asciidoc::reverse_subs(&text));
        false
    }

    pub(super) fn visit_pi(&mut self, id: NodeId) -> bool {
        match self.doc.name(id) {
            "asciidoc-br" => self.out.push_text(" +"),
            "asciidoc-hr" => self.out.push_text("'''"),
            _ => {}
        }
        false
    }

    /// Unresolved entities such as `&rarr;` pass through unchanged.
    pub(super) fn visit_entity_ref(&mut self, id: NodeId) -> bool {
        let entity = format!("&{};", self.doc.name(id));
        self.out.push_text(&entity);
        false
    }

    pub(super) fn emphasis_marker(&self, id: NodeId) -> char {
        match self.doc.attr(id, "role") {
            Some("strong" | "bold") => '*',
            Some("marked") => '#',
            _ => '_',
        }
    }

    pub(super) fn visit_emphasis(&mut self, id: NodeId) -> bool {
        let marker = self.emphasis_marker(id);
        let times = if self.needs_unconstrained(id) { 2 } else { 1 };
        let quote = marker.to_string().repeat(times);
        self.format_append_text(id, &quote, &quote)
    }

    /// Whether a span must use the doubled (unconstrained) marker because it
    /// touches a word character or sits inside another span.
    fn needs_unconstrained(&self, id: NodeId) -> bool {
        let doc = self.doc;
        if self.nested_formatting.len() > 1 {
            return true;
        }

        let prev = doc.previous(id);
        let next = doc.next(id);
        let text_of = |node: NodeId| {
            if doc.kind(node) == Some(NodeKind::Text) {
                doc.raw_text(node)
            } else {
                None
            }
        };
        if prev.and_then(text_of).is_some_and(ends_adjacent)
            || next.and_then(text_of).is_some_and(starts_adjacent)
        {
            return true;
        }

        let first_text_of_span = |node: NodeId| {
            if doc.is_element(node) && is_formatting(doc.name(node)) {
                doc.first_child(node).and_then(text_of)
            } else {
                None
            }
        };
        if prev.and_then(first_text_of_span).is_some_and(ends_adjacent)
            || next.and_then(first_text_of_span).is_some_and(starts_adjacent)
        {
            return true;
        }

        let last = self.out.last_or_empty();
        !last.is_empty() && !last.ends_with([' ', '\n', '\t', '\x0c'])
    }

    /// Literal family: code-like spans and named spans with a role.
    pub(super) fn process_literal(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let parent = doc.parent_name(id);
        let (prefix, suffix) = match doc.name(id) {
            "envar" => ("[var]`", "`"),
            "organization" => ("[org]_", "_"),
            "application" => ("[app]`", "`"),
            "prompt" => ("[prompt]#", "#"),
            "option" if parent == "term" => ("*", "*"),
            "option" => ("[opt]*", "*"),
            "command" if parent == "cmdsynopsis" => ("*", "*"),
            "command" => ("[cmd]*", "*"),
            "computeroutput" => ("[output]`", "`"),
            "userinput" => ("[ui]`", "`"),
            "replaceable" if parent == "arg" || parent == "term" => ("_", "_"),
            "replaceable" => ("[rep]_", "_"),
            _ => ("`", "`"),
        };

        let (first, rest) = split_first(self.format_text(id));
        let body = trim(&first);
        // Backticks in monospaced content would close the span early.
        let span = if prefix.ends_with('`') && body.contains('`') {
            format!("{prefix}+{body}+{suffix}")
        } else {
            format!("{prefix}{body}{suffix}")
        };
        self.out.push_text(&span);
        self.out.extend(rest);
        false
    }

    /// `package`, `firstterm` and `citetitle`.
    pub(super) fn process_keyword(&mut self, id: NodeId) -> bool {
        let (role, mark) = match self.doc.name(id) {
            "firstterm" => ("term", '_'),
            "citetitle" => ("ref", '_'),
            name => (name, '#'),
        };
        let text = self.text(id);
        self.out
            .push_text(&format!("[{role}]{mark}{text}{mark}"));
        false
    }

    pub(super) fn process_path(&mut self, id: NodeId) -> bool {
        let text = self.text(id);
        self.out.push_text(&format!("[path]_{text}_"));
        false
    }

    /// GUI labels, buttons, menus and keys.
    pub(super) fn process_ui(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let mut name = doc.name(id);
        if name == "guilabel"
            && doc.next(id).is_some_and(|next| {
                doc.kind(next) == Some(NodeKind::EntityRef)
                    && matches!(doc.name(next), "rarr" | "gt")
            })
        {
            name = "guimenu";
        }

        let text = self.text(id);
        let markup = match name {
            "menuchoice" => {
                let items: Vec<NodeId> = doc
                    .elements(id)
                    .filter(|&c| matches!(doc.name(c), "guimenu" | "guisubmenu" | "guimenuitem"))
                    .collect();
                self.consumed.extend(items.iter().copied());
                let labels: Vec<String> = items.iter().map(|&item| self.text(item)).collect();
                match labels.split_first() {
                    Some((menu, path)) => format!("menu:{menu}[{}]", path.join(" > ")),
                    None => "menu:[]".to_string(),
                }
            }
            "guimenu" => format!("menu:{text}[]"),
            "guibutton" => format!("btn:[{text}]"),
            "guilabel" => format!("[label]#{text}#"),
            "keycap" => format!("kbd:[{text}]"),
            _ => return false,
        };
        self.out.push_text(&markup);
        false
    }

    pub(super) fn visit_link(&mut self, id: NodeId) -> bool {
        if self.doc.attr(id, "linkend").is_some() {
            self.visit_xref(id)
        } else {
            self.visit_uri(id)
        }
    }

    /// `uri`, `ulink` and `link` with an address.
    pub(super) fn visit_uri(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let url = if doc.is_named(id, "ulink") {
            doc.attr(id, "url").unwrap_or_default().to_string()
        } else {
            doc.attr_ns(id, "href", XLINK_NS)
                .or_else(|| doc.attr(id, "xlink:href"))
                .map(str::to_string)
                .unwrap_or_else(|| doc.text(id))
        };
        let prefix = if url.starts_with("http://") || url.starts_with("https://") {
            ""
        } else {
            "link:"
        };
        let label = self.text(id);
        let show_label = !label.is_empty() && label != url;
        let target = match self.opts.attribute_for_value(&url) {
            Some(name) => format!("{{{name}}}"),
            None => url,
        };
        let link = if show_label {
            format!("{prefix}{target}[{label}]")
        } else {
            format!("{prefix}{target}")
        };
        self.out.push_text(&link);
        false
    }

    pub(super) fn visit_xref(&mut self, id: NodeId) -> bool {
        let linkend = self.doc.attr(id, "linkend").unwrap_or_default();
        let target = if self.opts.normalize_ids {
            self.normalize_id(linkend)
        } else {
            linkend.to_string()
        };
        let (label, rest) = split_first(self.format_text(id));
        if label.is_empty() {
            self.out.push_text(&format!("<<{target}>>"));
        } else {
            self.out
                .push_text(&format!("<<{target},{}>>", lazy_quote(&label)));
        }
        self.out.extend(rest);
        false
    }

    pub(super) fn visit_email(&mut self, id: NodeId) -> bool {
        let address = self.doc.text(id);
        self.out.push_text(&format!("mailto:{address}[]"));
        false
    }

    pub(super) fn visit_anchor(&mut self, id: NodeId) -> bool {
        if self.doc.parent_name(id).starts_with("biblio") {
            return false;
        }
        let anchor = self.resolve_id(id).unwrap_or_default();
        self.out.push_text(&format!("[[{anchor}]]"));
        false
    }

    pub(super) fn visit_phrase(&mut self, id: NodeId) -> bool {
        let (text, rest) = split_first(self.format_text(id));
        match self.doc.attr(id, "role") {
            Some(role) => self.out.push_text(&format!("[{role}]##{text}##")),
            None => self.out.push_text(&text),
        }
        self.out.extend(rest);
        false
    }

    pub(super) fn visit_footnote(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let note = doc
            .elements(id)
            .find(|&c| PARA_NAMES.contains(&doc.name(c)))
            .map(|para| self.text(para))
            .unwrap_or_default();
        self.out
            .push_text(&format!("footnote:[{}]", trim(&note)));
        false
    }

    pub(super) fn visit_inlinemediaobject(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let src = doc
            .descendant_within(id, "imageobject", "imagedata")
            .and_then(|image| doc.attr(image, "fileref"))
            .unwrap_or_default();
        let alt = self.image_alt(id, src);
        self.out.push_text(&format!("image:{src}[{alt}]"));
        false
    }

    /// Index terms become `(((primary,secondary,tertiary)))` on a line of
    /// their own. A multi-level term suppresses as many following terms as
    /// it has extra levels.
    pub(super) fn visit_indexterm(&mut self, id: NodeId) -> bool {
        match self.index_skip {
            Some(remaining) if remaining > 0 => {
                self.index_skip = Some(remaining - 1);
                return false;
            }
            Some(_) => self.index_skip = None,
            None => {}
        }

        self.requires_index = true;
        let entries: Vec<String> = ["primary", "secondary", "tertiary"]
            .into_iter()
            .filter_map(|level| self.text_at(id, level))
            .collect();
        if entries.len() > 1 {
            self.index_skip = Some(entries.len() - 1);
        }
        self.out
            .push_line(format!("((({})))", entries.join(",")));
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
    fn test_adjacency() {
        assert!(ends_adjacent("word"));
        assert!(ends_adjacent("word\n"));
        assert!(!ends_adjacent("word "));
        assert!(starts_adjacent("apple"));
        assert!(!starts_adjacent(" or"));
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            render("<para><emphasis>Apple</emphasis> or <emphasis>pine</emphasis>apple.</para>"),
            "\n_Apple_ or __pine__apple."
        );
    }

    #[test]
    fn test_bold_emphasis_before_punctuation() {
        let out = render(
            r#"<para><emphasis role="bold">Singleton strategy</emphasis>- instructs RuntimeManager</para>"#,
        );
        assert_eq!(out, "\n**Singleton strategy**- instructs RuntimeManager");
    }

    #[test]
    fn test_nested_literal_escapes_hash() {
        assert_eq!(
            render("<para><code><emphasis>#{expression}</emphasis></code></para>"),
            "\n`__\\#{expression}__`"
        );
    }

    #[test]
    fn test_literal_with_backtick() {
        assert_eq!(render("<para><code>a`b</code></para>"), "\n`+a`b+`");
    }

    #[test]
    fn test_named_literals() {
        let out = render(
            "<para>Set <envar>HOME</envar> to <replaceable>file</replaceable> with <option>-v</option></para>",
        );
        assert_eq!(out, "\nSet [var]`HOME` to [rep]_file_ with [opt]*-v*");
    }

    #[test]
    fn test_keywords_and_paths() {
        let out = render(
            "<para>See <firstterm>DocBook</firstterm> in <citetitle>Guide</citetitle> at <filename>/etc</filename></para>",
        );
        assert_eq!(out, "\nSee [term]_DocBook_ in [ref]_Guide_ at [path]_/etc_");
    }

    #[test]
    fn test_menuchoice() {
        let out = render(
            "<para><menuchoice><guimenu>File</guimenu><guisubmenu>Export</guisubmenu><guimenuitem>PDF</guimenuitem></menuchoice></para>",
        );
        assert_eq!(out, "\nmenu:File[Export > PDF]");
    }

    #[test]
    fn test_guilabel_before_arrow_is_menu() {
        let out = render("<para><guilabel>Tools</guilabel>&rarr;<guibutton>OK</guibutton> or <keycap>F1</keycap></para>");
        assert_eq!(out, "\nmenu:Tools[]&rarr;btn:[OK] or kbd:[F1]");
    }

    #[test]
    fn test_links() {
        let out = render(
            r#"<para xmlns:xl="http://www.w3.org/1999/xlink"><link xl:href="http://example.org">Example</link> and <ulink url="docs/a.html">docs/a.html</ulink></para>"#,
        );
        assert_eq!(out, "\nhttp://example.org[Example] and link:docs/a.html");
    }

    #[test]
    fn test_link_url_replaced_by_attribute() {
        let opts = ConversionOptions::default().with_attribute("uri-home", "http://example.org");
        let out = render_with(
            r#"<para><ulink url="http://example.org">home</ulink></para>"#,
            &opts,
        );
        assert_eq!(out, "\n{uri-home}[home]");
    }

    #[test]
    fn test_xref_label_is_quoted() {
        let out = render(r#"<para><xref linkend="some-id">One, two</xref></para>"#);
        assert_eq!(out, "\n<<_some_id,\"One, two\">>");
        let opts = ConversionOptions::default().with_normalize_ids(false);
        let out = render_with(r#"<para><xref linkend="some-id"/></para>"#, &opts);
        assert_eq!(out, "\n<<some-id>>");
    }

    #[test]
    fn test_email_and_footnote() {
        let out = render(
            "<para><email>doc@example.com</email><footnote><para> Note </para></footnote></para>",
        );
        assert_eq!(out, "\nmailto:doc@example.com[]footnote:[Note]");
    }

    #[test]
    fn test_phrase_role_and_remark() {
        let out = render(r#"<para><phrase role="red">stop</phrase> then <remark>todo</remark></para>"#);
        assert_eq!(out, "\n[red]##stop## then ##todo#");
    }

    #[test]
    fn test_processing_instructions() {
        assert_eq!(
            render("<para>a<?asciidoc-br?></para>"),
            "\na +"
        );
        assert_eq!(render("<para><?asciidoc-hr?></para>"), "\n'''");
    }

    #[test]
    fn test_indexterm_skips_following_terms() {
        let out = render(
            "<para>x<indexterm><primary>a</primary><secondary>b</secondary></indexterm><indexterm><primary>c</primary></indexterm><indexterm><primary>d</primary></indexterm></para>",
        );
        assert!(out.contains("(((a,b)))"));
        assert!(!out.contains("(((c)))"));
        assert!(out.contains("(((d)))"));
    }

    #[test]
    fn test_sentence_per_line() {
        assert_eq!(
            render("<para>First one. Second one.</para>"),
            "\nFirst one.\nSecond one."
        );
        let opts = ConversionOptions::default().with_sentence_per_line(false);
        assert_eq!(
            render_with("<para>First one. Second one.</para>", &opts),
            "\nFirst one. Second one."
        );
    }

    #[test]
    fn test_leading_dots_are_protected() {
        assert_eq!(render("<para>.. a note...</para>"), "\n$$..$$ a note...");
    }
}
