//! Document roots, headers, sections and includes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::asciidoc::text::unwrap_text;
use crate::dom::{self, NodeId};

use super::dispatch::DOCUMENT_NAMES;
use super::{Visitor, split_first};

impl Visitor<'_> {
    /// `book`, `article` and `refentry`: their element children sit one level
    /// below the document title.
    pub(super) fn process_doc(&mut self, id: NodeId) -> bool {
        self.level += 1;
        self.traverse_elements(id);
        self.level -= 1;
        false
    }

    pub(super) fn visit_info(&mut self, id: NodeId) -> bool {
        if DOCUMENT_NAMES.contains(&self.doc.parent_name(id)) {
            self.process_info(id);
        }
        false
    }

    /// Document header: title, authors, revision line and attributes.
    fn process_info(&mut self, id: NodeId) {
        let doc = self.doc;
        let title = self.child_text(id, "title").unwrap_or_default();
        self.out.push_line(format!("= {title}"));

        let authors: Vec<String> = doc
            .descendants_named(id, "author")
            .into_iter()
            .map(|author| {
                let mut name = match self.text_at(author, "personname") {
                    Some(name) => name,
                    None => [self.text_at(author, "firstname"), self.text_at(author, "surname")]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" "),
                };
                if let Some(email) = self.text_at(author, "email") {
                    name = format!("{name} <{email}>");
                }
                name
            })
            .filter(|name| !name.is_empty())
            .collect();
        if !authors.is_empty() {
            self.out.push_line(authors.join("; "));
        }

        let revision = doc.descendants(id).find(|&d| {
            doc.is_named(d, "releaseinfo")
                || (doc.is_named(d, "revnumber")
                    && doc.parent(d).is_some_and(|p| self.has_ancestor(p, "revhistory", id)))
        });
        let date_prefix = revision
            .map(|r| format!("v{}, ", doc.text(r)))
            .unwrap_or_default();
        if let Some(date) = doc
            .elements(id)
            .find(|&c| doc.is_named(c, "date") || doc.is_named(c, "pubdate"))
        {
            self.out
                .push_line(format!("{date_prefix}{}", doc.text(date)));
        }

        let parent = doc.parent_name(id);
        let book = doc.name(id) == "bookinfo" || parent == "book" || parent == "chapter";
        self.header_attributes(book, false);
    }

    /// Whether `id`, or one of its ancestors below `stop`, is named `name`.
    fn has_ancestor(&self, id: NodeId, name: &str, stop: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == stop {
                return false;
            }
            if self.doc.is_named(node, name) {
                return true;
            }
            current = self.doc.parent(node);
        }
        false
    }

    /// `chapter` and `part`. A chapter at the root is rendered as a book.
    pub(super) fn visit_chapter(&mut self, id: NodeId) -> bool {
        if self.doc.is_root(id) {
            self.out.set_adjoin_next(true);
            self.process_section(id, None, true)
        } else {
            self.process_section(id, None, false)
        }
    }

    /// Sections, special sections and chapters.
    ///
    /// `special` names the section style (`appendix`, `glossary`, ...).
    /// `book_header` writes the document attributes below the title.
    pub(super) fn process_section(
        &mut self,
        id: NodeId,
        special: Option<&str>,
        book_header: bool,
    ) -> bool {
        let doc = self.doc;
        self.out.push_blank_line();
        if let Some(style) = special {
            self.out.push_line(":sectnums!:");
            self.out.push_blank_line();
            self.out.push_line(format!("[{style}]"));
        }

        let title_node = self.title_node(id);
        let mut rest = Vec::new();
        let title = match title_node {
            Some(node) => {
                let (mut title, title_rest) = split_first(self.format_text(node));
                rest = title_rest;
                let subtitle = doc
                    .child(id, "subtitle")
                    .or_else(|| doc.child_path(id, &["info", "subtitle"]));
                if let Some(subtitle) = subtitle {
                    let (sub, _) = split_first(self.format_text(subtitle));
                    title.push_str(": ");
                    title.push_str(&sub);
                }
                title
            }
            None => match special {
                Some(style) => capitalize(style),
                None => {
                    log::warn!("No title found for section node: <{}>", doc.name(id));
                    "Unknown Title!".to_string()
                }
            },
        };

        self.append_anchor_unless_implicit(id, &title);
        if let Some(node) = title_node {
            self.ifdef_start(node);
        }
        self.out
            .push_line(format!("{} {}", "=".repeat(self.level), unwrap_text(&title)));
        self.out.extend(rest);
        if let Some(node) = title_node {
            self.ifdef_end(node);
        }

        if book_header {
            self.header_attributes(true, true);
        }

        if let Some(abstract_node) = doc.child_path(id, &["info", "abstract"]) {
            self.out.push_line("");
            self.out.push_line("[abstract]");
            self.out.push_line("--");
            for element in doc.elements(abstract_node) {
                self.out.push_line("");
                self.traverse_children(element);
                self.out.push_line("");
            }
            self.out.push_text("--");
        }

        self.level += 1;
        self.traverse_elements(id);
        self.level -= 1;

        if special.is_some() {
            self.out.push_blank_line();
            self.out.push_line(":sectnums:");
        }
        false
    }

    /// Free-floating heading at its `renderas` level.
    pub(super) fn visit_bridgehead(&mut self, id: NodeId) -> bool {
        let level = match self.doc.attr(id, "renderas") {
            Some(renderas) => leading_number(renderas.trim_start_matches("sect")) + 1,
            None => self.level,
        };
        self.out.push_blank_line();
        self.out.push_line("[float]");
        let (title, rest) = split_first(self.format_text(id));
        self.append_anchor_unless_implicit(id, &title);
        self.out
            .push_line(format!("{} {}", "=".repeat(level), unwrap_text(&title)));
        self.out.extend(rest);
        false
    }

    /// `xi:include`: convert the referenced file next to itself and include
    /// the result.
    pub(super) fn visit_include(&mut self, id: NodeId) -> bool {
        let Some(href) = self.doc.attr(id, "href") else {
            log::warn!("Include without href! Skipping.");
            return false;
        };
        let target = href.replacen(".xml", ".adoc", 1);
        let source = self.resolve_path(href);

        if !source.is_file() {
            log::warn!("Include file not readable: {href}");
        } else if self.is_open(&source) {
            log::warn!("Include cycle at {href}! Not converting it again.");
        } else if let Err(err) = self.convert_include(&source, &self.resolve_path(&target)) {
            log::warn!("Failed to convert include {href}: {err}");
        }

        self.out.push_blank_line();
        if self.level > 1 {
            self.out
                .push_line(format!(":leveloffset: {}", self.level - 1));
        }
        self.out.push_line(format!("include::{target}[]"));
        if self.level > 1 {
            self.out.push_line(":leveloffset: 0");
        }
        false
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        }
    }

    /// Whether `path` is being converted by this visitor or one enclosing it.
    fn is_open(&self, path: &Path) -> bool {
        path.canonicalize()
            .is_ok_and(|canonical| self.open_files.contains(&canonical))
    }

    fn convert_include(&self, source: &Path, target: &Path) -> crate::Result<()> {
        log::debug!("Converting include {}", source.display());
        let bytes = fs::read(source)?;
        let text = crate::util::decode_xml(&bytes);
        let included = dom::parse(&text)?;
        let mut visitor = Visitor::new(&included, self.opts);
        visitor.open_files = self.open_files.clone();
        let mut visitor = visitor.with_source_file(source);
        if let Some(root) = included.root() {
            visitor.visit(root);
        }
        let mut buffer = visitor.into_buffer();
        buffer.trim_start();
        fs::write(target, buffer.finish())?;
        Ok(())
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Parse the leading digits of `text`, or 0 when there are none.
pub(super) fn leading_number(text: &str) -> usize {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
