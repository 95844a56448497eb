//! Element classification.
//!
//! Every node maps to exactly one [`Handler`]. Families of elements that
//! render the same way share a handler; everything else is matched by exact
//! local name.

use crate::dom::{Document, NodeId, NodeKind};

pub const PARA_NAMES: &[&str] = &["para", "simpara"];

pub const ADMONITION_NAMES: &[&str] = &["note", "tip", "warning", "caution", "important"];

pub const NORMAL_SECTION_NAMES: &[&str] = &[
    "section",
    "simplesect",
    "sect1",
    "sect2",
    "sect3",
    "sect4",
    "sect5",
    "refsection",
    "refsect1",
    "refsect2",
    "refsect3",
];

pub const SPECIAL_SECTION_NAMES: &[&str] =
    &["abstract", "appendix", "bibliography", "glossary", "preface"];

pub const DOCUMENT_NAMES: &[&str] = &["article", "book", "refentry"];

pub const ANONYMOUS_LITERAL_NAMES: &[&str] =
    &["abbrev", "acronym", "code", "database", "function", "literal", "tag"];

pub const NAMED_LITERAL_NAMES: &[&str] = &[
    "application",
    "organization",
    "classname",
    "constant",
    "envar",
    "exceptionname",
    "interfacename",
    "methodname",
    "option",
    "parameter",
    "property",
    "replaceable",
    "type",
    "varname",
    "prompt",
    "command",
    "userinput",
    "computeroutput",
];

pub const KEYWORD_NAMES: &[&str] = &["package", "firstterm", "citetitle"];

pub const PATH_NAMES: &[&str] = &["directory", "filename", "systemitem"];

pub const UI_NAMES: &[&str] = &["guibutton", "guilabel", "menuchoice", "guimenu", "keycap"];

pub const LIST_NAMES: &[&str] = &[
    "itemizedlist",
    "orderedlist",
    "variablelist",
    "procedure",
    "substeps",
    "stepalternatives",
];

pub const IGNORED_NAMES: &[&str] = &["title", "subtitle", "toc"];

/// Block-level elements. A paragraph holding any of these cannot be folded
/// into a single run-in line.
pub const BLOCK_NAMES: &[&str] = &[
    "blockquote",
    "calloutlist",
    "caution",
    "cmdsynopsis",
    "example",
    "figure",
    "formalpara",
    "funcsynopsis",
    "important",
    "informalexample",
    "informaltable",
    "itemizedlist",
    "literallayout",
    "mediaobject",
    "note",
    "orderedlist",
    "para",
    "procedure",
    "programlisting",
    "qandaset",
    "screen",
    "screenshot",
    "sidebar",
    "simpara",
    "simplelist",
    "synopsis",
    "table",
    "tip",
    "variablelist",
    "warning",
];

pub fn is_literal(name: &str) -> bool {
    ANONYMOUS_LITERAL_NAMES.contains(&name) || NAMED_LITERAL_NAMES.contains(&name)
}

/// Literal spans and emphasis.
pub fn is_formatting(name: &str) -> bool {
    is_literal(name) || name == "emphasis"
}

/// Rendering rule for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Pi,
    EntityRef,
    Text,
    Unknown,
    Ignore,

    // Families
    Admonition,
    Literal,
    Keyword,
    Path,
    Ui,
    Section,
    SpecialSection,

    // Document structure
    Document,
    Info,
    Chapter,
    Include,
    Bridgehead,

    // Paragraphs
    FormalPara,
    Para,
    SimPara,

    // Lists
    ItemizedList,
    Procedure,
    OrderedList,
    VariableList,
    ListItem,
    VarListEntry,
    GlossEntry,
    GlossTerm,
    GlossDef,

    // Bibliography
    Citation,
    BiblioDiv,
    BiblioMisc,
    BiblioMixed,

    // Verbatim and delimited blocks
    LiteralLayout,
    Screen,
    ProgramListing,
    Synopsis,
    Example,
    Sidebar,
    BlockQuote,
    Table,
    Figure,
    FuncSynopsis,
    QandaSet,

    // Inline
    Anchor,
    Email,
    Link,
    Uri,
    Xref,
    Phrase,
    ForeignPhrase,
    Attribution,
    Quote,
    Emphasis,
    Remark,
    Trademark,
    GuiIcon,
    Footnote,
    InlineMediaObject,
    IndexTerm,

    // Manual pages
    RefMeta,
    RefNameDiv,
    RefSynopsisDiv,
    CmdSynopsis,
    Arg,
    Group,
    Optional,
    Sbr,
    CiteRefEntry,
}

/// Pick the handler for a node.
pub fn classify(doc: &Document, id: NodeId) -> Handler {
    match doc.kind(id) {
        Some(NodeKind::ProcessingInstruction) => return Handler::Pi,
        Some(NodeKind::EntityRef) => return Handler::EntityRef,
        Some(NodeKind::Text) => return Handler::Text,
        Some(NodeKind::Element) => {}
        _ => return Handler::Unknown,
    }

    let name = doc.name(id);
    if ADMONITION_NAMES.contains(&name) {
        return Handler::Admonition;
    }
    if is_literal(name) {
        return Handler::Literal;
    }
    if KEYWORD_NAMES.contains(&name) {
        return Handler::Keyword;
    }
    if PATH_NAMES.contains(&name) {
        return Handler::Path;
    }
    if UI_NAMES.contains(&name) {
        return Handler::Ui;
    }
    if NORMAL_SECTION_NAMES.contains(&name) {
        return Handler::Section;
    }
    if SPECIAL_SECTION_NAMES.contains(&name) {
        return Handler::SpecialSection;
    }

    match name {
        "title" | "subtitle" | "toc" => Handler::Ignore,
        "book" | "article" | "refentry" => Handler::Document,
        "info" | "bookinfo" | "articleinfo" => Handler::Info,
        "chapter" | "part" => Handler::Chapter,
        "include" => Handler::Include,
        "bridgehead" => Handler::Bridgehead,
        "formalpara" => Handler::FormalPara,
        "para" => Handler::Para,
        "simpara" => Handler::SimPara,
        "itemizedlist" => Handler::ItemizedList,
        "procedure" => Handler::Procedure,
        "orderedlist" | "substeps" | "stepalternatives" => Handler::OrderedList,
        "variablelist" => Handler::VariableList,
        "listitem" | "step" => Handler::ListItem,
        "varlistentry" => Handler::VarListEntry,
        "glossentry" => Handler::GlossEntry,
        "glossterm" => Handler::GlossTerm,
        "glossdef" => Handler::GlossDef,
        "citation" => Handler::Citation,
        "bibliodiv" => Handler::BiblioDiv,
        "bibliomisc" => Handler::BiblioMisc,
        "bibliomixed" => Handler::BiblioMixed,
        "literallayout" => Handler::LiteralLayout,
        "screen" => Handler::Screen,
        "programlisting" => Handler::ProgramListing,
        "synopsis" => Handler::Synopsis,
        "example" | "informalexample" => Handler::Example,
        "sidebar" => Handler::Sidebar,
        "blockquote" => Handler::BlockQuote,
        "table" | "informaltable" => Handler::Table,
        "figure" | "mediaobject" | "screenshot" => Handler::Figure,
        "funcsynopsis" => Handler::FuncSynopsis,
        "qandaset" => Handler::QandaSet,
        "anchor" => Handler::Anchor,
        "email" => Handler::Email,
        "link" => Handler::Link,
        "uri" | "ulink" => Handler::Uri,
        "xref" => Handler::Xref,
        "phrase" => Handler::Phrase,
        "foreignphrase" => Handler::ForeignPhrase,
        "attribution" => Handler::Attribution,
        "quote" => Handler::Quote,
        "emphasis" => Handler::Emphasis,
        "remark" => Handler::Remark,
        "trademark" => Handler::Trademark,
        "guiicon" => Handler::GuiIcon,
        "footnote" => Handler::Footnote,
        "inlinemediaobject" => Handler::InlineMediaObject,
        "indexterm" => Handler::IndexTerm,
        "refmeta" => Handler::RefMeta,
        "refnamediv" => Handler::RefNameDiv,
        "refsynopsisdiv" => Handler::RefSynopsisDiv,
        "cmdsynopsis" => Handler::CmdSynopsis,
        "arg" => Handler::Arg,
        "group" => Handler::Group,
        "optional" => Handler::Optional,
        "sbr" => Handler::Sbr,
        "citerefentry" => Handler::CiteRefEntry,
        _ => Handler::Unknown,
    }
}

impl Handler {
    /// Whether entering this handler opens a list level.
    pub fn opens_list(self) -> bool {
        matches!(
            self,
            Handler::ItemizedList | Handler::Procedure | Handler::OrderedList
        )
    }

    /// Whether this handler pushes an inline formatting marker.
    pub fn pushes_marker(self) -> bool {
        matches!(self, Handler::Emphasis | Handler::Literal)
    }
}
