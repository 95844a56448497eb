//! Reverse AsciiDoc text substitutions.
//!
//! AsciiDoc replaces sequences like `(C)` or `--` with typographic
//! characters when it renders a document. Source text that already contains
//! those characters is mapped back to the plain sequences so the rendered
//! output matches the DocBook source.

/// Typographic characters and the plain text AsciiDoc turns into them.
pub const ENTITY_TABLE: &[(char, &str)] = &[
    ('\u{a9}', "(C)"),
    ('\u{ae}', "(R)"),
    ('\u{2009}', " "),
    ('\u{2014}', "--"),
    ('\u{2018}', "'`"),
    ('\u{2019}', "`'"),
    ('\u{201c}', "\"`"),
    ('\u{201d}', "`\""),
    ('\u{2026}', "..."),
    ('\u{2122}', "(TM)"),
    ('\u{2190}', "<-"),
    ('\u{2192}', "->"),
    ('\u{21d0}', "<="),
    ('\u{21d2}', "=>"),
];

/// Literal sequences AsciiDoc would interpret as markup.
pub const REPLACEMENT_TABLE: &[(&str, &str)] = &[(":: ", "{two-colons} ")];

fn entity_replacement(c: char) -> Option<&'static str> {
    ENTITY_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Replace typographic characters and markup-like sequences with their
/// plain-text equivalents.
///
/// ```
/// use docbookrx::asciidoc::reverse_subs;
///
/// assert_eq!(reverse_subs("\u{a9} Acme, Inc."), "(C) Acme, Inc.");
/// assert_eq!(reverse_subs("term:: value"), "term{two-colons} value");
/// ```
pub fn reverse_subs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match entity_replacement(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    for (from, to) in REPLACEMENT_TABLE {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}
