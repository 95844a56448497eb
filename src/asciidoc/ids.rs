//! Section identifiers.
//!
//! AsciiDoc derives an implicit id from every section title. These helpers
//! compute that id, so an explicit id that matches it can be dropped, and
//! normalize explicit DocBook ids into the same shape.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static ILLEGAL_ID_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:[[:alpha:]]+|#[[:digit:]]+|#x[[:alnum:]]+);|[^A-Za-z0-9_]")
        .expect("valid id pattern")
});

/// Derive the id AsciiDoc assigns to a section with the given title.
///
/// Entity references and every character outside `[A-Za-z0-9_]` become
/// `separator`; runs of the separator collapse and one trailing separator
/// is dropped from the title part. `prefix` is kept as given. With an empty
/// `prefix` no leading separator survives.
///
/// ```
/// use docbookrx::asciidoc::generate_id;
///
/// assert_eq!(generate_id("First Section", "_", "_"), "_first_section");
/// assert_eq!(generate_id("What's new?", "", "-"), "what-s-new");
/// ```
pub fn generate_id(title: &str, prefix: &str, separator: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = ILLEGAL_ID_CHARS.replace_all(&lowered, NoExpand(separator));
    let mut slug = squeeze(&replaced, separator);
    if !separator.is_empty() && slug.ends_with(separator) {
        slug.truncate(slug.len() - separator.len());
    }
    if !prefix.is_empty() {
        return format!("{prefix}{slug}");
    }
    match separator {
        "" => slug,
        sep => slug.trim_start_matches(sep).to_string(),
    }
}

/// Lowercase an explicit id, translate `_` and `-` through `separator` and
/// prepend `prefix` unless the id already starts with it.
///
/// `_` becomes the first character of `separator` and `-` the second, or the
/// last one when `separator` is a single character. An empty `separator`
/// deletes both.
///
/// ```
/// use docbookrx::asciidoc::normalize_id;
///
/// assert_eq!(normalize_id("Getting-Started", "_", "_"), "_getting_started");
/// assert_eq!(normalize_id("_usage", "_", "_"), "_usage");
/// assert_eq!(normalize_id("a_b-c", "", "+="), "a+b=c");
/// ```
pub fn normalize_id(raw: &str, prefix: &str, separator: &str) -> String {
    let underscore = separator.chars().next();
    let hyphen = separator.chars().nth(1).or_else(|| separator.chars().last());
    let normalized: String = raw
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '_' => underscore,
            '-' => hyphen,
            other => Some(other),
        })
        .collect();
    if normalized.starts_with(prefix) {
        normalized
    } else {
        format!("{prefix}{normalized}")
    }
}

/// Collapse runs of any separator character into a single occurrence.
fn squeeze(text: &str, separator: &str) -> String {
    if separator.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last: Option<char> = None;
    for c in text.chars() {
        if last == Some(c) && separator.contains(c) {
            continue;
        }
        out.push(c);
        last = Some(c);
    }
    out
}
