//! Whitespace handling for paragraph text.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_ENDLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\n+ *").expect("valid pattern"));
static WRAPPED_INDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[\t\p{Zs}]*").expect("valid pattern"));
static TRAILING_ENDLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+\z").expect("valid pattern"));
static INDENTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[\t\p{Zs}]+").expect("valid pattern"));

/// Whitespace as understood by the trimming helpers below: ASCII whitespace
/// including vertical tab, plus NUL.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r' | '\0')
}

fn is_blank(c: char) -> bool {
    c == '\t' || (c.is_whitespace() && !matches!(c, '\n' | '\x0b' | '\x0c' | '\r'))
}

pub fn trim(text: &str) -> &str {
    text.trim_matches(is_space)
}

pub fn trim_start(text: &str) -> &str {
    text.trim_start_matches(is_space)
}

pub fn trim_end(text: &str) -> &str {
    text.trim_end_matches(is_space)
}

/// Whether the text is empty once trailing whitespace is removed.
pub fn is_blank_text(text: &str) -> bool {
    trim_end(text).is_empty()
}

/// Collapse the source layout of paragraph text.
///
/// Leading and trailing line breaks are removed and every line break with
/// its indentation becomes a single space, or a bare line break when
/// `preserve_wraps` is set. Whitespace-only text collapses to nothing.
pub fn strip_whitespace(text: &str, preserve_wraps: bool) -> String {
    if text.chars().all(|c| c.is_ascii_whitespace() || c == '\x0b') {
        return String::new();
    }
    let text = LEADING_ENDLINES.replace(text, "");
    let text = WRAPPED_INDENT.replace_all(&text, if preserve_wraps { "\n" } else { " " });
    TRAILING_ENDLINES.replace(&text, "").into_owned()
}

/// Join wrapped lines by dropping each line break and the indentation after
/// it.
pub fn unwrap_text(text: &str) -> String {
    WRAPPED_INDENT.replace_all(text, "").into_owned()
}

/// Remove leading indentation from every line.
pub fn strip_indentation(text: &str) -> String {
    INDENTATION.replace_all(text, "").into_owned()
}

/// Wrap text in double quotes when it contains a comma, so it survives as a
/// single macro attribute.
pub fn lazy_quote(text: &str) -> String {
    if text.contains(',') {
        format!("\"{text}\"")
    } else {
        text.to_string()
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Break a line after every sentence.
///
/// A period that starts a line or follows a word character, and is followed
/// by blanks, ends a sentence. The blanks are replaced by a line break,
/// except that a sentence ending the text keeps one trailing blank.
pub fn sentence_per_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        let boundary = prev.is_none_or(|p| p == '\n' || is_word(p));
        if c == '.' && boundary {
            let blanks = after.len() - after.trim_start_matches(is_blank).len();
            let run = &after[..blanks];
            let tail = &after[blanks..];
            let count = run.chars().count();
            let at_end = tail.is_empty() || tail == "\n";
            if count > 0 && (!at_end || count > 1) {
                out.push_str(".\n");
                if at_end {
                    // The final blank cannot be consumed.
                    let keep = run.chars().last().map(char::len_utf8).unwrap_or(0);
                    out.push_str(&run[run.len() - keep..]);
                }
                prev = Some('\n');
                rest = tail;
                continue;
            }
        }
        out.push(c);
        prev = Some(c);
        rest = after;
    }
    out
}

/// Put a line break after a leading `+` so it is not read as a list
/// continuation.
pub fn break_leading_plus(text: &str) -> String {
    match text.strip_prefix('+') {
        Some(rest) if !rest.is_empty() && !rest.starts_with('\n') => format!("+\n{rest}"),
        _ => text.to_string(),
    }
}

/// Wrap leading periods in a passthrough so they are not read as a block
/// title or list marker.
pub fn protect_leading_dots(text: &str) -> String {
    let dots = text.len() - text.trim_start_matches('.').len();
    if dots == 0 {
        return text.to_string();
    }
    format!("$${}$${}", &text[..dots], &text[dots..])
}
