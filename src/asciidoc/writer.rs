//! Line-oriented output buffer.

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_WITH_TRAILER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:ifdef|endif)::.+?\[\])(.+)$").expect("valid directive pattern"));

/// Ordered output lines with look-behind editing.
///
/// Only the last line can be extended in place; earlier lines change only
/// through [`pop_line`](Self::pop_line) and [`splice_back`](Self::splice_back).
///
/// Two one-shot flags absorb the next blank line: `continuation` (content
/// joined to a list item with `+`) and `adjoin_next` (a block title or
/// delimiter directly above the next block). A blank line consumes the
/// continuation flag first.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    continuation: bool,
    adjoin_next: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The last line, if any.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// The last line, or `""` when the buffer is empty.
    pub fn last_or_empty(&self) -> &str {
        self.last().unwrap_or("")
    }

    /// Whether the buffer ends with an empty line.
    pub fn last_is_empty(&self) -> bool {
        self.last().is_some_and(str::is_empty)
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Push an empty line unless a one-shot flag absorbs it.
    pub fn push_blank_line(&mut self) {
        if self.continuation {
            self.continuation = false;
        } else if self.adjoin_next {
            self.adjoin_next = false;
        } else {
            self.lines.push(String::new());
        }
    }

    /// Append a fragment to the last line.
    ///
    /// Callers must make sure a line exists, normally through a preceding
    /// [`push_blank_line`](Self::push_blank_line).
    pub fn push_text(&mut self, fragment: &str) {
        debug_assert!(!self.lines.is_empty(), "push_text on an empty buffer");
        match self.lines.last_mut() {
            Some(last) => last.push_str(fragment),
            None => self.lines.push(fragment.to_string()),
        }
    }

    /// Remove the last line.
    pub fn pop_line(&mut self) -> Option<String> {
        self.lines.pop()
    }

    /// Remove and return the last `n` lines, or every line when `n` exceeds
    /// the length.
    pub fn splice_back(&mut self, n: usize) -> Vec<String> {
        let at = self.lines.len().saturating_sub(n);
        self.lines.split_off(at)
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.extend(lines);
    }

    pub fn continuation(&self) -> bool {
        self.continuation
    }

    pub fn set_continuation(&mut self, value: bool) {
        self.continuation = value;
    }

    pub fn set_adjoin_next(&mut self, value: bool) {
        self.adjoin_next = value;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drop leading empty lines.
    pub fn trim_start(&mut self) {
        let blank = self.lines.iter().take_while(|l| l.is_empty()).count();
        self.lines.drain(..blank);
    }

    /// Flatten the buffer into text.
    ///
    /// A conditional directive that shares its line with other content is
    /// split onto a line of its own.
    pub fn finish(self) -> String {
        let mut out: Vec<String> = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            match DIRECTIVE_WITH_TRAILER.captures(&line) {
                Some(caps) => {
                    out.push(caps[1].to_string());
                    out.push(caps[2].to_string());
                }
                None => out.push(line),
            }
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_extends_last_line() {
        let mut buf = LineBuffer::new();
        buf.push_blank_line();
        buf.push_text("Hello");
        buf.push_text(", World");
        assert_eq!(buf.lines(), &["Hello, World".to_string()]);
    }

    #[test]
    fn test_continuation_absorbs_blank_line_first() {
        let mut buf = LineBuffer::new();
        buf.push_line("* item");
        buf.set_continuation(true);
        buf.set_adjoin_next(true);
        buf.push_blank_line();
        assert_eq!(buf.len(), 1);
        assert!(!buf.continuation());
        buf.push_blank_line();
        assert_eq!(buf.len(), 1);
        buf.push_blank_line();
        assert_eq!(buf.len(), 2);
        assert!(buf.last_is_empty());
    }

    #[test]
    fn test_splice_back() {
        let mut buf = LineBuffer::new();
        buf.extend(["a", "b", "c"].map(String::from));
        assert_eq!(buf.splice_back(2), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(buf.lines(), &["a".to_string()]);
        assert_eq!(buf.splice_back(5), vec!["a".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_finish_splits_directives() {
        let mut buf = LineBuffer::new();
        buf.push_line("a");
        buf.push_line("ifdef::foo[]b");
        buf.push_line("endif::foo[]");
        buf.push_line("endif::foo[]c");
        assert_eq!(buf.finish(), "a\nifdef::foo[]\nb\nendif::foo[]\nendif::foo[]\nc");
    }

    #[test]
    fn test_trim_start() {
        let mut buf = LineBuffer::new();
        buf.extend(["", "", "= Title", ""].map(String::from));
        buf.trim_start();
        assert_eq!(buf.finish(), "= Title\n");
    }
}
