//! Conversion options.

use std::collections::BTreeMap;

/// Immutable settings for one conversion run.
///
/// The defaults give the usual AsciiDoc house style:
/// ids prefixed and separated with `_`, normalized explicit ids, one
/// sentence per line and delimited source blocks.
///
/// ```
/// use docbookrx::ConversionOptions;
///
/// let opts = ConversionOptions::default()
///     .with_attribute("uri-home", "https://example.org")
///     .with_sentence_per_line(false);
/// assert_eq!(opts.id_prefix, "_");
/// assert!(!opts.sentence_per_line);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct ConversionOptions {
    /// Prefix for generated and normalized ids.
    pub id_prefix: String,
    /// Separator used between words of generated ids.
    pub id_separator: String,
    /// Lowercase explicit ids and map `_`/`-` to the separator.
    pub normalize_ids: bool,
    /// Emit `:compat-mode:` in the document header.
    pub compat_mode: bool,
    /// Extra document attributes. Each becomes a `:name: value` header line,
    /// and a URL equal to a value is rewritten to `{name}`.
    pub attributes: BTreeMap<String, String>,
    /// Break paragraph text after each sentence.
    pub sentence_per_line: bool,
    /// Keep the source line breaks of paragraph text. Has no effect when
    /// `sentence_per_line` is enabled.
    pub preserve_line_wrap: bool,
    /// Always delimit program listings with `----`.
    pub delimit_source: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            id_prefix: "_".to_string(),
            id_separator: "_".to_string(),
            normalize_ids: true,
            compat_mode: false,
            attributes: BTreeMap::new(),
            sentence_per_line: true,
            preserve_line_wrap: false,
            delimit_source: true,
        }
    }
}

impl ConversionOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_id_separator(mut self, separator: impl Into<String>) -> Self {
        self.id_separator = separator.into();
        self
    }

    pub fn with_normalize_ids(mut self, normalize: bool) -> Self {
        self.normalize_ids = normalize;
        self
    }

    pub fn with_compat_mode(mut self, compat: bool) -> Self {
        self.compat_mode = compat;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_sentence_per_line(mut self, enabled: bool) -> Self {
        self.sentence_per_line = enabled;
        self
    }

    pub fn with_preserve_line_wrap(mut self, enabled: bool) -> Self {
        self.preserve_line_wrap = enabled;
        self
    }

    pub fn with_delimit_source(mut self, enabled: bool) -> Self {
        self.delimit_source = enabled;
        self
    }

    /// Whether source line breaks survive whitespace collapsing.
    pub fn wraps_preserved(&self) -> bool {
        !self.sentence_per_line && self.preserve_line_wrap
    }

    /// Name of the first attribute whose value is exactly `value`.
    pub fn attribute_for_value(&self, value: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(_, v)| v.as_str() == value)
            .map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConversionOptions::default();
        assert_eq!(opts.id_prefix, "_");
        assert_eq!(opts.id_separator, "_");
        assert!(opts.normalize_ids);
        assert!(!opts.compat_mode);
        assert!(opts.sentence_per_line);
        assert!(!opts.preserve_line_wrap);
        assert!(opts.delimit_source);
    }

    #[test]
    fn test_line_wrap_is_ignored_with_sentence_per_line() {
        let opts = ConversionOptions::default().with_preserve_line_wrap(true);
        assert!(!opts.wraps_preserved());
        let opts = opts.with_sentence_per_line(false);
        assert!(opts.wraps_preserved());
    }

    #[test]
    fn test_attribute_for_value() {
        let opts = ConversionOptions::default()
            .with_attribute("uri-orm", "http://example.org/orm")
            .with_attribute("uri-home", "http://example.org");
        assert_eq!(
            opts.attribute_for_value("http://example.org/orm"),
            Some("uri-orm")
        );
        assert_eq!(opts.attribute_for_value("http://example.com"), None);
    }
}
