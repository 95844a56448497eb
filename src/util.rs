//! Input decoding and path helpers.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Bytes searched for the end of the XML declaration.
const DECLARATION_LIMIT: usize = 256;

/// Decode an XML document to text.
///
/// The encoding comes from, in order of precedence, a byte order mark, the
/// `encoding` of the XML declaration, and a UTF-8 check of the bytes, with
/// windows-1252 (a superset of ISO-8859-1) as the last resort. Well-formed
/// UTF-8 input is borrowed.
pub fn decode_xml(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        log::debug!("Byte order mark selects {}", encoding.name());
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
    }

    if let Some(encoding) = declared_encoding(bytes)
        && encoding != UTF_8
    {
        log::debug!("XML declaration selects {}", encoding.name());
        return encoding.decode_without_bom_handling(bytes).0;
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            log::debug!("Input is not valid UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

/// The encoding named by an XML declaration at the very start of `bytes`.
///
/// Labels that are unknown, or name an encoding the declaration itself could
/// not have been written in (UTF-16 without a byte order mark), give `None`.
pub fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECLARATION_LIMIT)];
    let decl = head.strip_prefix(b"<?xml")?;
    if !decl.first().is_some_and(u8::is_ascii_whitespace) {
        return None;
    }
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = &decl[..end];

    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let value = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?;
    let (&quote, value) = value.trim_ascii_start().split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = value.iter().position(|&b| b == quote)?;

    Encoding::for_label(&value[..len]).filter(|encoding| encoding.is_ascii_compatible())
}

/// The AsciiDoc file written next to a DocBook input.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("adoc")
}
