//! # docbookrx
//!
//! A fast, lightweight library for converting DocBook XML (4.x and 5.x) to
//! AsciiDoc.
//!
//! ## Features
//!
//! - Sections, lists, tables, admonitions, figures and manual pages
//! - Inline markup, links, cross references and index terms
//! - Reverses the typographic substitutions AsciiDoc applies when rendering
//! - Converts `xi:include` targets to sibling `.adoc` files
//!
//! ## Quick Start
//!
//! ```
//! use docbookrx::{ConversionOptions, convert};
//!
//! let xml = r#"<article>
//!   <para>Please note the fruit:</para>
//!   <itemizedlist>
//!     <listitem><para>Apples</para></listitem>
//!     <listitem><para>Oranges</para></listitem>
//!   </itemizedlist>
//! </article>"#;
//!
//! let adoc = convert(xml, &ConversionOptions::default()).unwrap();
//! assert!(adoc.contains("* Apples\n* Oranges"));
//! ```
//!
//! ## Lower-level access
//!
//! [`dom::parse`] builds the source tree and [`Visitor`] walks it, so the
//! two steps can be driven separately:
//!
//! ```
//! use docbookrx::{ConversionOptions, Visitor, dom};
//!
//! let doc = dom::parse("<para>Hello <emphasis>world</emphasis> again</para>").unwrap();
//! let opts = ConversionOptions::default();
//! let adoc = Visitor::new(&doc, &opts).convert();
//! assert!(adoc.contains("Hello _world_ again"));
//! ```

pub mod asciidoc;
pub mod dom;
pub mod error;
pub mod options;
pub mod util;
pub mod visitor;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use options::ConversionOptions;
pub use visitor::Visitor;

/// Convert DocBook source text to AsciiDoc.
///
/// Includes are resolved against the current directory.
pub fn convert(source: &str, options: &ConversionOptions) -> Result<String> {
    let doc = dom::parse(source)?;
    Ok(Visitor::new(&doc, options).convert())
}

/// Convert raw DocBook bytes, honoring a byte order mark or the encoding
/// named in the XML declaration.
pub fn convert_bytes(bytes: &[u8], options: &ConversionOptions) -> Result<String> {
    convert(&util::decode_xml(bytes), options)
}

/// Convert a DocBook file and write the result next to it with an `.adoc`
/// extension. Returns the path written.
pub fn convert_file(path: impl AsRef<Path>, options: &ConversionOptions) -> Result<PathBuf> {
    let path = path.as_ref();
    let output = util::output_path(path);
    let adoc = convert_path(path, options)?;
    fs::write(&output, adoc)?;
    Ok(output)
}

/// Convert a DocBook file and return the AsciiDoc text.
///
/// Includes are resolved relative to the file's directory.
pub fn convert_path(path: impl AsRef<Path>, options: &ConversionOptions) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let doc = dom::parse(&util::decode_xml(&bytes))?;
    Ok(Visitor::new(&doc, options).with_source_file(path).convert())
}
