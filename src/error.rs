//! Error types for docbookrx operations.

use thiserror::Error;

/// Errors that can occur while reading or converting a DocBook document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Not a parseable document: no root element")]
    NoRoot,
}

pub type Result<T> = std::result::Result<T, Error>;
