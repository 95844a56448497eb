//! WASM bindings for browser-based conversion.
//!
//! This module exposes the core conversion functions to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::ConversionOptions;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert DocBook XML text to AsciiDoc with the default options.
#[wasm_bindgen]
pub fn docbook_to_asciidoc(source: &str) -> Result<String, JsValue> {
    crate::convert(source, &ConversionOptions::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert raw DocBook bytes, honoring the encoding in the XML declaration.
///
/// `sentence_per_line` toggles one sentence per output line.
#[wasm_bindgen]
pub fn docbook_bytes_to_asciidoc(data: &[u8], sentence_per_line: bool) -> Result<String, JsValue> {
    let options = ConversionOptions::default().with_sentence_per_line(sentence_per_line);
    crate::convert_bytes(data, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}
