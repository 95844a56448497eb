//! AsciiDoc output primitives: the line buffer, id derivation and text
//! normalization shared by the element handlers.

mod ids;
mod subs;
pub mod text;
mod writer;

pub use ids::{generate_id, normalize_id};
pub use subs::{ENTITY_TABLE, REPLACEMENT_TABLE, reverse_subs};
pub use writer::LineBuffer;
