//! SVG parsing and serialization.
//!
//! - [`extract`]: Root `<svg>` element extraction (attributes + inner markup)
//! - [`compose`]: `<symbol>` and sprite document serialization

pub mod compose;
pub mod extract;

pub use extract::{ExtractError, ExtractedSymbol, extract_root};
