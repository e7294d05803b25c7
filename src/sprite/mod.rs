//! The sprite pipeline core.
//!
//! Three layers, leaf first:
//! - [`symbol`]: one icon file, lazily parsed and memoized
//! - [`collection`]: a named sprite composing many symbols into one document
//! - [`collector`]: the project-wide owner fanning out events and deriving
//!   lookup tables
//!
//! Plus [`hooks`] (user transform seam) and [`template`] (generated source
//! modules).

pub mod collection;
pub mod collector;
pub mod hooks;
pub mod symbol;
pub mod template;

pub use collection::{Sprite, SpriteDocument};
pub use collector::Collector;
pub use symbol::{ProcessedSymbol, SpriteSymbol};

/// URL route under which the dev server exposes current sprite documents.
pub const SPRITE_ROUTE: &str = "/__sprite";
