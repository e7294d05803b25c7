//! User-supplied transform hooks.
//!
//! Hooks are the pass-through extension seam of the pipeline: raw markup
//! before parsing, each parsed symbol before composition, and the finished
//! sprite document before hashing. Every method defaults to the identity,
//! so implementors override only what they need.
//!
//! A hook failure is never fatal: per-symbol hooks degrade the affected
//! symbol to "absent", the sprite hook falls back to the unprocessed
//! document. Both are logged.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::svg::{ExtractedSymbol, extract_root};

/// What `process_symbol` may return: the structured symbol, or replacement
/// raw markup that is re-parsed into one.
pub enum HookOutput {
    Symbol(ExtractedSymbol),
    Markup(String),
}

impl HookOutput {
    /// Normalize into the canonical structured shape.
    pub fn into_symbol(self) -> Result<ExtractedSymbol> {
        match self {
            Self::Symbol(symbol) => Ok(symbol),
            Self::Markup(markup) => Ok(extract_root(&markup)?),
        }
    }
}

/// Transform hooks applied while processing one sprite's symbols.
pub trait SpriteHooks: Send + Sync {
    /// Process raw SVG markup before it is parsed.
    fn process_svg(&self, markup: &str, _file_path: &Path) -> Result<String> {
        Ok(markup.to_string())
    }

    /// Process a parsed symbol before it is added to the sprite.
    ///
    /// May mutate attributes and content, or return replacement markup.
    fn process_symbol(&self, symbol: ExtractedSymbol, _file_path: &Path) -> Result<HookOutput> {
        Ok(HookOutput::Symbol(symbol))
    }

    /// Process the finished sprite document right before it is hashed.
    fn process_sprite(&self, markup: &str, _name: &str) -> Result<String> {
        Ok(markup.to_string())
    }
}

/// Shared hook set attached to all symbols of one sprite.
pub type SharedHooks = Arc<dyn SpriteHooks>;

/// The do-nothing hook set.
pub struct PassthroughHooks;

impl SpriteHooks for PassthroughHooks {}
