//! One icon sourced from one file.
//!
//! A symbol lazily reads, parses and normalizes its SVG file on first
//! access and memoizes the result. Invalid sources (empty file, missing
//! root element, hook failure) are remembered as such, so repeat requests
//! do not re-attempt parsing until an explicit [`SpriteSymbol::reset`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use parking_lot::Mutex;

use crate::logger;
use crate::svg::extract_root;

use super::hooks::SharedHooks;

/// The normalized, reusable definition extracted from one icon file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSymbol {
    /// Root element attributes. Always contains `id`; never contains
    /// `width` or `height`.
    pub attributes: Vec<(String, String)>,
    /// Serialized child content of the root element.
    pub dom: String,
}

/// Memoization states for the processed result.
enum Cache {
    /// Not attempted yet (or reset since the last attempt).
    Pending,
    /// Last attempt failed; don't retry until reset.
    Invalid,
    Ready(Arc<ProcessedSymbol>),
}

/// One icon file belonging to a sprite.
pub struct SpriteSymbol {
    /// Symbol id, fixed at construction. Derived from the file stem unless
    /// explicitly given.
    pub id: String,
    /// Absolute path of the source file.
    pub file_path: PathBuf,

    hooks: Option<SharedHooks>,
    cache: Mutex<Cache>,
}

impl SpriteSymbol {
    /// Create a symbol whose id is the file's base name without extension.
    pub fn new(file_path: PathBuf, hooks: Option<SharedHooks>) -> Self {
        let id = file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::with_id(id, file_path, hooks)
    }

    /// Create a symbol with an explicit id (user-declared symbol files).
    pub fn with_id(id: impl Into<String>, file_path: PathBuf, hooks: Option<SharedHooks>) -> Self {
        Self {
            id: id.into(),
            file_path,
            hooks,
            cache: Mutex::new(Cache::Pending),
        }
    }

    /// Clear the memoized result, forcing the next [`Self::get_processed`]
    /// to redo all work.
    pub fn reset(&self) {
        *self.cache.lock() = Cache::Pending;
    }

    /// Read, parse and normalize the source file. Memoized.
    ///
    /// Returns `None` for invalid sources; the failure is logged once and
    /// remembered until `reset()`.
    pub fn get_processed(&self) -> Option<Arc<ProcessedSymbol>> {
        let mut cache = self.cache.lock();
        match &*cache {
            Cache::Invalid => None,
            Cache::Ready(processed) => Some(Arc::clone(processed)),
            Cache::Pending => match self.process() {
                Ok(processed) => {
                    let processed = Arc::new(processed);
                    *cache = Cache::Ready(Arc::clone(&processed));
                    Some(processed)
                }
                Err(e) => {
                    logger::warn(
                        "sprite",
                        &format!("skipping `{}`: {e:#}", self.file_path.display()),
                    );
                    *cache = Cache::Invalid;
                    None
                }
            },
        }
    }

    /// The full processing chain: read → pre-process hook → parse →
    /// per-symbol hook → normalize attributes.
    fn process(&self) -> Result<ProcessedSymbol> {
        let raw = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let raw = raw.trim();

        ensure!(!raw.is_empty(), "SVG file is empty");
        ensure!(raw.contains("<svg"), "no root <svg> element");

        let markup = match &self.hooks {
            Some(hooks) => hooks
                .process_svg(raw, &self.file_path)
                .context("process_svg hook failed")?,
            None => raw.to_string(),
        };

        let mut symbol = extract_root(&markup)?;
        symbol.set_attr("id", &self.id);

        if let Some(hooks) = &self.hooks {
            symbol = hooks
                .process_symbol(symbol, &self.file_path)
                .context("process_symbol hook failed")?
                .into_symbol()?;
        }

        // Final attribute normalization: id is forced even if a hook
        // dropped it, sizing is left to the consuming markup.
        symbol.remove_attr("width");
        symbol.remove_attr("height");
        symbol.set_attr("id", &self.id);

        Ok(ProcessedSymbol {
            attributes: symbol.attributes,
            dom: symbol.content,
        })
    }
}
