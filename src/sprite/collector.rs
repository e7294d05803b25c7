//! The aggregate owner of all sprites in one project.
//!
//! The collector fans lifecycle and filesystem events out to every sprite
//! and derives the lookup tables the surrounding tooling consumes. The
//! sprite set is fixed at construction; only membership within each sprite
//! changes over time.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::ProjectConfig;

use super::SPRITE_ROUTE;
use super::collection::Sprite;
use super::hooks::SharedHooks;
use super::symbol::ProcessedSymbol;

/// One symbol's markup and attributes, for inline-rendering consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolData {
    pub attributes: Vec<(String, String)>,
    pub dom: String,
}

impl From<&ProcessedSymbol> for SymbolData {
    fn from(processed: &ProcessedSymbol) -> Self {
        Self {
            attributes: processed.attributes.clone(),
            dom: processed.dom.clone(),
        }
    }
}

/// Owns every sprite of one project.
pub struct Collector {
    sprites: Vec<Sprite>,
    dev: bool,
}

impl Collector {
    /// Construct sprites from the project configuration, in name order.
    pub fn new(config: &ProjectConfig, dev: bool) -> Self {
        Self::with_hooks(config, FxHashMap::default(), dev)
    }

    /// Same as [`Self::new`], with transform hooks attached per sprite name.
    pub fn with_hooks(
        config: &ProjectConfig,
        mut hooks: FxHashMap<String, SharedHooks>,
        dev: bool,
    ) -> Self {
        let source_root = config.source_root().to_path_buf();
        let sprites = config
            .sprites
            .iter()
            .map(|(name, sprite_config)| {
                Sprite::new(
                    name.clone(),
                    sprite_config.clone(),
                    source_root.clone(),
                    hooks.remove(name),
                    dev,
                )
            })
            .collect();

        Self { sprites, dev }
    }

    /// Initialize every sprite. Sprites are independent, so discovery runs
    /// unordered in parallel; one sprite's failure never blocks another.
    pub fn init(&mut self) {
        self.sprites.par_iter_mut().for_each(Sprite::init);
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.name == name)
    }

    /// SVG file was added.
    pub fn handle_add(&mut self, path: &Path) {
        self.sprites.par_iter_mut().for_each(|s| s.handle_add(path));
    }

    /// SVG file was changed.
    pub fn handle_change(&self, path: &Path) {
        self.sprites.par_iter().for_each(|s| s.handle_change(path));
    }

    /// SVG file was removed.
    pub fn handle_unlink(&mut self, path: &Path) {
        self.sprites
            .par_iter_mut()
            .for_each(|s| s.handle_unlink(path));
    }

    /// Any directory was added.
    pub fn handle_add_dir(&mut self) {
        self.sprites.par_iter_mut().for_each(Sprite::handle_add_dir);
    }

    /// Any directory was removed.
    pub fn handle_unlink_dir(&mut self, folder: &Path) {
        self.sprites
            .par_iter_mut()
            .for_each(|s| s.handle_unlink_dir(folder));
    }

    /// Every known symbol id (fully prefixed) → owning sprite name.
    pub fn symbol_sprite_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for sprite in &self.sprites {
            let prefix = sprite.prefix();
            for (symbol, _) in sprite.get_processed_symbols() {
                map.insert(format!("{prefix}{}", symbol.id), sprite.name.clone());
            }
        }
        map
    }

    /// Sprite name → output file reference.
    ///
    /// Dev mode points at the serve endpoint (re-resolved per build so the
    /// digest stays current); build mode points at the hashed file under
    /// the configured asset prefix.
    pub fn sprite_paths(&self, asset_prefix: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for sprite in &self.sprites {
            let path = if self.dev {
                format!("{SPRITE_ROUTE}/{}", sprite.dev_file_name())
            } else {
                format!("{asset_prefix}{}", sprite.file_name())
            };
            map.insert(sprite.name.clone(), path);
        }
        map
    }

    /// Every known symbol id (fully prefixed) → markup and attributes.
    pub fn symbol_data(&self) -> BTreeMap<String, SymbolData> {
        let mut map = BTreeMap::new();
        for sprite in &self.sprites {
            let prefix = sprite.prefix();
            for (symbol, processed) in sprite.get_processed_symbols() {
                map.insert(
                    format!("{prefix}{}", symbol.id),
                    SymbolData::from(processed.as_ref()),
                );
            }
        }
        map
    }

    /// Sprite name → composed document markup, for consumers that persist
    /// it to storage.
    pub fn sprite_contents(&self) -> BTreeMap<String, String> {
        self.sprites
            .iter()
            .map(|sprite| (sprite.name.clone(), sprite.get_sprite().markup.clone()))
            .collect()
    }
}
