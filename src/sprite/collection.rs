//! A named collection of symbols composed into one sprite document.
//!
//! The sprite owns its symbols exclusively. Membership comes from glob
//! discovery plus explicit id → path entries; the composed document is
//! memoized and explicitly invalidated whenever membership or member
//! content changes. A no-op event never forces a rebuild.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::GlobSet;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::config::SpriteConfig;
use crate::logger;
use crate::svg::compose::{self, SymbolEntry};
use crate::utils::path::resolve_path;
use crate::utils::{glob, hash};

use super::hooks::SharedHooks;
use super::symbol::{ProcessedSymbol, SpriteSymbol};

/// The composed sprite output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDocument {
    /// One root SVG document with a `<defs>` of `<symbol>` elements.
    pub markup: String,
    /// Content fingerprint of `markup`, used for cache busting.
    pub digest: String,
}

/// A named sprite and its member symbols.
pub struct Sprite {
    /// Unique sprite name. `"default"` gets unprefixed symbol ids.
    pub name: String,

    config: SpriteConfig,
    source_root: PathBuf,
    dev: bool,
    hooks: Option<SharedHooks>,

    /// Compiled import patterns; `None` until init, or when compilation
    /// failed (the sprite then only holds explicit symbol files).
    matcher: Option<GlobSet>,

    symbols: Vec<SpriteSymbol>,
    generated: Mutex<Option<Arc<SpriteDocument>>>,
}

impl Sprite {
    pub fn new(
        name: impl Into<String>,
        config: SpriteConfig,
        source_root: PathBuf,
        hooks: Option<SharedHooks>,
        dev: bool,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            source_root,
            dev,
            hooks,
            matcher: None,
            symbols: Vec::new(),
            generated: Mutex::new(None),
        }
    }

    /// Discover member files and construct symbols. No parsing happens
    /// here; symbols stay lazy until first access.
    ///
    /// A malformed pattern or an empty result is reported but leaves the
    /// sprite in a valid (possibly empty) state.
    pub fn init(&mut self) {
        if !self.config.import_patterns.is_empty() {
            match glob::build_matcher(&self.config.import_patterns) {
                Ok(matcher) => {
                    for file in glob::resolve_files(&self.source_root, &matcher) {
                        self.symbols
                            .push(SpriteSymbol::new(file, self.hooks.clone()));
                    }
                    self.matcher = Some(matcher);
                }
                Err(e) => logger::error("sprite", &format!("sprite `{}`: {e:#}", self.name)),
            }
        }

        for (id, path) in &self.config.symbol_files {
            let file = resolve_path(path, &self.source_root);
            self.symbols
                .push(SpriteSymbol::with_id(id.clone(), file, self.hooks.clone()));
        }

        if self.symbols.is_empty() {
            logger::error(
                "sprite",
                &format!(
                    "sprite `{}`: no SVG files found in configured import patterns",
                    self.name
                ),
            );
        }
    }

    /// Drop the memoized sprite document.
    pub fn reset(&self) {
        *self.generated.lock() = None;
    }

    /// Current member count (valid or not).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Namespace prefix applied to this sprite's ids in public tables.
    pub fn prefix(&self) -> String {
        if self.name == "default" {
            String::new()
        } else {
            format!("{}/", self.name)
        }
    }

    /// All members with a valid processed result, sorted by id.
    ///
    /// Duplicate ids within the sprite keep the first-seen member (by
    /// insertion order) and report the rest.
    pub fn get_processed_symbols(&self) -> Vec<(&SpriteSymbol, Arc<ProcessedSymbol>)> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut processed = Vec::with_capacity(self.symbols.len());

        for symbol in &self.symbols {
            if !seen.insert(symbol.id.as_str()) {
                logger::error(
                    "sprite",
                    &format!(
                        "sprite `{}`: duplicate symbol id `{}` ({}), keeping first occurrence",
                        self.name,
                        symbol.id,
                        symbol.file_path.display()
                    ),
                );
                continue;
            }

            if let Some(result) = symbol.get_processed() {
                processed.push((symbol, result));
            }
        }

        processed.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        processed
    }

    /// Compose (or return the memoized) sprite document.
    ///
    /// The document is built to completion before being cached, so a
    /// concurrent reader either sees the previous complete document or
    /// triggers a fresh build of its own.
    pub fn get_sprite(&self) -> Arc<SpriteDocument> {
        if let Some(doc) = self.generated.lock().clone() {
            return doc;
        }

        let processed = self.get_processed_symbols();
        let entries: Vec<SymbolEntry<'_>> = processed
            .iter()
            .map(|(symbol, result)| SymbolEntry {
                file_path: &symbol.file_path,
                attributes: &result.attributes,
                content: &result.dom,
            })
            .collect();

        let mut markup = compose::sprite_document(&entries, self.dev);

        if let Some(hooks) = &self.hooks {
            match hooks.process_sprite(&markup, &self.name) {
                Ok(result) => markup = result,
                Err(e) => logger::warn(
                    "sprite",
                    &format!("sprite `{}`: process_sprite hook failed: {e:#}", self.name),
                ),
            }
        }

        // Hash the final serialized markup so hook output participates in
        // cache busting.
        let digest = hash::fingerprint(&markup);
        let doc = Arc::new(SpriteDocument { markup, digest });
        *self.generated.lock() = Some(Arc::clone(&doc));
        doc
    }

    /// Hashed production file name, e.g. `sprite-default.a1b2c3d4.svg`.
    pub fn file_name(&self) -> String {
        format!("sprite-{}.{}.svg", self.name, self.get_sprite().digest)
    }

    /// Dot-separated dev endpoint file name, e.g.
    /// `sprite.default.a1b2c3d4.svg`. The serve route parses the sprite
    /// name back out of this shape.
    pub fn dev_file_name(&self) -> String {
        format!("sprite.{}.{}.svg", self.name, self.get_sprite().digest)
    }

    /// A file appeared. Becomes a member if it matches the patterns and is
    /// not already one.
    pub fn handle_add(&mut self, path: &Path) {
        let Some(matcher) = &self.matcher else {
            return;
        };

        if glob::matches(&self.source_root, matcher, path)
            && !self.symbols.iter().any(|s| s.file_path == path)
        {
            self.symbols
                .push(SpriteSymbol::new(path.to_path_buf(), self.hooks.clone()));
            self.reset();
        }
    }

    /// A file's content changed. Invalidates the matching member.
    pub fn handle_change(&self, path: &Path) {
        if let Some(symbol) = self.symbols.iter().find(|s| s.file_path == path) {
            symbol.reset();
            self.reset();
        }
    }

    /// A file was removed. Drops the matching member.
    pub fn handle_unlink(&mut self, path: &Path) {
        let before = self.symbols.len();
        self.symbols.retain(|s| s.file_path != path);
        if self.symbols.len() != before {
            self.reset();
        }
    }

    /// A directory appeared. Re-resolves the whole pattern set and appends
    /// any newly matching files.
    pub fn handle_add_dir(&mut self) {
        let Some(matcher) = &self.matcher else {
            return;
        };

        let existing: FxHashSet<&Path> =
            self.symbols.iter().map(|s| s.file_path.as_path()).collect();

        let new_files: Vec<PathBuf> = glob::resolve_files(&self.source_root, matcher)
            .into_iter()
            .filter(|file| !existing.contains(file.as_path()))
            .collect();

        if new_files.is_empty() {
            return;
        }

        for file in new_files {
            self.symbols
                .push(SpriteSymbol::new(file, self.hooks.clone()));
        }
        self.reset();
    }

    /// A directory was removed. Drops every member underneath it.
    pub fn handle_unlink_dir(&mut self, folder: &Path) {
        let before = self.symbols.len();
        self.symbols.retain(|s| !s.file_path.starts_with(folder));
        if self.symbols.len() != before {
            self.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpriteConfig;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = crate::utils::path::normalize_path(dir.path());
        fs::create_dir_all(root.join("icons")).unwrap();
        fs::write(
            root.join("icons/home.svg"),
            r#"<svg viewBox="0 0 10 10"><path d="M0 0"/></svg>"#,
        )
        .unwrap();
        fs::write(
            root.join("icons/user.svg"),
            r#"<svg viewBox="0 0 12 12"><circle r="5"/></svg>"#,
        )
        .unwrap();
        (dir, root)
    }

    fn sprite(name: &str, root: &Path, patterns: &[&str]) -> Sprite {
        let config = SpriteConfig {
            import_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            symbol_files: BTreeMap::new(),
        };
        let mut sprite = Sprite::new(name, config, root.to_path_buf(), None, false);
        sprite.init();
        sprite
    }

    #[test]
    fn test_init_and_sorted_processing() {
        let (_dir, root) = setup();
        let sprite = sprite("default", &root, &["icons/*.svg"]);

        assert_eq!(sprite.len(), 2);
        let processed = sprite.get_processed_symbols();
        let ids: Vec<&str> = processed.iter().map(|(s, _)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "user"]);
    }

    #[test]
    fn test_symbol_files_appended_with_explicit_id() {
        let (_dir, root) = setup();
        fs::write(root.join("special.svg"), "<svg><g/></svg>").unwrap();

        let config = SpriteConfig {
            import_patterns: vec!["icons/*.svg".to_string()],
            symbol_files: BTreeMap::from([("extra".to_string(), PathBuf::from("special.svg"))]),
        };
        let mut sprite = Sprite::new("default", config, root.clone(), None, false);
        sprite.init();

        let processed = sprite.get_processed_symbols();
        let ids: Vec<&str> = processed.iter().map(|(s, _)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["extra", "home", "user"]);
    }

    #[test]
    fn test_document_contains_symbols_in_id_order() {
        let (_dir, root) = setup();
        let sprite = sprite("default", &root, &["icons/*.svg"]);

        let doc = sprite.get_sprite();
        let home = doc.markup.find(r#"<symbol viewBox="0 0 10 10" id="home">"#);
        let user = doc.markup.find(r#"<symbol viewBox="0 0 12 12" id="user">"#);
        assert!(home.is_some() && user.is_some());
        assert!(home < user);
        assert_eq!(doc.digest.len(), 8);
    }

    #[test]
    fn test_document_memoized() {
        let (_dir, root) = setup();
        let sprite = sprite("default", &root, &["icons/*.svg"]);

        let first = sprite.get_sprite();
        let second = sprite.get_sprite();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.markup, second.markup);
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn test_change_and_reset_updates_digest() {
        let (_dir, root) = setup();
        let sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        fs::write(
            root.join("icons/home.svg"),
            r#"<svg viewBox="0 0 10 10"><path d="M5 5"/></svg>"#,
        )
        .unwrap();
        sprite.handle_change(&root.join("icons/home.svg"));

        let after = sprite.get_sprite();
        assert_ne!(before.digest, after.digest);
        assert!(after.markup.contains("M5 5"));
    }

    #[test]
    fn test_change_for_unknown_path_is_noop() {
        let (_dir, root) = setup();
        let sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        sprite.handle_change(&root.join("icons/unknown.svg"));

        // Cache untouched: same Arc.
        assert!(Arc::ptr_eq(&before, &sprite.get_sprite()));
    }

    #[test]
    fn test_handle_add_matching_and_non_matching() {
        let (_dir, root) = setup();
        let mut sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        // Non-matching path: membership and digest unchanged.
        fs::write(root.join("elsewhere.svg"), "<svg><g/></svg>").unwrap();
        sprite.handle_add(&root.join("elsewhere.svg"));
        assert_eq!(sprite.len(), 2);
        assert!(Arc::ptr_eq(&before, &sprite.get_sprite()));

        // Matching path: appended, cache invalidated.
        fs::write(root.join("icons/star.svg"), "<svg><g/></svg>").unwrap();
        sprite.handle_add(&root.join("icons/star.svg"));
        assert_eq!(sprite.len(), 3);
        let after = sprite.get_sprite();
        assert_ne!(before.digest, after.digest);
        assert!(after.markup.contains(r#"id="star""#));
    }

    #[test]
    fn test_handle_add_existing_member_is_noop() {
        let (_dir, root) = setup();
        let mut sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        sprite.handle_add(&root.join("icons/home.svg"));
        assert_eq!(sprite.len(), 2);
        assert!(Arc::ptr_eq(&before, &sprite.get_sprite()));
    }

    #[test]
    fn test_handle_unlink() {
        let (_dir, root) = setup();
        let mut sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        sprite.handle_unlink(&root.join("icons/user.svg"));
        assert_eq!(sprite.len(), 1);

        let processed = sprite.get_processed_symbols();
        assert!(!processed.iter().any(|(s, _)| s.id == "user"));

        let after = sprite.get_sprite();
        assert_ne!(before.digest, after.digest);
        assert!(!after.markup.contains(r#"id="user""#));
    }

    #[test]
    fn test_handle_add_dir_picks_up_new_directory() {
        let (_dir, root) = setup();
        let mut sprite = sprite("default", &root, &["icons/**/*.svg"]);
        assert_eq!(sprite.len(), 2);

        fs::create_dir_all(root.join("icons/arrows")).unwrap();
        fs::write(root.join("icons/arrows/left.svg"), "<svg><g/></svg>").unwrap();
        fs::write(root.join("icons/arrows/right.svg"), "<svg><g/></svg>").unwrap();

        sprite.handle_add_dir();
        assert_eq!(sprite.len(), 4);

        // Idempotent: nothing new to add, cache stays.
        let doc = sprite.get_sprite();
        sprite.handle_add_dir();
        assert!(Arc::ptr_eq(&doc, &sprite.get_sprite()));
    }

    #[test]
    fn test_handle_unlink_dir() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join("icons/arrows")).unwrap();
        fs::write(root.join("icons/arrows/left.svg"), "<svg><g/></svg>").unwrap();

        let mut sprite = sprite("default", &root, &["icons/**/*.svg"]);
        assert_eq!(sprite.len(), 3);

        sprite.handle_unlink_dir(&root.join("icons/arrows"));
        assert_eq!(sprite.len(), 2);

        let processed = sprite.get_processed_symbols();
        assert!(!processed.iter().any(|(s, _)| s.id == "left"));
    }

    #[test]
    fn test_invalid_member_excluded_from_output() {
        let (_dir, root) = setup();
        fs::write(root.join("icons/broken.svg"), "").unwrap();

        let sprite = sprite("default", &root, &["icons/*.svg"]);
        assert_eq!(sprite.len(), 3);
        assert_eq!(sprite.get_processed_symbols().len(), 2);
    }

    #[test]
    fn test_unlink_of_failing_member_keeps_digest() {
        let (_dir, root) = setup();
        fs::write(root.join("icons/broken.svg"), "").unwrap();

        let mut sprite = sprite("default", &root, &["icons/*.svg"]);
        let before = sprite.get_sprite();

        sprite.handle_unlink(&root.join("icons/broken.svg"));
        let after = sprite.get_sprite();

        // Membership changed so the cache was cleared, but the composed
        // output is identical since the member never contributed.
        assert_eq!(before.digest, after.digest);
        assert_eq!(before.markup, after.markup);
    }

    #[test]
    fn test_duplicate_id_keeps_first_occurrence() {
        let (_dir, root) = setup();
        fs::create_dir_all(root.join("icons/a")).unwrap();
        fs::create_dir_all(root.join("icons/b")).unwrap();
        fs::write(root.join("icons/a/icon.svg"), "<svg><rect/></svg>").unwrap();
        fs::write(root.join("icons/b/icon.svg"), "<svg><circle/></svg>").unwrap();

        let sprite = sprite("default", &root, &["icons/**/*.svg"]);
        let processed = sprite.get_processed_symbols();

        let icons: Vec<_> = processed.iter().filter(|(s, _)| s.id == "icon").collect();
        assert_eq!(icons.len(), 1);
        // Discovery is sorted, so a/icon.svg is first-seen.
        assert!(icons[0].0.file_path.ends_with("a/icon.svg"));
        assert_eq!(icons[0].1.dom, "<rect/>");
    }

    #[test]
    fn test_prefix() {
        let (_dir, root) = setup();
        assert_eq!(sprite("default", &root, &["icons/*.svg"]).prefix(), "");
        assert_eq!(sprite("extra", &root, &["icons/*.svg"]).prefix(), "extra/");
    }

    #[test]
    fn test_empty_sprite_composes_empty_document() {
        let (_dir, root) = setup();
        let sprite = sprite("empty", &root, &["missing/*.svg"]);
        assert!(sprite.is_empty());

        let doc = sprite.get_sprite();
        assert!(doc.markup.contains("<defs></defs>"));
    }

    #[test]
    fn test_malformed_pattern_does_not_panic() {
        let (_dir, root) = setup();
        let sprite = sprite("bad", &root, &["icons/["]);
        assert!(sprite.is_empty());
        // Events against a pattern-less sprite are no-ops.
        let mut sprite = sprite;
        sprite.handle_add(&root.join("icons/home.svg"));
        sprite.handle_add_dir();
        assert!(sprite.is_empty());
    }

    #[test]
    fn test_dev_mode_file_comments() {
        let (_dir, root) = setup();
        let config = SpriteConfig {
            import_patterns: vec!["icons/*.svg".to_string()],
            symbol_files: BTreeMap::new(),
        };
        let mut sprite = Sprite::new("default", config, root, None, true);
        sprite.init();

        let doc = sprite.get_sprite();
        assert!(doc.markup.contains("<!-- File: "));
        assert!(doc.markup.contains("home.svg -->"));
    }

    #[test]
    fn test_file_names() {
        let (_dir, root) = setup();
        let sprite = sprite("extra", &root, &["icons/*.svg"]);
        let digest = sprite.get_sprite().digest.clone();

        assert_eq!(sprite.file_name(), format!("sprite-extra.{digest}.svg"));
        assert_eq!(sprite.dev_file_name(), format!("sprite.extra.{digest}.svg"));
    }
}
