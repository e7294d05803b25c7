//! Glob-based icon file discovery.
//!
//! Patterns are matched against paths relative to the configured source
//! root. `*` does not cross directory separators, `**` does, matching the
//! conventions of the usual web-tooling globs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use jwalk::WalkDir;

/// Compile a list of glob patterns into a single matcher.
///
/// A leading `./` is stripped from each pattern before compilation.
/// Fails on the first malformed pattern.
pub fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid import pattern `{pattern}`"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile import patterns")
}

/// Resolve all files under `root` matching the compiled pattern set.
///
/// Symbolic links are excluded from traversal. The result is sorted and
/// deduplicated so discovery order is deterministic across runs.
pub fn resolve_files(root: &Path, matcher: &GlobSet) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| matches(root, matcher, path))
        .collect();

    files.sort();
    files.dedup();
    files
}

/// Check whether one absolute path matches the pattern set.
///
/// Paths outside `root` never match.
pub fn matches(root: &Path, matcher: &GlobSet, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rel) => matcher.is_match(rel),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = crate::utils::path::normalize_path(dir.path());
        let icons = root.join("icons");
        fs::create_dir_all(icons.join("social")).unwrap();
        fs::write(icons.join("home.svg"), "<svg></svg>").unwrap();
        fs::write(icons.join("user.svg"), "<svg></svg>").unwrap();
        fs::write(icons.join("social/mail.svg"), "<svg></svg>").unwrap();
        fs::write(icons.join("readme.txt"), "not an icon").unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolve_recursive() {
        let (_dir, root) = setup();
        let matcher = build_matcher(&["icons/**/*.svg".to_string()]).unwrap();

        let files = resolve_files(&root, &matcher);
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.extension().unwrap() == "svg"));
        // Sorted output
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let (_dir, root) = setup();
        let matcher = build_matcher(&["icons/*.svg".to_string()]).unwrap();

        let files = resolve_files(&root, &matcher);
        assert_eq!(files.len(), 2);
        assert!(!files.iter().any(|f| f.ends_with("social/mail.svg")));
    }

    #[test]
    fn test_leading_dot_slash_stripped() {
        let (_dir, root) = setup();
        let matcher = build_matcher(&["./icons/*.svg".to_string()]).unwrap();
        assert_eq!(resolve_files(&root, &matcher).len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(build_matcher(&["icons/[".to_string()]).is_err());
    }

    #[test]
    fn test_matches_outside_root() {
        let (_dir, root) = setup();
        let matcher = build_matcher(&["icons/*.svg".to_string()]).unwrap();
        assert!(matches(&root, &matcher, &root.join("icons/home.svg")));
        assert!(!matches(&root, &matcher, Path::new("/elsewhere/home.svg")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_excluded() {
        let (_dir, root) = setup();
        std::os::unix::fs::symlink(
            root.join("icons/home.svg"),
            root.join("icons/alias.svg"),
        )
        .unwrap();

        let matcher = build_matcher(&["icons/*.svg".to_string()]).unwrap();
        let files = resolve_files(&root, &matcher);
        assert!(!files.iter().any(|f| f.ends_with("alias.svg")));
    }
}
