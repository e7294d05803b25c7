//! Project configuration loaded from `spriteforge.toml`.
//!
//! The config file declares one table per sprite plus the build, serve and
//! runtime sections. All sections have defaults so a bare config (or none at
//! all) yields a working project with a single `default` sprite scanning
//! `assets/icons/**/*.svg`.
//!
//! ```toml
//! src_dir = "."
//!
//! [build]
//! output = "dist/sprites"
//! asset_prefix = "/sprites/"
//!
//! [sprites.default]
//! import_patterns = ["assets/icons/**/*.svg"]
//!
//! [sprites.default.symbol_files]
//! email = "assets/special/email.svg"
//! ```

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use crate::utils::path::normalize_path;

/// Default pattern for the implicit `default` sprite.
pub const DEFAULT_IMPORT_PATTERN: &str = "assets/icons/**/*.svg";

/// Configuration for one named sprite.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteConfig {
    /// Glob patterns resolved against the project source root.
    pub import_patterns: Vec<String>,

    /// Explicit symbol id → file path entries, appended after discovery.
    pub symbol_files: BTreeMap<String, PathBuf>,
}

/// Build command settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory for sprite files and generated modules.
    pub output: PathBuf,

    /// URL prefix under which built sprite files are reachable.
    pub asset_prefix: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist/sprites"),
            asset_prefix: "/sprites/".to_string(),
        }
    }
}

/// Dev server settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// Port number to listen on.
    pub port: u16,

    /// Enable file watching for incremental sprite updates.
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4850,
            watch: true,
        }
    }
}

/// Presentation options passed through verbatim into the generated runtime
/// module. Not interpreted by the pipeline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Serialized as `ariaHidden`, the spelling the consuming runtime uses.
    #[serde(rename(serialize = "ariaHidden", deserialize = "aria_hidden"))]
    pub aria_hidden: bool,
}

/// Top-level project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Source root all import patterns are resolved against.
    pub src_dir: PathBuf,

    pub build: BuildConfig,
    pub serve: ServeConfig,
    pub runtime: RuntimeOptions,

    /// Sprite name → sprite configuration. Iteration order is name order,
    /// which keeps everything downstream deterministic.
    pub sprites: BTreeMap<String, SpriteConfig>,

    /// Project root (directory of the config file). Set at load time.
    #[serde(skip)]
    pub root: PathBuf,
}

impl ProjectConfig {
    /// Load configuration from a `spriteforge.toml` path.
    ///
    /// A missing file is not an error: defaults apply, rooted at the
    /// directory the path points into.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = normalize_path(path);
        let mut config: Self = if path.is_file() {
            let raw =
                fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };

        config.root = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        config.finalize()?;
        Ok(config)
    }

    /// Resolve paths against the project root and validate sprite names.
    fn finalize(&mut self) -> Result<(), ConfigError> {
        if self.sprites.is_empty() {
            self.sprites.insert(
                "default".to_string(),
                SpriteConfig {
                    import_patterns: vec![DEFAULT_IMPORT_PATTERN.to_string()],
                    symbol_files: BTreeMap::new(),
                },
            );
        }

        for name in self.sprites.keys() {
            validate_sprite_name(name)?;
        }

        if self.src_dir.as_os_str().is_empty() {
            self.src_dir = self.root.clone();
        } else if self.src_dir.is_relative() {
            self.src_dir = self.root.join(&self.src_dir);
        }

        if self.build.output.is_relative() {
            self.build.output = self.root.join(&self.build.output);
        }

        if !self.build.asset_prefix.ends_with('/') {
            self.build.asset_prefix.push('/');
        }

        Ok(())
    }

    /// Absolute source root for icon discovery.
    pub fn source_root(&self) -> &Path {
        &self.src_dir
    }
}

/// Sprite names become id prefixes (`<name>/...`) and filename components
/// (`sprite.<name>.<digest>.svg`), so `/` and `.` are off limits.
fn validate_sprite_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "sprite name must not be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "sprite name `{name}` may only contain alphanumerics, `-` and `_`"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, raw: &str) -> PathBuf {
        let path = dir.path().join("spriteforge.toml");
        fs::write(&path, raw).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::load(&dir.path().join("spriteforge.toml")).unwrap();

        assert_eq!(config.sprites.len(), 1);
        assert_eq!(
            config.sprites["default"].import_patterns,
            vec![DEFAULT_IMPORT_PATTERN]
        );
        assert!(config.source_root().is_absolute());
        assert!(!config.runtime.aria_hidden);
    }

    #[test]
    fn test_load_sprites() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[sprites.default]
import_patterns = ["icons/**/*.svg"]

[sprites.special]
import_patterns = ["special/*.svg"]

[sprites.special.symbol_files]
email = "mail/email.svg"

[runtime]
aria_hidden = true
"#,
        );

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.sprites.len(), 2);
        assert_eq!(
            config.sprites["special"].symbol_files["email"],
            PathBuf::from("mail/email.svg")
        );
        assert!(config.runtime.aria_hidden);
    }

    #[test]
    fn test_invalid_sprite_name() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[sprites.\"bad.name\"]\nimport_patterns = []\n");

        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_relative_paths_resolved_against_root() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "src_dir = \"app\"\n\n[build]\noutput = \"out\"\n");

        let config = ProjectConfig::load(&path).unwrap();
        assert!(config.source_root().ends_with("app"));
        assert!(config.build.output.ends_with("out"));
        assert!(config.build.asset_prefix.ends_with('/'));
    }

    #[test]
    fn test_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[sprites.default\n");
        assert!(matches!(
            ProjectConfig::load(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}
