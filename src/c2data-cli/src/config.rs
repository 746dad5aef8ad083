//! Configuration management for the c2data CLI

use anyhow::{Context, Result};
use c2data::{Locale, Source};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A source directory as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub locale: Locale,
}

impl From<&SourceEntry> for Source {
    fn from(entry: &SourceEntry) -> Self {
        Source::new(&entry.path, entry.locale)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub sheet_prefix: Option<String>,
    pub preferred_frame: Option<i64>,
    pub atlas_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: Option<PathBuf>,
    pub skip_errors: Option<bool>,
    pub validate: Option<bool>,
    pub legacy_zero_defaults: bool,
    /// Primary source first
    pub sources: Vec<SourceEntry>,
    pub sprite: SpriteConfig,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("c2data");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve `--config`, falling back to the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration.
    ///
    /// A missing default file yields the defaults; a missing file named
    /// with `--config` is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(explicit)?;

        if !config_path.exists() {
            if explicit.is_some() {
                anyhow::bail!("Config file {} does not exist", config_path.display());
            }
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from {}", config_path.display());
        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn sources(&self) -> Vec<Source> {
        self.sources.iter().map(Source::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
            output = "data/extracted"
            validate = true
            legacy_zero_defaults = true

            [[sources]]
            path = "../package"
            locale = "zh"

            [[sources]]
            path = "../package_kor"
            locale = "ko"

            [sprite]
            atlas_dir = "../package/images"
            preferred_frame = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.output, Some(PathBuf::from("data/extracted")));
        assert_eq!(config.validate, Some(true));
        assert!(config.skip_errors.is_none());
        assert!(config.legacy_zero_defaults);
        assert_eq!(config.sprite.preferred_frame, Some(2));
        assert!(config.sprite.sheet_prefix.is_none());

        let sources = config.sources();
        assert_eq!(sources[1], Source::new("../package_kor", Locale::Ko));
    }

    #[test]
    fn test_source_locale_defaults() {
        let config: Config = toml::from_str("[[sources]]\npath = \"pkg\"\n").unwrap();
        assert_eq!(config.sources[0].locale, Locale::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = Config {
            sources: vec![SourceEntry {
                path: "pkg".into(),
                locale: Locale::En,
            }],
            skip_errors: Some(false),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
