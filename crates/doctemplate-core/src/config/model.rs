use serde::{Deserialize, Serialize};
use std::path::Path;

use super::locale::Locale;
use crate::error::{DoctemplateError, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "doctemplate.toml";

/// doctemplate.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale used by `today()` and `currency()`
    #[serde(default = "default_locale_tag")]
    pub tag: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            tag: default_locale_tag(),
        }
    }
}

fn default_locale_tag() -> String {
    "de-DE".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file is `<template>.<extension>`
    #[serde(default = "default_cache_extension")]
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            extension: default_cache_extension(),
        }
    }
}

fn default_cache_extension() -> String {
    "yaml".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix stripped from the template file name (may be empty)
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Directory, relative to the template, receiving filled documents
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            directory: default_directory(),
        }
    }
}

fn default_marker() -> String {
    "_".to_string()
}

fn default_directory() -> String {
    "output".to_string()
}

impl Config {
    /// doctemplate.toml を読み込む
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DoctemplateError::ConfigParseError(e.to_string()))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| DoctemplateError::ConfigParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// doctemplate.toml に書き込む
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DoctemplateError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(DoctemplateError::IoError)?;

        Ok(())
    }

    /// Load `doctemplate.toml` from `dir`, or defaults when the file is absent
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(path = %path.display(), "loading config");
        Self::from_file(&path)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<()> {
        self.locale()?;

        let extension = self.cache.extension.trim();
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(DoctemplateError::ConfigInvalidValue {
                field: "cache.extension".to_string(),
                reason: format!("'{}' is not a usable file extension", self.cache.extension),
            });
        }

        if self.output.directory.trim().is_empty() {
            return Err(DoctemplateError::ConfigInvalidValue {
                field: "output.directory".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the configured locale tag
    pub fn locale(&self) -> Result<Locale> {
        Locale::from_tag(&self.locale.tag).ok_or_else(|| DoctemplateError::ConfigInvalidValue {
            field: "locale.tag".to_string(),
            reason: format!(
                "unknown locale '{}' (supported: {})",
                self.locale.tag,
                Locale::supported_tags().join(", ")
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.locale.tag, "de-DE");
        assert_eq!(config.cache.extension, "yaml");
        assert_eq!(config.output.marker, "_");
        assert_eq!(config.output.directory, "output");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[locale]
tag = "en-US"

[cache]
extension = "values.yml"

[output]
marker = "tpl-"
directory = "filled"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.locale().unwrap().tag(), "en-US");
        assert_eq!(config.cache.extension, "values.yml");
        assert_eq!(config.output.marker, "tpl-");
        assert_eq!(config.output.directory, "filled");
    }

    #[test]
    fn test_unknown_locale_is_invalid() {
        let config: Config = toml::from_str("[locale]\ntag = \"xx-XX\"").unwrap();
        match config.validate() {
            Err(DoctemplateError::ConfigInvalidValue { field, .. }) => {
                assert_eq!(field, "locale.tag");
            }
            other => panic!("Expected ConfigInvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_extension_is_invalid() {
        let config: Config = toml::from_str("[cache]\nextension = \"\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(DoctemplateError::ConfigInvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(temp.path()).unwrap();
        assert_eq!(config.locale.tag, "de-DE");
    }

    #[test]
    fn test_config_file_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.locale.tag = "fr-FR".to_string();
        config.to_file(temp.path().join(CONFIG_FILE_NAME)).unwrap();

        let loaded = Config::load_or_default(temp.path()).unwrap();
        assert_eq!(loaded.locale.tag, "fr-FR");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[locale\ntag=").unwrap();
        assert!(matches!(
            Config::load_or_default(temp.path()),
            Err(DoctemplateError::ConfigParseError(_))
        ));
    }
}
