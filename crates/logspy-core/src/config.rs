//! Logger configuration: options and per-category minimum levels

use crate::errors::{LogSpyError, Result};
use logspy_core_types::schema::{DEFAULT_LEVEL_KEY, PREFIX_WILDCARD};
use logspy_core_types::LogLevel;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Format used by the default formatter when none is given explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "PlainText", alias = "plaintext", alias = "plain")]
    PlainText,
    #[serde(alias = "Json")]
    Json,
}

/// Options shared by every logger a factory creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Maintain the scope stack and include scopes in entries and output
    pub scopes_enabled: bool,
    pub output_format: OutputFormat,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            scopes_enabled: true,
            output_format: OutputFormat::PlainText,
        }
    }
}

impl LoggerOptions {
    pub fn with_scopes(mut self, enabled: bool) -> Self {
        self.scopes_enabled = enabled;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Minimum level per category prefix, with a mandatory default
///
/// The longest configured prefix that the category starts with wins.
/// Prefix comparison is ordinal (case-sensitive); a trailing `*` on a
/// configured prefix is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    default: LogLevel,
    prefixes: Vec<(String, LogLevel)>,
}

impl LevelMap {
    pub fn new(default: LogLevel) -> Self {
        Self {
            default,
            prefixes: Vec::new(),
        }
    }

    /// Add or replace the minimum for `prefix`
    pub fn with_prefix(mut self, prefix: impl AsRef<str>, level: LogLevel) -> Self {
        let prefix = prefix
            .as_ref()
            .trim_end_matches(PREFIX_WILDCARD)
            .to_string();
        match self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            Some(slot) => slot.1 = level,
            None => self.prefixes.push((prefix, level)),
        }
        self
    }

    /// Build from `(key, level)` pairs, one of which must be `Default`
    ///
    /// # Errors
    /// * `MissingDefaultLevel` - If no pair has the key `Default`
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, LogLevel)>,
        K: AsRef<str>,
    {
        let mut default = None;
        let mut prefixes = Vec::new();
        for (key, level) in pairs {
            if key.as_ref() == DEFAULT_LEVEL_KEY {
                default = Some(level);
            } else {
                prefixes.push((key, level));
            }
        }

        let default = default.ok_or(LogSpyError::MissingDefaultLevel {
            key: DEFAULT_LEVEL_KEY,
        })?;
        Ok(prefixes
            .into_iter()
            .fold(Self::new(default), |map, (key, level)| {
                map.with_prefix(key, level)
            }))
    }

    pub fn default_level(&self) -> LogLevel {
        self.default
    }

    /// Resolve the minimum level for `category`
    pub fn min_level_for(&self, category: &str) -> LogLevel {
        self.prefixes
            .iter()
            .filter(|(prefix, _)| category.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
            .unwrap_or(self.default)
    }
}

/// Deserializable bundle of options and level map
///
/// ```
/// use logspy_core::config::{LoggerConfig, OutputFormat};
/// use logspy_core::LogLevel;
///
/// let config = LoggerConfig::from_toml_str(r#"
///     scopes_enabled = false
///     output_format = "json"
///
///     [log_level]
///     Default = "Information"
///     Microsoft = "Warning"
/// "#).unwrap();
///
/// assert_eq!(config.options.output_format, OutputFormat::Json);
/// let levels = config.level_map().unwrap();
/// assert_eq!(levels.min_level_for("Microsoft.Hosting"), LogLevel::Warning);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggerConfig {
    #[serde(flatten)]
    pub options: LoggerOptions,
    #[serde(default)]
    pub log_level: BTreeMap<String, LogLevel>,
}

impl LoggerConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    /// * `InvalidConfig` - If the document is malformed or names an unknown level
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// * `Io` - If the file cannot be read
    /// * `InvalidConfig` - If the document is malformed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let document = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&document)
    }

    /// Validated level map
    ///
    /// # Errors
    /// * `MissingDefaultLevel` - If `[log_level]` has no `Default` key
    pub fn level_map(&self) -> Result<LevelMap> {
        LevelMap::from_pairs(self.log_level.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_longest_prefix_wins() {
        let map = LevelMap::new(LogLevel::Information)
            .with_prefix("Microsoft", LogLevel::Warning)
            .with_prefix("Microsoft.Hosting.Lifetime", LogLevel::Debug);

        assert_eq!(map.min_level_for("Microsoft.AspNetCore"), LogLevel::Warning);
        assert_eq!(
            map.min_level_for("Microsoft.Hosting.Lifetime"),
            LogLevel::Debug
        );
        assert_eq!(map.min_level_for("MyApp"), LogLevel::Information);
    }

    #[test]
    fn test_wildcard_suffix_is_ignored() {
        let map = LevelMap::new(LogLevel::Information).with_prefix("System.*", LogLevel::Error);
        assert_eq!(map.min_level_for("System.Net"), LogLevel::Error);
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let map = LevelMap::new(LogLevel::Information).with_prefix("Microsoft", LogLevel::Error);
        assert_eq!(map.min_level_for("microsoft.x"), LogLevel::Information);
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let err = LevelMap::from_pairs([("Microsoft", LogLevel::Warning)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDefaultLevel);
    }

    #[test]
    fn test_options_default() {
        let options = LoggerOptions::default();
        assert!(options.scopes_enabled);
        assert_eq!(options.output_format, OutputFormat::PlainText);
    }

    #[test]
    fn test_unknown_level_in_toml_is_invalid_config() {
        let err = LoggerConfig::from_toml_str("[log_level]\nDefault = \"Loud\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_empty_document_uses_defaults_but_needs_levels() {
        let config = LoggerConfig::from_toml_str("").unwrap();
        assert_eq!(config.options, LoggerOptions::default());
        assert_eq!(
            config.level_map().unwrap_err().kind(),
            ErrorKind::MissingDefaultLevel
        );
    }

    proptest! {
        #[test]
        fn prop_longer_matching_prefix_wins(base in "[A-Za-z]{1,8}", ext in "[A-Za-z]{1,8}", tail in "[A-Za-z.]{0,8}") {
            let long = format!("{}.{}", base, ext);
            let map = LevelMap::new(LogLevel::Information)
                .with_prefix(&long, LogLevel::Critical)
                .with_prefix(&base, LogLevel::Debug);

            let category = format!("{}{}", long, tail);
            prop_assert_eq!(map.min_level_for(&category), LogLevel::Critical);
        }
    }
}
