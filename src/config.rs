//! Index configuration
//!
//! Sentinel labels shared by the builder and every output projection, plus
//! the parser session limits. All fields have defaults, so a TOML file only
//! needs the keys it overrides.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Label of the parser's root constituent; never indexed as a word
    pub root_label: String,
    /// Tag for a token with no syntactic parent
    pub fallback_tag: String,
    /// Relation for punctuation and for tokens without a governor
    pub punct_relation: String,
    /// Tag reported for markup fragments
    pub markup_tag: String,
    /// Table key column for markup rows
    pub markup_placeholder: String,
    /// Filler for fields a row does not have
    pub empty_field: String,
    /// Longest token sequence handed to the parser session
    pub max_length: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root_label: "ROOT".to_string(),
            fallback_tag: "Z".to_string(),
            punct_relation: "punct".to_string(),
            markup_tag: "XML".to_string(),
            markup_placeholder: "-".to_string(),
            empty_field: "_".to_string(),
            max_length: 80,
        }
    }
}

impl IndexConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_override() {
        let config = IndexConfig::from_toml_str("max_length = 120\nmarkup_tag = \"SGML\"\n").unwrap();
        assert_eq!(config.max_length, 120);
        assert_eq!(config.markup_tag, "SGML");
        assert_eq!(config.punct_relation, "punct");
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(IndexConfig::from_toml_str("").unwrap(), IndexConfig::default());
    }

    #[test]
    fn test_bad_value() {
        assert!(matches!(
            IndexConfig::from_toml_str("max_length = \"long\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "fallback_tag = \"X\"").unwrap();

        let config = IndexConfig::from_path(file.path()).unwrap();
        assert_eq!(config.fallback_tag, "X");

        assert!(matches!(
            IndexConfig::from_path("/nonexistent/depindex.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
