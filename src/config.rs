//! Language configuration.
//!
//! The surface spelling of every keyword, primitive type name and standard
//! library function can be replaced, which lets the same compiler accept a
//! "translated" dialect of the language. A configuration file is a flat JSON
//! object from canonical key to spelling:
//!
//! ```json
//! { "if": "se", "else": "alia", "int": "integralo", "print": "pres" }
//! ```
//!
//! Keys that are not mentioned keep their canonical spelling.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::lexer::tokens::{TokenKind, RESERVED_LOOKUP};

/// Keys naming standard library functions rather than keywords.
pub const STDLIB_KEYS: [&str; 2] = ["print", "length"];

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown config key {0:?}")]
    UnknownKey(String),
    #[error("spelling {spelling:?} for {key:?} is not a valid identifier")]
    InvalidSpelling { key: String, spelling: String },
    #[error("spelling {spelling:?} is used by both {first:?} and {second:?}")]
    DuplicateSpelling {
        spelling: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LanguageConfig {
    spellings: HashMap<String, String>,
}

impl LanguageConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LanguageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        log::info!(
            "loaded language config from {} ({} override(s))",
            path.display(),
            config.spellings.len()
        );
        Ok(config)
    }

    /// Returns a copy of this config with `key` spelled as `spelling`.
    pub fn with_spelling(mut self, key: &str, spelling: &str) -> Result<Self, ConfigError> {
        self.spellings.insert(key.to_string(), spelling.to_string());
        self.validate()?;
        Ok(self)
    }

    /// The surface spelling of a canonical key.
    pub fn spelling<'a>(&'a self, key: &'a str) -> &'a str {
        self.spellings.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Maps every reserved surface spelling to the token it produces.
    pub fn reserved_lookup(&self) -> HashMap<String, TokenKind> {
        RESERVED_LOOKUP
            .iter()
            .map(|(key, kind)| (self.spelling(key).to_string(), *kind))
            .collect()
    }

    fn known_keys() -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = RESERVED_LOOKUP.keys().copied().collect();
        keys.extend(STDLIB_KEYS);
        keys.sort_unstable();
        keys
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let known: HashSet<&str> = Self::known_keys().into_iter().collect();
        let mut overridden: Vec<&String> = self.spellings.keys().collect();
        overridden.sort();
        if let Some(key) = overridden.into_iter().find(|key| !known.contains(key.as_str())) {
            return Err(ConfigError::UnknownKey(key.clone()));
        }

        let mut owners: HashMap<&str, &str> = HashMap::new();
        for key in Self::known_keys() {
            let spelling = self.spelling(key);
            if !IDENTIFIER.is_match(spelling) {
                return Err(ConfigError::InvalidSpelling {
                    key: key.to_string(),
                    spelling: spelling.to_string(),
                });
            }
            if let Some(first) = owners.insert(spelling, key) {
                return Err(ConfigError::DuplicateSpelling {
                    spelling: spelling.to_string(),
                    first: first.to_string(),
                    second: key.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spellings_are_canonical() {
        let config = LanguageConfig::default();
        assert_eq!(config.spelling("while"), "while");
        assert_eq!(config.spelling("print"), "print");
        assert_eq!(config.reserved_lookup().get("int"), Some(&TokenKind::Int));
    }

    #[test]
    fn test_json_overrides() {
        let config =
            LanguageConfig::from_json_str(r#"{ "if": "se", "int": "integralo", "print": "pres" }"#)
                .unwrap();

        assert_eq!(config.spelling("if"), "se");
        assert_eq!(config.spelling("print"), "pres");
        let lookup = config.reserved_lookup();
        assert_eq!(lookup.get("se"), Some(&TokenKind::If));
        assert_eq!(lookup.get("integralo"), Some(&TokenKind::Int));
        assert!(lookup.get("if").is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let error = LanguageConfig::from_json_str(r#"{ "unless": "nisi" }"#).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownKey(key) if key == "unless"));
    }

    #[test]
    fn test_invalid_spelling_is_rejected() {
        let error = LanguageConfig::from_json_str(r#"{ "if": "2if" }"#).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidSpelling { .. }));
    }

    #[test]
    fn test_colliding_spellings_are_rejected() {
        let error = LanguageConfig::default()
            .with_spelling("if", "while")
            .unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateSpelling { spelling, .. } if spelling == "while"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let error = LanguageConfig::from_json_str(r#"{ "if": 3 }"#).unwrap_err();
        assert!(matches!(error, ConfigError::Json(_)));
    }
}
