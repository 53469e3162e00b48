// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! YAML serializer options loader.
//!
//! # Example YAML
//!
//! ```yaml
//! # keystate.yaml
//! serializer:
//!   force_generic_serializer: false
//!   disable_generic_types: true
//!   max_collection_length: 65536
//! ```
//!
//! Type registrations are not part of the file: they depend on the program's
//! types and are done through [`SerializerConfig::register_type`].

use super::{SerializerConfig, SerializerOptions};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// YAML options loader.
pub struct YamlLoader;

/// Root YAML document structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfigDocument {
    /// Resolution options; missing keys keep their defaults.
    #[serde(default)]
    pub serializer: SerializerOptions,
}

/// Failure to load a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            ConfigError::Parse(e) => write!(f, "invalid YAML config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl YamlLoader {
    /// Load a document from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<YamlConfigDocument, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_yaml(&content)
    }

    /// Parse a document from a string.
    pub fn parse_yaml(yaml_content: &str) -> Result<YamlConfigDocument, ConfigError> {
        // An empty file is a valid, all-defaults document.
        if yaml_content.trim().is_empty() {
            return Ok(YamlConfigDocument::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }
}

impl SerializerConfig {
    /// Build a config with options read from YAML and no registrations.
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, ConfigError> {
        let doc = YamlLoader::parse_yaml(yaml_content)?;
        log::debug!(
            "[SerializerConfig::from_yaml_str] loaded options {:?}",
            doc.serializer
        );
        Ok(Self::with_options(doc.serializer))
    }

    /// Build a config with options read from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let doc = YamlLoader::load_from_file(path.as_ref())?;
        log::debug!(
            "[SerializerConfig::from_yaml_file] loaded {} ({:?})",
            path.as_ref().display(),
            doc.serializer
        );
        Ok(Self::with_options(doc.serializer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_COLLECTION_LENGTH;
    use std::io::Write;

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
serializer:
  force_generic_serializer: true
  disable_generic_types: false
  max_collection_length: 4096
"#;
        let config = SerializerConfig::from_yaml_str(yaml).expect("valid YAML should parse");
        assert!(config.options().force_generic_serializer);
        assert!(!config.options().disable_generic_types);
        assert_eq!(config.options().max_collection_length, 4096);
        assert!(config.registered_types().is_empty());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let yaml = r#"
serializer:
  disable_generic_types: true
"#;
        let config = SerializerConfig::from_yaml_str(yaml).expect("parse");
        assert!(config.options().disable_generic_types);
        assert_eq!(
            config.options().max_collection_length,
            DEFAULT_MAX_COLLECTION_LENGTH
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = YamlLoader::parse_yaml("").expect("parse");
        assert_eq!(doc.serializer, SerializerOptions::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let yaml = r#"
profiles:
  reliable: {}
"#;
        let err = YamlLoader::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "serializer:\n  max_collection_length: 8").expect("write temp file");

        let config = SerializerConfig::from_yaml_file(file.path()).expect("load file");
        assert_eq!(config.options().max_collection_length, 8);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("absent.yaml");
        let err = SerializerConfig::from_yaml_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }
}
