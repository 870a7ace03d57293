//! Configuration for a [`crate::ManifestService`].

use std::path::{Path, PathBuf};

use manifx_core::{FieldTags, ManifestError, error_report};
use manifx_history::DEFAULT_MAP_SIZE;
use serde::Deserialize;
use thiserror::Error;

/// Configuration for the manifests and the export history, usually read from
/// a TOML file:
///
/// ```toml
/// root = "/var/lib/manifx"
/// history_db_name = "__historyDB"
/// export_directory = "/var/lib/manifx/export"
///
/// [field_tags]
/// collection = "00131010"
/// site_name = "00131012"
/// ```
///
/// Every setting is optional.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
  /// The directory that holds the history store.
  pub root: PathBuf,

  /// The name of the history store's directory under `root`.
  pub history_db_name: String,

  /// The maximum size in bytes of the history store.
  pub history_map_size: usize,

  /// The directory that export manifest and history files are written into
  /// for pickup by the export pipeline.
  pub export_directory: Option<PathBuf>,

  pub field_tags: FieldTagsConfig,
}

/// The data elements holding the collection and site names, as eight hex
/// digits.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldTagsConfig {
  pub collection: String,
  pub site_name: String,
}

impl Default for ManifestConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from("."),
      history_db_name: "__historyDB".to_string(),
      history_map_size: DEFAULT_MAP_SIZE,
      export_directory: None,
      field_tags: FieldTagsConfig::default(),
    }
  }
}

impl Default for FieldTagsConfig {
  fn default() -> Self {
    Self {
      collection: "00131010".to_string(),
      site_name: "00131012".to_string(),
    }
  }
}

impl ManifestConfig {
  /// Loads configuration from a TOML file.
  ///
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Parses configuration from a TOML string. The field tags are validated.
  ///
  pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(content)?;
    config.field_tags()?;

    Ok(config)
  }

  /// Sets the directory that holds the history store.
  ///
  pub fn root(mut self, root: PathBuf) -> Self {
    self.root = root;
    self
  }

  /// Sets the directory that export drops are written into.
  ///
  pub fn export_directory(mut self, export_directory: PathBuf) -> Self {
    self.export_directory = Some(export_directory);
    self
  }

  /// The path of the history store's directory.
  ///
  pub fn history_path(&self) -> PathBuf {
    self.root.join(&self.history_db_name)
  }

  /// Parses the configured field tags.
  ///
  pub fn field_tags(&self) -> Result<FieldTags, ConfigError> {
    Ok(FieldTags {
      collection: FieldTags::parse_tag(&self.field_tags.collection)
        .map_err(ConfigError::InvalidTag)?,
      site_name: FieldTags::parse_tag(&self.field_tags.site_name)
        .map_err(ConfigError::InvalidTag)?,
    })
  }
}

/// Occurs when configuration can't be loaded.
///
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse configuration: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("{0}")]
  InvalidTag(String),
}

impl ManifestError for ConfigError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    error_report(
      "Configuration error",
      task_description,
      &[("Details", self.to_string())],
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = ManifestConfig::from_toml("").unwrap();

    assert_eq!(config, ManifestConfig::default());
    assert_eq!(config.history_path(), PathBuf::from("./__historyDB"));
    assert_eq!(config.field_tags().unwrap(), FieldTags::DEFAULT);
  }

  #[test]
  fn from_toml_test() {
    let config = ManifestConfig::from_toml(
      r#"
        root = "/data"
        history_map_size = 1048576

        [field_tags]
        site_name = "(0013,1014)"
      "#,
    )
    .unwrap();

    assert_eq!(config.history_path(), PathBuf::from("/data/__historyDB"));
    assert_eq!(config.history_map_size, 1_048_576);
    assert_eq!(
      config.field_tags().unwrap(),
      FieldTags {
        collection: 0x0013_1010,
        site_name: 0x0013_1014,
      }
    );
  }

  #[test]
  fn invalid_config() {
    assert!(matches!(
      ManifestConfig::from_toml("[field_tags]\ncollection = \"13\""),
      Err(ConfigError::InvalidTag(_))
    ));

    assert!(matches!(
      ManifestConfig::from_toml("unknown = 1"),
      Err(ConfigError::Parse(_))
    ));

    assert!(matches!(
      ManifestConfig::from_file(Path::new("missing.toml")),
      Err(ConfigError::Io(_))
    ));
  }
}
