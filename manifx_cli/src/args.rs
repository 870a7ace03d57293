//! Arguments shared by more than one command.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use manifx::{
  ConfigError, ManifestConfig,
  core::{ManifestError, print_error_lines},
  render::OutputFormat,
};

#[derive(Args)]
pub struct StoreArgs {
  #[arg(
    long,
    help_heading = "History",
    help = "The directory that holds the export history store. This overrides \
      the 'root' setting in the configuration file."
  )]
  pub store: Option<PathBuf>,

  #[arg(
    long,
    help_heading = "History",
    help = "A TOML configuration file that sets the location of the export \
      history store and the data elements holding the collection and site \
      names."
  )]
  pub config: Option<PathBuf>,
}

impl StoreArgs {
  /// Returns whether a history store location was given.
  ///
  pub fn is_set(&self) -> bool {
    self.store.is_some() || self.config.is_some()
  }

  /// Loads the configuration file if one was given, then applies --store.
  ///
  pub fn load_config(&self) -> Result<ManifestConfig, ConfigError> {
    let mut config = match &self.config {
      Some(path) => ManifestConfig::from_file(path)?,
      None => ManifestConfig::default(),
    };

    if let Some(store) = &self.store {
      config = config.root(store.clone());
    }

    Ok(config)
  }

  /// Loads the configuration for a command that requires a history store,
  /// printing an error if none was given or it can't be loaded.
  ///
  pub fn require_config(&self) -> Result<ManifestConfig, ()> {
    if !self.is_set() {
      print_error_lines(&[
        "Error: --store or --config must be specified".to_string(),
      ]);
      return Err(());
    }

    self.load_config().map_err(|e| {
      e.print("loading configuration");
    })
  }
}

#[derive(Args)]
pub struct OutputArgs {
  #[arg(
    long,
    short,
    help_heading = "Output",
    help = "The format of the output file.",
    default_value_t = Format::Csv
  )]
  pub format: Format,

  #[arg(
    long,
    short,
    help_heading = "Output",
    help = "The name of the file to write the output to. Specify '-' to write \
      to stdout.",
    default_value = "-"
  )]
  pub output_filename: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
  /// Comma-separated text that spreadsheet applications open with every
  /// value kept as text.
  Csv,

  /// An XML document with one element per series.
  Xml,

  /// An Excel workbook.
  Xlsx,
}

impl core::fmt::Display for Format {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Csv => write!(f, "csv"),
      Self::Xml => write!(f, "xml"),
      Self::Xlsx => write!(f, "xlsx"),
    }
  }
}

impl From<Format> for OutputFormat {
  fn from(format: Format) -> Self {
    match format {
      Format::Csv => OutputFormat::Csv,
      Format::Xml => OutputFormat::Xml,
      Format::Xlsx => OutputFormat::Xlsx,
    }
  }
}
