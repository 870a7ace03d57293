use manifx_core::{ManifestError, error_report};
use thiserror::Error;

/// Occurs when a manifest can't be rendered.
///
#[derive(Debug, Error)]
pub enum RenderError {
  /// The XML form couldn't be serialized.
  ///
  #[error("XML serialization failed: {0}")]
  Tree(String),

  /// The spreadsheet couldn't be built.
  ///
  #[error("spreadsheet generation failed: {0}")]
  Grid(#[from] rust_xlsxwriter::XlsxError),
}

impl ManifestError for RenderError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let title = match self {
      RenderError::Tree(_) => "XML render error",
      RenderError::Grid(_) => "Spreadsheet render error",
    };

    error_report(title, task_description, &[("Details", self.to_string())])
  }
}
