use manifx_core::{ManifestError, error_report};
use manifx_render::RenderError;
use thiserror::Error;

/// Occurs when a manifest or the history can't be written to the export
/// directory.
///
#[derive(Debug, Error)]
pub enum ServiceError {
  #[error(transparent)]
  Render(#[from] RenderError),

  #[error("unable to write file: {0}")]
  Io(#[from] std::io::Error),
}

impl ManifestError for ServiceError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      ServiceError::Render(e) => e.to_lines(task_description),
      ServiceError::Io(e) => error_report(
        "I/O error",
        task_description,
        &[("Error", e.to_string())],
      ),
    }
  }
}
