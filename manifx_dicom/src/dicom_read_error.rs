use dcmfx::core::DcmfxError;
use dcmfx::p10::P10Error;
use manifx_core::ManifestError;
use thiserror::Error;

/// Occurs when a DICOM P10 file can't be read.
///
#[derive(Debug, Error)]
pub enum DicomReadError {
  #[error("{path}: {error}")]
  P10 { path: String, error: P10Error },
}

impl ManifestError for DicomReadError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      DicomReadError::P10 { path, error } => {
        let mut lines = error.to_lines(task_description);
        lines.push(format!("  File: {path}"));
        lines
      }
    }
  }
}
