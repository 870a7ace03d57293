use manifx_core::{ManifestError, error_report};
use thiserror::Error;

/// Occurs when an export can't be recorded in the history, or when the
/// history store's backing environment fails.
///
#[derive(Debug, Error)]
pub enum HistoryError {
  /// An instance was exported from a series that has neither a history entry
  /// nor a manifest entry to seed one from.
  ///
  #[error(
    "no manifest entry for series {series_instance_uid} of exported instance \
     {sop_instance_uid}"
  )]
  MissingSourceEntry {
    sop_instance_uid: String,
    series_instance_uid: String,
    registry_size: usize,
  },

  /// The LMDB environment returned an error.
  ///
  #[error("history store error: {0}")]
  Store(#[from] heed::Error),

  /// The store's directory couldn't be created or removed.
  ///
  #[error("history store I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl ManifestError for HistoryError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      HistoryError::MissingSourceEntry {
        sop_instance_uid,
        series_instance_uid,
        registry_size,
      } => error_report(
        "Missing manifest entry",
        task_description,
        &[
          ("SOP Instance UID", sop_instance_uid.clone()),
          ("Series Instance UID", series_instance_uid.clone()),
          ("Manifest size", registry_size.to_string()),
        ],
      ),

      HistoryError::Store(e) => error_report(
        "History store error",
        task_description,
        &[("Error", e.to_string())],
      ),

      HistoryError::Io(e) => error_report(
        "History store I/O error",
        task_description,
        &[("Error", e.to_string())],
      ),
    }
  }
}
