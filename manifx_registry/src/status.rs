//! Aggregate counters reported to the wizard.

use serde::Serialize;

/// A point-in-time view of a registry's counters and the depth of the
/// external quarantine.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStatus {
  /// The quarantine depth when the registry was last cleared or its counts
  /// were initialized.
  pub starting_quarantine_count: u64,

  /// The quarantine depth now.
  pub current_quarantine_count: u64,

  /// The total number of instances across all entries.
  pub current_manifest_instance_count: u64,

  /// The number of instances handed towards export since the last reset.
  pub queued_instance_count: u64,
}

impl ManifestStatus {
  /// Returns the status as a single `Status` element whose attributes hold
  /// the counters.
  ///
  pub fn to_xml(&self) -> String {
    format!(
      "<Status startingQuarantineCount=\"{}\" currentQuarantineCount=\"{}\" \
       currentManifestInstanceCount=\"{}\" queuedInstanceCount=\"{}\"/>",
      self.starting_quarantine_count,
      self.current_quarantine_count,
      self.current_manifest_instance_count,
      self.queued_instance_count
    )
  }
}
