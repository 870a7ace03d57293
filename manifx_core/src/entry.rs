//! The per-series row recorded in manifests and in the export history.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::series_object::{FieldTags, SeriesObject, field_value};

/// One row of a manifest or of the export history, describing a single
/// series.
///
/// The identity fields hold the values seen on the logged object, which for
/// the anonymizer and export stages are de-identified values. The original
/// identifying values are held separately in [`Entry::phi`], and are only
/// present when the original object was available when the series was first
/// logged.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  pub collection: String,
  pub site_name: String,
  pub patient_id: String,
  pub study_date: String,
  pub study_description: String,
  pub series_description: String,
  pub series_instance_uid: String,
  pub modality: String,

  /// The original identifying values for the series. Either all of them are
  /// present or none are.
  ///
  pub phi: Option<PhiFields>,

  /// The number of instances recorded for the series.
  ///
  pub num_files: u32,

  /// The first and last export times. Only ever set on history entries.
  ///
  pub export: Option<ExportTimes>,
}

/// The original, pre-de-identification values of an entry's identifying
/// fields.
///
#[derive(
  Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PhiFields {
  pub patient_id: String,
  pub study_date: String,
  pub series_instance_uid: String,
}

/// Export timestamps in milliseconds since the Unix epoch. `first` is never
/// after `last`.
///
#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub struct ExportTimes {
  pub first: i64,
  pub last: i64,
}

impl PhiFields {
  /// Extracts the original identifying values from an object.
  ///
  pub fn from_object(original: &dyn SeriesObject) -> Self {
    Self {
      patient_id: field_value(original.patient_id()),
      study_date: field_value(original.study_date()),
      series_instance_uid: field_value(original.series_instance_uid()),
    }
  }
}

impl Entry {
  /// Creates a new entry with no recorded instances from the fields of an
  /// object. When the cached original of the object is given then its values
  /// populate [`Entry::phi`].
  ///
  /// Missing fields become empty strings.
  ///
  pub fn from_object(
    object: &dyn SeriesObject,
    original: Option<&dyn SeriesObject>,
    field_tags: &FieldTags,
  ) -> Self {
    Self {
      collection: field_value(object.element_value(field_tags.collection)),
      site_name: field_value(object.element_value(field_tags.site_name)),
      patient_id: field_value(object.patient_id()),
      study_date: field_value(object.study_date()),
      study_description: field_value(object.study_description()),
      series_description: field_value(object.series_description()),
      series_instance_uid: field_value(object.series_instance_uid()),
      modality: field_value(object.modality()),
      phi: original.map(PhiFields::from_object),
      num_files: 0,
      export: None,
    }
  }

  /// Records one more instance for the series.
  ///
  pub fn add_instance(&mut self) {
    self.num_files = self.num_files.saturating_add(1);
  }

  /// Records an export of one instance of the series at the given time. The
  /// first export time is only set by the first call, and the last export
  /// time never moves before it.
  ///
  pub fn add_export(&mut self, now: i64) {
    self.add_instance();

    self.export = Some(match self.export {
      None => ExportTimes {
        first: now,
        last: now,
      },
      Some(ExportTimes { first, .. }) => ExportTimes {
        first,
        last: now.max(first),
      },
    });
  }

  /// Returns the starting point for a new history entry: a copy of this entry
  /// with no recorded instances and no export times.
  ///
  pub fn history_seed(&self) -> Self {
    Self {
      num_files: 0,
      export: None,
      ..self.clone()
    }
  }

  /// Returns a copy of this entry, with the original identifying values
  /// removed unless `include_phi` is set.
  ///
  pub fn copy_with_phi(&self, include_phi: bool) -> Self {
    let mut entry = self.clone();

    if !include_phi {
      entry.phi = None;
    }

    entry
  }
}

impl PartialOrd for Entry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Entries order by patient ID then series instance UID. The remaining fields
/// break ties so that the order is total.
///
impl Ord for Entry {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .patient_id
      .cmp(&other.patient_id)
      .then_with(|| self.series_instance_uid.cmp(&other.series_instance_uid))
      .then_with(|| self.collection.cmp(&other.collection))
      .then_with(|| self.site_name.cmp(&other.site_name))
      .then_with(|| self.study_date.cmp(&other.study_date))
      .then_with(|| self.study_description.cmp(&other.study_description))
      .then_with(|| self.series_description.cmp(&other.series_description))
      .then_with(|| self.modality.cmp(&other.modality))
      .then_with(|| self.phi.cmp(&other.phi))
      .then_with(|| self.num_files.cmp(&other.num_files))
      .then_with(|| self.export.cmp(&other.export))
  }
}

/// Copies entries into a new list in manifest order, honoring the PHI flag.
///
pub fn sorted_entries<'a>(
  entries: impl IntoIterator<Item = &'a Entry>,
  include_phi: bool,
) -> Vec<Entry> {
  let mut entries: Vec<Entry> = entries
    .into_iter()
    .map(|entry| entry.copy_with_phi(include_phi))
    .collect();

  entries.sort();
  entries
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::SeriesRecord;

  fn deidentified() -> SeriesRecord {
    SeriesRecord::new(" 1.2.3 ", "1.2.3.1")
      .patient_id("ANON-1")
      .study_date("20200101")
      .study_description("CHEST")
      .modality("CT ")
      .element(0x0013_1010, "LIDC")
      .element(0x0013_1012, " Site A ")
  }

  fn original() -> SeriesRecord {
    SeriesRecord::new("9.8.7", "9.8.7.1")
      .patient_id("P1")
      .study_date("19991231")
  }

  #[test]
  fn from_object_test() {
    let entry =
      Entry::from_object(&deidentified(), None, &FieldTags::default());

    assert_eq!(
      entry,
      Entry {
        collection: "LIDC".to_string(),
        site_name: "Site A".to_string(),
        patient_id: "ANON-1".to_string(),
        study_date: "20200101".to_string(),
        study_description: "CHEST".to_string(),
        series_description: "".to_string(),
        series_instance_uid: "1.2.3".to_string(),
        modality: "CT".to_string(),
        phi: None,
        num_files: 0,
        export: None,
      }
    );
  }

  #[test]
  fn from_object_with_original_test() {
    let entry = Entry::from_object(
      &deidentified(),
      Some(&original()),
      &FieldTags::default(),
    );

    assert_eq!(
      entry.phi,
      Some(PhiFields {
        patient_id: "P1".to_string(),
        study_date: "19991231".to_string(),
        series_instance_uid: "9.8.7".to_string(),
      })
    );
  }

  #[test]
  fn add_export_test() {
    let mut entry = Entry::default();

    entry.add_export(100);
    assert_eq!(entry.num_files, 1);
    assert_eq!(
      entry.export,
      Some(ExportTimes {
        first: 100,
        last: 100
      })
    );

    entry.add_export(250);
    entry.add_export(400);
    assert_eq!(entry.num_files, 3);
    assert_eq!(
      entry.export,
      Some(ExportTimes {
        first: 100,
        last: 400
      })
    );

    // A clock that steps backwards doesn't move the last export before the
    // first
    entry.add_export(50);
    assert_eq!(
      entry.export,
      Some(ExportTimes {
        first: 100,
        last: 100
      })
    );
  }

  #[test]
  fn history_seed_test() {
    let mut entry = Entry::from_object(
      &deidentified(),
      Some(&original()),
      &FieldTags::default(),
    );
    entry.add_instance();
    entry.add_instance();

    let seed = entry.history_seed();
    assert_eq!(seed.num_files, 0);
    assert_eq!(seed.export, None);
    assert_eq!(seed.phi, entry.phi);
    assert_eq!(seed.patient_id, entry.patient_id);
  }

  #[test]
  fn sorted_entries_test() {
    let entry = |patient_id: &str, series_instance_uid: &str| Entry {
      patient_id: patient_id.to_string(),
      series_instance_uid: series_instance_uid.to_string(),
      phi: Some(PhiFields::default()),
      ..Entry::default()
    };

    let entries = [entry("B", "1"), entry("A", "2"), entry("A", "1")];

    let sorted = sorted_entries(&entries, false);
    assert_eq!(
      sorted
        .iter()
        .map(|e| (e.patient_id.as_str(), e.series_instance_uid.as_str()))
        .collect::<Vec<_>>(),
      vec![("A", "1"), ("A", "2"), ("B", "1")]
    );
    assert!(sorted.iter().all(|e| e.phi.is_none()));

    let sorted = sorted_entries(&entries, true);
    assert!(sorted.iter().all(|e| e.phi.is_some()));
  }
}
