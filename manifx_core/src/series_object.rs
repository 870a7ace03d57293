//! The capability the manifest bookkeeping needs from a decoded DICOM object.

use std::collections::HashMap;

/// Read access to the fields of a decoded DICOM object that are recorded in
/// manifests. Every accessor returns `None` when the field is absent or can't
/// be read as a string.
///
/// Implementations exist for real DICOM data sets in `manifx_dicom`, and
/// [`SeriesRecord`] is a plain in-memory implementation.
///
pub trait SeriesObject {
  /// *'(0020,000E) Series Instance UID'*.
  fn series_instance_uid(&self) -> Option<String>;

  /// *'(0008,0018) SOP Instance UID'*.
  fn sop_instance_uid(&self) -> Option<String>;

  /// *'(0010,0020) Patient ID'*.
  fn patient_id(&self) -> Option<String>;

  /// *'(0008,0020) Study Date'*.
  fn study_date(&self) -> Option<String>;

  /// *'(0008,1030) Study Description'*.
  fn study_description(&self) -> Option<String>;

  /// *'(0008,103E) Series Description'*.
  fn series_description(&self) -> Option<String>;

  /// *'(0008,0060) Modality'*.
  fn modality(&self) -> Option<String>;

  /// *'(0020,000D) Study Instance UID'*.
  fn study_instance_uid(&self) -> Option<String>;

  /// Returns the string value of an arbitrary data element, addressed by its
  /// 32-bit tag, e.g. `0x00131010`.
  ///
  fn element_value(&self, tag: u32) -> Option<String>;
}

/// Normalizes an extracted field value: surrounding whitespace is trimmed and
/// a missing value becomes the empty string.
///
pub fn field_value(value: Option<String>) -> String {
  match value {
    Some(value) => value.trim().to_string(),
    None => String::new(),
  }
}

/// The tags of the two free-form data elements that hold the collection and
/// site names.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldTags {
  pub collection: u32,
  pub site_name: u32,
}

impl FieldTags {
  /// The private tags conventionally written by the anonymizer:
  /// `(0013,1010)` for the collection and `(0013,1012)` for the site name.
  ///
  pub const DEFAULT: Self = Self {
    collection: 0x0013_1010,
    site_name: 0x0013_1012,
  };

  /// Parses a tag written as eight hex digits, optionally in the
  /// `(gggg,eeee)` form.
  ///
  pub fn parse_tag(s: &str) -> Result<u32, String> {
    let hex: String = s
      .chars()
      .filter(|c| !matches!(c, '(' | ')' | ',' | ' '))
      .collect();

    if hex.len() != 8 {
      return Err(format!("Invalid data element tag: '{s}'"));
    }

    u32::from_str_radix(&hex, 16)
      .map_err(|_| format!("Invalid data element tag: '{s}'"))
  }
}

impl Default for FieldTags {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// An in-memory [`SeriesObject`] holding field values directly. Useful when
/// the fields have already been extracted, and in tests.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesRecord {
  pub series_instance_uid: Option<String>,
  pub sop_instance_uid: Option<String>,
  pub patient_id: Option<String>,
  pub study_date: Option<String>,
  pub study_description: Option<String>,
  pub series_description: Option<String>,
  pub modality: Option<String>,
  pub study_instance_uid: Option<String>,
  pub elements: HashMap<u32, String>,
}

impl SeriesRecord {
  /// Creates a record for one instance of the given series.
  ///
  pub fn new(series_instance_uid: &str, sop_instance_uid: &str) -> Self {
    Self {
      series_instance_uid: Some(series_instance_uid.to_string()),
      sop_instance_uid: Some(sop_instance_uid.to_string()),
      ..Self::default()
    }
  }

  pub fn patient_id(mut self, value: &str) -> Self {
    self.patient_id = Some(value.to_string());
    self
  }

  pub fn study_date(mut self, value: &str) -> Self {
    self.study_date = Some(value.to_string());
    self
  }

  pub fn study_description(mut self, value: &str) -> Self {
    self.study_description = Some(value.to_string());
    self
  }

  pub fn series_description(mut self, value: &str) -> Self {
    self.series_description = Some(value.to_string());
    self
  }

  pub fn modality(mut self, value: &str) -> Self {
    self.modality = Some(value.to_string());
    self
  }

  pub fn study_instance_uid(mut self, value: &str) -> Self {
    self.study_instance_uid = Some(value.to_string());
    self
  }

  /// Sets the value of a tag-addressed data element.
  ///
  pub fn element(mut self, tag: u32, value: &str) -> Self {
    self.elements.insert(tag, value.to_string());
    self
  }
}

impl SeriesObject for SeriesRecord {
  fn series_instance_uid(&self) -> Option<String> {
    self.series_instance_uid.clone()
  }

  fn sop_instance_uid(&self) -> Option<String> {
    self.sop_instance_uid.clone()
  }

  fn patient_id(&self) -> Option<String> {
    self.patient_id.clone()
  }

  fn study_date(&self) -> Option<String> {
    self.study_date.clone()
  }

  fn study_description(&self) -> Option<String> {
    self.study_description.clone()
  }

  fn series_description(&self) -> Option<String> {
    self.series_description.clone()
  }

  fn modality(&self) -> Option<String> {
    self.modality.clone()
  }

  fn study_instance_uid(&self) -> Option<String> {
    self.study_instance_uid.clone()
  }

  fn element_value(&self, tag: u32) -> Option<String> {
    self.elements.get(&tag).cloned()
  }
}
