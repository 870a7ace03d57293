//! Reads manifest fields from a DICOM data set.

use std::path::Path;

use dcmfx::core::{DataElementTag, DataSet, ValueRepresentation, dictionary};
use manifx_core::SeriesObject;

use crate::DicomReadError;

/// A decoded DICOM object whose fields can be recorded in a manifest.
///
#[derive(Clone, Debug)]
pub struct DicomObject {
  data_set: DataSet,
}

impl DicomObject {
  pub fn new(data_set: DataSet) -> Self {
    Self { data_set }
  }

  pub fn data_set(&self) -> &DataSet {
    &self.data_set
  }

  fn string(&self, tag: DataElementTag) -> Option<String> {
    let value = self.data_set.get_value(tag).ok()?;

    if let Ok(s) = value.get_string() {
      return Some(s.to_string());
    }

    // Private data elements read from implicit VR files have no known VR, so
    // their bytes are interpreted as text directly
    if value.value_representation() == ValueRepresentation::Unknown {
      let bytes = value.bytes().ok()?;
      let s = String::from_utf8_lossy(&bytes[..]);

      return Some(s.trim_matches(['\0', ' ']).to_string());
    }

    None
  }
}

impl From<DataSet> for DicomObject {
  fn from(data_set: DataSet) -> Self {
    Self::new(data_set)
  }
}

impl SeriesObject for DicomObject {
  fn series_instance_uid(&self) -> Option<String> {
    self.string(dictionary::SERIES_INSTANCE_UID.tag)
  }

  fn sop_instance_uid(&self) -> Option<String> {
    self.string(dictionary::SOP_INSTANCE_UID.tag)
  }

  fn patient_id(&self) -> Option<String> {
    self.string(dictionary::PATIENT_ID.tag)
  }

  fn study_date(&self) -> Option<String> {
    self.string(dictionary::STUDY_DATE.tag)
  }

  fn study_description(&self) -> Option<String> {
    self.string(dictionary::STUDY_DESCRIPTION.tag)
  }

  fn series_description(&self) -> Option<String> {
    self.string(dictionary::SERIES_DESCRIPTION.tag)
  }

  fn modality(&self) -> Option<String> {
    self.string(dictionary::MODALITY.tag)
  }

  fn study_instance_uid(&self) -> Option<String> {
    self.string(dictionary::STUDY_INSTANCE_UID.tag)
  }

  fn element_value(&self, tag: u32) -> Option<String> {
    self.string(DataElementTag::new((tag >> 16) as u16, tag as u16))
  }
}

/// Returns whether the file at the given path starts with the DICOM P10
/// preamble and prefix.
///
pub fn is_dicom_file(path: &Path) -> bool {
  dcmfx::p10::is_valid_file(path)
}

/// Reads a DICOM P10 file.
///
pub fn read_series_object(path: &Path) -> Result<DicomObject, DicomReadError> {
  match dcmfx::p10::read_file(path) {
    Ok(data_set) => Ok(DicomObject::new(data_set)),
    Err(error) => Err(DicomReadError::P10 {
      path: path.display().to_string(),
      error,
    }),
  }
}
