//! Reads the fields recorded in manifests from DICOM P10 files, using `dcmfx`.

mod dicom_object;
mod dicom_read_error;

pub use dicom_object::{DicomObject, is_dicom_file, read_series_object};
pub use dicom_read_error::DicomReadError;
