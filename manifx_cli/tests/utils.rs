use std::path::{Path, PathBuf};

use assert_cmd::{Command, assert::Assert, cargo::cargo_bin_cmd};
use dcmfx::core::{DataElementTag, DataElementValue, DataSet, dictionary};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn manifx_cli() -> Command {
  let mut cmd = cargo_bin_cmd!("manifx");
  cmd.env_remove("RUST_LOG");
  cmd
}

fn temp_dir() -> PathBuf {
  if let Ok(t) = std::env::var("RUNNER_TEMP") {
    PathBuf::from(t)
  } else {
    std::env::temp_dir()
  }
}

#[allow(dead_code)]
pub fn create_temp_dir() -> TempDir {
  TempDir::new_in(temp_dir()).unwrap()
}

#[allow(dead_code)]
pub fn get_stdout(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[allow(dead_code)]
pub fn get_stderr(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stderr.clone()).unwrap()
}

/// The fields written into a test DICOM file. An empty series instance UID
/// leaves the data element out.
///
#[allow(dead_code)]
pub struct Fixture<'a> {
  pub patient_id: &'a str,
  pub study_date: &'a str,
  pub series_instance_uid: &'a str,
  pub sop_instance_uid: &'a str,
  pub modality: &'a str,
  pub collection: Option<&'a str>,
}

#[allow(dead_code)]
pub fn write_dicom(path: &Path, fixture: &Fixture) {
  let mut data_set = DataSet::new();

  data_set
    .insert_string_value(&dictionary::PATIENT_ID, &[fixture.patient_id])
    .unwrap();
  data_set
    .insert_string_value(&dictionary::STUDY_DATE, &[fixture.study_date])
    .unwrap();
  if !fixture.series_instance_uid.is_empty() {
    data_set
      .insert_string_value(
        &dictionary::SERIES_INSTANCE_UID,
        &[fixture.series_instance_uid],
      )
      .unwrap();
  }
  data_set
    .insert_string_value(
      &dictionary::SOP_INSTANCE_UID,
      &[fixture.sop_instance_uid],
    )
    .unwrap();
  data_set
    .insert_string_value(&dictionary::MODALITY, &[fixture.modality])
    .unwrap();

  if let Some(collection) = fixture.collection {
    data_set.insert(
      DataElementTag::new(0x0013, 0x1010),
      DataElementValue::new_long_string(&[collection]).unwrap(),
    );
  }

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }

  dcmfx::p10::write_file(path, &data_set, None).unwrap();
}
