//! The columns shown by each kind of manifest.

use manifx_core::{Entry, format_export_date};

/// A single field of an [`Entry`] that can be shown in a column.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
  Collection,
  SiteName,
  PatientId,
  StudyDate,
  SeriesInstanceUid,
  StudyDescription,
  SeriesDescription,
  Modality,
  NumFiles,
  FirstExport,
  LastExport,
  PhiPatientId,
  PhiStudyDate,
  PhiSeriesInstanceUid,
}

/// The value of a field in a row.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
  Text(String),
  Number(u32),
}

impl core::fmt::Display for Cell {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Cell::Text(s) => write!(f, "{s}"),
      Cell::Number(n) => write!(f, "{n}"),
    }
  }
}

impl Field {
  /// Returns the field's value for an entry. Original identifying values are
  /// empty when the entry doesn't have them, as are export dates on entries
  /// that haven't been exported.
  ///
  pub fn cell(self, entry: &Entry) -> Cell {
    let phi = entry.phi.as_ref();
    let text = |s: &str| Cell::Text(s.to_string());

    match self {
      Field::Collection => text(&entry.collection),
      Field::SiteName => text(&entry.site_name),
      Field::PatientId => text(&entry.patient_id),
      Field::StudyDate => text(&entry.study_date),
      Field::SeriesInstanceUid => text(&entry.series_instance_uid),
      Field::StudyDescription => text(&entry.study_description),
      Field::SeriesDescription => text(&entry.series_description),
      Field::Modality => text(&entry.modality),
      Field::NumFiles => Cell::Number(entry.num_files),

      Field::FirstExport => Cell::Text(
        entry
          .export
          .map(|times| format_export_date(times.first))
          .unwrap_or_default(),
      ),
      Field::LastExport => Cell::Text(
        entry
          .export
          .map(|times| format_export_date(times.last))
          .unwrap_or_default(),
      ),

      Field::PhiPatientId => text(phi.map_or("", |p| p.patient_id.as_str())),
      Field::PhiStudyDate => text(phi.map_or("", |p| p.study_date.as_str())),
      Field::PhiSeriesInstanceUid => {
        text(phi.map_or("", |p| p.series_instance_uid.as_str()))
      }
    }
  }

  /// Returns whether this field holds an original identifying value.
  ///
  pub fn is_phi(self) -> bool {
    matches!(
      self,
      Field::PhiPatientId | Field::PhiStudyDate | Field::PhiSeriesInstanceUid
    )
  }

  /// Returns the field holding the original value of this field, if it has
  /// one.
  ///
  pub fn phi_counterpart(self) -> Option<Field> {
    match self {
      Field::PatientId => Some(Field::PhiPatientId),
      Field::StudyDate => Some(Field::PhiStudyDate),
      Field::SeriesInstanceUid => Some(Field::PhiSeriesInstanceUid),
      _ => None,
    }
  }

  /// The name of the element that holds this field in the XML form.
  ///
  pub fn element_name(self) -> &'static str {
    match self {
      Field::Collection => "Collection",
      Field::SiteName => "SiteName",
      Field::PatientId | Field::PhiPatientId => "PatientID",
      Field::StudyDate | Field::PhiStudyDate => "StudyDate",
      Field::SeriesInstanceUid | Field::PhiSeriesInstanceUid => {
        "SeriesInstanceUID"
      }
      Field::StudyDescription => "StudyDescription",
      Field::SeriesDescription => "SeriesDescription",
      Field::Modality => "Modality",
      Field::NumFiles => "NumFiles",
      Field::FirstExport => "FirstExport",
      Field::LastExport => "LastExport",
    }
  }
}

/// A column: its header text and the field it shows.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
  pub header: &'static str,
  pub field: Field,
}

const fn column(header: &'static str, field: Field) -> Column {
  Column { header, field }
}

const IMPORT_COLUMNS: [Column; 7] = [
  column("PatientID", Field::PatientId),
  column("StudyDate", Field::StudyDate),
  column("SeriesInstanceUID", Field::SeriesInstanceUid),
  column("StudyDescription", Field::StudyDescription),
  column("SeriesDescription", Field::SeriesDescription),
  column("Modality", Field::Modality),
  column("NumFiles", Field::NumFiles),
];

const EXPORT_COLUMNS: [Column; 9] = [
  column("Collection", Field::Collection),
  column("SiteName", Field::SiteName),
  column("De-idPatientID", Field::PatientId),
  column("De-idStudyDate", Field::StudyDate),
  column("De-idSeriesInstanceUID", Field::SeriesInstanceUid),
  column("StudyDescription", Field::StudyDescription),
  column("SeriesDescription", Field::SeriesDescription),
  column("Modality", Field::Modality),
  column("NumFiles", Field::NumFiles),
];

const LOCAL_COLUMNS: [Column; 12] = [
  column("Collection", Field::Collection),
  column("SiteName", Field::SiteName),
  column("PatientID", Field::PhiPatientId),
  column("De-idPatientID", Field::PatientId),
  column("StudyDate", Field::PhiStudyDate),
  column("De-idStudyDate", Field::StudyDate),
  column("SeriesInstanceUID", Field::PhiSeriesInstanceUid),
  column("De-idSeriesInstanceUID", Field::SeriesInstanceUid),
  column("StudyDescription", Field::StudyDescription),
  column("SeriesDescription", Field::SeriesDescription),
  column("Modality", Field::Modality),
  column("NumFiles", Field::NumFiles),
];

const DATE_COLUMNS: [Column; 2] = [
  column("FirstExport", Field::FirstExport),
  column("LastExport", Field::LastExport),
];

/// The columns of a rendered manifest, and the names used for the XML root
/// element and the spreadsheet's worksheet.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
  pub columns: Vec<Column>,
  pub root_element: &'static str,
  pub sheet_name: &'static str,
}

impl Layout {
  /// The layout of the import manifest, which records the values received
  /// before de-identification.
  ///
  pub fn import() -> Self {
    Self {
      columns: IMPORT_COLUMNS.to_vec(),
      root_element: "Manifest",
      sheet_name: "Manifest",
    }
  }

  /// The layout of the de-identified manifest. With `include_phi` each
  /// original identifying value is shown in the column before its
  /// de-identified counterpart.
  ///
  pub fn manifest(include_phi: bool) -> Self {
    let columns = if include_phi {
      LOCAL_COLUMNS.to_vec()
    } else {
      EXPORT_COLUMNS.to_vec()
    };

    Self {
      columns,
      root_element: "Manifest",
      sheet_name: "Manifest",
    }
  }

  /// The layout of the export history. With `include_dates` the first and
  /// last export dates are appended.
  ///
  pub fn history(include_phi: bool, include_dates: bool) -> Self {
    let mut columns = Self::manifest(include_phi).columns;

    if include_dates {
      columns.extend_from_slice(&DATE_COLUMNS);
    }

    Self {
      columns,
      root_element: "History",
      sheet_name: "History",
    }
  }

  /// Returns the header text of every column.
  ///
  pub fn headers(&self) -> Vec<&'static str> {
    self.columns.iter().map(|column| column.header).collect()
  }

  /// Returns whether any column holds original identifying values.
  ///
  pub fn includes_phi(&self) -> bool {
    self.columns.iter().any(|column| column.field.is_phi())
  }

  pub fn includes_field(&self, field: Field) -> bool {
    self.columns.iter().any(|column| column.field == field)
  }

  /// Returns an entry's cells in column order.
  ///
  pub fn cells(&self, entry: &Entry) -> Vec<Cell> {
    self
      .columns
      .iter()
      .map(|column| column.field.cell(entry))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use manifx_core::{ExportTimes, PhiFields};

  #[test]
  fn phi_columns_precede_their_counterparts() {
    let layout = Layout::manifest(true);

    for (i, column) in layout.columns.iter().enumerate() {
      if let Some(phi) = column.field.phi_counterpart() {
        assert_eq!(layout.columns[i - 1].field, phi);
      }
    }
  }

  #[test]
  fn history_headers() {
    assert_eq!(
      Layout::history(false, true).headers(),
      vec![
        "Collection",
        "SiteName",
        "De-idPatientID",
        "De-idStudyDate",
        "De-idSeriesInstanceUID",
        "StudyDescription",
        "SeriesDescription",
        "Modality",
        "NumFiles",
        "FirstExport",
        "LastExport"
      ]
    );

    assert_eq!(Layout::history(true, false).headers().len(), 12);
    assert!(Layout::history(true, false).includes_phi());
    assert!(!Layout::history(false, true).includes_phi());
  }

  #[test]
  fn cells_test() {
    let entry = Entry {
      patient_id: "ANON".to_string(),
      num_files: 4,
      phi: Some(PhiFields {
        patient_id: "P1".to_string(),
        ..PhiFields::default()
      }),
      export: Some(ExportTimes {
        first: 1_710_504_000_000,
        last: 1_710_504_000_000,
      }),
      ..Entry::default()
    };

    assert_eq!(Field::PhiPatientId.cell(&entry), Cell::Text("P1".into()));
    assert_eq!(Field::PatientId.cell(&entry), Cell::Text("ANON".into()));
    assert_eq!(Field::NumFiles.cell(&entry), Cell::Number(4));
    assert_eq!(
      Field::LastExport.cell(&entry),
      Cell::Text("2024.03.15".into())
    );

    let entry = Entry::default();
    assert_eq!(Field::PhiStudyDate.cell(&entry), Cell::Text("".into()));
    assert_eq!(Field::FirstExport.cell(&entry), Cell::Text("".into()));
  }
}
