//! The delimited text (CSV) form.

use manifx_core::Entry;

use crate::layout::{Cell, Layout};

const EOL: &str = "\r\n";

/// Renders entries as CSV with a header row.
///
/// Every cell is quoted and followed by a comma, and every row ends with CRLF.
/// Text cells hold the formula `=("value")` so that spreadsheet applications
/// keep them as literal text rather than interpreting them as numbers, dates,
/// or formulas. Quotes are doubled once inside the formula's string literal
/// and again when the cell is quoted, so commas and line breaks in values
/// never split a cell.
///
pub fn render_text(entries: &[Entry], layout: &Layout) -> String {
  let mut s = String::new();

  for header in layout.headers() {
    s.push_str(&quote(header));
    s.push(',');
  }
  s.push_str(EOL);

  for entry in entries {
    for cell in layout.cells(entry) {
      match cell {
        Cell::Text(text) => {
          s.push_str(&quote(&format!("=({})", quote(&text))));
        }
        Cell::Number(n) => s.push_str(&quote(&n.to_string())),
      }

      s.push(',');
    }

    s.push_str(EOL);
  }

  s
}

fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn render_text_test() {
    let entries = vec![Entry {
      patient_id: "P\"1".to_string(),
      study_date: "20200101".to_string(),
      series_instance_uid: "1.2".to_string(),
      num_files: 12,
      ..Entry::default()
    }];

    assert_eq!(
      render_text(&entries, &Layout::import()),
      "\"PatientID\",\"StudyDate\",\"SeriesInstanceUID\",\
       \"StudyDescription\",\"SeriesDescription\",\"Modality\",\
       \"NumFiles\",\r\n\
       \"=(\"\"P\"\"\"\"1\"\")\",\"=(\"\"20200101\"\")\",\
       \"=(\"\"1.2\"\")\",\"=(\"\"\"\")\",\"=(\"\"\"\")\",\
       \"=(\"\"\"\")\",\"12\",\r\n"
    );
  }

  #[test]
  fn render_text_keeps_separators_inside_cells() {
    let entries = vec![Entry {
      series_description: "AX T1, POST\r\nC+".to_string(),
      num_files: 2,
      ..Entry::default()
    }];

    let text = render_text(&entries, &Layout::import());

    assert!(text.contains(",\"=(\"\"AX T1, POST\r\nC+\"\")\","));
    assert!(text.ends_with(",\"2\",\r\n"));
  }

  #[test]
  fn render_text_empty() {
    assert_eq!(
      render_text(&[], &Layout::history(false, true)),
      "\"Collection\",\"SiteName\",\"De-idPatientID\",\"De-idStudyDate\",\
       \"De-idSeriesInstanceUID\",\"StudyDescription\",\"SeriesDescription\",\
       \"Modality\",\"NumFiles\",\"FirstExport\",\"LastExport\",\r\n"
    );
  }
}
