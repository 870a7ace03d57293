//! The spreadsheet grid (XLSX) form.

use manifx_core::Entry;
use rust_xlsxwriter::{Format, Workbook};

use crate::{
  RenderError,
  layout::{Cell, Layout},
};

/// The contents of a single-worksheet spreadsheet: a header row followed by
/// one row per entry.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
  pub sheet_name: String,
  pub headers: Vec<String>,
  pub rows: Vec<Vec<Cell>>,
}

impl Grid {
  /// Lays out entries as rows of cells.
  ///
  pub fn new(entries: &[Entry], layout: &Layout) -> Self {
    Self {
      sheet_name: layout.sheet_name.to_string(),
      headers: layout.headers().into_iter().map(String::from).collect(),
      rows: entries.iter().map(|entry| layout.cells(entry)).collect(),
    }
  }

  /// Writes the grid as an XLSX workbook. The header row is bold, data rows
  /// start directly beneath it, and columns are sized to fit their contents.
  ///
  pub fn to_xlsx(&self) -> Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&self.sheet_name)?;

    let bold = Format::new().set_bold();

    for (col, header) in self.headers.iter().enumerate() {
      worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (i, row) in self.rows.iter().enumerate() {
      let row_number = i as u32 + 1;

      for (col, cell) in row.iter().enumerate() {
        match cell {
          Cell::Text(text) => {
            worksheet.write_string(row_number, col as u16, text)?;
          }
          Cell::Number(n) => {
            worksheet.write_number(row_number, col as u16, *n)?;
          }
        }
      }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
  }
}

/// Renders entries as an XLSX workbook.
///
pub fn render_grid(
  entries: &[Entry],
  layout: &Layout,
) -> Result<Vec<u8>, RenderError> {
  Grid::new(entries, layout).to_xlsx()
}
