use manifx_core::{Entry, ExportTimes, PhiFields, sorted_entries};
use manifx_render::{Cell, Grid, Layout, render_text, render_tree};

fn entry(patient_id: &str, series: &str, phi: bool) -> Entry {
  Entry {
    collection: "COLL".to_string(),
    site_name: "SITE".to_string(),
    patient_id: patient_id.to_string(),
    study_date: "20200101".to_string(),
    series_instance_uid: series.to_string(),
    modality: "MR".to_string(),
    num_files: 5,
    phi: phi.then(|| PhiFields {
      patient_id: format!("{patient_id}-ORIG"),
      study_date: "19990101".to_string(),
      series_instance_uid: format!("{series}-ORIG"),
    }),
    export: Some(ExportTimes {
      first: 1_710_504_000_000,
      last: 1_710_504_000_000,
    }),
    ..Entry::default()
  }
}

fn entries() -> Vec<Entry> {
  vec![
    entry("B", "S3", true),
    entry("A", "S2", false),
    entry("A", "S1", true),
  ]
}

/// Parses CSV produced by [`render_text`] into rows of unquoted cells,
/// honouring quoted commas and line breaks.
///
fn parse_text(text: &str) -> Vec<Vec<String>> {
  let mut rows = Vec::new();
  let mut row = Vec::new();
  let mut cell = String::new();
  let mut in_quotes = false;
  let mut chars = text.chars().peekable();

  while let Some(c) = chars.next() {
    match (c, in_quotes) {
      ('"', true) if chars.peek() == Some(&'"') => {
        chars.next();
        cell.push('"');
      }
      ('"', _) => in_quotes = !in_quotes,
      (',', false) => row.push(unwrap_formula(&std::mem::take(&mut cell))),
      ('\r', false) if chars.peek() == Some(&'\n') => {
        chars.next();
        rows.push(std::mem::take(&mut row));
      }
      _ => cell.push(c),
    }
  }

  rows
}

/// Turns a `=("value")` text cell back into its value.
///
fn unwrap_formula(cell: &str) -> String {
  match cell
    .strip_prefix("=(\"")
    .and_then(|rest| rest.strip_suffix("\")"))
  {
    Some(value) => value.replace("\"\"", "\""),
    None => cell.to_string(),
  }
}

fn grid_strings(grid: &Grid) -> Vec<Vec<String>> {
  let mut rows = vec![grid.headers.clone()];

  for row in &grid.rows {
    rows.push(row.iter().map(Cell::to_string).collect());
  }

  rows
}

#[test]
fn text_and_grid_agree() {
  for layout in [
    Layout::import(),
    Layout::manifest(false),
    Layout::manifest(true),
    Layout::history(false, false),
    Layout::history(true, true),
  ] {
    let entries = sorted_entries(&entries(), layout.includes_phi());

    let text = parse_text(&render_text(&entries, &layout));
    let grid = grid_strings(&Grid::new(&entries, &layout));

    assert_eq!(text, grid);
    assert_eq!(text.len(), 4);
  }
}

#[test]
fn all_forms_share_row_order() {
  let layout = Layout::manifest(true);
  let entries = sorted_entries(&entries(), true);

  let text = parse_text(&render_text(&entries, &layout));
  let text_order: Vec<_> = text[1..].iter().map(|row| row[7].clone()).collect();

  let grid = Grid::new(&entries, &layout);
  let grid_order: Vec<_> =
    grid.rows.iter().map(|row| row[7].to_string()).collect();

  let xml = render_tree(&entries, &layout).unwrap();
  let tree_order: Vec<_> = ["S1", "S2", "S3"]
    .into_iter()
    .map(|series| {
      let needle = format!("<SeriesInstanceUID value=\"{series}\"");
      (xml.find(&needle).unwrap(), series.to_string())
    })
    .collect::<std::collections::BTreeMap<_, _>>()
    .into_values()
    .collect();

  assert_eq!(text_order, vec!["S1", "S2", "S3"]);
  assert_eq!(grid_order, text_order);
  assert_eq!(tree_order, text_order);
}

#[test]
fn phi_columns_are_strictly_additive() {
  let without_phi = Layout::manifest(false);
  let with_phi = Layout::manifest(true);

  let plain =
    parse_text(&render_text(&sorted_entries(&entries(), false), &without_phi));
  let full =
    parse_text(&render_text(&sorted_entries(&entries(), true), &with_phi));

  let kept: Vec<usize> = with_phi
    .columns
    .iter()
    .enumerate()
    .filter(|(_, column)| !column.field.is_phi())
    .map(|(i, _)| i)
    .collect();

  for (plain_row, full_row) in plain.iter().zip(&full) {
    let projected: Vec<_> = kept.iter().map(|i| full_row[*i].clone()).collect();
    assert_eq!(&projected, plain_row);
  }
}

#[test]
fn entry_without_phi_has_empty_phi_cells() {
  let layout = Layout::manifest(true);
  let entries = sorted_entries(&entries(), true);

  let text = parse_text(&render_text(&entries, &layout));

  // "A"/"S2" was logged without a cached original
  assert_eq!(text[2][2], "");
  assert_eq!(text[2][3], "A");
  assert_eq!(text[1][2], "A-ORIG");
}

#[test]
fn two_entries_without_phi() {
  let entries = vec![entry("B", "S2", false), entry("A", "S1", false)];
  let entries = sorted_entries(&entries, false);

  let text = render_text(&entries, &Layout::manifest(false));
  let lines: Vec<_> = text.split_terminator("\r\n").collect();

  assert_eq!(lines.len(), 3);
  assert!(lines[0].starts_with("\"Collection\","));
  assert!(lines[1].contains("\"=(\"\"A\"\")\""));
  assert!(lines[2].contains("\"=(\"\"B\"\")\""));
}

#[test]
fn separators_in_values_stay_inside_their_cell() {
  let mut entries = entries();
  entries[0].series_description = "AX T1, POST\r\nC+".to_string();
  entries[1].study_description = "say \"hi\"".to_string();

  let layout = Layout::history(true, true);
  let entries = sorted_entries(&entries, true);

  let text = parse_text(&render_text(&entries, &layout));
  let grid = grid_strings(&Grid::new(&entries, &layout));

  assert_eq!(text.len(), 4);
  for row in &text {
    assert_eq!(row.len(), layout.headers().len());
  }
  assert_eq!(text, grid);
  assert!(text.iter().flatten().any(|cell| cell == "AX T1, POST\r\nC+"));
}
