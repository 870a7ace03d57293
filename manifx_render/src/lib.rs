//! Renders sorted manifest entries as delimited text, an XML tree, or an XLSX
//! spreadsheet. All three forms show the same rows in the same order, with
//! the columns given by a [`Layout`].

mod format;
pub mod grid;
pub mod layout;
mod render_error;
pub mod text;
pub mod tree;

use manifx_core::Entry;

pub use format::OutputFormat;
pub use grid::{Grid, render_grid};
pub use layout::{Cell, Column, Field, Layout};
pub use render_error::RenderError;
pub use text::render_text;
pub use tree::render_tree;

/// Renders entries in the given format.
///
pub fn render(
  format: OutputFormat,
  entries: &[Entry],
  layout: &Layout,
) -> Result<Vec<u8>, RenderError> {
  match format {
    OutputFormat::Csv => Ok(render_text(entries, layout).into_bytes()),
    OutputFormat::Xml => Ok(render_tree(entries, layout)?.into_bytes()),
    OutputFormat::Xlsx => render_grid(entries, layout),
  }
}
