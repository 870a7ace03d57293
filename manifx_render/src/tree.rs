//! The tagged tree (XML) form.

use manifx_core::Entry;
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, Event},
};

use crate::{RenderError, layout::Layout};

/// Renders entries as an XML document with one `Series` element per entry
/// under the layout's root element.
///
/// Each field is an empty element carrying the de-identified value in a
/// `value` attribute. When the layout includes original identifying values,
/// fields that have one also carry it in a `phi` attribute, omitted for
/// entries with no original values.
///
pub fn render_tree(
  entries: &[Entry],
  layout: &Layout,
) -> Result<String, RenderError> {
  let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

  write_event(
    &mut writer,
    Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
  )?;
  write_event(&mut writer, Event::Start(BytesStart::new(layout.root_element)))?;

  for entry in entries {
    write_event(&mut writer, Event::Start(BytesStart::new("Series")))?;

    for column in layout.columns.iter().filter(|c| !c.field.is_phi()) {
      let field = column.field;
      let value = field.cell(entry).to_string();

      let mut element = BytesStart::new(field.element_name());
      element.push_attribute(("value", value.as_str()));

      if let Some(phi_field) = field.phi_counterpart()
        && layout.includes_field(phi_field)
        && entry.phi.is_some()
      {
        let phi = phi_field.cell(entry).to_string();
        element.push_attribute(("phi", phi.as_str()));
      }

      write_event(&mut writer, Event::Empty(element))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("Series")))?;
  }

  write_event(&mut writer, Event::End(BytesEnd::new(layout.root_element)))?;

  String::from_utf8(writer.into_inner())
    .map_err(|e| RenderError::Tree(e.to_string()))
}

fn write_event(
  writer: &mut Writer<Vec<u8>>,
  event: Event,
) -> Result<(), RenderError> {
  writer
    .write_event(event)
    .map_err(|e| RenderError::Tree(e.to_string()))
}
