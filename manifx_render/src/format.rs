/// The encodings a manifest can be rendered in.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
  Csv,
  Xml,
  Xlsx,
}

impl OutputFormat {
  /// Parses a file extension such as `"csv"`. Matching is case-insensitive.
  ///
  pub fn from_extension(extension: &str) -> Option<Self> {
    match extension.to_ascii_lowercase().as_str() {
      "csv" => Some(Self::Csv),
      "xml" => Some(Self::Xml),
      "xlsx" => Some(Self::Xlsx),
      _ => None,
    }
  }

  pub fn extension(self) -> &'static str {
    match self {
      Self::Csv => "csv",
      Self::Xml => "xml",
      Self::Xlsx => "xlsx",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::Csv => "text/csv",
      Self::Xml => "application/xml",
      Self::Xlsx => {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
      }
    }
  }
}

impl core::fmt::Display for OutputFormat {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}", self.extension())
  }
}
