//! Defines a trait implemented by all error types in manifx.

use std::io::Write;

use owo_colors::{OwoColorize, Stream::Stderr};

/// Error trait implemented by all error types in manifx.
///
pub trait ManifestError {
  /// Returns lines of text that describe an error in a human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String>;

  /// Prints details on the error to stderr.
  ///
  fn print(&self, task_description: &str) {
    print_error_lines(&self.to_lines(task_description));
  }
}

/// Prints lines of error information to stderr in red, preceded by a
/// separator line.
///
pub fn print_error_lines(lines: &[String]) {
  let _ = std::io::stdout().flush();
  let _ = std::io::stderr().flush();

  eprintln!();
  eprintln!("{}", "-----".if_supports_color(Stderr, |text| text.red()));

  for line in lines {
    eprintln!("{}", line.if_supports_color(Stderr, |text| text.red()));
  }

  eprintln!();
}

/// Builds the lines for an error report: a title line naming the task that
/// failed, a blank line, then one indented `Label: value` line per detail.
///
pub fn error_report(
  title: &str,
  task_description: &str,
  details: &[(&str, String)],
) -> Vec<String> {
  let mut lines = vec![format!("{title} {task_description}"), String::new()];

  for (label, value) in details {
    lines.push(format!("  {label}: {value}"));
  }

  lines
}
