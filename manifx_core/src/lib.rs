//! Core types for recording DICOM series in manifests: the [`Entry`] row, the
//! [`SeriesObject`] capability used to read fields from decoded objects, and
//! the shared error reporting trait.

pub mod clock;
pub mod entry;
pub mod error;
pub mod series_object;

pub use clock::{Clock, ManualClock, SystemClock, format_export_date};
pub use entry::{Entry, ExportTimes, PhiFields, sorted_entries};
pub use error::{ManifestError, error_report, print_error_lines};
pub use series_object::{FieldTags, SeriesObject, SeriesRecord, field_value};
