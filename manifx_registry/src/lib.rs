//! Records DICOM series as they pass through a processing pipeline, one
//! [`manifx_core::Entry`] per series.

mod quarantine;
mod registry;
mod status;

pub use quarantine::{NoQuarantine, QuarantineDepth};
pub use registry::{EntrySource, ManifestRegistry};
pub use status::ManifestStatus;
