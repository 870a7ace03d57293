//! Manifest and export history bookkeeping for DICOM de-identification
//! pipelines.
//!
//! A [`ManifestService`] records each series as its instances pass through
//! the import, de-identification, and export stages of a pipeline, keeps a
//! persistent history of everything exported, and renders both as CSV, XML,
//! or XLSX. The [`wizard`] module maps the wizard UI's requests onto it.
//!
//! The individual crates are re-exported as modules.

pub use manifx_core as core;
pub use manifx_dicom as dicom;
pub use manifx_history as history;
pub use manifx_registry as registry;
pub use manifx_render as render;

mod config;
mod manifest_service;
mod service_error;
pub mod wizard;

pub use config::{ConfigError, FieldTagsConfig, ManifestConfig};
pub use manifest_service::ManifestService;
pub use service_error::ServiceError;
