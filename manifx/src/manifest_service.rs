//! Wires the manifests, the export history, and the renderers together.

use std::{
  io::Write,
  path::{Path, PathBuf},
  sync::Arc,
};

use manifx_core::{Clock, FieldTags, SeriesObject};
use manifx_history::{HistoryError, HistoryStore};
use manifx_registry::{ManifestRegistry, ManifestStatus, QuarantineDepth};
use manifx_render::{Layout, OutputFormat, RenderError};

use crate::{ConfigError, ManifestConfig, ServiceError};

/// The manifests and export history of a de-identification pipeline.
///
/// The import manifest records objects as they are received. The export
/// manifest records de-identified objects, along with their cached originals
/// when available. The history records every instance handed to the export
/// transport and persists across runs.
///
/// A service is shared by reference between the pipeline stages that feed it
/// and the request handlers that read it. All methods take `&self`.
///
pub struct ManifestService {
  import: ManifestRegistry,
  export: ManifestRegistry,
  history: HistoryStore,
  export_directory: Option<PathBuf>,
}

impl ManifestService {
  /// Assembles a service from its parts.
  ///
  pub fn new(
    import: ManifestRegistry,
    export: ManifestRegistry,
    history: HistoryStore,
  ) -> Self {
    Self {
      import,
      export,
      history,
      export_directory: None,
    }
  }

  /// Creates a service whose history is stored at the configured location.
  ///
  pub fn from_config(
    config: &ManifestConfig,
    quarantine: Arc<dyn QuarantineDepth>,
    clock: Arc<dyn Clock>,
  ) -> Result<Self, ConfigError> {
    let field_tags = config.field_tags()?;

    let history = HistoryStore::open(
      &config.history_path(),
      config.history_map_size,
      clock,
    );

    let mut service = Self::new(
      ManifestRegistry::new(field_tags, quarantine.clone()),
      ManifestRegistry::new(field_tags, quarantine),
      history,
    );
    service.export_directory = config.export_directory.clone();

    Ok(service)
  }

  /// Creates a service whose history is kept in memory.
  ///
  pub fn in_memory(
    field_tags: FieldTags,
    quarantine: Arc<dyn QuarantineDepth>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self::new(
      ManifestRegistry::new(field_tags, quarantine.clone()),
      ManifestRegistry::new(field_tags, quarantine),
      HistoryStore::in_memory(clock),
    )
  }

  pub fn import_manifest(&self) -> &ManifestRegistry {
    &self.import
  }

  pub fn export_manifest(&self) -> &ManifestRegistry {
    &self.export
  }

  pub fn history(&self) -> &HistoryStore {
    &self.history
  }

  /// The directory that export drops are written into, if configured.
  ///
  pub fn export_directory(&self) -> Option<&Path> {
    self.export_directory.as_deref()
  }

  /// Records a de-identified object in the export manifest.
  ///
  pub fn log(
    &self,
    object: &dyn SeriesObject,
    original: Option<&dyn SeriesObject>,
  ) {
    self.export.log(object, original);
  }

  /// Clears the export manifest.
  ///
  pub fn clear(&self) {
    self.export.clear();
  }

  /// Counts one instance handed towards the export stage.
  ///
  pub fn increment_queued_instance(&self) {
    self.export.increment_queued_instance();
  }

  /// Records an instance handed to the export transport in the history.
  /// Failures are logged by the history store and also returned.
  ///
  pub fn log_exported_object(
    &self,
    object: &dyn SeriesObject,
  ) -> Result<(), HistoryError> {
    self.history.record_export(object, &self.export)
  }

  /// Records a received object in the import manifest.
  ///
  pub fn log_import(&self, object: &dyn SeriesObject) {
    self.import.log(object, None);
  }

  pub fn clear_import(&self) {
    self.import.clear();
  }

  /// The number of instances in the import manifest.
  ///
  pub fn import_instance_count(&self) -> u64 {
    self.import.instance_count()
  }

  /// The export manifest's counters and the current quarantine depth.
  ///
  pub fn status(&self) -> ManifestStatus {
    self.export.status()
  }

  /// Starts a new counting period for the export manifest. See
  /// [`ManifestRegistry::initialize_counts()`].
  ///
  pub fn initialize_counts(&self) -> ManifestStatus {
    self.export.initialize_counts()
  }

  /// The number of series in the export manifest.
  ///
  pub fn series_count(&self) -> usize {
    self.export.series_count()
  }

  /// Deletes the whole export history.
  ///
  pub fn clear_history(&self) {
    self.history.clear();
  }

  /// Renders the import manifest.
  ///
  pub fn render_import(
    &self,
    format: OutputFormat,
  ) -> Result<Vec<u8>, RenderError> {
    manifx_render::render(
      format,
      &self.import.snapshot(false),
      &Layout::import(),
    )
  }

  /// Renders the export manifest, with the original identifying values when
  /// `include_phi` is set.
  ///
  pub fn render_manifest(
    &self,
    format: OutputFormat,
    include_phi: bool,
  ) -> Result<Vec<u8>, RenderError> {
    manifx_render::render(
      format,
      &self.export.snapshot(include_phi),
      &Layout::manifest(include_phi),
    )
  }

  /// Renders the export history, with the original identifying values when
  /// `include_phi` is set and the first and last export dates when
  /// `include_dates` is set.
  ///
  pub fn render_history(
    &self,
    format: OutputFormat,
    include_phi: bool,
    include_dates: bool,
  ) -> Result<Vec<u8>, RenderError> {
    manifx_render::render(
      format,
      &self.history.snapshot(include_phi),
      &Layout::history(include_phi, include_dates),
    )
  }

  /// Writes the export manifest, without original identifying values, as a
  /// uniquely named `MAN-*.csv` file in the given directory. Returns the path
  /// of the new file.
  ///
  pub fn write_export_manifest(
    &self,
    directory: &Path,
  ) -> Result<PathBuf, ServiceError> {
    let bytes = self.render_manifest(OutputFormat::Csv, false)?;
    write_unique_file(directory, "MAN-", ".csv", &bytes)
  }

  /// Writes the export history, without original identifying values, as a
  /// uniquely named `HIS-*.xlsx` file in the given directory. Returns the path
  /// of the new file.
  ///
  pub fn write_export_history(
    &self,
    directory: &Path,
  ) -> Result<PathBuf, ServiceError> {
    let bytes = self.render_history(OutputFormat::Xlsx, false, true)?;
    write_unique_file(directory, "HIS-", ".xlsx", &bytes)
  }

  /// Syncs and closes the history store.
  ///
  pub fn shutdown(&self) {
    self.history.shutdown();
  }
}

fn write_unique_file(
  directory: &Path,
  prefix: &str,
  suffix: &str,
  bytes: &[u8],
) -> Result<PathBuf, ServiceError> {
  let mut file = tempfile::Builder::new()
    .prefix(prefix)
    .suffix(suffix)
    .tempfile_in(directory)?;

  file.write_all(bytes)?;
  file.flush()?;

  let (_, path) = file.keep().map_err(|e| e.error)?;

  tracing::info!(path = %path.display(), "Wrote export file");

  Ok(path)
}
