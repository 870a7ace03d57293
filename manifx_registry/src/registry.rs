//! The in-memory registry of manifest entries, keyed by series instance UID.

use std::{collections::HashMap, sync::Arc};

use manifx_core::{Entry, FieldTags, SeriesObject, field_value, sorted_entries};
use parking_lot::Mutex;

use crate::{ManifestStatus, QuarantineDepth};

/// Read access to a registry's entries, used by the history store to find the
/// entry that seeds a series' history.
///
pub trait EntrySource {
  /// Returns a copy of the entry for the given series, if there is one.
  ///
  fn entry(&self, series_instance_uid: &str) -> Option<Entry>;

  /// Returns the series instance UIDs of all entries, in no particular order.
  ///
  fn keys(&self) -> Vec<String>;

  /// Returns the number of entries.
  ///
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// A concurrency-safe map from series instance UID to [`Entry`], along with
/// the counters reported by [`ManifestRegistry::status()`].
///
/// All operations serialize on a single lock, so concurrent calls to
/// [`ManifestRegistry::log()`] for the same series never lose an update.
/// Readers only ever receive copies of entries.
///
pub struct ManifestRegistry {
  state: Mutex<RegistryState>,
  quarantine: Arc<dyn QuarantineDepth>,
  field_tags: FieldTags,
}

#[derive(Default)]
struct RegistryState {
  entries: HashMap<String, Entry>,
  starting_quarantine_count: u64,
  queued_instance_count: u64,
  manifest_instance_count: u64,
}

impl ManifestRegistry {
  /// Creates an empty registry. The collection and site name fields are read
  /// from the data elements given by `field_tags`, and `quarantine` is
  /// consulted for the quarantine depth whenever status is reported.
  ///
  pub fn new(
    field_tags: FieldTags,
    quarantine: Arc<dyn QuarantineDepth>,
  ) -> Self {
    Self {
      state: Mutex::new(RegistryState::default()),
      quarantine,
      field_tags,
    }
  }

  /// The tags used to read the collection and site name fields.
  ///
  pub fn field_tags(&self) -> &FieldTags {
    &self.field_tags
  }

  /// Records one instance of the object's series, creating the series' entry
  /// if this is the first instance seen. When the cached original of the
  /// object is given, and the entry doesn't yet hold original identifying
  /// values, they are taken from it.
  ///
  /// Fields that can't be read are recorded as empty strings.
  ///
  pub fn log(
    &self,
    object: &dyn SeriesObject,
    original: Option<&dyn SeriesObject>,
  ) {
    let series_instance_uid = field_value(object.series_instance_uid());
    let mut new_entry = Entry::from_object(object, original, &self.field_tags);
    let phi = new_entry.phi.take();

    let mut state = self.state.lock();

    let entry = state
      .entries
      .entry(series_instance_uid.clone())
      .or_insert(new_entry);

    if entry.phi.is_none() {
      entry.phi = phi;
    }

    entry.add_instance();
    let num_files = entry.num_files;

    state.manifest_instance_count += 1;

    tracing::debug!(
      series_instance_uid = %series_instance_uid,
      num_files,
      "Logged instance"
    );
  }

  /// Discards all entries, zeroes the instance counters, and takes a new
  /// snapshot of the quarantine depth.
  ///
  pub fn clear(&self) {
    let quarantine_depth = self.quarantine.quarantine_depth();

    let mut state = self.state.lock();
    let series_count = state.entries.len();

    *state = RegistryState {
      starting_quarantine_count: quarantine_depth,
      ..RegistryState::default()
    };

    tracing::info!(series_count, "Cleared manifest");
  }

  /// Counts one instance handed towards the export stage.
  ///
  pub fn increment_queued_instance(&self) {
    self.state.lock().queued_instance_count += 1;
  }

  /// Returns the number of instances summed across all entries.
  ///
  pub fn instance_count(&self) -> u64 {
    self.state.lock().instance_count()
  }

  /// Returns the running count of logged instances. It restarts from zero on
  /// a clear, and from the entry total on [`Self::initialize_counts()`].
  ///
  pub fn manifest_instance_count(&self) -> u64 {
    self.state.lock().manifest_instance_count
  }

  /// Returns the number of instances handed towards export since the last
  /// reset.
  ///
  pub fn queued_instance_count(&self) -> u64 {
    self.state.lock().queued_instance_count
  }

  /// Returns the number of series in the registry.
  ///
  pub fn series_count(&self) -> usize {
    self.state.lock().entries.len()
  }

  /// Returns copies of all entries sorted by patient ID then series instance
  /// UID. Original identifying values are only included when `include_phi`
  /// is set.
  ///
  pub fn snapshot(&self, include_phi: bool) -> Vec<Entry> {
    let state = self.state.lock();
    sorted_entries(state.entries.values(), include_phi)
  }

  /// Returns the registry's counters along with the current quarantine
  /// depth.
  ///
  pub fn status(&self) -> ManifestStatus {
    let current_quarantine_count = self.quarantine.quarantine_depth();

    let state = self.state.lock();

    ManifestStatus {
      starting_quarantine_count: state.starting_quarantine_count,
      current_quarantine_count,
      current_manifest_instance_count: state.instance_count(),
      queued_instance_count: state.queued_instance_count,
    }
  }

  /// Starts a new counting period: the running instance count is reset to
  /// the entry total, the queued count is zeroed, and the quarantine depth is
  /// snapshotted. Returns the resulting status.
  ///
  pub fn initialize_counts(&self) -> ManifestStatus {
    let quarantine_depth = self.quarantine.quarantine_depth();

    let mut state = self.state.lock();
    state.manifest_instance_count = state.instance_count();
    state.queued_instance_count = 0;
    state.starting_quarantine_count = quarantine_depth;

    ManifestStatus {
      starting_quarantine_count: quarantine_depth,
      current_quarantine_count: quarantine_depth,
      current_manifest_instance_count: state.manifest_instance_count,
      queued_instance_count: 0,
    }
  }
}

impl RegistryState {
  fn instance_count(&self) -> u64 {
    self
      .entries
      .values()
      .map(|entry| u64::from(entry.num_files))
      .sum()
  }
}

impl EntrySource for ManifestRegistry {
  fn entry(&self, series_instance_uid: &str) -> Option<Entry> {
    self.state.lock().entries.get(series_instance_uid).cloned()
  }

  fn keys(&self) -> Vec<String> {
    self.state.lock().entries.keys().cloned().collect()
  }

  fn len(&self) -> usize {
    self.series_count()
  }
}
